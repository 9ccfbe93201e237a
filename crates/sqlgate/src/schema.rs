//! Static model descriptors.
//!
//! A [`Schema`] lists a model's table and columns once, in declaration order.
//! [`QueryBuilder::select`](crate::QueryBuilder::select) falls back to it when
//! no explicit column list is given. Usually produced by `#[derive(Model)]`.

/// Broad column type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Integer,
    Float,
    Text,
    Bytes,
    Timestamp,
    /// A Rust type without a scalar mapping (e.g. a JSON wrapper).
    Other,
}

/// One column of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Table name plus ordered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub table: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(table: &'static str, fields: &'static [Field]) -> Self {
        Self { table, fields }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.to_string()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A type with a static schema.
pub trait Model {
    fn schema() -> &'static Schema;
}
