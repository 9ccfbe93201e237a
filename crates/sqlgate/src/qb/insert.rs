//! INSERT builder, single-row and multi-row.

use crate::config::{Placeholder, QueryConfig};
use crate::error::{DbError, DbResult};
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQuery};
use crate::record::Record;
use crate::value::Value;

/// INSERT query builder.
///
/// The column list comes from the first row, in its field order. Later rows
/// are rendered in that same column order; a column a later row lacks binds
/// `NULL`, and fields a later row has beyond the first row's are ignored.
#[derive(Clone, Debug)]
pub struct InsertQuery {
    table: String,
    rows: Vec<Record>,
    bulk: bool,
    config: QueryConfig,
}

impl InsertQuery {
    /// Create a new INSERT query builder.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: Vec::new(),
            bulk: false,
            config: QueryConfig::default(),
        }
    }

    /// Multi-row insert of `rows` in one statement.
    pub fn bulk(table: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            rows,
            bulk: true,
            ..Self::new(table)
        }
    }

    /// Set the single row to insert, replacing any previous one.
    pub fn values(mut self, data: Record) -> Self {
        self.rows = vec![data];
        self.bulk = false;
        self
    }

    /// Set one column of the single row.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        match self.rows.first_mut() {
            Some(row) => row.insert(column, value),
            None => self.rows.push(Record::new().set(column, value)),
        }
        self
    }

    /// Force a placeholder style.
    pub fn placeholder(mut self, style: Placeholder) -> Self {
        self.config.placeholder = Some(style);
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// The single row, or an empty record.
    pub(crate) fn into_row(self) -> Record {
        self.rows.into_iter().next().unwrap_or_default()
    }

    fn what(&self) -> String {
        if self.bulk {
            format!("bulk insert into {}", self.table)
        } else {
            format!("insert into {}", self.table)
        }
    }
}

impl MutationQuery for InsertQuery {
    fn table(&self) -> &str {
        &self.table
    }

    fn query_config(&self) -> &QueryConfig {
        &self.config
    }

    fn build_with(&self, style: Placeholder) -> DbResult<BuiltQuery> {
        let columns: Vec<&str> = match self.rows.first() {
            Some(first) if !first.is_empty() => first.fields().collect(),
            _ => return Err(DbError::EmptyValues(self.what())),
        };

        let mut params = ParamList::new(style);
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let phs: Vec<String> = columns
                    .iter()
                    .map(|col| params.push(row.get(col).cloned().unwrap_or(Value::Null)))
                    .collect();
                format!("({})", phs.join(", "))
            })
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            columns.join(", "),
            tuples.join(", ")
        );
        Ok(BuiltQuery::new(sql, params.into_values()))
    }
}
