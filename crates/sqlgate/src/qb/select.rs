//! SELECT query builder with cursor pagination.

use crate::condition::{Condition, FilterGroup, OperatorGroup, conditions_from_groups};
use crate::config::{Placeholder, QueryConfig};
use crate::connection::Connection;
use crate::error::{DbError, DbResult, Stage};
use crate::log::log_statement;
use crate::qb::clause::{Cursor, OrderSpec, render_order, render_where};
use crate::qb::insert::InsertQuery;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQuery, exec_built};
use crate::record::Record;
use crate::row::{collect_records, first_record};
use crate::schema::{Model, Schema};
use crate::value::Value;
use std::borrow::Cow;

/// WHERE state as supplied by the caller.
///
/// The group form is kept unconverted so that construction errors surface
/// from `build()` / `execute()` instead of from the setter.
#[derive(Clone, Debug)]
enum WhereClause {
    Conditions(Vec<Condition>),
    Groups {
        groups: Vec<FilterGroup>,
        operators: Vec<OperatorGroup>,
    },
}

impl WhereClause {
    fn conditions(&self) -> DbResult<Cow<'_, [Condition]>> {
        match self {
            WhereClause::Conditions(conds) => Ok(Cow::Borrowed(conds)),
            WhereClause::Groups { groups, operators } => {
                conditions_from_groups(groups, operators).map(Cow::Owned)
            }
        }
    }
}

/// Outcome of [`QueryBuilder::get_or_create`].
#[derive(Clone, Debug, PartialEq)]
pub enum GetOrCreate {
    /// The first row matched by the query.
    Existing(Record),
    /// Nothing matched; this is the data that was inserted.
    Created(Record),
}

impl GetOrCreate {
    /// Whether an insert happened.
    pub fn was_created(&self) -> bool {
        matches!(self, GetOrCreate::Created(_))
    }

    pub fn record(&self) -> &Record {
        match self {
            GetOrCreate::Existing(r) | GetOrCreate::Created(r) => r,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            GetOrCreate::Existing(r) | GetOrCreate::Created(r) => r,
        }
    }
}

/// SELECT query builder.
///
/// Every setter replaces the corresponding state; nothing accumulates across
/// calls. Parameters are produced by `build()` and never stored, so building
/// the same builder twice gives identical output.
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    /// FROM table
    table: String,
    /// Column source when no explicit list is given
    schema: Option<&'static Schema>,
    /// Explicit SELECT list
    columns: Vec<String>,
    /// WHERE conditions
    where_clause: WhereClause,
    /// ORDER BY specs
    order: Vec<OrderSpec>,
    /// LIMIT, ignored when `<= 0`
    limit: i64,
    /// Keyset pagination anchor
    cursor: Option<Cursor>,
    config: QueryConfig,
}

impl QueryBuilder {
    /// Create a new SELECT query builder for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            columns: Vec::new(),
            where_clause: WhereClause::Conditions(Vec::new()),
            order: Vec::new(),
            limit: 0,
            cursor: None,
            config: QueryConfig::default(),
        }
    }

    /// Builder for a model's table, with its schema bound.
    pub fn for_model<M: Model>() -> Self {
        let schema = M::schema();
        Self::new(schema.table).with_schema(schema)
    }

    /// Bind a schema, used for the column list when none is selected.
    pub fn with_schema(mut self, schema: &'static Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    // ==================== SELECT columns ====================

    /// Set the SELECT list.
    ///
    /// An empty list means "derive from the schema", or `*` without one.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    // ==================== WHERE ====================

    /// Replace the WHERE state with loosely-typed groups.
    ///
    /// `operators` is index-aligned with `groups`; a missing group or field
    /// means equality.
    pub fn where_groups(mut self, groups: Vec<FilterGroup>, operators: Vec<OperatorGroup>) -> Self {
        self.where_clause = WhereClause::Groups { groups, operators };
        self
    }

    /// Replace the WHERE state with typed conditions.
    pub fn where_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.where_clause = WhereClause::Conditions(conditions);
        self
    }

    // ==================== ORDER / LIMIT / cursor ====================

    pub fn order_by<I, O>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderSpec>,
    {
        self.order = specs.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.limit = n;
        self
    }

    /// Only return rows with `field > value`. A `Null` value clears the cursor.
    pub fn cursor(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.cursor = if value.is_null() {
            None
        } else {
            Some(Cursor {
                field: field.into(),
                value,
            })
        };
        self
    }

    // ==================== Config ====================

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

    pub fn table(&self) -> &str {
        &self.table
    }

    // ==================== Build ====================

    fn select_list(&self) -> String {
        if !self.columns.is_empty() {
            return self.columns.join(", ");
        }
        match self.schema {
            Some(schema) if !schema.fields.is_empty() => schema.column_names().join(", "),
            _ => "*".to_string(),
        }
    }

    /// Build with the configured placeholder style (`?` unless forced).
    pub fn build(&self) -> DbResult<BuiltQuery> {
        self.build_with(self.config.build_style())
    }

    /// Build with an explicit placeholder style.
    pub fn build_with(&self, style: Placeholder) -> DbResult<BuiltQuery> {
        let conditions = self.where_clause.conditions()?;
        let mut params = ParamList::new(style);

        let mut sql = format!("SELECT {} FROM {}", self.select_list(), self.table);

        let where_sql = render_where(&conditions, self.cursor.as_ref(), &mut params)?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.order.is_empty() {
            let order_sql = render_order(&self.order);
            if !order_sql.is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(&order_sql);
            }
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }

        Ok(BuiltQuery::new(sql, params.into_values()))
    }

    /// INSERT of `data` into this builder's table, sharing its configuration.
    pub fn build_insert(&self, data: &Record) -> DbResult<BuiltQuery> {
        self.insert_for(data.clone()).build()
    }

    fn insert_for(&self, data: Record) -> InsertQuery {
        InsertQuery::new(self.table.as_str())
            .config(self.config.clone())
            .values(data)
    }

    // ==================== Execute ====================

    async fn open<C: Connection>(&self, conn: &C) -> DbResult<C::Cursor> {
        let built = self.build_with(self.config.exec_style(conn.placeholder()))?;
        log_statement(&self.config, &self.table, &built.sql, built.param_count());
        conn.query(&built.sql, &built.params)
            .await
            .map_err(|e| DbError::stage(Stage::Query, e))
    }

    /// Run the query and return every row.
    pub async fn execute<C: Connection>(&self, conn: &C) -> DbResult<Vec<Record>> {
        let cursor = self.open(conn).await?;
        collect_records(cursor).await
    }

    /// Run the query and return the first row, if any.
    pub async fn fetch_first<C: Connection>(&self, conn: &C) -> DbResult<Option<Record>> {
        let cursor = self.open(conn).await?;
        first_record(cursor).await
    }

    /// Return the first matching row, or insert `create_data` when nothing matches.
    ///
    /// The created variant carries `create_data` as given. Values the database
    /// fills in (identity columns, defaults) are not read back. The INSERT is
    /// only built once the SELECT came back empty, so `create_data` is not
    /// checked when a row already exists.
    pub async fn get_or_create<C: Connection>(
        &self,
        conn: &C,
        create_data: Record,
    ) -> DbResult<GetOrCreate> {
        if let Some(existing) = self.fetch_first(conn).await? {
            return Ok(GetOrCreate::Existing(existing));
        }

        let insert = self.insert_for(create_data);
        let insert_sql = insert.build_with(self.config.exec_style(conn.placeholder()))?;
        exec_built(conn, &self.config, &self.table, &insert_sql).await?;
        Ok(GetOrCreate::Created(insert.into_row()))
    }
}
