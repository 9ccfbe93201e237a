//! DELETE query builder.

use crate::condition::Condition;
use crate::config::{Placeholder, QueryConfig};
use crate::error::{DbError, DbResult};
use crate::qb::clause::render_filter;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQuery};
use crate::record::Record;

/// DELETE query builder.
///
/// A DELETE without any rendered WHERE predicate is refused with
/// [`DbError::MissingWhere`]; there is no way to delete every row. A
/// NULL-valued filter is refused with [`DbError::NullFilter`].
#[derive(Clone, Debug)]
pub struct DeleteQuery {
    table: String,
    conditions: Vec<Condition>,
    config: QueryConfig,
}

impl DeleteQuery {
    /// Create a new DELETE query builder.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            config: QueryConfig::default(),
        }
    }

    /// Replace the WHERE conditions.
    pub fn where_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Replace the WHERE conditions with one equality per field of `filter`.
    pub fn where_eq(mut self, filter: Record) -> Self {
        self.conditions = filter
            .into_iter()
            .map(|(field, value)| Condition::eq(field, value))
            .collect();
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
}

impl MutationQuery for DeleteQuery {
    fn table(&self) -> &str {
        &self.table
    }

    fn query_config(&self) -> &QueryConfig {
        &self.config
    }

    fn build_with(&self, style: Placeholder) -> DbResult<BuiltQuery> {
        let mut params = ParamList::new(style);
        let where_sql = render_filter(&self.conditions, &mut params)?;
        if where_sql.is_empty() {
            return Err(DbError::MissingWhere(format!("delete from {}", self.table)));
        }
        let sql = format!("DELETE FROM {} WHERE {}", self.table, where_sql);
        Ok(BuiltQuery::new(sql, params.into_values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn delete_with_filter() {
        let q = DeleteQuery::new("sessions")
            .where_eq(Record::new().set("user_id", 5).set("kind", "web"))
            .build()
            .unwrap();
        assert_eq!(q.sql, "DELETE FROM sessions WHERE user_id = ? AND kind = ?");
        assert_eq!(q.params, vec![Value::Int(5), Value::from("web")]);
    }

    #[test]
    fn partially_null_filter_is_refused() {
        let err = DeleteQuery::new("orders")
            .where_eq(
                Record::new()
                    .set("tenant_id", Value::Null)
                    .set("status", "stale"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, DbError::NullFilter { ref field } if field == "tenant_id"));
    }

    #[test]
    fn delete_without_where_is_refused() {
        let err = DeleteQuery::new("sessions").build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "delete from sessions requires at least one WHERE condition"
        );
    }
}
