//! UPDATE query builder, soft delete and per-row bulk update.

use crate::condition::Condition;
use crate::config::{Placeholder, QueryConfig};
use crate::connection::Connection;
use crate::error::{DbError, DbResult};
use crate::qb::clause::render_filter;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQuery, exec_built};
use crate::record::Record;
use crate::value::Value;
use chrono::{DateTime, Utc};

/// UPDATE query builder.
///
/// SET parameters are numbered before WHERE parameters. An UPDATE whose
/// rendered WHERE is empty is refused with [`DbError::MissingWhere`], and a
/// NULL-valued filter with [`DbError::NullFilter`].
#[derive(Clone, Debug)]
pub struct UpdateQuery {
    /// Table name
    table: String,
    /// SET columns, in order
    set_fields: Record,
    /// WHERE conditions
    conditions: Vec<Condition>,
    /// Soft-delete timestamp, bound ahead of any other SET column
    deleted_at: Option<DateTime<Utc>>,
    config: QueryConfig,
}

impl UpdateQuery {
    /// Create a new UPDATE query builder.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set_fields: Record::new(),
            conditions: Vec::new(),
            deleted_at: None,
            config: QueryConfig::default(),
        }
    }

    /// Mark matching rows deleted: `UPDATE t SET deleted_at = ? WHERE ...`.
    ///
    /// The timestamp is taken now, so rebuilding the statement binds the
    /// same instant. The column is `QueryConfig::soft_delete_column`.
    pub fn soft_delete(table: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            deleted_at: Some(Utc::now()),
            conditions,
            ..Self::new(table)
        }
    }

    /// Set a column value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_fields.insert(column, value);
        self
    }

    /// Set every field of `data`, in its order.
    pub fn set_record(mut self, data: Record) -> Self {
        for (column, value) in data {
            self.set_fields.insert(column, value);
        }
        self
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

    /// The soft-delete timestamp, when this is a soft delete.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn what(&self) -> String {
        if self.deleted_at.is_some() {
            format!("soft delete of {}", self.table)
        } else {
            format!("update of {}", self.table)
        }
    }
}

impl MutationQuery for UpdateQuery {
    fn table(&self) -> &str {
        &self.table
    }

    fn query_config(&self) -> &QueryConfig {
        &self.config
    }

    fn build_with(&self, style: Placeholder) -> DbResult<BuiltQuery> {
        let mut params = ParamList::new(style);
        let mut sets = Vec::with_capacity(self.set_fields.len() + 1);

        if let Some(at) = self.deleted_at {
            let ph = params.push(Value::Timestamp(at));
            sets.push(format!("{} = {ph}", self.config.soft_delete_column));
        }
        for (column, value) in self.set_fields.iter() {
            if self.deleted_at.is_some() && column == self.config.soft_delete_column {
                continue;
            }
            let ph = params.push(value.clone());
            sets.push(format!("{column} = {ph}"));
        }
        if sets.is_empty() {
            return Err(DbError::EmptyValues(self.what()));
        }

        let where_sql = render_filter(&self.conditions, &mut params)?;
        if where_sql.is_empty() {
            return Err(DbError::MissingWhere(self.what()));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            sets.join(", "),
            where_sql
        );
        Ok(BuiltQuery::new(sql, params.into_values()))
    }
}

/// Apply each row of `rows` as the SET list of its own UPDATE, all sharing
/// `conditions`, and return the total affected row count.
///
/// Every statement is built before the first one runs, so a construction
/// error executes nothing. Execution is sequential and stops at the first
/// failing statement; earlier statements are not rolled back unless `conn`
/// is a transaction.
pub async fn update_many<C: Connection>(
    conn: &C,
    table: &str,
    rows: &[Record],
    conditions: &[Condition],
) -> DbResult<u64> {
    update_many_with(conn, &QueryConfig::default(), table, rows, conditions).await
}

/// [`update_many`] with an explicit configuration.
pub async fn update_many_with<C: Connection>(
    conn: &C,
    config: &QueryConfig,
    table: &str,
    rows: &[Record],
    conditions: &[Condition],
) -> DbResult<u64> {
    if rows.is_empty() {
        return Err(DbError::EmptyValues(format!("bulk update of {table}")));
    }

    let style = config.exec_style(conn.placeholder());
    let statements = rows
        .iter()
        .map(|row| {
            UpdateQuery::new(table)
                .config(config.clone())
                .set_record(row.clone())
                .where_conditions(conditions.to_vec())
                .build_with(style)
        })
        .collect::<DbResult<Vec<_>>>()?;

    let mut affected = 0;
    for built in &statements {
        affected += exec_built(conn, config, table, built).await?;
    }
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_params_precede_where_params() {
        let q = UpdateQuery::new("users")
            .set("status", "inactive")
            .set("score", 3)
            .where_conditions(vec![Condition::eq("id", 7), Condition::gt("age", 18)])
            .placeholder(Placeholder::Dollar)
            .build()
            .unwrap();
        assert_eq!(
            q.sql,
            "UPDATE users SET status = $1, score = $2 WHERE id = $3 AND age > $4"
        );
        assert_eq!(
            q.params,
            vec![
                Value::from("inactive"),
                Value::Int(3),
                Value::Int(7),
                Value::Int(18)
            ]
        );
    }

    #[test]
    fn empty_where_is_refused() {
        let err = UpdateQuery::new("users").set("a", 1).build().unwrap_err();
        assert!(matches!(err, DbError::MissingWhere(_)));
    }

    #[test]
    fn null_filter_is_refused_not_dropped() {
        let err = UpdateQuery::new("orders")
            .set("archived", true)
            .where_eq(
                Record::new()
                    .set("tenant_id", Value::Null)
                    .set("status", "stale"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, DbError::NullFilter { ref field } if field == "tenant_id"));

        let err = UpdateQuery::new("users")
            .set("a", 1)
            .where_eq(Record::new().set("id", Value::Null))
            .build()
            .unwrap_err();
        assert!(matches!(err, DbError::NullFilter { .. }));
    }

    #[test]
    fn soft_delete_refuses_null_filter() {
        let err = UpdateQuery::soft_delete(
            "orders",
            vec![Condition::eq("status", "stale"), Condition::eq("tenant_id", Value::Null)],
        )
        .build()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "WHERE condition on 'tenant_id' has a NULL value"
        );
    }

    #[test]
    fn empty_set_is_refused() {
        let err = UpdateQuery::new("users")
            .where_conditions(vec![Condition::eq("id", 1)])
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "no data provided for update of users");
    }

    #[test]
    fn soft_delete_binds_timestamp_first() {
        let q = UpdateQuery::soft_delete("users", vec![Condition::eq("id", 42)]);
        let at = q.deleted_at().unwrap();
        let built = q.build().unwrap();
        assert_eq!(built.sql, "UPDATE users SET deleted_at = ? WHERE id = ?");
        assert_eq!(built.params, vec![Value::Timestamp(at), Value::Int(42)]);
        assert_eq!(q.build().unwrap(), built);
    }

    #[test]
    fn soft_delete_column_is_configurable() {
        let q = UpdateQuery::soft_delete("posts", vec![Condition::eq("id", 1)])
            .config(QueryConfig::new().soft_delete_column("removed_at"))
            .build()
            .unwrap();
        assert_eq!(q.sql, "UPDATE posts SET removed_at = ? WHERE id = ?");
    }
}
