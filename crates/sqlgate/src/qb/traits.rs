//! Shared pieces of the statement builders.

use crate::config::{Placeholder, QueryConfig};
use crate::connection::Connection;
use crate::error::{DbError, DbResult, Stage};
use crate::log::log_statement;
use crate::value::Value;
use std::future::Future;

/// The result of building a statement: SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// Number of placeholders / parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// INSERT / UPDATE / DELETE builders.
pub trait MutationQuery: Sync {
    /// Target table.
    fn table(&self) -> &str;

    /// Builder configuration.
    fn query_config(&self) -> &QueryConfig;

    /// Build with an explicit placeholder style.
    fn build_with(&self, style: Placeholder) -> DbResult<BuiltQuery>;

    /// Build with the configured placeholder style (`?` unless forced).
    fn build(&self) -> DbResult<BuiltQuery> {
        self.build_with(self.query_config().build_style())
    }

    /// Build, then run on `conn` and return the affected row count.
    fn execute<C: Connection>(&self, conn: &C) -> impl Future<Output = DbResult<u64>> + Send {
        async move {
            let style = self.query_config().exec_style(conn.placeholder());
            let built = self.build_with(style)?;
            exec_built(conn, self.query_config(), self.table(), &built).await
        }
    }
}

/// Log and run a built mutation.
pub(crate) async fn exec_built<C: Connection>(
    conn: &C,
    config: &QueryConfig,
    table: &str,
    built: &BuiltQuery,
) -> DbResult<u64> {
    log_statement(config, table, &built.sql, built.param_count());
    conn.exec(&built.sql, &built.params)
        .await
        .map_err(|e| DbError::stage(Stage::Exec, e))
}
