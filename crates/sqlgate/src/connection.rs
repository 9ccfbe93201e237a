//! The driver seam.
//!
//! Builders never open connections. They take any [`Connection`] by reference
//! at execution time, so a direct client, a pooled client or a transaction can
//! all be passed in the same way.

use crate::config::Placeholder;
use crate::error::BoxError;
use crate::value::Value;
use std::future::Future;

/// A live database session able to run parameterized statements.
pub trait Connection: Send + Sync {
    /// Result-set cursor returned by [`Connection::query`].
    type Cursor: RowCursor + Send;

    /// The driver's native placeholder style, if it has one.
    ///
    /// Used when a builder has no explicit style configured.
    fn placeholder(&self) -> Option<Placeholder> {
        None
    }

    /// Run a row-returning statement.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Self::Cursor, BoxError>> + Send;

    /// Run a statement and return the number of affected rows.
    fn exec(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<u64, BoxError>> + Send;
}

/// A forward-only result cursor.
///
/// Protocol: `columns()`, then `next()` / `scan()` until `next()` returns
/// `false`, then `take_err()` for a deferred iteration error, and finally
/// `close()`.
pub trait RowCursor {
    /// Column names in result-set order.
    fn columns(&self) -> Result<Vec<String>, BoxError>;

    /// Advance to the next row. `false` at the end or on failure.
    fn next(&mut self) -> impl Future<Output = bool> + Send;

    /// Read the current row, one value per column.
    fn scan(&mut self) -> Result<Vec<Value>, BoxError>;

    /// The error that stopped iteration early, if any.
    fn take_err(&mut self) -> Option<BoxError>;

    /// Release the cursor.
    fn close(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send;
}
