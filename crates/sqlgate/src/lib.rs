//! # sqlgate
//!
//! A small SQL query-builder and execution layer.
//!
//! ## Features
//!
//! - **Values are always bound**: conditions render placeholders, never literals
//! - **Driver-agnostic**: anything implementing [`Connection`] can run a statement
//! - **Placeholder styles**: `?`, `$n` and `@pn`, picked per builder or per connection
//! - **Keyset pagination**: `cursor(field, value)` adds `field > ?` to the WHERE clause
//! - **Safe defaults**: UPDATE and DELETE refuse to run without a WHERE predicate
//! - **Ordered records**: rows come back as [`Record`]s in result-set column order
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlgate::{Condition, FilterGroup, OperatorGroup, qb};
//!
//! // Typed conditions
//! let rows = qb::select("users")
//!     .select(["id", "name"])
//!     .where_conditions(vec![Condition::eq("status", "active")])
//!     .order_by(["id ASC"])
//!     .limit(10)
//!     .execute(&client)
//!     .await?;
//!
//! // Loosely-typed groups with per-field operator overrides
//! let rows = qb::select("people")
//!     .where_groups(
//!         vec![FilterGroup::new().list("age", [18, 65])],
//!         vec![OperatorGroup::new().op("age", "BETWEEN")],
//!     )
//!     .execute(&client)
//!     .await?;
//! ```
//!
//! With the `postgres` feature, `tokio_postgres::Client` and
//! `tokio_postgres::Transaction` implement [`Connection`].

extern crate self as sqlgate;

pub mod condition;
pub mod config;
pub mod connection;
pub mod error;
mod log;
pub mod qb;
pub mod record;
pub mod row;
pub mod schema;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use condition::{Condition, FilterGroup, Operand, Operator, OperatorGroup, conditions_from_groups};
pub use config::{Placeholder, QueryConfig};
pub use connection::{Connection, RowCursor};
pub use error::{BoxError, DbError, DbResult, Stage};
pub use record::Record;
pub use row::{collect_records, first_record, materialize};
pub use schema::{Field, FieldType, Model, Schema};
pub use value::{FromValue, Value};

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, DeleteQuery, GetOrCreate, InsertQuery, MutationQuery, OrderSpec, QueryBuilder,
    UpdateQuery, delete, insert, select, soft_delete, update, update_many,
};

#[cfg(feature = "postgres")]
pub use pg::PgCursor;

#[cfg(feature = "derive")]
pub use sqlgate_derive::Model;
