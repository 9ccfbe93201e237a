//! Statement builders.
//!
//! Every builder is a plain owned value configured by chained `self -> Self`
//! calls. `build()` renders `(sql, params)` without touching a database;
//! `execute(&conn)` builds with the connection's placeholder style and runs
//! the statement.
//!
//! # Usage
//!
//! ```ignore
//! use sqlgate::qb;
//! use sqlgate::{Condition, Record};
//!
//! let users = qb::select("users")
//!     .select(["id", "name"])
//!     .where_conditions(vec![Condition::eq("status", "active")])
//!     .order_by(["id ASC"])
//!     .cursor("id", last_seen_id)
//!     .limit(20)
//!     .execute(&client)
//!     .await?;
//!
//! qb::insert("users")
//!     .set("username", "alice")
//!     .set("email", "alice@example.com")
//!     .execute(&client)
//!     .await?;
//!
//! qb::update("users")
//!     .set("status", "inactive")
//!     .where_eq(Record::new().set("id", user_id))
//!     .execute(&client)
//!     .await?;
//!
//! qb::delete("users")
//!     .where_conditions(vec![Condition::eq("id", user_id)])
//!     .execute(&client)
//!     .await?;
//! ```

mod clause;
mod delete;
mod insert;
mod param;
mod select;
mod traits;
mod update;

pub use clause::{Cursor, OrderSpec};
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::{GetOrCreate, QueryBuilder};
pub use traits::{BuiltQuery, MutationQuery};
pub use update::{UpdateQuery, update_many, update_many_with};

/// Create a SELECT query builder for the given table.
pub fn select(table: &str) -> QueryBuilder {
    QueryBuilder::new(table)
}

/// Create an INSERT query builder for the given table.
pub fn insert(table: &str) -> InsertQuery {
    InsertQuery::new(table)
}

/// Create a multi-row INSERT for the given table.
pub fn insert_bulk(table: &str, rows: Vec<crate::Record>) -> InsertQuery {
    InsertQuery::bulk(table, rows)
}

/// Create an UPDATE query builder for the given table.
pub fn update(table: &str) -> UpdateQuery {
    UpdateQuery::new(table)
}

/// Create a soft-delete UPDATE for the given table.
pub fn soft_delete(table: &str, conditions: Vec<crate::Condition>) -> UpdateQuery {
    UpdateQuery::soft_delete(table, conditions)
}

/// Create a DELETE query builder for the given table.
///
/// A DELETE that renders no WHERE predicate fails to build.
pub fn delete(table: &str) -> DeleteQuery {
    DeleteQuery::new(table)
}
