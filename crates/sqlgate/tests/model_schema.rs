#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlgate::{Field, FieldType, Model, QueryBuilder};

#[derive(Debug, Clone, Model)]
#[orm(table = "users")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[orm(column = "email_address")]
    pub email: Option<String>,
    pub avatar: Option<Vec<u8>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[orm(skip)]
    pub cached_rank: f64,
    password_hash: String,
}

#[derive(Model)]
#[orm(table = "audit_logs")]
pub struct AuditLog {
    pub r#type: String,
    pub latency_ms: Option<f32>,
}

#[test]
fn derive_keeps_public_fields_in_order() {
    let schema = User::schema();
    assert_eq!(schema.table, "users");
    assert_eq!(
        schema.column_names(),
        vec!["id", "username", "email_address", "avatar", "active", "created_at"]
    );
}

#[test]
fn derive_maps_types_and_nullability() {
    let schema = User::schema();
    assert_eq!(
        schema.field("email_address"),
        Some(&Field::new("email_address", FieldType::Text).nullable())
    );
    assert_eq!(
        schema.field("avatar"),
        Some(&Field::new("avatar", FieldType::Bytes).nullable())
    );
    assert_eq!(schema.field("active").map(|f| f.ty), Some(FieldType::Bool));
    assert_eq!(
        schema.field("created_at").map(|f| f.ty),
        Some(FieldType::Timestamp)
    );
    assert!(schema.field("cached_rank").is_none());
    assert!(schema.field("password_hash").is_none());
}

#[test]
fn raw_identifiers_are_unescaped() {
    let schema = AuditLog::schema();
    assert_eq!(schema.column_names(), vec!["type", "latency_ms"]);
    assert_eq!(
        schema.field("latency_ms"),
        Some(&Field::new("latency_ms", FieldType::Float).nullable())
    );
}

#[test]
fn model_query_selects_schema_columns() {
    let built = QueryBuilder::for_model::<User>().limit(5).build().unwrap();
    assert_eq!(
        built.sql,
        "SELECT id, username, email_address, avatar, active, created_at FROM users LIMIT 5"
    );
}
