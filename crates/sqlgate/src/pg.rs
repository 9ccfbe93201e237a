//! PostgreSQL adapter over `tokio-postgres`.
//!
//! [`Connection`] is implemented for `tokio_postgres::Client` and
//! `tokio_postgres::Transaction`, so a builder runs the same way inside and
//! outside a transaction. Statements are prepared first; column names come
//! from the prepared statement and are reported even for empty results.

use crate::config::Placeholder;
use crate::connection::{Connection, RowCursor};
use crate::error::BoxError;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_postgres::types::{IsNull, ToSql, Type};
use tokio_postgres::{GenericClient, Row, Statement};

/// Encode `v` only if `T` accepts the parameter type.
fn checked<T: ToSql>(v: &T, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    v.to_sql_checked(ty, out)
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => checked(v, ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => checked(&i16::try_from(*v)?, ty, out),
                Type::INT4 => checked(&i32::try_from(*v)?, ty, out),
                Type::FLOAT4 => checked(&(*v as f32), ty, out),
                Type::FLOAT8 => checked(&(*v as f64), ty, out),
                _ => checked(v, ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => checked(&(*v as f32), ty, out),
                _ => checked(v, ty, out),
            },
            Value::Text(v) => match *ty {
                Type::JSON | Type::JSONB => {
                    checked(&serde_json::from_str::<serde_json::Value>(v)?, ty, out)
                }
                _ => checked(v, ty, out),
            },
            Value::Bytes(v) => checked(v, ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => checked(&v.naive_utc(), ty, out),
                _ => checked(v, ty, out),
            },
        }
    }

    /// Any type some variant can be written as; the variant itself is
    /// checked again in `to_sql`.
    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <f32 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
            || <serde_json::Value as ToSql>::accepts(ty)
            || <Vec<u8> as ToSql>::accepts(ty)
            || <DateTime<Utc> as ToSql>::accepts(ty)
            || <NaiveDateTime as ToSql>::accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Fully buffered result set of one prepared query.
#[derive(Debug)]
pub struct PgCursor {
    columns: Vec<(String, Type)>,
    rows: std::vec::IntoIter<Row>,
    current: Option<Row>,
}

impl PgCursor {
    fn new(stmt: &Statement, rows: Vec<Row>) -> Self {
        Self {
            columns: stmt
                .columns()
                .iter()
                .map(|c| (c.name().to_string(), c.type_().clone()))
                .collect(),
            rows: rows.into_iter(),
            current: None,
        }
    }
}

impl RowCursor for PgCursor {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.columns.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn next(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn scan(&mut self) -> Result<Vec<Value>, BoxError> {
        let row = self.current.as_ref().ok_or("scan called without a current row")?;
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, (name, ty))| decode_cell(row, idx, name, ty))
            .collect()
    }

    fn take_err(&mut self) -> Option<BoxError> {
        // Rows are fully read by `query`; failures surface there.
        None
    }

    async fn close(&mut self) -> Result<(), BoxError> {
        self.rows = Vec::new().into_iter();
        self.current = None;
        Ok(())
    }
}

fn decode_cell(row: &Row, idx: usize, name: &str, ty: &Type) -> Result<Value, BoxError> {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx)?.map(Value::from),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.map(Value::from),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(Value::Int),
        Type::FLOAT4 => row.try_get::<_, Option<f32>>(idx)?.map(Value::from),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(Value::Float),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(idx)?.map(Value::Text)
        }
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(Value::Bytes),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(Value::from),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(Value::Timestamp),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<serde_json::Value>>(idx)?
            .map(|v| Value::Text(v.to_string())),
        _ => return Err(format!("column {name}: unsupported type {ty}").into()),
    };
    Ok(value.unwrap_or(Value::Null))
}

fn as_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

async fn run_query<C>(client: &C, sql: &str, params: &[Value]) -> Result<PgCursor, BoxError>
where
    C: GenericClient + Sync,
{
    let stmt = client.prepare(sql).await?;
    let rows = client.query(&stmt, &as_params(params)).await?;
    Ok(PgCursor::new(&stmt, rows))
}

async fn run_exec<C>(client: &C, sql: &str, params: &[Value]) -> Result<u64, BoxError>
where
    C: GenericClient + Sync,
{
    Ok(client.execute(sql, &as_params(params)).await?)
}

impl Connection for tokio_postgres::Client {
    type Cursor = PgCursor;

    fn placeholder(&self) -> Option<Placeholder> {
        Some(Placeholder::Dollar)
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<PgCursor, BoxError> {
        run_query(self, sql, params).await
    }

    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, BoxError> {
        run_exec(self, sql, params).await
    }
}

impl Connection for tokio_postgres::Transaction<'_> {
    type Cursor = PgCursor;

    fn placeholder(&self) -> Option<Placeholder> {
        Some(Placeholder::Dollar)
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<PgCursor, BoxError> {
        run_query(self, sql, params).await
    }

    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, BoxError> {
        run_exec(self, sql, params).await
    }
}
