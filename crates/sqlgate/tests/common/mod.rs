//! Scripted in-memory `Connection` for integration tests.
#![allow(dead_code)]

use sqlgate::{BoxError, Connection, Placeholder, RowCursor, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Query,
    Exec,
}

/// One statement the connection received.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub kind: Kind,
    pub sql: String,
    pub params: Vec<Value>,
}

pub struct MockCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Result<Vec<Value>, String>>,
    current: Option<Result<Vec<Value>, String>>,
    deferred: Option<String>,
    fail_close: bool,
    closed: Arc<AtomicBool>,
}

impl MockCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self::scripted(columns, rows.into_iter().map(Ok).collect())
    }

    /// Rows that may fail to scan.
    pub fn scripted(columns: &[&str], rows: Vec<Result<Vec<Value>, String>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter(),
            current: None,
            deferred: None,
            fail_close: false,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Report `message` from `take_err` once the rows run out.
    pub fn deferred_error(mut self, message: &str) -> Self {
        self.deferred = Some(message.to_string());
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Flag set once `close` has been called.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

impl RowCursor for MockCursor {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.columns.clone())
    }

    async fn next(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn scan(&mut self) -> Result<Vec<Value>, BoxError> {
        match self.current.take() {
            Some(row) => row.map_err(Into::into),
            None => Err("no current row".into()),
        }
    }

    fn take_err(&mut self) -> Option<BoxError> {
        self.deferred.take().map(Into::into)
    }

    async fn close(&mut self) -> Result<(), BoxError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            Err("close failed".into())
        } else {
            Ok(())
        }
    }
}

/// Replays scripted results in order and records every statement.
///
/// An unscripted query returns an empty result; an unscripted exec affects
/// one row.
#[derive(Default)]
pub struct MockConnection {
    native: Option<Placeholder>,
    queries: Mutex<VecDeque<Result<MockCursor, String>>>,
    execs: Mutex<VecDeque<Result<u64, String>>>,
    log: Mutex<Vec<Executed>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `style` as the driver's native placeholder.
    pub fn native(mut self, style: Placeholder) -> Self {
        self.native = Some(style);
        self
    }

    pub fn push_cursor(&self, cursor: MockCursor) -> Arc<AtomicBool> {
        let closed = cursor.closed_flag();
        self.queries.lock().unwrap().push_back(Ok(cursor));
        closed
    }

    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) -> Arc<AtomicBool> {
        self.push_cursor(MockCursor::new(columns, rows))
    }

    pub fn push_query_error(&self, message: &str) {
        self.queries
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn push_affected(&self, rows: u64) {
        self.execs.lock().unwrap().push_back(Ok(rows));
    }

    pub fn push_exec_error(&self, message: &str) {
        self.execs
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn statements(&self) -> Vec<Executed> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, kind: Kind, sql: &str, params: &[Value]) {
        self.log.lock().unwrap().push(Executed {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl Connection for MockConnection {
    type Cursor = MockCursor;

    fn placeholder(&self) -> Option<Placeholder> {
        self.native
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<MockCursor, BoxError> {
        self.record(Kind::Query, sql, params);
        let next = self.queries.lock().unwrap().pop_front();
        match next {
            Some(Ok(cursor)) => Ok(cursor),
            Some(Err(message)) => Err(message.into()),
            None => Ok(MockCursor::new(&[], vec![])),
        }
    }

    async fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, BoxError> {
        self.record(Kind::Exec, sql, params);
        let next = self.execs.lock().unwrap().pop_front();
        match next {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(message.into()),
            None => Ok(1),
        }
    }
}
