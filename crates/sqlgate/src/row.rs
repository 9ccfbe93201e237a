//! Row materialization: result cursor to [`Record`]s.

use crate::connection::RowCursor;
use crate::error::{DbError, DbResult, Stage};
use crate::record::Record;

/// Read every remaining row of `cursor` into records.
///
/// Field order follows the cursor's column order. Zero rows yield an empty
/// vector. A scan failure or a deferred iteration error discards everything
/// read so far. The cursor is not closed; see [`collect_records`] for that.
pub async fn materialize<R: RowCursor>(cursor: &mut R) -> DbResult<Vec<Record>> {
    let columns = cursor
        .columns()
        .map_err(|e| DbError::stage(Stage::Columns, e))?;

    let mut records = Vec::new();
    while cursor.next().await {
        records.push(scan_record(cursor, &columns)?);
    }
    if let Some(err) = cursor.take_err() {
        return Err(DbError::stage(Stage::Iteration, err));
    }
    Ok(records)
}

/// Materialize all rows, then close the cursor on every exit path.
pub async fn collect_records<R: RowCursor>(mut cursor: R) -> DbResult<Vec<Record>> {
    let result = materialize(&mut cursor).await;
    release(&mut cursor).await;
    result
}

/// Read only the first row, then close the cursor.
pub async fn first_record<R: RowCursor>(mut cursor: R) -> DbResult<Option<Record>> {
    let result = read_first(&mut cursor).await;
    release(&mut cursor).await;
    result
}

async fn read_first<R: RowCursor>(cursor: &mut R) -> DbResult<Option<Record>> {
    let columns = cursor
        .columns()
        .map_err(|e| DbError::stage(Stage::Columns, e))?;
    if cursor.next().await {
        return scan_record(cursor, &columns).map(Some);
    }
    match cursor.take_err() {
        Some(err) => Err(DbError::stage(Stage::Iteration, err)),
        None => Ok(None),
    }
}

fn scan_record<R: RowCursor>(cursor: &mut R, columns: &[String]) -> DbResult<Record> {
    let values = cursor.scan().map_err(|e| DbError::stage(Stage::Scan, e))?;
    if values.len() != columns.len() {
        return Err(DbError::stage(
            Stage::Scan,
            format!(
                "row has {} values for {} columns",
                values.len(),
                columns.len()
            ),
        ));
    }

    let mut record = Record::with_capacity(columns.len());
    for (column, value) in columns.iter().zip(values) {
        record.insert(column.as_str(), value);
    }
    Ok(record)
}

/// Close the cursor, logging rather than returning any failure.
async fn release<R: RowCursor>(cursor: &mut R) {
    if let Err(err) = cursor.close().await {
        tracing::warn!(target: "sqlgate", error = %err, "failed to close rows");
    }
}
