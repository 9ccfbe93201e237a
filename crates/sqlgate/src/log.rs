//! Statement logging through `tracing`.

use crate::config::QueryConfig;

/// Truncate `sql` to at most `max` bytes without splitting a UTF-8 character.
pub(crate) fn truncate_sql_bytes(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit the statement about to be executed on target `sqlgate.sql`.
pub(crate) fn log_statement(config: &QueryConfig, table: &str, sql: &str, param_count: usize) {
    if !config.log_statements {
        return;
    }
    match config.max_sql_length {
        Some(max) if sql.len() > max => {
            let truncated = format!("{}...", truncate_sql_bytes(sql, max));
            tracing::debug!(target: "sqlgate.sql", table, param_count, sql = %truncated);
        }
        _ => tracing::debug!(target: "sqlgate.sql", table, param_count, sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting inside it backs off.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }
}
