//! Builder configuration.

use serde::Deserialize;

/// How parameter placeholders are written into statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `?` (MySQL, SQLite)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
    /// `@p1`, `@p2`, ... (SQL Server)
    AtP,
}

impl Placeholder {
    /// Render the placeholder for the 1-based parameter `index`.
    pub fn render(self, index: usize) -> String {
        match self {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${index}"),
            Placeholder::AtP => format!("@p{index}"),
        }
    }
}

/// Settings shared by all builders.
///
/// Deserializable so it can live in an application's own config file:
///
/// ```toml
/// placeholder = "dollar"
/// max_sql_length = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Forced placeholder style. `None` defers to the connection at execution
    /// time and to `?` for `build()`.
    pub placeholder: Option<Placeholder>,
    /// Emit a `tracing` event for every executed statement.
    pub log_statements: bool,
    /// Truncate logged SQL to this many bytes. `None` disables truncation.
    pub max_sql_length: Option<usize>,
    /// Column set by soft deletes.
    pub soft_delete_column: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            log_statements: true,
            max_sql_length: Some(200),
            soft_delete_column: "deleted_at".to_string(),
        }
    }
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a placeholder style.
    pub fn placeholder(mut self, style: Placeholder) -> Self {
        self.placeholder = Some(style);
        self
    }

    /// Enable or disable statement logging.
    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    /// Set maximum logged SQL length.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Set the soft-delete timestamp column.
    pub fn soft_delete_column(mut self, column: impl Into<String>) -> Self {
        self.soft_delete_column = column.into();
        self
    }

    /// The style used for `build()`.
    pub(crate) fn build_style(&self) -> Placeholder {
        self.placeholder.unwrap_or_default()
    }

    /// The style used when executing against a connection with `native` style.
    pub(crate) fn exec_style(&self, native: Option<Placeholder>) -> Placeholder {
        self.placeholder.or(native).unwrap_or_default()
    }
}
