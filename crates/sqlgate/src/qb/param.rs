//! Parameter collection with placeholder rendering.

use crate::config::Placeholder;
use crate::value::Value;

/// Ordered statement parameters.
///
/// Every `push` returns the placeholder text for the value just added, so the
/// position of a placeholder in the SQL and the position of its value here can
/// never drift apart.
#[derive(Clone, Debug)]
pub(crate) struct ParamList {
    style: Placeholder,
    params: Vec<Value>,
}

impl ParamList {
    pub(crate) fn new(style: Placeholder) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    /// Add a parameter and return its placeholder.
    pub(crate) fn push(&mut self, value: Value) -> String {
        self.params.push(value);
        self.style.render(self.params.len())
    }

    /// Add several parameters, returning their placeholders joined by `, `.
    pub(crate) fn push_all<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) -> String {
        values
            .into_iter()
            .map(|v| self.push(v.clone()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.params
    }
}
