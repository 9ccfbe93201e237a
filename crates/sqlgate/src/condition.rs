//! Query condition types for dynamic WHERE clauses.
//!
//! Two ways in:
//!
//! - the typed [`Condition`] constructors (`Condition::eq`, `Condition::between`, ...);
//! - loosely-typed [`FilterGroup`]s paired with [`OperatorGroup`]s, converted by
//!   [`conditions_from_groups`]. This form mirrors request-driven filtering where
//!   the operator arrives as a string.
//!
//! Both produce the same `Condition` values. Field names are written into the SQL
//! text as given; only values are parameterized.

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Comparison operator.
///
/// Parsing never fails: strings that are not one of the named operators become
/// [`Operator::Other`] and are rendered verbatim as `field OP ?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Like,
    In,
    NotIn,
    Between,
    Other(String),
}

impl Operator {
    /// Parse an operator string. Case and inner whitespace are normalized for the
    /// named operators; an empty string means equality.
    pub fn parse(op: &str) -> Self {
        let normalized = op
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "" | "=" => Operator::Eq,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            "LIKE" => Operator::Like,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "BETWEEN" => Operator::Between,
            _ => Operator::Other(op.trim().to_string()),
        }
    }

    /// SQL spelling.
    pub fn as_sql(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::Other(op) => op,
        }
    }
}

/// Right-hand side of a loosely-typed filter entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

impl Operand {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Operand::Scalar(value.into())
    }

    pub fn list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Operand::List(values)
    }
}

/// An ordered `field -> operand` group.
///
/// Setting a field twice replaces the earlier operand in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    entries: Vec<(String, Operand)>,
}

impl FilterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-value entry.
    pub fn value(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operand(field, Operand::scalar(value))
    }

    /// Add a list entry (for IN / NOT IN / BETWEEN).
    pub fn list<V: Into<Value>>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.operand(field, Operand::list(values))
    }

    pub fn operand(mut self, field: impl Into<String>, operand: Operand) -> Self {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = operand,
            None => self.entries.push((field, operand)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.entries.iter().map(|(f, o)| (f.as_str(), o))
    }
}

/// Per-field operator overrides for the [`FilterGroup`] at the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorGroup {
    entries: Vec<(String, String)>,
}

impl OperatorGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn op(mut self, field: impl Into<String>, operator: impl Into<String>) -> Self {
        let field = field.into();
        let operator = operator.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = operator,
            None => self.entries.push((field, operator)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, op)| op.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OperatorGroup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(OperatorGroup::new(), |group, (k, v)| group.op(k, v))
    }
}

/// A single WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field OP ?` for `=`, `>`, `<` and any unrecognized operator.
    Compare {
        field: String,
        op: String,
        value: Value,
    },
    /// `field LIKE ?`
    Like { field: String, pattern: Value },
    /// `field IN (?, ...)`
    In { field: String, values: Vec<Value> },
    /// `field NOT IN (?, ...)`
    NotIn { field: String, values: Vec<Value> },
    /// `field BETWEEN ? AND ?`
    Between {
        field: String,
        low: Value,
        high: Value,
    },
}

impl Condition {
    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, "=", value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, ">", value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, "<", value)
    }

    /// `field op value` with the operator written verbatim.
    ///
    /// The operator is caller-trusted text, like the field name.
    pub fn compare(
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Condition::Compare {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// `field LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Condition::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// `field IN (values...)`. An empty list is rejected when the statement is built.
    pub fn in_list<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field NOT IN (values...)`. An empty list is rejected when the statement is built.
    pub fn not_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::NotIn {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field BETWEEN low AND high`
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Condition::Between {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Build a condition from a loosely-typed entry.
    ///
    /// Returns `Ok(None)` when the operand is `Null`: such entries are optional
    /// filters and are dropped.
    pub fn from_parts(
        field: &str,
        operand: &Operand,
        operator: Option<&str>,
    ) -> DbResult<Option<Self>> {
        if matches!(operand, Operand::Scalar(Value::Null)) {
            return Ok(None);
        }
        if field.is_empty() {
            return Err(DbError::EmptyField);
        }

        let op = operator.map_or(Operator::Eq, Operator::parse);
        let cond = match (op, operand) {
            (Operator::In, Operand::List(values)) => Self::in_list(field, values.iter().cloned()),
            (Operator::NotIn, Operand::List(values)) => {
                Self::not_in(field, values.iter().cloned())
            }
            (Operator::Between, Operand::List(values)) => match values.as_slice() {
                [low, high] => Self::between(field, low.clone(), high.clone()),
                _ => {
                    return Err(DbError::BetweenArity {
                        field: field.to_string(),
                        got: values.len(),
                    });
                }
            },
            (op @ (Operator::In | Operator::NotIn | Operator::Between), Operand::Scalar(_)) => {
                return Err(DbError::ExpectedList {
                    field: field.to_string(),
                    operator: list_operator_name(&op),
                });
            }
            (op, Operand::List(_)) => {
                return Err(DbError::UnexpectedList {
                    field: field.to_string(),
                    operator: op.as_sql().to_string(),
                });
            }
            (Operator::Like, Operand::Scalar(value)) => Self::like(field, value.clone()),
            (op, Operand::Scalar(value)) => Self::compare(field, op.as_sql(), value.clone()),
        };

        cond.validate()?;
        Ok(Some(cond))
    }

    /// The field this condition filters on.
    pub fn field(&self) -> &str {
        match self {
            Condition::Compare { field, .. }
            | Condition::Like { field, .. }
            | Condition::In { field, .. }
            | Condition::NotIn { field, .. }
            | Condition::Between { field, .. } => field,
        }
    }

    /// Number of parameters this condition binds.
    pub fn param_count(&self) -> usize {
        match self {
            Condition::Compare { .. } | Condition::Like { .. } => 1,
            Condition::In { values, .. } | Condition::NotIn { values, .. } => values.len(),
            Condition::Between { .. } => 2,
        }
    }

    /// Single-value conditions against `Null` are optional filters that render nothing.
    pub fn is_skipped(&self) -> bool {
        match self {
            Condition::Compare { value, .. } => value.is_null(),
            Condition::Like { pattern, .. } => pattern.is_null(),
            _ => false,
        }
    }

    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> DbResult<()> {
        if self.field().is_empty() {
            return Err(DbError::EmptyField);
        }
        match self {
            Condition::In { field, values } if values.is_empty() => Err(DbError::EmptyList {
                field: field.clone(),
                operator: "IN",
            }),
            Condition::NotIn { field, values } if values.is_empty() => Err(DbError::EmptyList {
                field: field.clone(),
                operator: "NOT IN",
            }),
            _ => Ok(()),
        }
    }
}

fn list_operator_name(op: &Operator) -> &'static str {
    match op {
        Operator::In => "IN",
        Operator::NotIn => "NOT IN",
        _ => "BETWEEN",
    }
}

/// Convert index-aligned filter and operator groups into conditions.
///
/// Group order, then entry order within a group, is preserved. A missing
/// operator group or a field without an override means equality.
pub fn conditions_from_groups(
    groups: &[FilterGroup],
    operators: &[OperatorGroup],
) -> DbResult<Vec<Condition>> {
    let mut conditions = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let overrides = operators.get(i);
        for (field, operand) in group.iter() {
            let operator = overrides.and_then(|ops| ops.get(field));
            if let Some(cond) = Condition::from_parts(field, operand, operator)? {
                conditions.push(cond);
            }
        }
    }
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_named_operators() {
        assert_eq!(Operator::parse("not   in"), Operator::NotIn);
        assert_eq!(Operator::parse(" between "), Operator::Between);
        assert_eq!(Operator::parse(""), Operator::Eq);
        assert_eq!(Operator::parse(">="), Operator::Other(">=".into()));
        assert_eq!(Operator::parse("NOT LIKE").as_sql(), "NOT LIKE");
    }

    #[test]
    fn null_operand_is_dropped_for_any_operator() {
        let null = Operand::Scalar(Value::Null);
        assert_eq!(Condition::from_parts("a", &null, None).unwrap(), None);
        assert_eq!(Condition::from_parts("a", &null, Some("IN")).unwrap(), None);
    }

    #[test]
    fn in_requires_a_non_empty_list() {
        let err = Condition::from_parts("id", &Operand::scalar(1), Some("IN")).unwrap_err();
        assert!(matches!(err, DbError::ExpectedList { operator: "IN", .. }));

        let empty = Operand::List(vec![]);
        let err = Condition::from_parts("id", &empty, Some("NOT IN")).unwrap_err();
        assert!(matches!(err, DbError::EmptyList { operator: "NOT IN", .. }));
    }

    #[test]
    fn between_requires_exactly_two_values() {
        let three = Operand::list([1, 2, 3]);
        let err = Condition::from_parts("age", &three, Some("BETWEEN")).unwrap_err();
        assert!(matches!(err, DbError::BetweenArity { got: 3, .. }));

        let pair = Operand::list([18, 65]);
        let cond = Condition::from_parts("age", &pair, Some("BETWEEN"))
            .unwrap()
            .unwrap();
        assert_eq!(cond, Condition::between("age", 18, 65));
    }

    #[test]
    fn list_with_scalar_operator_is_rejected() {
        let err = Condition::from_parts("id", &Operand::list([1, 2]), None).unwrap_err();
        assert!(matches!(err, DbError::UnexpectedList { .. }));
    }

    #[test]
    fn unknown_operator_passes_through() {
        let cond = Condition::from_parts("score", &Operand::scalar(10), Some(">="))
            .unwrap()
            .unwrap();
        assert_eq!(cond, Condition::compare("score", ">=", 10));
    }

    #[test]
    fn groups_keep_order_and_align_overrides() {
        let groups = vec![
            FilterGroup::new().value("status", "active").value("age", Value::Null),
            FilterGroup::new().list("role", ["admin", "dev"]),
        ];
        let ops = vec![OperatorGroup::new(), OperatorGroup::new().op("role", "IN")];

        let conds = conditions_from_groups(&groups, &ops).unwrap();
        assert_eq!(
            conds,
            vec![
                Condition::eq("status", "active"),
                Condition::in_list("role", ["admin", "dev"]),
            ]
        );
    }

    #[test]
    fn missing_operator_groups_default_to_equality() {
        let groups = vec![FilterGroup::new().value("a", 1), FilterGroup::new().value("b", 2)];
        let conds = conditions_from_groups(&groups, &[]).unwrap();
        assert_eq!(conds, vec![Condition::eq("a", 1), Condition::eq("b", 2)]);
    }

    #[test]
    fn typed_empty_in_fails_validation() {
        let cond = Condition::in_list("id", Vec::<i64>::new());
        assert!(cond.validate().is_err());
        assert!(Condition::eq("", 1).validate().is_err());
    }
}
