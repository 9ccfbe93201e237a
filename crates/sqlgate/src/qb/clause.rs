//! Clause rendering: conditions, ordering and the cursor predicate.
//!
//! Rendering is a pure function of its inputs. Parameters are pushed in exactly
//! the order their placeholders are written.

use crate::condition::Condition;
use crate::error::{DbError, DbResult};
use crate::qb::param::ParamList;
use crate::value::Value;

/// One ORDER BY input element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSpec {
    /// Written verbatim, e.g. `"created_at DESC"`.
    Raw(String),
    /// `(field, direction)` pairs, rendered as `field direction` in order.
    Pairs(Vec<(String, String)>),
}

impl OrderSpec {
    pub fn raw(spec: impl Into<String>) -> Self {
        OrderSpec::Raw(spec.into())
    }

    pub fn asc(field: impl Into<String>) -> Self {
        OrderSpec::Pairs(vec![(field.into(), "ASC".to_string())])
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderSpec::Pairs(vec![(field.into(), "DESC".to_string())])
    }

    /// Append a pair. A `Raw` spec turns into `Pairs` holding it first.
    pub fn then(self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        let mut pairs = match self {
            OrderSpec::Pairs(pairs) => pairs,
            OrderSpec::Raw(raw) => vec![(raw, String::new())],
        };
        pairs.push((field.into(), direction.into()));
        OrderSpec::Pairs(pairs)
    }

    fn render_into(&self, out: &mut Vec<String>) {
        match self {
            OrderSpec::Raw(raw) => out.push(raw.clone()),
            OrderSpec::Pairs(pairs) => {
                for (field, direction) in pairs {
                    if direction.is_empty() {
                        out.push(field.clone());
                    } else {
                        out.push(format!("{field} {direction}"));
                    }
                }
            }
        }
    }
}

impl From<&str> for OrderSpec {
    fn from(spec: &str) -> Self {
        OrderSpec::raw(spec)
    }
}

impl From<String> for OrderSpec {
    fn from(spec: String) -> Self {
        OrderSpec::Raw(spec)
    }
}

impl<F: Into<String>, D: Into<String>> From<Vec<(F, D)>> for OrderSpec {
    fn from(pairs: Vec<(F, D)>) -> Self {
        OrderSpec::Pairs(
            pairs
                .into_iter()
                .map(|(f, d)| (f.into(), d.into()))
                .collect(),
        )
    }
}

/// Pagination anchor: rows strictly after `value` on `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub field: String,
    pub value: Value,
}

/// Render one condition.
pub(crate) fn render_condition(cond: &Condition, params: &mut ParamList) -> String {
    match cond {
        Condition::Compare { field, op, value } => {
            let ph = params.push(value.clone());
            format!("{field} {op} {ph}")
        }
        Condition::Like { field, pattern } => {
            let ph = params.push(pattern.clone());
            format!("{field} LIKE {ph}")
        }
        Condition::In { field, values } => {
            let phs = params.push_all(values);
            format!("{field} IN ({phs})")
        }
        Condition::NotIn { field, values } => {
            let phs = params.push_all(values);
            format!("{field} NOT IN ({phs})")
        }
        Condition::Between { field, low, high } => {
            let lo = params.push(low.clone());
            let hi = params.push(high.clone());
            format!("{field} BETWEEN {lo} AND {hi}")
        }
    }
}

/// Render the WHERE body (without the keyword): all conditions ANDed, then the
/// cursor predicate as one more conjunct. Empty when there is nothing to filter.
pub(crate) fn render_where(
    conditions: &[Condition],
    cursor: Option<&Cursor>,
    params: &mut ParamList,
) -> DbResult<String> {
    let mut parts = Vec::with_capacity(conditions.len() + 1);
    for cond in conditions {
        cond.validate()?;
        if cond.is_skipped() {
            continue;
        }
        parts.push(render_condition(cond, params));
    }

    if let Some(cursor) = cursor.filter(|c| !c.field.is_empty() && !c.value.is_null()) {
        let ph = params.push(cursor.value.clone());
        parts.push(format!("{} > {ph}", cursor.field));
    }

    Ok(parts.join(" AND "))
}

/// Render the WHERE body of an UPDATE or DELETE.
///
/// Unlike SELECT, a NULL-valued condition is never dropped: it is refused
/// with [`DbError::NullFilter`] so the statement cannot widen to more rows.
pub(crate) fn render_filter(conditions: &[Condition], params: &mut ParamList) -> DbResult<String> {
    for cond in conditions {
        cond.validate()?;
        if cond.is_skipped() {
            return Err(DbError::NullFilter {
                field: cond.field().to_string(),
            });
        }
    }
    render_where(conditions, None, params)
}

/// Render the ORDER BY body (without the keyword).
pub(crate) fn render_order(specs: &[OrderSpec]) -> String {
    let mut parts = Vec::new();
    for spec in specs {
        spec.render_into(&mut parts);
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Placeholder;

    fn render(conds: &[Condition], cursor: Option<&Cursor>) -> (String, Vec<Value>) {
        let mut params = ParamList::new(Placeholder::Question);
        let sql = render_where(conds, cursor, &mut params).unwrap();
        (sql, params.into_values())
    }

    #[test]
    fn operator_fragments() {
        let (sql, params) = render(
            &[
                Condition::eq("a", 1),
                Condition::gt("b", 2),
                Condition::lt("c", 3),
                Condition::compare("d", "<>", 4),
                Condition::like("e", "x%"),
                Condition::in_list("f", [5, 6]),
                Condition::not_in("g", [7]),
                Condition::between("h", 8, 9),
            ],
            None,
        );
        assert_eq!(
            sql,
            "a = ? AND b > ? AND c < ? AND d <> ? AND e LIKE ? AND f IN (?, ?) \
             AND g NOT IN (?) AND h BETWEEN ? AND ?"
        );
        assert_eq!(sql.matches('?').count(), params.len());
        assert_eq!(params[4], Value::from("x%"));
        assert_eq!(params[9], Value::Int(9));
    }

    #[test]
    fn null_conditions_leave_no_trace() {
        let (sql, params) = render(
            &[Condition::eq("a", Value::Null), Condition::eq("b", 2)],
            None,
        );
        assert_eq!(sql, "b = ?");
        assert_eq!(params, vec![Value::Int(2)]);
    }

    #[test]
    fn cursor_alone_has_no_leading_and() {
        let cursor = Cursor {
            field: "id".into(),
            value: Value::Int(100),
        };
        let (sql, params) = render(&[], Some(&cursor));
        assert_eq!(sql, "id > ?");
        assert_eq!(params, vec![Value::Int(100)]);
    }

    #[test]
    fn cursor_follows_conditions() {
        let cursor = Cursor {
            field: "id".into(),
            value: Value::Int(100),
        };
        let mut params = ParamList::new(Placeholder::Dollar);
        let sql = render_where(&[Condition::eq("s", "x")], Some(&cursor), &mut params).unwrap();
        assert_eq!(sql, "s = $1 AND id > $2");
    }

    #[test]
    fn null_cursor_is_ignored() {
        let cursor = Cursor {
            field: "id".into(),
            value: Value::Null,
        };
        assert_eq!(render(&[], Some(&cursor)), (String::new(), vec![]));
    }

    #[test]
    fn empty_in_list_is_an_error() {
        let mut params = ParamList::new(Placeholder::Question);
        let res = render_where(&[Condition::in_list("id", Vec::<i32>::new())], None, &mut params);
        assert!(res.is_err());
    }

    #[test]
    fn filter_refuses_null_conditions() {
        let mut params = ParamList::new(Placeholder::Question);
        let err = render_filter(
            &[Condition::eq("status", "stale"), Condition::eq("tenant_id", Value::Null)],
            &mut params,
        )
        .unwrap_err();
        assert!(matches!(err, DbError::NullFilter { ref field } if field == "tenant_id"));
        assert!(err.is_construction());

        let sql = render_filter(&[Condition::eq("status", "stale")], &mut params).unwrap();
        assert_eq!(sql, "status = ?");
    }

    #[test]
    fn order_specs_render_in_input_order() {
        let specs = vec![
            OrderSpec::from("name ASC"),
            OrderSpec::from(vec![("age", "DESC"), ("id", "ASC")]),
            OrderSpec::desc("created_at"),
        ];
        assert_eq!(
            render_order(&specs),
            "name ASC, age DESC, id ASC, created_at DESC"
        );
    }

    #[test]
    fn then_chains_pairs() {
        let spec = OrderSpec::raw("score DESC").then("id", "ASC");
        assert_eq!(render_order(&[spec]), "score DESC, id ASC");
    }
}
