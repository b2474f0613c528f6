//! Translation of [`Filter`]s into SQL.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::identifier::Filter;
use crate::types::CANONICAL_ID_FIELD;

/// A SQL boolean expression with anonymous `?` placeholders, plus the values
/// bound to them in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlFilter {
    pub clause: String,
    pub params: Vec<SqlValue>,
}

/// Compiles a filter against the `documents` table.
pub(crate) fn compile(filter: &Filter) -> SqlFilter {
    let mut params = Vec::new();
    let clause = compile_into(filter, &mut params);
    SqlFilter { clause, params }
}

fn compile_into(filter: &Filter, params: &mut Vec<SqlValue>) -> String {
    match filter {
        Filter::CanonicalId(id) => {
            params.push(SqlValue::Text(id.to_hex()));
            "id = ?".to_string()
        }
        Filter::FieldEquals { field, value } if field == CANONICAL_ID_FIELD => {
            params.push(json_to_sql(value));
            "id IS ?".to_string()
        }
        Filter::FieldEquals { field, value } => {
            params.push(SqlValue::Text(json_path(field)));
            params.push(json_to_sql(value));
            "json_extract(data, ?) IS ?".to_string()
        }
        Filter::AnyOf(branches) if branches.is_empty() => "0".to_string(),
        Filter::AnyOf(branches) => {
            let parts: Vec<String> = branches
                .iter()
                .map(|branch| format!("({})", compile_into(branch, params)))
                .collect();
            parts.join(" OR ")
        }
    }
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

/// `json_extract` yields integers, reals and text without affinity, so a
/// bound text never equals a bound integer.
fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{FilterPolicy, FilterPurpose, custom_id_filter};
    use crate::types::CanonicalId;

    #[test]
    fn test_canonical_clause() {
        let id = CanonicalId::parse("507F1F77BCF86CD799439011").unwrap();
        let sql = compile(&Filter::CanonicalId(id));
        assert_eq!(sql.clause, "id = ?");
        assert_eq!(
            sql.params,
            vec![SqlValue::Text("507f1f77bcf86cd799439011".to_string())]
        );
    }

    #[test]
    fn test_custom_union_clause() {
        let policy = FilterPolicy::default().with_legacy_canonical_fallback(true);
        let sql = compile(&custom_id_filter("42", FilterPurpose::Write, &policy));
        assert_eq!(
            sql.clause,
            "(json_extract(data, ?) IS ?) OR (json_extract(data, ?) IS ?) OR (id IS ?)"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlValue::Text("$.\"id\"".to_string()),
                SqlValue::Text("42".to_string()),
                SqlValue::Text("$.\"id\"".to_string()),
                SqlValue::Integer(42),
                SqlValue::Text("42".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_any_of_is_false() {
        let sql = compile(&Filter::AnyOf(vec![]));
        assert_eq!(sql.clause, "0");
        assert!(sql.params.is_empty());
    }
}
