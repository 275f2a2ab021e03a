//! `filters` parameter decoding
//!
//! The parameter is a JSON-stringified array of at least one clause object
//! `{id, condition, value}`. Any defect rejects the whole parameter with the
//! single [`ValidationError::InvalidFilters`] message.

use serde_json::{Map, Value};

use crate::model::{Condition, FilterClause, QuestionValue};

use super::errors::ValidationError;
use super::params::{number_value, parse_number, MAX_SAFE_INTEGER};

const CLAUSE_KEYS: [&str; 3] = ["id", "condition", "value"];

/// Decodes the raw `filters` parameter
pub fn parse_filters(raw: &str) -> Result<Vec<FilterClause>, ValidationError> {
    let parsed: Value = serde_json::from_str(raw).map_err(|_| ValidationError::InvalidFilters)?;

    let items = match parsed.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ValidationError::InvalidFilters),
    };

    items
        .iter()
        .map(|item| item.as_object().and_then(parse_clause))
        .collect::<Option<Vec<_>>>()
        .ok_or(ValidationError::InvalidFilters)
}

fn parse_clause(object: &Map<String, Value>) -> Option<FilterClause> {
    if object.keys().any(|key| !CLAUSE_KEYS.contains(&key.as_str())) {
        return None;
    }

    let id = object.get("id")?.as_str().filter(|id| !id.is_empty())?;
    let condition = Condition::parse(object.get("condition")?.as_str()?)?;
    let value = clause_value(object.get("value")?)?;

    Some(FilterClause::new(id, condition, value))
}

/// Number or non-empty string. Numeric strings are read as numbers.
fn clause_value(value: &Value) -> Option<QuestionValue> {
    match value {
        Value::Number(n) => {
            let float = n.as_f64()?;
            if float.fract() == 0.0 && float.abs() > MAX_SAFE_INTEGER {
                return None;
            }
            Some(QuestionValue::Number(n.clone()))
        }
        Value::String(s) if !s.is_empty() => match parse_number(s) {
            Some(number) => number_value(number),
            None => Some(QuestionValue::Text(s.clone())),
        },
        _ => None,
    }
}
