//! Query parameter validation
//!
//! Parameters are checked in a fixed order (`limit`, `afterDate`,
//! `beforeDate`, `offset`, `status`, `includeEditLink`, `sort`), then unknown
//! keys, then `filters`. The first failure is reported.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::model::{
    QuerySpec, QuestionValue, SortOrder, SubmissionStatus, MAX_LIMIT, MIN_LIMIT,
};

use super::errors::ValidationError;
use super::filters::parse_filters;

/// Largest integer exactly representable as an IEEE double
pub(crate) const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const KNOWN_KEYS: [&str; 8] = [
    "limit",
    "afterDate",
    "beforeDate",
    "offset",
    "status",
    "includeEditLink",
    "sort",
    "filters",
];

/// Validator for raw request query parameters
pub struct QueryParams;

impl QueryParams {
    /// Validates raw parameters into a normalized spec with defaults applied
    pub fn parse(params: &HashMap<String, String>) -> Result<QuerySpec, ValidationError> {
        let mut spec = QuerySpec::default();

        if let Some(raw) = params.get("limit") {
            let limit = parse_integer("limit", raw)?;
            if limit < f64::from(MIN_LIMIT) {
                return Err(ValidationError::param(
                    "limit",
                    &format!("must be greater than or equal to {}", MIN_LIMIT),
                ));
            }
            if limit > f64::from(MAX_LIMIT) {
                return Err(ValidationError::param(
                    "limit",
                    &format!("must be less than or equal to {}", MAX_LIMIT),
                ));
            }
            spec.limit = limit as u32;
        }

        if let Some(raw) = params.get("afterDate") {
            spec.after_date = Some(parse_date("afterDate", raw)?);
        }

        if let Some(raw) = params.get("beforeDate") {
            spec.before_date = Some(parse_date("beforeDate", raw)?);
        }

        if let Some(raw) = params.get("offset") {
            let offset = parse_integer("offset", raw)?;
            if offset < 0.0 {
                return Err(ValidationError::param(
                    "offset",
                    "must be greater than or equal to 0",
                ));
            }
            spec.offset = offset as u64;
        }

        if let Some(raw) = params.get("status") {
            non_empty("status", raw)?;
            spec.status = SubmissionStatus::parse(raw).ok_or_else(|| {
                ValidationError::param("status", "must be one of in_progress, finished")
            })?;
        }

        if let Some(raw) = params.get("includeEditLink") {
            spec.include_edit_link = parse_bool(raw)
                .ok_or_else(|| ValidationError::param("includeEditLink", "must be a boolean"))?;
        }

        if let Some(raw) = params.get("sort") {
            non_empty("sort", raw)?;
            spec.sort = SortOrder::parse(raw)
                .ok_or_else(|| ValidationError::param("sort", "must be one of asc, desc"))?;
        }

        let mut unknown: Vec<&String> = params
            .keys()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .collect();
        unknown.sort();
        if let Some(key) = unknown.first() {
            return Err(ValidationError::param(key, "is not allowed"));
        }

        if let Some(raw) = params.get("filters") {
            non_empty("filters", raw)?;
            spec.filters = Some(parse_filters(raw)?);
        }

        Ok(spec)
    }
}

/// Parses a decimal number written the way query strings carry them.
///
/// Surrounding whitespace is ignored. `inf`, `NaN` and hex are rejected.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !well_formed {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Wraps a parsed number, keeping integers in integer form
pub(crate) fn number_value(number: f64) -> Option<QuestionValue> {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        Some(QuestionValue::from(number as i64))
    } else if number.fract() == 0.0 {
        None
    } else {
        QuestionValue::from_f64(number)
    }
}

fn parse_integer(key: &str, raw: &str) -> Result<f64, ValidationError> {
    let number =
        parse_number(raw).ok_or_else(|| ValidationError::param(key, "must be a number"))?;
    if number.abs() > MAX_SAFE_INTEGER {
        return Err(ValidationError::param(key, "must be a safe number"));
    }
    if number.fract() != 0.0 {
        return Err(ValidationError::param(key, "must be an integer"));
    }
    Ok(number)
}

fn parse_date(key: &str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_iso8601(raw.trim())
        .ok_or_else(|| ValidationError::param(key, "must be in ISO 8601 date format"))
}

/// Accepts RFC 3339, a naive date-time (read as UTC) or a plain date
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn non_empty(key: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::param(key, "is not allowed to be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn message(pairs: &[(&str, &str)]) -> String {
        QueryParams::parse(&params(pairs)).unwrap_err().to_string()
    }

    #[test]
    fn test_defaults_applied() {
        let spec = QueryParams::parse(&HashMap::new()).unwrap();
        assert_eq!(spec, QuerySpec::default());
    }

    #[test]
    fn test_full_params() {
        let spec = QueryParams::parse(&params(&[
            ("limit", "25"),
            ("offset", "50"),
            ("afterDate", "2024-01-01T00:00:00.000Z"),
            ("beforeDate", "2024-02-01"),
            ("status", "in_progress"),
            ("includeEditLink", "true"),
            ("sort", "desc"),
            ("filters", r#"[{"id":"q1","condition":"equals","value":"x"}]"#),
        ]))
        .unwrap();

        assert_eq!(spec.limit, 25);
        assert_eq!(spec.offset, 50);
        assert_eq!(
            spec.after_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            spec.before_date,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(spec.status, SubmissionStatus::InProgress);
        assert!(spec.include_edit_link);
        assert_eq!(spec.sort, SortOrder::Desc);
        assert!(spec.has_filters());
    }

    #[test]
    fn test_limit_messages() {
        assert_eq!(message(&[("limit", "abc")]), "Limit must be a number");
        assert_eq!(message(&[("limit", "2.5")]), "Limit must be an integer");
        assert_eq!(
            message(&[("limit", "0")]),
            "Limit must be greater than or equal to 1"
        );
        assert_eq!(
            message(&[("limit", "151")]),
            "Limit must be less than or equal to 150"
        );
    }

    #[test]
    fn test_limit_bounds_inclusive() {
        assert_eq!(QueryParams::parse(&params(&[("limit", "1")])).unwrap().limit, 1);
        assert_eq!(QueryParams::parse(&params(&[("limit", "150")])).unwrap().limit, 150);
    }

    #[test]
    fn test_offset_messages() {
        assert_eq!(message(&[("offset", "x")]), "Offset must be a number");
        assert_eq!(
            message(&[("offset", "-1")]),
            "Offset must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_enum_messages() {
        assert_eq!(
            message(&[("status", "done")]),
            "Status must be one of in_progress, finished"
        );
        assert_eq!(message(&[("sort", "up")]), "Sort must be one of asc, desc");
        assert_eq!(
            message(&[("includeEditLink", "yes")]),
            "IncludeEditLink must be a boolean"
        );
        assert_eq!(message(&[("status", "")]), "Status is not allowed to be empty");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(message(&[("sort", "")]), "Sort is not allowed to be empty");
        assert_eq!(message(&[("limit", "")]), "Limit must be a number");
        assert_eq!(message(&[("offset", "")]), "Offset must be a number");
        assert_eq!(
            message(&[("beforeDate", "")]),
            "BeforeDate must be in ISO 8601 date format"
        );
    }

    #[test]
    fn test_date_message() {
        assert_eq!(
            message(&[("afterDate", "yesterday")]),
            "AfterDate must be in ISO 8601 date format"
        );
        assert_eq!(
            message(&[("beforeDate", "2024-13-01")]),
            "BeforeDate must be in ISO 8601 date format"
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(message(&[("page", "2")]), "Page is not allowed");
    }

    #[test]
    fn test_known_params_checked_before_unknown_and_filters() {
        assert_eq!(
            message(&[("page", "2"), ("limit", "0"), ("filters", "[]")]),
            "Limit must be greater than or equal to 1"
        );
        assert_eq!(
            message(&[("page", "2"), ("filters", "[]")]),
            "Page is not allowed"
        );
    }

    #[test]
    fn test_bad_filters() {
        let err = QueryParams::parse(&params(&[("filters", "[]")])).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFilters);
    }

    #[test]
    fn test_parse_number_rejects_words() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("0x10"), None);
    }
}
