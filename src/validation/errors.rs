//! Request validation errors

use thiserror::Error;

/// Message returned for any malformed `filters` parameter
pub const FILTERS_MESSAGE: &str = "Invalid JSON string for filters. Filters must have JSON stringified array of objects containing at least one object with these properties: id in string, condition can be equals | does_not_equal | greater_than | less_than, and value either in number or string";

/// Message returned when the route's form id is not the served form
pub const FORM_ID_MESSAGE: &str = "Provide demo form Id in request params";

/// Request rejected before it reaches the compiler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A single query parameter failed its rule
    #[error("{0}")]
    InvalidParam(String),

    #[error("{}", FILTERS_MESSAGE)]
    InvalidFilters,

    #[error("{}", FORM_ID_MESSAGE)]
    FormIdMismatch,
}

impl ValidationError {
    /// Builds a parameter error from a rule message, capitalizing the key
    pub(crate) fn param(key: &str, rule: &str) -> Self {
        let mut chars = key.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        Self::InvalidParam(format!("{} {}", label, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_message_capitalized() {
        let err = ValidationError::param("afterDate", "must be in ISO 8601 date format");
        assert_eq!(err.to_string(), "AfterDate must be in ISO 8601 date format");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(ValidationError::InvalidFilters.to_string(), FILTERS_MESSAGE);
        assert_eq!(
            ValidationError::FormIdMismatch.to_string(),
            "Provide demo form Id in request params"
        );
    }
}
