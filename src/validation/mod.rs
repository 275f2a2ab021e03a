//! Request validation
//!
//! Converts raw request input into a normalized
//! [`QuerySpec`](crate::model::QuerySpec). Everything the core trusts
//! (limit bounds, enum membership, filter shape) is enforced here.

mod errors;
mod filters;
mod params;

pub use errors::{ValidationError, FILTERS_MESSAGE, FORM_ID_MESSAGE};
pub use filters::parse_filters;
pub use params::{parse_iso8601, QueryParams};

/// Checks that the requested form is the one this server mirrors
pub fn check_form_id(requested: &str, served: &str) -> Result<(), ValidationError> {
    if requested.is_empty() || requested != served {
        return Err(ValidationError::FormIdMismatch);
    }
    Ok(())
}
