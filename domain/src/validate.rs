//! Lightweight input validation helpers. Keep logic minimal and deterministic.
//!
//! The create operation requires `user_name`, `rating`, and `review` to be
//! present; no other field is checked and no range validation is applied to
//! the rating.

use crate::CoreError;
use crate::NewTestimonial;

/// Validate a candidate testimonial for creation: `user_name` and `review`
/// must be non-empty. Presence of `rating` is enforced by the type; its
/// value is not range-checked. Anything beyond a presence check (trimming,
/// sanitization) is out of scope.
pub fn validate_new_testimonial(new: &NewTestimonial) -> Result<(), CoreError> {
    if new.user_name.is_empty() {
        return Err(CoreError::MissingFields);
    }
    if new.review.is_empty() {
        return Err(CoreError::MissingFields);
    }
    Ok(())
}
