//! Field-level checks shared by the create and patch payloads.

use crate::errors::AppError;

/// Checks the character length of `value` against an inclusive range.
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::Validation(if min == 1 {
            format!("{field} cannot be empty")
        } else {
            format!("{field} must be at least {min} characters")
        }));
    }
    if len > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Minimal shape check: one `@`, a non-empty local part and a dotted domain.
pub fn check_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation(format!("'{email}' is not a valid email address"));

    check_length("email", email, 3, 255)?;
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain.split('.').filter(|label| !label.is_empty()).count() >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

pub fn check_positive_price(price: f64) -> Result<(), AppError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(
            "price_per_night must be greater than 0".to_string(),
        ))
    }
}
