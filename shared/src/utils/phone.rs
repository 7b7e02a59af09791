//! Phone number utilities

/// Normalize a phone number by stripping every non-digit character
///
/// An empty result means the input carried no digits and must be rejected.
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask a phone number for logging, keeping the last 4 digits (e.g. ******4567)
pub fn mask_phone_number(phone: &str) -> String {
    let digits = normalize_phone_number(phone);
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }

    let visible = &digits[digits.len() - 4..];
    format!("{}{}", "*".repeat(digits.len() - 4), visible)
}

/// Format a normalized number as E.164 for providers that require a leading '+'
pub fn to_e164(phone: &str) -> String {
    format!("+{}", normalize_phone_number(phone))
}
