use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+?1[\s.-]?)?(?:\((\d{3})\)|(\d{3}))[\s.-]?(\d{3})[\s.-]?(\d{4})$")
        .expect("valid phone regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid phone number.")]
    InvalidPhone,
}

/// Check a submitted phone number and return the `XXX-XXX-XXXX` form that
/// gets stored. Separators, a parenthesized area code and a leading `+1` are
/// accepted on input.
pub fn phone_validator(input: &str) -> Result<String, ValidationError> {
    let caps = PHONE_RE
        .captures(input.trim())
        .ok_or(ValidationError::InvalidPhone)?;
    let area = caps
        .get(1)
        .or_else(|| caps.get(2))
        .ok_or(ValidationError::InvalidPhone)?;
    let (exchange, line) = match (caps.get(3), caps.get(4)) {
        (Some(exchange), Some(line)) => (exchange, line),
        _ => return Err(ValidationError::InvalidPhone),
    };
    Ok(format!(
        "{}-{}-{}",
        area.as_str(),
        exchange.as_str(),
        line.as_str()
    ))
}
