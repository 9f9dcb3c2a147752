use crate::utils::error::{ApiError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MIN_PHONE_DIGITS: usize = 10;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{10,}$").expect("phone pattern compiles"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ApiError::config(field_name, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ApiError::config(
                field_name,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(ApiError::config(
            field_name,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ApiError::config(
            field_name,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Names every field whose value is blank, in the order given.
pub fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

/// Fails with a single validation error listing all blank fields.
pub fn validate_required_fields(fields: &[(&str, &str)]) -> Result<()> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        return Ok(());
    }

    Err(ApiError::validation(
        missing.iter().map(|f| f.to_string()).collect(),
        format!("Please fill in all required fields: {}", missing.join(", ")),
    ))
}

pub fn validate_non_empty_string(field_name: &str, value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(vec![field_name.to_string()], message));
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max: usize, message: &str) -> Result<()> {
    if value.chars().count() > max {
        return Err(ApiError::validation(vec![field_name.to_string()], message));
    }
    Ok(())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
        && phone.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

pub fn validate_phone(field_name: &str, phone: &str) -> Result<()> {
    if !is_valid_phone(phone) {
        return Err(ApiError::validation(
            vec![field_name.to_string()],
            "Please enter a valid phone number",
        ));
    }
    Ok(())
}
