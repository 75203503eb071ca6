//! Field checks applied while constructing products.
//!
//! Every failure names the construct path of the offending resource so the
//! caller can tell which product in a larger configuration is at fault.

use regex::RegexBuilder;
use url::Url;

use crate::error::{Error, Result};
use crate::fs::naming::ConstructPath;

/// Longest value echoed back in a length error.
const MAX_ECHO_LENGTH: usize = 100;

/// Email shape accepted for support contacts.
const EMAIL_PATTERN: &str = r"^[\w.%+\-]+@[a-z\d.\-]+\.[a-z]{2,4}$";

/// Check that an optional string has a length within `min..=max`.
pub fn validate_length(
    path: &ConstructPath,
    description: &str,
    min: usize,
    max: usize,
    value: Option<&str>,
) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    let length = value.chars().count();
    if length < min || length > max {
        return Err(Error::validation(
            description,
            path,
            format!(
                "must have length between {} and {}, got: '{}'",
                min,
                max,
                truncate(value, MAX_ECHO_LENGTH)
            ),
        ));
    }

    Ok(())
}

/// Check that an optional string is a syntactically valid email address.
pub fn validate_email(path: &ConstructPath, description: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    let pattern = RegexBuilder::new(EMAIL_PATTERN)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("Invalid email pattern: {}", e)))?;

    if !pattern.is_match(value) {
        return Err(Error::validation(
            description,
            path,
            format!("expected a valid email, got: '{}'", value),
        ));
    }

    Ok(())
}

/// Check that an optional string is an absolute http(s) URL with a host.
pub fn validate_url(path: &ConstructPath, description: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    let valid = match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    };

    if !valid {
        return Err(Error::validation(
            description,
            path,
            format!("expected a valid url, got: '{}'", value),
        ));
    }

    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max).collect();
        format!("{}...", head)
    }
}
