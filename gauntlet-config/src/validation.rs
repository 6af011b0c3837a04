//! Validation helpers shared by the configuration domains

use crate::error::{ConfigError, ConfigResult};
use std::fmt::Display;

/// A configuration domain that can check its own values
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Domain name used in error messages
    fn domain_name(&self) -> &'static str;

    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        invalid(self.domain_name(), message)
    }
}

pub(crate) fn invalid(domain: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        domain: domain.to_string(),
        message: message.into(),
    }
}

pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(domain, format!("{} must not be blank", field_name)));
    }
    Ok(())
}

/// Rejects zero (and anything below the type's default)
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + Display,
{
    if value > T::default() {
        Ok(())
    } else {
        Err(invalid(domain, format!("{} must be at least 1, got {}", field_name, value)))
    }
}

/// Absolute http or https URL with a host
pub fn validate_http_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(url, field_name, domain)?;

    let parsed = url::Url::parse(url)
        .map_err(|e| invalid(domain, format!("{} '{}' is not a URL: {}", field_name, url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(
            domain,
            format!("{} must use http or https, got '{}'", field_name, parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none() {
        return Err(invalid(domain, format!("{} '{}' has no host", field_name, url)));
    }
    Ok(())
}

pub fn validate_path(path: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(invalid(domain, format!("{} must start with '/', got '{}'", field_name, path)))
    }
}

/// Case-insensitive membership in `valid_choices`
pub fn validate_enum_choice<T>(value: &str, valid_choices: &[T], field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: AsRef<str>,
{
    if valid_choices.iter().any(|c| c.as_ref().eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    let choices: Vec<&str> = valid_choices.iter().map(AsRef::as_ref).collect();
    Err(invalid(
        domain,
        format!("{} '{}' is not one of: {}", field_name, value, choices.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u64, "requests", "load").is_ok());
        assert!(validate_positive(0u64, "requests", "load").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("http://127.0.0.1:8080", "base_url", "targets").is_ok());
        assert!(validate_http_url("https://example.com/api", "base_url", "targets").is_ok());
        assert!(validate_http_url("", "base_url", "targets").is_err());
        assert!(validate_http_url("not a url", "base_url", "targets").is_err());
        assert!(validate_http_url("ftp://example.com", "base_url", "targets").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/json", "path", "scenarios").is_ok());
        assert!(validate_path("json", "path", "scenarios").is_err());
    }

    #[test]
    fn test_validate_enum_choice() {
        let methods = ["GET", "POST"];
        assert!(validate_enum_choice("get", &methods, "method", "scenarios").is_ok());
        let err = validate_enum_choice("BREW", &methods, "method", "scenarios").unwrap_err();
        assert!(err.to_string().contains("is not one of: GET, POST"));
    }
}
