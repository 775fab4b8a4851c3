//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::fs::archive::encoding_for_label;
use regex::Regex;
use url::Url;

/// Minimum length for the session cookie value.
const MIN_SESSION_ID_LENGTH: usize = 16;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_session_id(&config.account.session_id)?;
    validate_user_agent(&config.account.user_agent)?;
    validate_fan_club_id(&config.target.fan_club_id)?;
    validate_encoding(&config.options.archive_name_encoding)?;
    validate_base_url(&config.options.base_url)?;

    Ok(())
}

/// Validate the session cookie value.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::MissingConfig("session_id".to_string()));
    }

    if session_id.len() < MIN_SESSION_ID_LENGTH {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: format!(
                "Session id must be at least {} characters (got {})",
                MIN_SESSION_ID_LENGTH,
                session_id.len()
            ),
        });
    }

    let lower = session_id.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session id appears to be a placeholder. Copy the _session_id cookie from your browser."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    Ok(())
}

/// Validate the fan club identifier.
pub fn validate_fan_club_id(fan_club_id: &str) -> Result<()> {
    if fan_club_id.is_empty() {
        return Err(Error::MissingConfig("fan_club_id".to_string()));
    }

    let id_pattern = Regex::new(r"^\d+$").unwrap();
    if !id_pattern.is_match(fan_club_id) {
        return Err(Error::ConfigValidation {
            field: "fan_club_id".to_string(),
            message: format!(
                "Invalid fan club id: '{}'. Must be the numeric id from the fan club URL.",
                fan_club_id
            ),
        });
    }

    Ok(())
}

/// Validate the archive name encoding label.
pub fn validate_encoding(label: &str) -> Result<()> {
    if encoding_for_label(label).is_none() {
        return Err(Error::ConfigValidation {
            field: "archive_name_encoding".to_string(),
            message: format!("Unknown encoding label: '{}'", label),
        });
    }

    Ok(())
}

/// Validate the platform root URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "base_url".to_string(),
        message: format!("'{}' is not a valid URL: {}", base_url, e),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("'{}' must be an absolute http(s) URL", base_url),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.account.session_id = "0123456789abcdef0123".to_string();
        config.target.fan_club_id = "1096".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_session_id() {
        let mut config = valid_config();
        config.account.session_id.clear();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_placeholder_session_id() {
        assert!(validate_session_id("REPLACEME_REPLACEME").is_err());
    }

    #[test]
    fn test_fan_club_id_must_be_numeric() {
        assert!(validate_fan_club_id("1096").is_ok());
        assert!(validate_fan_club_id("abc").is_err());
        assert!(validate_fan_club_id("12/34").is_err());
        assert!(validate_fan_club_id("").is_err());
    }

    #[test]
    fn test_encoding_labels() {
        assert!(validate_encoding("Shift_JIS").is_ok());
        assert!(validate_encoding("windows-31j").is_ok());
        assert!(validate_encoding("cp932").is_ok());
        assert!(validate_encoding("cp-nothing").is_err());
    }

    #[test]
    fn test_base_url() {
        assert!(validate_base_url("https://fantia.jp/").is_ok());
        assert!(validate_base_url("fantia.jp").is_err());
        assert!(validate_base_url("mailto:someone@fantia.jp").is_err());
    }
}
