//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    let length = username.chars().count();

    if length < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if length > 50 {
        return Err("Username must be at most 50 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[^\s\p{Cc}]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username must not contain whitespace or control characters".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();

    if length < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if length > 100 {
        return Err("Password must be at most 100 characters long".to_string());
    }

    Ok(())
}
