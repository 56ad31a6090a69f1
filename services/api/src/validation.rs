//! Input validation utilities

use crate::models::ItemRequest;

/// Validate an item payload
pub fn validate_item(payload: &ItemRequest) -> Result<(), String> {
    let name_length = payload.name.chars().count();

    if name_length == 0 {
        return Err("Name is required".to_string());
    }

    if name_length > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    if payload.name.chars().any(char::is_control) {
        return Err("Name must not contain control characters".to_string());
    }

    if payload.description.chars().count() > 500 {
        return Err("Description must be at most 500 characters long".to_string());
    }

    // Line breaks and tabs are fine in free text
    if payload
        .description
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err("Description must not contain control characters".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, description: &str) -> ItemRequest {
        ItemRequest {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_item(&request("", "")).is_err());
        assert!(validate_item(&request("W", "")).is_ok());
        assert!(validate_item(&request(&"n".repeat(100), "")).is_ok());
        assert!(validate_item(&request(&"n".repeat(101), "")).is_err());
    }

    #[test]
    fn test_description_bounds() {
        assert!(validate_item(&request("Widget", &"d".repeat(500))).is_ok());
        assert!(validate_item(&request("Widget", &"d".repeat(501))).is_err());
    }

    #[test]
    fn test_lengths_are_counted_in_characters() {
        assert!(validate_item(&request(&"ü".repeat(100), &"é".repeat(500))).is_ok());
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert!(validate_item(&request("Wid\u{0}get", "")).is_err());
        assert!(validate_item(&request("Widget\n", "")).is_err());
        assert!(validate_item(&request("Widget", "nul \u{0} byte")).is_err());
        assert!(validate_item(&request("Widget", "bell \u{7}")).is_err());
        assert!(validate_item(&request("Widget", "line one\nline two\tend\r\n")).is_ok());
    }
}
