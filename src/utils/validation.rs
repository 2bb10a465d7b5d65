// Validation utilities for string fields

/// Trim and validate string fields
pub fn trim_and_validate_field(field: &str, required: bool) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        if required {
            Err("Field cannot be empty".to_string())
        } else {
            Ok(trimmed) // For optional fields, empty is valid
        }
    } else {
        Ok(trimmed)
    }
}

/// Trim an optional string field, collapsing whitespace-only values to None
pub fn trim_optional_field(field: Option<&String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_required() {
        assert_eq!(trim_and_validate_field("  hi ", true).unwrap(), "hi");
        assert!(trim_and_validate_field("   ", true).is_err());
    }

    #[test]
    fn test_trim_optional() {
        assert_eq!(trim_optional_field(Some(&"  x ".to_string())), Some("x".to_string()));
        assert_eq!(trim_optional_field(Some(&"   ".to_string())), None);
        assert_eq!(trim_optional_field(None), None);
    }
}
