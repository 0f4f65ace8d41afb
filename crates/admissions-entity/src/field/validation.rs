//! Field attribute validators.
//!
//! Each validator returns `None` when the input is acceptable, or the
//! message to show next to the offending control.

use super::field_type::FieldType;
use super::value::{parse_boolean, parse_number, parse_timestamp};

/// Minimum length of a field's system name.
pub const MIN_NAME_LEN: usize = 2;
/// Minimum length of a field's display name.
pub const MIN_DISPLAY_NAME_LEN: usize = 2;

/// Validate a default value against the selected field type.
///
/// Blank input is always valid and means "no default".
pub fn validate_default_value(field_type: FieldType, raw: &str) -> Option<&'static str> {
    if raw.trim().is_empty() {
        return None;
    }

    match field_type {
        FieldType::String => None,
        FieldType::Number => parse_number(raw)
            .is_none()
            .then_some("Value must be a number"),
        FieldType::Boolean => parse_boolean(raw)
            .is_none()
            .then_some("Value must be true or false"),
        FieldType::Date | FieldType::DateTime => parse_timestamp(raw)
            .is_none()
            .then_some("Invalid date"),
    }
}

/// Validate a field's system name.
pub fn validate_field_name(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("System name is required");
    }

    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some(
            "System name must start with a letter and contain only letters, digits, and underscores",
        );
    }

    if name.chars().count() < MIN_NAME_LEN {
        return Some("System name must be at least 2 characters long");
    }

    None
}

/// Validate a field's display name.
pub fn validate_display_name(display_name: &str) -> Option<&'static str> {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return Some("Display name is required");
    }

    if trimmed.chars().count() < MIN_DISPLAY_NAME_LEN {
        return Some("Display name must be at least 2 characters long");
    }

    None
}

/// Strip every character a system name may not contain.
pub fn sanitize_field_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::value::convert_default_value;

    #[test]
    fn test_default_value_per_type() {
        assert_eq!(validate_default_value(FieldType::Number, "42"), None);
        assert!(validate_default_value(FieldType::Number, "abc").is_some());
        assert_eq!(validate_default_value(FieldType::Boolean, " TRUE "), None);
        assert!(validate_default_value(FieldType::Boolean, "yes").is_some());
        assert_eq!(validate_default_value(FieldType::Date, "2025-06-01"), None);
        assert!(validate_default_value(FieldType::DateTime, "tomorrow").is_some());
        assert_eq!(validate_default_value(FieldType::String, "anything"), None);
    }

    #[test]
    fn test_blank_default_is_valid() {
        for ty in FieldType::ALL {
            assert_eq!(validate_default_value(ty, "  "), None);
        }
    }

    #[test]
    fn test_accepted_values_always_convert() {
        let samples = [
            "42", "-3.5", "1e9", "0x1f", "Infinity", "true", "FALSE", "2024-02-29",
            "2024-02-29T10:00", "2024-02-29T10:00:00Z", "text", "abc", "  ", "", "30-02-2024",
        ];
        for ty in FieldType::ALL {
            for raw in samples {
                if validate_default_value(ty, raw).is_none() {
                    assert!(
                        convert_default_value(ty, Some(raw)).is_ok(),
                        "{ty} accepted '{raw}' but conversion failed"
                    );
                }
            }
        }
    }

    #[test]
    fn test_field_name_rules() {
        assert_eq!(validate_field_name("region_code"), None);
        assert_eq!(validate_field_name("A1"), None);
        assert!(validate_field_name("").is_some());
        assert!(validate_field_name("1region").is_some());
        assert!(validate_field_name("region-code").is_some());
        assert_eq!(
            validate_field_name("a"),
            Some("System name must be at least 2 characters long")
        );
    }

    #[test]
    fn test_display_name_rules() {
        assert_eq!(validate_display_name("Region"), None);
        assert!(validate_display_name("   ").is_some());
        assert!(validate_display_name(" R ").is_some());
    }

    #[test]
    fn test_sanitize_field_name() {
        assert_eq!(sanitize_field_name("region code-2!"), "regioncode2");
    }
}
