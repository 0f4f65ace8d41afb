//! The boundary between stored strings and typed field values.
//!
//! Every value is persisted and transmitted as a string. [`RawValue`] pairs
//! that string with its field type, and [`convert_default_value`] is the one
//! function that turns it into a [`TypedValue`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use admissions_core::AppError;

use super::field_type::FieldType;

/// A value interpreted according to its field type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Trimmed text.
    Text(String),
    /// A finite or infinite number (never NaN).
    Number(f64),
    /// A boolean.
    Boolean(bool),
    /// A calendar day.
    Date(NaiveDate),
    /// A timestamp without zone (UTC when an offset was given).
    DateTime(NaiveDateTime),
}

impl TypedValue {
    /// Render the canonical stored form.
    pub fn to_raw(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.is_infinite() => {
                if n.is_sign_positive() {
                    "Infinity".to_string()
                } else {
                    "-Infinity".to_string()
                }
            }
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

/// Failure to coerce a stored string into its field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The text is not a number.
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    /// The text is neither `true` nor `false`.
    #[error("'{0}' is not a valid boolean, expected true or false")]
    InvalidBoolean(String),
    /// The text is not a recognizable date or timestamp.
    #[error("'{0}' is not a valid date")]
    InvalidDate(String),
    /// The type name is not one of the known field types.
    #[error("Unknown field type: '{0}'")]
    UnknownType(String),
}

impl From<CoercionError> for AppError {
    fn from(err: CoercionError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// A stored value tagged with the type of its owning field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    /// Type of the owning field.
    pub field_type: FieldType,
    /// Stored text.
    pub raw: String,
}

impl RawValue {
    /// Tag a stored string with its field type.
    pub fn new(field_type: FieldType, raw: impl Into<String>) -> Self {
        Self {
            field_type,
            raw: raw.into(),
        }
    }

    /// Interpret the value. Blank text yields `None`.
    pub fn typed(&self) -> Result<Option<TypedValue>, CoercionError> {
        convert_default_value(self.field_type, Some(&self.raw))
    }

    /// Whether the text is blank.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Convert a stored string into a typed value.
///
/// `None`, empty and whitespace-only input mean "no value" and yield
/// `Ok(None)`.
pub fn convert_default_value(
    field_type: FieldType,
    raw: Option<&str>,
) -> Result<Option<TypedValue>, CoercionError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = match field_type {
        FieldType::String => TypedValue::Text(trimmed.to_string()),
        FieldType::Number => TypedValue::Number(
            parse_number(trimmed).ok_or_else(|| CoercionError::InvalidNumber(raw.to_string()))?,
        ),
        FieldType::Boolean => TypedValue::Boolean(
            parse_boolean(trimmed).ok_or_else(|| CoercionError::InvalidBoolean(raw.to_string()))?,
        ),
        FieldType::Date => {
            let ts = parse_timestamp(trimmed)
                .ok_or_else(|| CoercionError::InvalidDate(raw.to_string()))?;
            TypedValue::Date(ts.date())
        }
        FieldType::DateTime => TypedValue::DateTime(
            parse_timestamp(trimmed).ok_or_else(|| CoercionError::InvalidDate(raw.to_string()))?,
        ),
    };

    Ok(Some(value))
}

/// Convert a stored string given the type's wire name.
pub fn coerce_named(type_name: &str, raw: Option<&str>) -> Result<Option<TypedValue>, CoercionError> {
    let field_type = type_name
        .parse::<FieldType>()
        .map_err(|_| CoercionError::UnknownType(type_name.to_string()))?;
    convert_default_value(field_type, raw)
}

/// Parse a number the way a browser's `Number()` does. `None` stands for NaN.
///
/// Accepts surrounding whitespace, an optional sign, decimal and exponent
/// notation, `Infinity`, and unsigned `0x` / `0o` / `0b` integer literals.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&s[2..], radix).ok().map(|n| n as f64);
    }

    // Rust also accepts "inf" and "nan"; a browser does not.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Case-insensitive `true` / `false`.
pub fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or timestamp. Offsets are normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
