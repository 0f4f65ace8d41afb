//! Field type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical type of a directory field. Values are always stored as strings;
/// the type decides how they are validated and interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    /// Free text.
    #[default]
    String,
    /// Numeric value.
    Number,
    /// Calendar day.
    Date,
    /// Date with time of day.
    DateTime,
    /// `true` / `false`.
    Boolean,
}

impl FieldType {
    /// All field types in the order the create form offers them.
    pub const ALL: [FieldType; 5] = [
        Self::String,
        Self::Number,
        Self::Date,
        Self::DateTime,
        Self::Boolean,
    ];

    /// Return the wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Boolean => "BOOLEAN",
        }
    }

    /// Whether values of this type are dates or timestamps.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = admissions_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRING" => Ok(Self::String),
            "NUMBER" => Ok(Self::Number),
            "DATE" => Ok(Self::Date),
            "DATETIME" => Ok(Self::DateTime),
            "BOOLEAN" => Ok(Self::Boolean),
            _ => Err(admissions_core::AppError::validation(format!(
                "Unknown field type: '{s}'. Expected one of: STRING, NUMBER, DATE, DATETIME, BOOLEAN"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("number".parse::<FieldType>().unwrap(), FieldType::Number);
        assert_eq!("DATETIME".parse::<FieldType>().unwrap(), FieldType::DateTime);
        assert!("TEXT".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&FieldType::DateTime).unwrap();
        assert_eq!(json, "\"DATETIME\"");
        let parsed: FieldType = serde_json::from_str("\"BOOLEAN\"").unwrap();
        assert_eq!(parsed, FieldType::Boolean);
    }
}
