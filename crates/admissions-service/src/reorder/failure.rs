//! Classification of failed reorder persistence.

use admissions_core::error::{AppError, ErrorKind};

/// Why a reorder could not be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderFailure {
    /// The payload was malformed.
    InvalidPayload,
    /// A field in the payload no longer exists.
    FieldNotFound,
    /// The backend refused the order on validation grounds.
    Validation,
    /// Anything else: server failure, network, unexpected answer.
    Server,
}

impl ReorderFailure {
    /// Classify an error returned by the reorder endpoint.
    pub fn classify(err: &AppError) -> Self {
        let message = err.message.to_lowercase();

        if err.kind == ErrorKind::NotFound || message.contains("not found") {
            return Self::FieldNotFound;
        }
        if message.contains("invalid field") || message.contains("invalid fields") {
            return Self::InvalidPayload;
        }
        match err.kind {
            ErrorKind::Validation if err.is_local() => Self::InvalidPayload,
            ErrorKind::Validation => Self::Validation,
            _ => Self::Server,
        }
    }

    /// Headline shown when the backend gave no usable message.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "Invalid field data, the new order was not saved",
            Self::FieldNotFound => "Some fields no longer exist, refresh the field list",
            Self::Validation => "The server rejected the new field order",
            Self::Server => "Failed to save the field order, please try again",
        }
    }

    /// Message for the user: the fallback headline, followed by the
    /// backend's explanation when it sent one.
    pub fn user_message(&self, err: &AppError) -> String {
        if err.status.is_some() && !err.message.trim().is_empty() {
            format!("{}: {}", self.fallback_message(), err.message)
        } else {
            self.fallback_message().to_string()
        }
    }
}
