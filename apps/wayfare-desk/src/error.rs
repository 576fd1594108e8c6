//! # API Error Type
//!
//! Unified error type for host commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Wayfare                                │
//! │                                                                         │
//! │  {"command":"toggle_unit","unit_id":"R99"}                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Malformed line? ──── serde_json::Error ─────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Engine refused? ──── CoreError::UnknownUnit ── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"error":{"code":"NOT_FOUND","message":"Inventory unit not found: R99"}}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use wayfare_core::{CoreError, ValidationError};

/// API error returned from host commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INCOMPLETE_SELECTION",
///   "message": "Selection is incomplete: stay window is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unit, ticket or add-on id not in the catalog
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Confirmation attempted on an incomplete selection
    IncompleteSelection,

    /// A selected unit is closed, too small or already reserved
    UnitUnavailable,

    /// A flow command arrived before `start`
    NoActiveFlow,

    /// The input line is not a known command
    InvalidCommand,

    /// Internal failure (I/O, serialization)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn no_active_flow() -> Self {
        ApiError::new(
            ErrorCode::NoActiveFlow,
            "No booking in progress; send a start command first",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownUnit(id) => ApiError::not_found("Inventory unit", &id),
            CoreError::UnknownTicket(id) => ApiError::not_found("Ticket type", &id),
            CoreError::UnknownAddOn(id) => ApiError::not_found("Add-on service", &id),
            err @ CoreError::IncompleteSelection { .. } => {
                ApiError::new(ErrorCode::IncompleteSelection, err.to_string())
            }
            err @ CoreError::UnitUnavailable(_) => {
                ApiError::new(ErrorCode::UnitUnavailable, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// A line that does not parse as a command.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            tracing::error!("JSON I/O failed: {}", err);
            return ApiError::internal("Output channel failed");
        }
        ApiError::new(ErrorCode::InvalidCommand, format!("Invalid command: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        // Log the actual error but return a generic message
        tracing::error!("I/O failed: {}", err);
        ApiError::internal("I/O operation failed")
    }
}
