//! # Error Types
//!
//! Domain-specific error types for wayfare-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wayfare-core errors (this file)                                       │
//! │  ├── CoreError        - Booking flow failures                          │
//! │  └── ValidationError  - Malformed catalog / input data                 │
//! │                                                                         │
//! │  wayfare-desk errors (host app)                                        │
//! │  └── ApiError         - What the presentation layer sees (serialized)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - No unit matching the filters: an empty [`UnitPage`](crate::pagination::UnitPage)
//! - A discount that is not yet eligible: a rule with shortfalls
//! - Toggling an unknown or ineligible discount: a logged no-op
//!
//! Only malformed data entering the engine raises, and it raises at the
//! boundary where it entered (catalog construction, range construction).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Booking flow errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Inventory unit id is not part of the loaded catalog.
    #[error("Inventory unit not found: {0}")]
    UnknownUnit(String),

    /// Ticket type id is not part of the loaded catalog.
    #[error("Ticket type not found: {0}")]
    UnknownTicket(String),

    /// Add-on service id is not part of the loaded catalog.
    #[error("Add-on service not found: {0}")]
    UnknownAddOn(String),

    /// The selection cannot be confirmed yet.
    ///
    /// ## When This Occurs
    /// - Lodging booking without a stay window
    /// - Lodging booking with no unit selected
    /// - Ticketed booking without tickets
    #[error("Selection is incomplete: {reason}")]
    IncompleteSelection { reason: String },

    /// Selected units the availability filter refuses for the current
    /// guests and stay window (closed, too small, or reserved).
    #[error("Selected units are not bookable: {}", .0.join(", "))]
    UnitUnavailable(Vec<String>),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Malformed input data (the ValidationFault class).
///
/// These are programmer or data errors, never user errors. They are raised
/// as soon as bad data crosses into the engine so that price computation
/// further down stays infallible.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Date range whose start is not strictly before its end.
    #[error("date range start {start} must be before end {end}")]
    InvalidDateRange { start: String, end: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two units sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
