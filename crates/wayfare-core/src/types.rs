//! # Domain Types
//!
//! Core domain types used throughout the booking engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryUnit  │   │   TicketType    │   │  AddOnService   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, unit_type  │   │  id, name       │   │  id, name       │       │
//! │  │  capacity       │   │  unit_price     │   │  price          │       │
//! │  │  nightly_price  │   │  quantity       │   └─────────────────┘       │
//! │  │  reservations ──┼─┐ └─────────────────┘                             │
//! │  └─────────────────┘ │                                                  │
//! │                      ▼                                                  │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   DateRange     │   │  BookingKind    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  [start, end)   │   │  Lodging        │   │  Card, Online   │       │
//! │  │  start < end    │   │  Ticketed       │   │  Wallet, Cash   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the lodging tax rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for config parsing).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Booking Kind
// =============================================================================

/// Which booking context a flow runs in.
///
/// Selects both the discount catalog and the pricing mode, so lodging and
/// ticketed bookings share one rule type instead of two near-identical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    /// Rooms priced per night, taxed.
    Lodging,
    /// Tickets priced per head plus add-on services, untaxed.
    Ticketed,
}

impl BookingKind {
    /// Payment method preselected when a flow of this kind starts.
    pub const fn default_payment_method(&self) -> PaymentMethod {
        match self {
            BookingKind::Lodging => PaymentMethod::Card,
            BookingKind::Ticketed => PaymentMethod::Wallet,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment at the property.
    Card,
    /// Online transfer.
    Online,
    /// E-wallet.
    Wallet,
    /// Cash on arrival.
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Cash => "cash",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// A half-open interval `[start, end)` of instants.
///
/// ## Invariant
/// `start < end`, enforced by [`DateRange::new`] and by deserialization.
/// A range can therefore never be empty, which is what makes
/// `overlaps(a, a)` hold for every constructed range.
///
/// ## Overlap Test
/// ```text
///   a:  [──────────)
///   b:        [──────────)      start_a < end_b && start_b < end_a → overlap
///
///   a:  [──────)
///   b:         [──────)         end_a == start_b → NO overlap (end exclusive)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "RawDateRange")]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    start: DateTime<Utc>,
    #[ts(as = "String")]
    end: DateTime<Utc>,
}

/// Unchecked wire shape of a [`DateRange`].
#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ValidationError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `start >= end`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use wayfare_core::types::DateRange;
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 10, 22, 0, 0, 0).unwrap();
    /// assert!(DateRange::new(start, end).is_ok());
    /// assert!(DateRange::new(end, start).is_err());
    /// assert!(DateRange::new(start, start).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Creates a range from check-in and check-out calendar dates (midnight UTC).
    pub fn from_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        DateRange::new(
            check_in.and_time(chrono::NaiveTime::MIN).and_utc(),
            check_out.and_time(chrono::NaiveTime::MIN).and_utc(),
        )
    }

    /// Parses `YYYY-MM-DD` check-in/check-out strings, as date pickers send them.
    pub fn parse_dates(check_in: &str, check_out: &str) -> Result<Self, ValidationError> {
        let parse = |field: &str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
                ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: e.to_string(),
                }
            })
        };
        DateRange::from_dates(parse("check_in", check_in)?, parse("check_out", check_out)?)
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Symmetric half-open overlap test.
    #[inline]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of nights covered, rounding a partial day up.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::types::DateRange;
    ///
    /// let stay = DateRange::parse_dates("2025-10-20", "2025-10-25").unwrap();
    /// assert_eq!(stay.nights(), 5);
    /// ```
    pub fn nights(&self) -> u32 {
        let seconds = (self.end - self.start).num_seconds();
        let nights = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(nights).unwrap_or(u32::MAX)
    }

    /// Whole days from `now` until the range starts, rounded toward
    /// negative infinity. Negative once the start has passed.
    pub fn days_until_start(&self, now: DateTime<Utc>) -> i64 {
        (self.start - now).num_seconds().div_euclid(SECONDS_PER_DAY)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

// =============================================================================
// Unit Type Filter
// =============================================================================

/// Room type filter for the availability search.
///
/// `Any` is the "any room" sentinel and bypasses type matching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitTypeFilter {
    #[default]
    Any,
    Only(String),
}

impl UnitTypeFilter {
    /// Checks whether a unit type passes the filter.
    pub fn matches(&self, unit_type: &str) -> bool {
        match self {
            UnitTypeFilter::Any => true,
            UnitTypeFilter::Only(wanted) => wanted == unit_type,
        }
    }
}

// =============================================================================
// Inventory Unit
// =============================================================================

/// A bookable room or venue slot.
///
/// Reservations are read-only reference data supplied by the inventory
/// collaborator; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUnit {
    pub id: String,

    /// Display name ("Deluxe Ocean View").
    pub name: String,

    /// Type tag matched by [`UnitTypeFilter`] ("Standard", "Suite", ...).
    pub unit_type: String,

    /// Maximum guests, at least 1.
    pub capacity: u32,

    /// Price per night, non-negative.
    pub nightly_price: Money,

    /// Availability flag set by the property (maintenance, closed, ...).
    pub available: bool,

    /// Existing reservations.
    #[serde(default)]
    pub reservations: Vec<DateRange>,
}

impl InventoryUnit {
    /// Checks whether any existing reservation overlaps `window`.
    pub fn is_reserved_during(&self, window: &DateRange) -> bool {
        self.reservations.iter().any(|booked| booked.overlaps(window))
    }
}

// =============================================================================
// Ticket Type
// =============================================================================

/// A ticket category of a service (adult entry, child entry, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: String,
    pub name: String,

    /// Price per ticket, non-negative.
    pub unit_price: Money,

    /// Quantity preselected when a flow starts.
    #[serde(default)]
    pub quantity: u32,

    /// Whether each ticket counts as an adult or a child guest.
    #[serde(default)]
    pub audience: TicketAudience,
}

/// Who a ticket admits. In ticketed bookings the party headcount is the
/// ticket count, split by audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TicketAudience {
    #[default]
    Adult,
    Child,
}

// =============================================================================
// Add-on Service
// =============================================================================

/// An optional extra sold alongside tickets (guide, lunch, transfer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOnService {
    pub id: String,
    pub name: String,
    pub price: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse_dates(start, end).unwrap()
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(10.0);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_date_range_rejects_inverted_and_empty() {
        assert!(DateRange::parse_dates("2025-10-22", "2025-10-20").is_err());
        assert!(matches!(
            DateRange::parse_dates("2025-10-20", "2025-10-20"),
            Err(ValidationError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            DateRange::parse_dates("20-10-2025", "2025-10-22"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = range("2025-10-20", "2025-10-22");
        let back_to_back = range("2025-10-22", "2025-10-24");
        let inside = range("2025-10-21", "2025-10-22");

        assert!(!a.overlaps(&back_to_back));
        assert!(!back_to_back.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_nights_rounds_partial_day_up() {
        let start = Utc.with_ymd_and_hms(2025, 10, 20, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 10, 22, 12, 0, 0).unwrap();
        let stay = DateRange::new(start, end).unwrap();
        assert_eq!(stay.nights(), 2);

        assert_eq!(range("2025-10-20", "2025-10-27").nights(), 7);
    }

    #[test]
    fn test_days_until_start_floors() {
        let stay = range("2025-11-30", "2025-12-02");
        let start = stay.start();

        assert_eq!(stay.days_until_start(start - Duration::days(30)), 30);
        // 29 days and 23 hours ahead is still 29 whole days
        assert_eq!(
            stay.days_until_start(start - Duration::days(30) + Duration::hours(1)),
            29
        );
        // an hour after check-in is day -1, not day 0
        assert_eq!(stay.days_until_start(start + Duration::hours(1)), -1);
    }

    #[test]
    fn test_date_range_deserialize_validates() {
        let ok: Result<DateRange, _> = serde_json::from_str(
            r#"{"start":"2025-10-20T00:00:00Z","end":"2025-10-22T00:00:00Z"}"#,
        );
        assert!(ok.is_ok());

        let bad: Result<DateRange, _> = serde_json::from_str(
            r#"{"start":"2025-10-22T00:00:00Z","end":"2025-10-20T00:00:00Z"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_unit_type_filter() {
        assert!(UnitTypeFilter::Any.matches("Suite"));
        assert!(UnitTypeFilter::Only("Suite".to_string()).matches("Suite"));
        assert!(!UnitTypeFilter::Only("Suite".to_string()).matches("Standard"));
    }

    #[test]
    fn test_payment_method_serde_names() {
        let json = serde_json::to_string(&PaymentMethod::Online).unwrap();
        assert_eq!(json, "\"online\"");
        assert_eq!(PaymentMethod::Wallet.to_string(), "wallet");
    }
}
