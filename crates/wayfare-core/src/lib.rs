//! # wayfare-core: Booking Eligibility and Pricing Engine
//!
//! Everything that happens between "show me rooms" and "confirm booking":
//! availability filtering, pagination, the selection snapshot, discount
//! eligibility and price aggregation. Pure functions, zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wayfare Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (booking modal)              │   │
//! │  │   Dates ──► Rooms / Tickets ──► Discounts ──► Confirm           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    wayfare-desk (host)                          │   │
//! │  │   config, logging, command dispatch, serialized flow state      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wayfare-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────┐ ┌────────────┐ ┌─────────────┐ ┌───────────┐  │   │
//! │  │  │availability │ │ selection  │ │ eligibility │ │  pricing  │  │   │
//! │  │  │ pagination  │ │ snapshots  │ │ auto-apply  │ │ breakdown │  │   │
//! │  │  └─────────────┘ └────────────┘ └─────────────┘ └───────────┘  │   │
//! │  │                        flow (orchestrates all four)             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (DateRange, InventoryUnit, PaymentMethod, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary checks for catalog data
//! - [`catalog`] - Validated inventory catalog
//! - [`discount`] - Discount rules and the built-in rule tables
//! - [`availability`] - Availability filter
//! - [`pagination`] - Page math and the pager
//! - [`selection`] - Immutable selection snapshots
//! - [`eligibility`] - Rule evaluation and the auto-apply policy
//! - [`pricing`] - Price aggregation
//! - [`flow`] - One booking session end to end
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use wayfare_core::{BookingFlow, DateRange, FlowSettings, InventoryCatalog, InventoryUnit, Money};
//!
//! let room = |id: &str| InventoryUnit {
//!     id: id.into(),
//!     name: format!("Room {}", id),
//!     unit_type: "Standard".into(),
//!     capacity: 2,
//!     nightly_price: Money::from_minor(100_000),
//!     available: true,
//!     reservations: Vec::new(),
//! };
//! let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
//! let catalog = InventoryCatalog::lodging(vec![room("R1"), room("R2")])?;
//! let mut flow = BookingFlow::start(catalog, FlowSettings::default(), now)?;
//!
//! flow.set_stay_window(Some(DateRange::parse_dates("2025-10-20", "2025-10-25")?), now)?;
//! flow.toggle_unit("R1", now)?;
//! flow.toggle_unit("R2", now)?;
//!
//! // 2 rooms × 5 nights: MULTI_ROOM + LONG_STAY + WALLET_PAY (card)
//! let price = flow.price();
//! assert_eq!(price.subtotal.minor(), 1_000_000);
//! assert_eq!(price.tax.minor(), 100_000);
//! assert_eq!(price.discount_total.minor(), 350_000);
//! assert_eq!(price.final_total.minor(), 750_000);
//! # Ok::<(), wayfare_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod catalog;
pub mod discount;
pub mod eligibility;
pub mod error;
pub mod flow;
pub mod money;
pub mod pagination;
pub mod pricing;
pub mod selection;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogSource, InventoryCatalog};
pub use discount::{DiscountCatalog, DiscountRule, DiscountValue, RuleCondition};
pub use eligibility::{AppliedDiscounts, RuleEvaluation, Shortfall};
pub use error::{CoreError, CoreResult, ValidationError};
pub use flow::{BookingFlow, BookingPayload, FlowSettings, FlowView};
pub use money::Money;
pub use pagination::{Page, UnitPage};
pub use pricing::PriceBreakdown;
pub use selection::{SelectionAction, SelectionState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax on lodging subtotals: 10%.
///
/// Ticketed bookings are not taxed.
pub const LODGING_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Units shown per page of availability results.
pub const DEFAULT_PAGE_SIZE: usize = 3;
