//! # Availability Filter
//!
//! Reduces the inventory catalog to the units that can host the requested
//! stay.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog units (catalog order)                                          │
//! │       │                                                                 │
//! │       ├── available == false?            → reject                       │
//! │       ├── type filter set and mismatch?  → reject                       │
//! │       ├── capacity < required guests?    → reject                       │
//! │       ├── stay window given and any                                     │
//! │       │   reservation overlaps it?       → reject                       │
//! │       ▼                                                                 │
//! │  survivors, catalog order preserved                                     │
//! │       │                                                                 │
//! │       └── empty? → FilteredUnits::is_empty(), NOT an error              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::availability::{filter_units, AvailabilityQuery};
//! use wayfare_core::money::Money;
//! use wayfare_core::types::{DateRange, InventoryUnit, UnitTypeFilter};
//!
//! let booked = DateRange::parse_dates("2025-10-20", "2025-10-22").unwrap();
//! let room = InventoryUnit {
//!     id: "R1".into(),
//!     name: "Garden Room".into(),
//!     unit_type: "Standard".into(),
//!     capacity: 2,
//!     nightly_price: Money::from_minor(120),
//!     available: true,
//!     reservations: vec![booked],
//! };
//!
//! let query = AvailabilityQuery {
//!     unit_type: UnitTypeFilter::Any,
//!     min_capacity: 2,
//!     stay_window: Some(booked),
//! };
//! assert!(filter_units(std::slice::from_ref(&room), &query).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::selection::SelectionState;
use crate::types::{DateRange, InventoryUnit, UnitTypeFilter};

// =============================================================================
// Query
// =============================================================================

/// The active availability predicates.
///
/// Two queries compare equal exactly when they select the same units, so a
/// changed query is the signal to send pagination back to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub unit_type: UnitTypeFilter,

    /// Guests every unit must be able to host on its own.
    pub min_capacity: u32,

    /// Requested stay; `None` skips the reservation conflict check.
    pub stay_window: Option<DateRange>,
}

impl AvailabilityQuery {
    /// Derives the query from the current selection: capacity from the
    /// party size, window from the requested stay.
    pub fn for_selection(unit_type: UnitTypeFilter, selection: &SelectionState) -> Self {
        AvailabilityQuery {
            unit_type,
            min_capacity: selection.total_guests(),
            stay_window: selection.stay_window(),
        }
    }

    /// Checks a single unit against every active predicate.
    pub fn admits(&self, unit: &InventoryUnit) -> bool {
        if !unit.available {
            return false;
        }
        if !self.unit_type.matches(&unit.unit_type) {
            return false;
        }
        if unit.capacity < self.min_capacity {
            return false;
        }
        match &self.stay_window {
            Some(window) => !unit.is_reserved_during(window),
            None => true,
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// Units that passed the filter, borrowed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredUnits<'a> {
    units: Vec<&'a InventoryUnit>,
}

impl<'a> FilteredUnits<'a> {
    #[inline]
    pub fn units(&self) -> &[&'a InventoryUnit] {
        &self.units
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.units.len()
    }

    /// The explicit "nothing matches" state.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.units.iter().map(|u| u.id.as_str()).collect()
    }
}

/// Filters `units` by `query`, preserving catalog order.
pub fn filter_units<'a>(units: &'a [InventoryUnit], query: &AvailabilityQuery) -> FilteredUnits<'a> {
    FilteredUnits {
        units: units.iter().filter(|unit| query.admits(unit)).collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use proptest::prelude::*;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse_dates(start, end).unwrap()
    }

    fn room(id: &str, unit_type: &str, capacity: u32, reservations: Vec<DateRange>) -> InventoryUnit {
        InventoryUnit {
            id: id.to_string(),
            name: format!("Room {}", id),
            unit_type: unit_type.to_string(),
            capacity,
            nightly_price: Money::from_minor(120),
            available: true,
            reservations,
        }
    }

    fn query(unit_type: UnitTypeFilter, min_capacity: u32, window: Option<DateRange>) -> AvailabilityQuery {
        AvailabilityQuery {
            unit_type,
            min_capacity,
            stay_window: window,
        }
    }

    #[test]
    fn test_reserved_room_excluded_for_same_window() {
        let booked = range("2025-10-20", "2025-10-22");
        let units = vec![
            room("R1", "Standard", 2, vec![booked]),
            room("R2", "Standard", 2, Vec::new()),
        ];

        let result = filter_units(&units, &query(UnitTypeFilter::Any, 1, Some(booked)));
        assert_eq!(result.ids(), vec!["R2"]);
    }

    #[test]
    fn test_back_to_back_stay_is_not_a_conflict() {
        let units = vec![room("R1", "Standard", 2, vec![range("2025-10-20", "2025-10-22")])];
        let next = Some(range("2025-10-22", "2025-10-25"));

        assert_eq!(filter_units(&units, &query(UnitTypeFilter::Any, 1, next)).count(), 1);
    }

    #[test]
    fn test_no_stay_window_skips_conflict_check() {
        let units = vec![room("R1", "Standard", 2, vec![range("2025-10-20", "2025-10-22")])];
        assert_eq!(filter_units(&units, &query(UnitTypeFilter::Any, 1, None)).count(), 1);
    }

    #[test]
    fn test_type_capacity_and_availability_filters() {
        let mut closed = room("R3", "Suite", 4, Vec::new());
        closed.available = false;
        let units = vec![
            room("R1", "Standard", 2, Vec::new()),
            room("R2", "Suite", 4, Vec::new()),
            closed,
            room("R4", "Suite", 2, Vec::new()),
        ];

        let suites = filter_units(&units, &query(UnitTypeFilter::Only("Suite".into()), 1, None));
        assert_eq!(suites.ids(), vec!["R2", "R4"]);

        let big = filter_units(&units, &query(UnitTypeFilter::Any, 3, None));
        assert_eq!(big.ids(), vec!["R2"]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let units = vec![room("R1", "Standard", 2, Vec::new())];
        let result = filter_units(&units, &query(UnitTypeFilter::Any, 6, None));
        assert!(result.is_empty());
        assert_eq!(result.count(), 0);
    }

    fn arb_range() -> impl Strategy<Value = DateRange> {
        (0i64..60, 1i64..10).prop_map(|(offset, len)| {
            let base = chrono::DateTime::from_timestamp(1_760_000_000, 0).unwrap();
            let start = base + chrono::Duration::days(offset);
            DateRange::new(start, start + chrono::Duration::days(len)).unwrap()
        })
    }

    fn arb_unit() -> impl Strategy<Value = InventoryUnit> {
        (
            0u8..3,
            1u32..6,
            any::<bool>(),
            prop::collection::vec(arb_range(), 0..3),
        )
            .prop_map(|(kind, capacity, available, reservations)| InventoryUnit {
                id: String::new(),
                name: String::new(),
                unit_type: ["Standard", "Deluxe", "Suite"][kind as usize].to_string(),
                capacity,
                nightly_price: Money::from_minor(100),
                available,
                reservations,
            })
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_range(), b in arb_range()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_filter_is_sound_and_complete(
            mut units in prop::collection::vec(arb_unit(), 0..12),
            wanted in prop::option::of(0u8..3),
            min_capacity in 0u32..6,
            window in prop::option::of(arb_range()),
        ) {
            for (i, unit) in units.iter_mut().enumerate() {
                unit.id = format!("U{}", i);
            }
            let unit_type = match wanted {
                Some(k) => UnitTypeFilter::Only(["Standard", "Deluxe", "Suite"][k as usize].to_string()),
                None => UnitTypeFilter::Any,
            };
            let q = query(unit_type.clone(), min_capacity, window);
            let result = filter_units(&units, &q);

            let expected: Vec<&str> = units
                .iter()
                .filter(|u| {
                    u.available
                        && unit_type.matches(&u.unit_type)
                        && u.capacity >= min_capacity
                        && window.map_or(true, |w| {
                            u.reservations.iter().all(|r| !(r.start() < w.end() && w.start() < r.end()))
                        })
                })
                .map(|u| u.id.as_str())
                .collect();

            prop_assert_eq!(result.ids(), expected);
        }
    }
}
