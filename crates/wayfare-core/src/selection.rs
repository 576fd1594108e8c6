//! # Selection State
//!
//! The in-progress booking selection as an immutable snapshot.
//!
//! ## Snapshot Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Selection Lifecycle                                  │
//! │                                                                         │
//! │  flow starts                                                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  S0 (empty) ──toggle_unit──► S1 ──set_quantity──► S2 ──...──► Sn        │
//! │                                                              │          │
//! │                           cancel: drop Sn ◄──────────────────┤          │
//! │                           confirm: Sn → BookingPayload ◄─────┘          │
//! │                                                                         │
//! │  Every operation takes &self and returns a NEW snapshot derived from   │
//! │  the latest one. Nothing is mutated in place, so a stale read can      │
//! │  never overwrite a newer update.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot knows nothing about discounts or prices. Whoever holds it
//! (see [`crate::flow::BookingFlow`]) recomputes eligibility and price
//! after each transition.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::types::{DateRange, PaymentMethod, TicketAudience, TicketType};

// =============================================================================
// Selection Action
// =============================================================================

/// One discrete selection change, as raised by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionAction {
    ToggleUnit {
        unit_id: String,
    },
    SetQuantity {
        ticket_id: String,
        delta: i64,
    },
    SetGuestCounts {
        adults: u32,
        children: u32,
    },
    SetPaymentMethod {
        method: PaymentMethod,
    },
    SetStayWindow {
        window: Option<DateRange>,
    },
}

// =============================================================================
// Selection State
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    selected_units: BTreeSet<String>,

    /// Keyed by ticket id; only ids seeded at flow start are present.
    ticket_quantities: BTreeMap<String, u32>,

    adults: u32,
    children: u32,
    payment_method: PaymentMethod,
    stay_window: Option<DateRange>,
}

impl SelectionState {
    /// An empty selection.
    pub fn new(payment_method: PaymentMethod) -> Self {
        SelectionState {
            selected_units: BTreeSet::new(),
            ticket_quantities: BTreeMap::new(),
            adults: 0,
            children: 0,
            payment_method,
            stay_window: None,
        }
    }

    /// Seeds one quantity entry per ticket type, starting at the ticket's
    /// preselected quantity.
    pub fn with_tickets(mut self, tickets: &[TicketType]) -> Self {
        self.ticket_quantities = tickets
            .iter()
            .map(|t| (t.id.clone(), t.quantity))
            .collect();
        self
    }

    /// Applies an action, returning the next snapshot.
    pub fn apply(&self, action: &SelectionAction) -> Self {
        match action {
            SelectionAction::ToggleUnit { unit_id } => self.toggle_unit(unit_id),
            SelectionAction::SetQuantity { ticket_id, delta } => {
                self.set_quantity(ticket_id, *delta)
            }
            SelectionAction::SetGuestCounts { adults, children } => {
                self.set_guest_counts(*adults, *children)
            }
            SelectionAction::SetPaymentMethod { method } => self.set_payment_method(*method),
            SelectionAction::SetStayWindow { window } => self.set_stay_window(*window),
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Adds the unit if absent, removes it if present.
    pub fn toggle_unit(&self, unit_id: &str) -> Self {
        let mut next = self.clone();
        if !next.selected_units.remove(unit_id) {
            next.selected_units.insert(unit_id.to_string());
        }
        next
    }

    /// Adds `delta` to one ticket's quantity, clamping at zero.
    ///
    /// Only the `ticket_id` entry changes. An id that was never seeded
    /// leaves the snapshot unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::selection::SelectionState;
    /// use wayfare_core::types::{PaymentMethod, TicketAudience, TicketType};
    /// use wayfare_core::money::Money;
    ///
    /// let ticket = |id: &str| TicketType {
    ///     id: id.into(),
    ///     name: id.into(),
    ///     unit_price: Money::from_minor(100),
    ///     quantity: 1,
    ///     audience: TicketAudience::Adult,
    /// };
    /// let s0 = SelectionState::new(PaymentMethod::Cash)
    ///     .with_tickets(&[ticket("adult"), ticket("child")]);
    ///
    /// let s1 = s0.set_quantity("adult", 2);
    /// assert_eq!(s1.quantity("adult"), 3);
    /// assert_eq!(s1.quantity("child"), 1);
    ///
    /// let s2 = s1.set_quantity("child", -5);
    /// assert_eq!(s2.quantity("child"), 0);
    /// ```
    pub fn set_quantity(&self, ticket_id: &str, delta: i64) -> Self {
        let mut next = self.clone();
        match next.ticket_quantities.get_mut(ticket_id) {
            Some(quantity) => {
                let updated = i64::from(*quantity)
                    .saturating_add(delta)
                    .clamp(0, i64::from(u32::MAX));
                *quantity = updated as u32;
            }
            None => debug!(ticket_id = %ticket_id, "quantity change for unknown ticket ignored"),
        }
        next
    }

    pub fn set_guest_counts(&self, adults: u32, children: u32) -> Self {
        SelectionState {
            adults,
            children,
            ..self.clone()
        }
    }

    /// Guest counts re-derived from ticket quantities: each ticket counts
    /// as one adult or one child according to its audience.
    ///
    /// Ticketed bookings price per ticket, so the headcount the group
    /// rules look at is the ticket count.
    pub fn with_headcount_from(&self, tickets: &[TicketType]) -> Self {
        let mut adults = 0u32;
        let mut children = 0u32;
        for ticket in tickets {
            let quantity = self.quantity(&ticket.id);
            match ticket.audience {
                TicketAudience::Adult => adults = adults.saturating_add(quantity),
                TicketAudience::Child => children = children.saturating_add(quantity),
            }
        }
        self.set_guest_counts(adults, children)
    }

    pub fn set_payment_method(&self, payment_method: PaymentMethod) -> Self {
        SelectionState {
            payment_method,
            ..self.clone()
        }
    }

    /// Replaces the requested stay; `None` clears it.
    pub fn set_stay_window(&self, stay_window: Option<DateRange>) -> Self {
        SelectionState {
            stay_window,
            ..self.clone()
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[inline]
    pub fn selected_units(&self) -> &BTreeSet<String> {
        &self.selected_units
    }

    #[inline]
    pub fn is_unit_selected(&self, unit_id: &str) -> bool {
        self.selected_units.contains(unit_id)
    }

    /// Number of selected units (rooms).
    #[inline]
    pub fn unit_count(&self) -> u32 {
        u32::try_from(self.selected_units.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn ticket_quantities(&self) -> &BTreeMap<String, u32> {
        &self.ticket_quantities
    }

    /// Quantity of one ticket, zero when unknown.
    pub fn quantity(&self, ticket_id: &str) -> u32 {
        self.ticket_quantities.get(ticket_id).copied().unwrap_or(0)
    }

    /// Tickets across all types.
    pub fn total_tickets(&self) -> u32 {
        self.ticket_quantities
            .values()
            .fold(0u32, |sum, q| sum.saturating_add(*q))
    }

    #[inline]
    pub fn adults(&self) -> u32 {
        self.adults
    }

    #[inline]
    pub fn children(&self) -> u32 {
        self.children
    }

    #[inline]
    pub fn total_guests(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    #[inline]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[inline]
    pub fn stay_window(&self) -> Option<DateRange> {
        self.stay_window
    }

    /// Nights of the requested stay, 0 without one.
    pub fn nights(&self) -> u32 {
        self.stay_window.map_or(0, |w| w.nights())
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

    fn ticket(id: &str, quantity: u32) -> TicketType {
        TicketType {
            id: id.to_string(),
            name: id.to_string(),
            unit_price: Money::from_minor(100_000),
            quantity,
            audience: if id == "child" {
                TicketAudience::Child
            } else {
                TicketAudience::Adult
            },
        }
    }

    fn seeded() -> SelectionState {
        SelectionState::new(PaymentMethod::Wallet).with_tickets(&[
            ticket("adult", 0),
            ticket("child", 0),
            ticket("senior", 0),
        ])
    }

    #[test]
    fn test_toggle_unit_has_set_semantics() {
        let s0 = SelectionState::new(PaymentMethod::Card);
        let s1 = s0.toggle_unit("R1").toggle_unit("R2");
        assert_eq!(s1.unit_count(), 2);

        let s2 = s1.toggle_unit("R1");
        assert!(!s2.is_unit_selected("R1"));
        assert!(s2.is_unit_selected("R2"));
        assert_eq!(s2.unit_count(), 1);
    }

    #[test]
    fn test_transitions_leave_previous_snapshot_untouched() {
        let s0 = seeded();
        let s1 = s0.set_quantity("adult", 3).toggle_unit("R1");
        assert_eq!(s0.quantity("adult"), 0);
        assert_eq!(s0.unit_count(), 0);
        assert_eq!(s1.quantity("adult"), 3);
    }

    #[test]
    fn test_repeated_increments_accumulate() {
        let mut snapshot = seeded();
        for _ in 0..5 {
            snapshot = snapshot.set_quantity("child", 1);
        }
        assert_eq!(snapshot.quantity("child"), 5);
        assert_eq!(snapshot.quantity("adult"), 0);
    }

    #[test]
    fn test_unknown_ticket_is_ignored() {
        let s0 = seeded();
        assert_eq!(s0.set_quantity("vip", 4), s0);
    }

    #[test]
    fn test_direct_replacements() {
        let window = DateRange::parse_dates("2025-10-20", "2025-10-25").unwrap();
        let s = SelectionState::new(PaymentMethod::Card)
            .set_guest_counts(2, 1)
            .set_payment_method(PaymentMethod::Online)
            .set_stay_window(Some(window));

        assert_eq!(s.total_guests(), 3);
        assert_eq!(s.payment_method(), PaymentMethod::Online);
        assert_eq!(s.nights(), 5);
        assert_eq!(s.set_stay_window(None).nights(), 0);
    }

    #[test]
    fn test_headcount_follows_ticket_audience() {
        let s = seeded()
            .set_quantity("adult", 3)
            .set_quantity("senior", 2)
            .set_quantity("child", 1)
            .set_guest_counts(9, 9);
        let tickets = [ticket("adult", 0), ticket("child", 0), ticket("senior", 0)];

        let derived = s.with_headcount_from(&tickets);
        assert_eq!(derived.adults(), 5);
        assert_eq!(derived.children(), 1);
        assert_eq!(derived.ticket_quantities(), s.ticket_quantities());
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let s = seeded()
            .apply(&SelectionAction::SetQuantity {
                ticket_id: "senior".to_string(),
                delta: 2,
            })
            .apply(&SelectionAction::ToggleUnit {
                unit_id: "R1".to_string(),
            });
        assert_eq!(s.quantity("senior"), 2);
        assert!(s.is_unit_selected("R1"));
    }

    #[test]
    fn test_action_wire_format() {
        let action: SelectionAction =
            serde_json::from_str(r#"{"type":"set_quantity","ticket_id":"adult","delta":-1}"#)
                .unwrap();
        assert_eq!(
            action,
            SelectionAction::SetQuantity {
                ticket_id: "adult".to_string(),
                delta: -1
            }
        );
    }

    proptest! {
        #[test]
        fn prop_set_quantity_isolated_and_non_negative(
            start in prop::collection::vec(0u32..20, 3),
            target in 0usize..3,
            delta in -50i64..50,
        ) {
            let ids = ["adult", "child", "senior"];
            let tickets: Vec<TicketType> = ids
                .iter()
                .zip(&start)
                .map(|(id, q)| ticket(id, *q))
                .collect();
            let before = SelectionState::new(PaymentMethod::Cash).with_tickets(&tickets);
            let after = before.set_quantity(ids[target], delta);

            for (i, id) in ids.iter().enumerate() {
                if i == target {
                    let expected = (i64::from(start[i]) + delta).max(0) as u32;
                    prop_assert_eq!(after.quantity(id), expected);
                } else {
                    prop_assert_eq!(after.quantity(id), before.quantity(id));
                }
            }
        }
    }
}
