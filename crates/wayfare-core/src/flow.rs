//! # Booking Flow
//!
//! One booking session: the catalog being browsed, the latest selection
//! snapshot, the applied discounts and the pager.
//!
//! ## Recompute Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply(action, now)                                                     │
//! │     │                                                                   │
//! │     ├── unknown unit / ticket id?  → Err(CoreError), snapshot untouched │
//! │     │                                                                   │
//! │     ├── next = selection.apply(action)                                  │
//! │     │     └── next == selection?   → Ok(false), nothing recomputed      │
//! │     │                                                                   │
//! │     ├── selection = next                                                │
//! │     ├── applied   = auto_apply(eligible set)      (manual toggles lost) │
//! │     └── query changed?             → pager back to page 1               │
//! │                                                                         │
//! │  view(now)  → FlowView { units page, annotated rules, price, add-ons }  │
//! │  confirm(now) → BookingPayload (handed to the submission collaborator)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs synchronously on the caller's thread. A host that
//! receives overlapping events serializes them before they get here.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::availability::{filter_units, AvailabilityQuery, FilteredUnits};
use crate::catalog::InventoryCatalog;
use crate::eligibility::{evaluate, AppliedDiscounts, EligibilityFacts, RuleEvaluation};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pagination::{Paginator, UnitPage};
use crate::pricing::{base_price, quote, PriceBreakdown, PricingInput};
use crate::selection::{SelectionAction, SelectionState};
use crate::types::{BookingKind, DateRange, PaymentMethod, TaxRate, UnitTypeFilter};
use crate::validation::validate_tax_rate_bps;
use crate::{DEFAULT_PAGE_SIZE, LODGING_TAX_RATE};

// =============================================================================
// Settings
// =============================================================================

/// Engine constants a flow runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub page_size: usize,

    /// Applied to lodging subtotals only.
    pub tax_rate: TaxRate,
}

impl Default for FlowSettings {
    fn default() -> Self {
        FlowSettings {
            page_size: DEFAULT_PAGE_SIZE,
            tax_rate: LODGING_TAX_RATE,
        }
    }
}

// =============================================================================
// Exposed Views
// =============================================================================

/// An add-on service and whether it is currently included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOnChoice {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub selected: bool,
}

/// Everything the presentation layer renders after a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FlowView {
    pub kind: BookingKind,
    pub selection: SelectionState,
    pub unit_type: UnitTypeFilter,

    /// Filtered and paginated units (empty page for ticketed flows).
    pub units: UnitPage,

    /// Every rule, eligible first.
    pub discounts: Vec<RuleEvaluation>,

    pub add_ons: Vec<AddOnChoice>,
    pub price: PriceBreakdown,
}

/// A ticket type and how many were booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketLine {
    pub ticket_id: String,
    pub quantity: u32,
}

/// The finalized booking handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    #[ts(as = "String")]
    pub reference: Uuid,
    pub kind: BookingKind,

    /// Selected unit ids (lodging).
    pub unit_ids: Vec<String>,

    /// Non-zero ticket quantities (ticketed).
    pub tickets: Vec<TicketLine>,

    pub adults: u32,
    pub children: u32,
    pub stay_window: Option<DateRange>,

    /// Applied discount codes, catalog order.
    pub discount_codes: Vec<String>,

    pub add_on_ids: Vec<String>,
    pub payment_method: PaymentMethod,
    pub price: PriceBreakdown,
    pub final_total: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Booking Flow
// =============================================================================

#[derive(Debug, Clone)]
pub struct BookingFlow {
    catalog: InventoryCatalog,
    tax_rate: TaxRate,
    selection: SelectionState,
    applied: AppliedDiscounts,
    add_ons: BTreeSet<String>,
    unit_type: UnitTypeFilter,
    query: AvailabilityQuery,
    paginator: Paginator,
}

impl BookingFlow {
    /// Opens a flow on `catalog`.
    ///
    /// The selection starts empty with the kind's default payment method,
    /// ticket quantities seeded from the catalog and every add-on selected.
    pub fn start(
        catalog: InventoryCatalog,
        settings: FlowSettings,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_tax_rate_bps(settings.tax_rate.bps())?;
        let paginator = Paginator::new(settings.page_size)?;

        let selection = derive_headcount(
            &catalog,
            SelectionState::new(catalog.kind().default_payment_method())
                .with_tickets(catalog.tickets()),
        );
        let add_ons = catalog.add_ons().iter().map(|a| a.id.clone()).collect();
        let query = AvailabilityQuery::for_selection(UnitTypeFilter::Any, &selection);
        let applied = AppliedDiscounts::auto_apply(
            catalog.discounts(),
            &EligibilityFacts::from_selection(&selection, now),
        );

        info!(
            kind = ?catalog.kind(),
            units = catalog.units().len(),
            tickets = catalog.tickets().len(),
            "Booking flow started"
        );

        Ok(BookingFlow {
            catalog,
            tax_rate: settings.tax_rate,
            selection,
            applied,
            add_ons,
            unit_type: UnitTypeFilter::Any,
            query,
            paginator,
        })
    }

    // -------------------------------------------------------------------------
    // Selection changes
    // -------------------------------------------------------------------------

    /// Applies one selection action and recomputes.
    ///
    /// Returns `Ok(false)` when the action left the snapshot as it was.
    pub fn apply(&mut self, action: SelectionAction, now: DateTime<Utc>) -> CoreResult<bool> {
        match &action {
            SelectionAction::ToggleUnit { unit_id } if self.catalog.unit(unit_id).is_none() => {
                return Err(CoreError::UnknownUnit(unit_id.clone()));
            }
            SelectionAction::SetQuantity { ticket_id, .. }
                if self.catalog.ticket(ticket_id).is_none() =>
            {
                return Err(CoreError::UnknownTicket(ticket_id.clone()));
            }
            _ => {}
        }

        let next = derive_headcount(&self.catalog, self.selection.apply(&action));
        if next == self.selection {
            debug!(?action, "Selection unchanged");
            return Ok(false);
        }

        self.selection = next;
        self.recompute(now);
        Ok(true)
    }

    pub fn toggle_unit(&mut self, unit_id: &str, now: DateTime<Utc>) -> CoreResult<bool> {
        self.apply(
            SelectionAction::ToggleUnit {
                unit_id: unit_id.to_string(),
            },
            now,
        )
    }

    pub fn set_quantity(
        &mut self,
        ticket_id: &str,
        delta: i64,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        self.apply(
            SelectionAction::SetQuantity {
                ticket_id: ticket_id.to_string(),
                delta,
            },
            now,
        )
    }

    /// Sets the party size. Ticketed flows count guests from their
    /// tickets, so there this leaves the snapshot unchanged.
    pub fn set_guest_counts(
        &mut self,
        adults: u32,
        children: u32,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        self.apply(SelectionAction::SetGuestCounts { adults, children }, now)
    }

    pub fn set_payment_method(
        &mut self,
        method: PaymentMethod,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        self.apply(SelectionAction::SetPaymentMethod { method }, now)
    }

    pub fn set_stay_window(
        &mut self,
        window: Option<DateRange>,
        now: DateTime<Utc>,
    ) -> CoreResult<bool> {
        self.apply(SelectionAction::SetStayWindow { window }, now)
    }

    /// Applied set := eligible set, then re-derive the availability query.
    fn recompute(&mut self, now: DateTime<Utc>) {
        self.applied = AppliedDiscounts::auto_apply(self.catalog.discounts(), &self.facts(now));
        debug!(applied = self.applied.len(), "Discounts re-applied");
        self.refresh_query();
    }

    fn refresh_query(&mut self) {
        let query = AvailabilityQuery::for_selection(self.unit_type.clone(), &self.selection);
        if query != self.query {
            self.query = query;
            self.paginator.reset();
        }
    }

    // -------------------------------------------------------------------------
    // Browsing
    // -------------------------------------------------------------------------

    /// Changes the room type filter; back to page 1 if it differs.
    pub fn set_unit_type(&mut self, unit_type: UnitTypeFilter) {
        self.unit_type = unit_type;
        self.refresh_query();
    }

    /// Moves the pager, clamped to the current results. Returns the page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let count = self.available_units().count();
        self.paginator.go_to(page, count)
    }

    pub fn available_units(&self) -> FilteredUnits<'_> {
        filter_units(self.catalog.units(), &self.query)
    }

    pub fn unit_page(&self) -> UnitPage {
        let filtered = self.available_units();
        self.paginator
            .page_of(filtered.units())
            .map(|unit| unit.clone())
    }

    // -------------------------------------------------------------------------
    // Discounts and extras
    // -------------------------------------------------------------------------

    /// Manual discount toggle. Unknown and ineligible ids are a no-op.
    pub fn toggle_discount(&mut self, rule_id: &str, now: DateTime<Utc>) -> bool {
        let facts = self.facts(now);
        self.applied
            .toggle(rule_id, self.catalog.discounts(), &facts)
    }

    /// Includes or drops an add-on service. Reprices, never re-applies
    /// discounts. Returns whether the add-on is now selected.
    pub fn toggle_add_on(&mut self, add_on_id: &str) -> CoreResult<bool> {
        if self.catalog.add_on(add_on_id).is_none() {
            return Err(CoreError::UnknownAddOn(add_on_id.to_string()));
        }
        let selected = if self.add_ons.remove(add_on_id) {
            false
        } else {
            self.add_ons.insert(add_on_id.to_string());
            true
        };
        debug!(add_on_id = %add_on_id, selected, "Add-on toggled");
        Ok(selected)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[inline]
    pub fn catalog(&self) -> &InventoryCatalog {
        &self.catalog
    }

    #[inline]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[inline]
    pub fn applied(&self) -> &AppliedDiscounts {
        &self.applied
    }

    #[inline]
    pub fn selected_add_ons(&self) -> &BTreeSet<String> {
        &self.add_ons
    }

    #[inline]
    pub fn current_page(&self) -> usize {
        self.paginator.current()
    }

    fn facts(&self, now: DateTime<Utc>) -> EligibilityFacts {
        EligibilityFacts::from_selection(&self.selection, now)
    }

    pub fn evaluations(&self, now: DateTime<Utc>) -> Vec<RuleEvaluation> {
        let base = base_price(&self.catalog, &self.selection, &self.add_ons);
        evaluate(self.catalog.discounts(), &self.facts(now), &self.applied, base)
    }

    pub fn price(&self) -> PriceBreakdown {
        quote(PricingInput {
            catalog: &self.catalog,
            selection: &self.selection,
            add_ons: &self.add_ons,
            applied: &self.applied,
            tax_rate: self.tax_rate,
        })
    }

    pub fn add_on_choices(&self) -> Vec<AddOnChoice> {
        self.catalog
            .add_ons()
            .iter()
            .map(|a| AddOnChoice {
                id: a.id.clone(),
                name: a.name.clone(),
                price: a.price,
                selected: self.add_ons.contains(&a.id),
            })
            .collect()
    }

    pub fn view(&self, now: DateTime<Utc>) -> FlowView {
        FlowView {
            kind: self.catalog.kind(),
            selection: self.selection.clone(),
            unit_type: self.unit_type.clone(),
            units: self.unit_page(),
            discounts: self.evaluations(now),
            add_ons: self.add_on_choices(),
            price: self.price(),
        }
    }

    // -------------------------------------------------------------------------
    // Confirmation
    // -------------------------------------------------------------------------

    /// Selected units the availability filter refuses for the current
    /// guests and stay window. The browsing type filter does not apply.
    pub fn unbookable_units(&self) -> Vec<String> {
        let query = AvailabilityQuery::for_selection(UnitTypeFilter::Any, &self.selection);
        self.selection
            .selected_units()
            .iter()
            .filter(|id| self.catalog.unit(id).map_or(true, |unit| !query.admits(unit)))
            .cloned()
            .collect()
    }

    /// Finalizes the selection into a [`BookingPayload`].
    ///
    /// ## Errors
    /// - Lodging without a stay window or without a unit
    /// - Lodging with a selected unit that is no longer bookable
    /// - Ticketed without tickets
    pub fn confirm(&self, now: DateTime<Utc>) -> CoreResult<BookingPayload> {
        self.check_complete()?;

        let price = self.price();
        let tickets = self
            .selection
            .ticket_quantities()
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(ticket_id, quantity)| TicketLine {
                ticket_id: ticket_id.clone(),
                quantity: *quantity,
            })
            .collect();

        let payload = BookingPayload {
            reference: Uuid::new_v4(),
            kind: self.catalog.kind(),
            unit_ids: self.selection.selected_units().iter().cloned().collect(),
            tickets,
            adults: self.selection.adults(),
            children: self.selection.children(),
            stay_window: self.selection.stay_window(),
            discount_codes: self.applied.codes(self.catalog.discounts()),
            add_on_ids: self.add_ons.iter().cloned().collect(),
            payment_method: self.selection.payment_method(),
            final_total: price.final_total,
            price,
            created_at: now,
        };

        info!(
            reference = %payload.reference,
            final_total = %payload.final_total,
            discounts = payload.discount_codes.len(),
            "Booking confirmed"
        );
        Ok(payload)
    }

    fn check_complete(&self) -> CoreResult<()> {
        let incomplete = |reason: &str| CoreError::IncompleteSelection {
            reason: reason.to_string(),
        };
        match self.catalog.kind() {
            BookingKind::Lodging => {
                if self.selection.stay_window().is_none() {
                    return Err(incomplete("stay window is required"));
                }
                if self.selection.unit_count() == 0 {
                    return Err(incomplete("select at least one room"));
                }
                let unbookable = self.unbookable_units();
                if !unbookable.is_empty() {
                    return Err(CoreError::UnitUnavailable(unbookable));
                }
            }
            BookingKind::Ticketed => {
                if self.selection.total_tickets() == 0 {
                    return Err(incomplete("select at least one ticket"));
                }
            }
        }
        Ok(())
    }
}

/// Ticketed selections take their headcount from the ticket quantities.
fn derive_headcount(catalog: &InventoryCatalog, selection: SelectionState) -> SelectionState {
    match catalog.kind() {
        BookingKind::Ticketed => selection.with_headcount_from(catalog.tickets()),
        BookingKind::Lodging => selection,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
