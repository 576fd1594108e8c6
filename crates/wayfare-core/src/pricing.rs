//! # Price Aggregator
//!
//! Computes the [`PriceBreakdown`] of a selection. Infallible: the catalog
//! was validated when it was built, so every input here is well-formed.
//!
//! ## Formulas
//! ```text
//! Lodging:   subtotal = Σ nightly_price × nights   (selected units)
//!            tax      = subtotal × tax_rate        (half up)
//!
//! Ticketed:  subtotal = Σ unit_price × quantity    (every ticket type)
//!                     + Σ price                    (selected add-ons)
//!            tax      = 0
//!
//! Both:      discount(rule)  = Percentage → round(subtotal × bps / 10000)
//!                              Fixed      → amount
//!            discount_total  = Σ discount(rule)   (applied rules, stacked)
//!            final_total     = max(0, subtotal + tax − discount_total)
//! ```
//!
//! Discounts always take the pre-tax subtotal as their base.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::InventoryCatalog;
use crate::eligibility::AppliedDiscounts;
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{BookingKind, TaxRate};

// =============================================================================
// Breakdown
// =============================================================================

/// One applied discount and what it took off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountLine {
    pub rule_id: String,
    pub code: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Nights priced (0 for ticketed bookings or without a stay window).
    pub nights: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub discount_total: Money,
    pub discounts: Vec<DiscountLine>,

    /// Never negative.
    pub final_total: Money,
}

impl PriceBreakdown {
    /// Totals the parts, clamping the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    /// use wayfare_core::pricing::{DiscountLine, PriceBreakdown};
    ///
    /// let oversized = DiscountLine {
    ///     rule_id: "BIG".into(),
    ///     code: "BIG".into(),
    ///     amount: Money::from_minor(1_300_000),
    /// };
    /// let price = PriceBreakdown::settle(
    ///     0,
    ///     Money::from_minor(1_000_000),
    ///     Money::from_minor(100_000),
    ///     vec![oversized],
    /// );
    /// assert_eq!(price.final_total, Money::zero());
    /// ```
    pub fn settle(nights: u32, subtotal: Money, tax: Money, discounts: Vec<DiscountLine>) -> Self {
        let discount_total: Money = discounts.iter().map(|line| line.amount).sum();
        let final_total = (subtotal + tax - discount_total).clamp_non_negative();

        PriceBreakdown {
            nights,
            subtotal,
            tax,
            discount_total,
            discounts,
            final_total,
        }
    }

    /// All zero, for a selection with nothing in it.
    pub fn empty() -> Self {
        PriceBreakdown::settle(0, Money::zero(), Money::zero(), Vec::new())
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Everything a quote depends on.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub catalog: &'a InventoryCatalog,
    pub selection: &'a SelectionState,
    /// Add-on ids currently selected (ticketed only).
    pub add_ons: &'a BTreeSet<String>,
    pub applied: &'a AppliedDiscounts,
    pub tax_rate: TaxRate,
}

/// The pre-tax subtotal; also the base every discount is computed on.
pub fn base_price(
    catalog: &InventoryCatalog,
    selection: &SelectionState,
    add_ons: &BTreeSet<String>,
) -> Money {
    match catalog.kind() {
        BookingKind::Lodging => {
            let nights = i64::from(selection.nights());
            selection
                .selected_units()
                .iter()
                .filter_map(|id| catalog.unit(id))
                .map(|unit| unit.nightly_price.multiply_quantity(nights))
                .sum()
        }
        BookingKind::Ticketed => {
            let tickets: Money = catalog
                .tickets()
                .iter()
                .map(|ticket| {
                    ticket
                        .unit_price
                        .multiply_quantity(i64::from(selection.quantity(&ticket.id)))
                })
                .sum();
            let extras: Money = catalog
                .add_ons()
                .iter()
                .filter(|add_on| add_ons.contains(&add_on.id))
                .map(|add_on| add_on.price)
                .sum();
            tickets + extras
        }
    }
}

/// Computes the full breakdown.
///
/// Every applied rule is deducted, in catalog order; stacking is allowed
/// and the clamp in [`PriceBreakdown::settle`] absorbs any excess.
pub fn quote(input: PricingInput<'_>) -> PriceBreakdown {
    let PricingInput {
        catalog,
        selection,
        add_ons,
        applied,
        tax_rate,
    } = input;

    let subtotal = base_price(catalog, selection, add_ons);
    let (nights, tax) = match catalog.kind() {
        BookingKind::Lodging => (selection.nights(), subtotal.calculate_tax(tax_rate)),
        BookingKind::Ticketed => (0, Money::zero()),
    };

    let discounts = applied
        .rules(catalog.discounts())
        .into_iter()
        .map(|rule| DiscountLine {
            rule_id: rule.id.clone(),
            code: rule.code.clone(),
            amount: rule.value.amount_for(subtotal),
        })
        .collect();

    PriceBreakdown::settle(nights, subtotal, tax, discounts)
}

// =============================================================================
// Unit Tests
// =============================================================================
