//! # Discount Rules
//!
//! One rule type for every booking context. Lodging and ticketed bookings
//! differ only in which [`DiscountCatalog`] they load, chosen by
//! [`BookingKind`].
//!
//! ## Rule Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DiscountRule "LONG_STAY"                                               │
//! │  ├── value:     Percentage { bps: 1500 }   (15% of the base price)      │
//! │  └── condition: RuleCondition                                           │
//! │                 ├── min_nights: Some(5)    ← checked with ≥             │
//! │                 └── everything else: None  ← absent = always true       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Eligibility is never stored on the rule; see [`crate::eligibility`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BookingKind, PaymentMethod};
use crate::validation::{validate_discount_rule, validate_unique_ids};

// =============================================================================
// Discount Value
// =============================================================================

/// How much a rule takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Share of the base price in basis points (1000 = 10%).
    Percentage { bps: u32 },
    /// Flat amount, independent of the base price.
    Fixed { amount: Money },
}

impl DiscountValue {
    /// Percentage value from whole percent.
    pub const fn percent(pct: u32) -> Self {
        DiscountValue::Percentage { bps: pct * 100 }
    }

    /// Fixed value from minor units.
    pub const fn fixed(minor: i64) -> Self {
        DiscountValue::Fixed {
            amount: Money::from_minor(minor),
        }
    }

    /// Amount deducted against `base`.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::discount::DiscountValue;
    /// use wayfare_core::money::Money;
    ///
    /// let base = Money::from_minor(600);
    /// assert_eq!(DiscountValue::percent(15).amount_for(base).minor(), 90);
    /// assert_eq!(DiscountValue::fixed(50_000).amount_for(base).minor(), 50_000);
    /// ```
    pub fn amount_for(&self, base: Money) -> Money {
        match self {
            DiscountValue::Percentage { bps } => base.percentage(*bps),
            DiscountValue::Fixed { amount } => *amount,
        }
    }
}

// =============================================================================
// Rule Condition
// =============================================================================

/// Predicate over a selection. Every field is optional; absent fields hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleCondition {
    pub min_rooms: Option<u32>,
    pub min_nights: Option<u32>,
    pub min_total_guests: Option<u32>,
    pub min_adults: Option<u32>,
    pub min_children: Option<u32>,
    pub payment_method: Option<PaymentMethod>,
    pub min_lead_days: Option<u32>,
}

impl RuleCondition {
    /// The empty condition: always eligible.
    pub fn always() -> Self {
        RuleCondition::default()
    }

    pub fn min_rooms(mut self, rooms: u32) -> Self {
        self.min_rooms = Some(rooms);
        self
    }

    pub fn min_nights(mut self, nights: u32) -> Self {
        self.min_nights = Some(nights);
        self
    }

    pub fn min_total_guests(mut self, guests: u32) -> Self {
        self.min_total_guests = Some(guests);
        self
    }

    pub fn min_adults(mut self, adults: u32) -> Self {
        self.min_adults = Some(adults);
        self
    }

    pub fn min_children(mut self, children: u32) -> Self {
        self.min_children = Some(children);
        self
    }

    pub fn paid_with(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn min_lead_days(mut self, days: u32) -> Self {
        self.min_lead_days = Some(days);
        self
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRule {
    pub id: String,

    /// Code shown to the guest and sent with the booking.
    pub code: String,

    pub description: String,
    pub value: DiscountValue,

    #[serde(default)]
    pub condition: RuleCondition,
}

impl DiscountRule {
    pub fn new(
        code: &str,
        description: &str,
        value: DiscountValue,
        condition: RuleCondition,
    ) -> Self {
        DiscountRule {
            id: code.to_string(),
            code: code.to_string(),
            description: description.to_string(),
            value,
            condition,
        }
    }
}

// =============================================================================
// Discount Catalog
// =============================================================================

/// The static rule table of one booking context, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", try_from = "RawDiscountCatalog")]
pub struct DiscountCatalog {
    kind: BookingKind,
    rules: Vec<DiscountRule>,
}

/// Unchecked wire shape of a [`DiscountCatalog`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiscountCatalog {
    kind: BookingKind,
    rules: Vec<DiscountRule>,
}

impl TryFrom<RawDiscountCatalog> for DiscountCatalog {
    type Error = ValidationError;

    fn try_from(raw: RawDiscountCatalog) -> Result<Self, Self::Error> {
        DiscountCatalog::new(raw.kind, raw.rules)
    }
}

impl DiscountCatalog {
    /// Builds a catalog, validating every rule and rejecting duplicate ids.
    pub fn new(kind: BookingKind, rules: Vec<DiscountRule>) -> Result<Self, ValidationError> {
        for rule in &rules {
            validate_discount_rule(rule)?;
        }
        validate_unique_ids("discount id", rules.iter().map(|r| r.id.as_str()))?;
        Ok(DiscountCatalog { kind, rules })
    }

    /// Built-in rules for a booking kind.
    pub fn for_kind(kind: BookingKind) -> Self {
        match kind {
            BookingKind::Lodging => DiscountCatalog::lodging(),
            BookingKind::Ticketed => DiscountCatalog::ticketed(),
        }
    }

    /// Room booking promotions.
    ///
    /// | Code         | Value   | Condition          |
    /// |--------------|---------|--------------------|
    /// | `MULTI_ROOM` | 10%     | ≥ 2 rooms          |
    /// | `LONG_STAY`  | 15%     | ≥ 5 nights         |
    /// | `WEEK_STAY`  | 20%     | ≥ 7 nights         |
    /// | `EARLY_BIRD` | 50,000  | ≥ 30 days ahead    |
    /// | `WALLET_PAY` | 10%     | paid by card       |
    /// | `CASH_PAY`   | 5%      | paid online        |
    pub fn lodging() -> Self {
        DiscountCatalog {
            kind: BookingKind::Lodging,
            rules: vec![
                DiscountRule::new(
                    "MULTI_ROOM",
                    "Book 2 or more rooms",
                    DiscountValue::percent(10),
                    RuleCondition::always().min_rooms(2),
                ),
                DiscountRule::new(
                    "LONG_STAY",
                    "Stay 5 nights or more",
                    DiscountValue::percent(15),
                    RuleCondition::always().min_nights(5),
                ),
                DiscountRule::new(
                    "WEEK_STAY",
                    "Stay 7 nights or more",
                    DiscountValue::percent(20),
                    RuleCondition::always().min_nights(7),
                ),
                DiscountRule::new(
                    "EARLY_BIRD",
                    "Book 30 days in advance",
                    DiscountValue::fixed(50_000),
                    RuleCondition::always().min_lead_days(30),
                ),
                DiscountRule::new(
                    "WALLET_PAY",
                    "Pay with an e-wallet linked card",
                    DiscountValue::percent(10),
                    RuleCondition::always().paid_with(PaymentMethod::Card),
                ),
                DiscountRule::new(
                    "CASH_PAY",
                    "Pay online in advance",
                    DiscountValue::percent(5),
                    RuleCondition::always().paid_with(PaymentMethod::Online),
                ),
            ],
        }
    }

    /// Ticketed service promotions.
    ///
    /// | Code     | Value  | Condition                  |
    /// |----------|--------|----------------------------|
    /// | `GROUP5` | 15%    | ≥ 5 adults                 |
    /// | `GROUP8` | 20%    | ≥ 8 guests                 |
    /// | `FAMILY` | 50,000 | ≥ 2 adults and ≥ 2 children|
    /// | `WALLET` | 10%    | paid by e-wallet           |
    /// | `CASH`   | 5%     | paid in cash               |
    pub fn ticketed() -> Self {
        DiscountCatalog {
            kind: BookingKind::Ticketed,
            rules: vec![
                DiscountRule::new(
                    "GROUP5",
                    "Group of 5 adults or more",
                    DiscountValue::percent(15),
                    RuleCondition::always().min_adults(5),
                ),
                DiscountRule::new(
                    "GROUP8",
                    "Group of 8 guests or more",
                    DiscountValue::percent(20),
                    RuleCondition::always().min_total_guests(8),
                ),
                DiscountRule::new(
                    "FAMILY",
                    "Family (2 adults + 2 children)",
                    DiscountValue::fixed(50_000),
                    RuleCondition::always().min_adults(2).min_children(2),
                ),
                DiscountRule::new(
                    "WALLET",
                    "Pay with an e-wallet",
                    DiscountValue::percent(10),
                    RuleCondition::always().paid_with(PaymentMethod::Wallet),
                ),
                DiscountRule::new(
                    "CASH",
                    "Pay in cash",
                    DiscountValue::percent(5),
                    RuleCondition::always().paid_with(PaymentMethod::Cash),
                ),
            ],
        }
    }

    #[inline]
    pub fn kind(&self) -> BookingKind {
        self.kind
    }

    /// Rules in catalog order.
    #[inline]
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    pub fn get(&self, rule_id: &str) -> Option<&DiscountRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
