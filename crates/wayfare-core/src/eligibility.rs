//! # Eligibility Evaluator
//!
//! Annotates every rule of a [`DiscountCatalog`] with whether the current
//! selection qualifies, whether it is applied, and what is still missing.
//!
//! ## Evaluation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SelectionState + now                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EligibilityFacts { rooms, nights, adults, children, payment, window }  │
//! │       │                                                                 │
//! │       ├── check_rule(rule) → [] (eligible) or [Shortfall, ...]          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppliedDiscounts                                                       │
//! │       ├── auto_apply: applied := eligible  (on every snapshot change)   │
//! │       └── toggle:     eligible ids only, anything else is a no-op       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<RuleEvaluation>   eligible first, then ineligible,                 │
//! │                        catalog order inside each group                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs. Evaluating twice with
//! the same facts gives the same annotations.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::discount::{DiscountCatalog, DiscountRule, DiscountValue};
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{DateRange, PaymentMethod};

// =============================================================================
// Facts
// =============================================================================

/// The selection reduced to what rule conditions look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityFacts {
    pub rooms: u32,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub payment_method: PaymentMethod,
    pub stay_window: Option<DateRange>,
    pub now: DateTime<Utc>,
}

impl EligibilityFacts {
    pub fn from_selection(selection: &SelectionState, now: DateTime<Utc>) -> Self {
        EligibilityFacts {
            rooms: selection.unit_count(),
            nights: selection.nights(),
            adults: selection.adults(),
            children: selection.children(),
            payment_method: selection.payment_method(),
            stay_window: selection.stay_window(),
            now,
        }
    }

    #[inline]
    pub fn total_guests(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    /// Whole days until the stay starts (floored), if there is a stay.
    pub fn lead_days(&self) -> Option<i64> {
        self.stay_window.map(|w| w.days_until_start(self.now))
    }
}

// =============================================================================
// Shortfall
// =============================================================================

/// One unmet condition, with how far off the selection is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shortfall {
    Rooms { missing: u32 },
    Nights { missing: u32 },
    Guests { missing: u32 },
    Adults { missing: u32 },
    Children { missing: u32 },
    PaymentMethod { required: PaymentMethod },
    LeadDays { missing: u32 },
    /// Lead-time rule without a stay window to measure from.
    MissingStayStart,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: &u32| if *n == 1 { "" } else { "s" };
        match self {
            Shortfall::Rooms { missing } => {
                write!(f, "add {} more room{}", missing, plural(missing))
            }
            Shortfall::Nights { missing } => {
                write!(f, "stay {} more night{}", missing, plural(missing))
            }
            Shortfall::Guests { missing } => {
                write!(f, "add {} more guest{}", missing, plural(missing))
            }
            Shortfall::Adults { missing } => {
                write!(f, "add {} more adult{}", missing, plural(missing))
            }
            Shortfall::Children { missing } => {
                let noun = if *missing == 1 { "child" } else { "children" };
                write!(f, "add {} more {}", missing, noun)
            }
            Shortfall::PaymentMethod { required } => write!(f, "pay by {}", required),
            Shortfall::LeadDays { missing } => {
                write!(f, "book {} day{} earlier", missing, plural(missing))
            }
            Shortfall::MissingStayStart => write!(f, "choose your dates"),
        }
    }
}

fn threshold(actual: u32, min: Option<u32>) -> Option<u32> {
    min.filter(|min| actual < *min).map(|min| min - actual)
}

/// Checks one rule; an empty result means eligible.
///
/// Shortfalls come out in condition field order, one per unmet threshold.
pub fn check_rule(rule: &DiscountRule, facts: &EligibilityFacts) -> Vec<Shortfall> {
    let cond = &rule.condition;
    let mut shortfalls = Vec::new();

    if let Some(missing) = threshold(facts.rooms, cond.min_rooms) {
        shortfalls.push(Shortfall::Rooms { missing });
    }
    if let Some(missing) = threshold(facts.nights, cond.min_nights) {
        shortfalls.push(Shortfall::Nights { missing });
    }
    if let Some(missing) = threshold(facts.total_guests(), cond.min_total_guests) {
        shortfalls.push(Shortfall::Guests { missing });
    }
    if let Some(missing) = threshold(facts.adults, cond.min_adults) {
        shortfalls.push(Shortfall::Adults { missing });
    }
    if let Some(missing) = threshold(facts.children, cond.min_children) {
        shortfalls.push(Shortfall::Children { missing });
    }
    if let Some(required) = cond.payment_method {
        if facts.payment_method != required {
            shortfalls.push(Shortfall::PaymentMethod { required });
        }
    }
    if let Some(min_days) = cond.min_lead_days {
        match facts.lead_days() {
            None => shortfalls.push(Shortfall::MissingStayStart),
            Some(days) if days < i64::from(min_days) => {
                let missing = u32::try_from(i64::from(min_days) - days).unwrap_or(u32::MAX);
                shortfalls.push(Shortfall::LeadDays { missing });
            }
            Some(_) => {}
        }
    }

    shortfalls
}

#[inline]
pub fn is_eligible(rule: &DiscountRule, facts: &EligibilityFacts) -> bool {
    check_rule(rule, facts).is_empty()
}

/// Ids of every eligible rule, in catalog order.
pub fn eligible_ids(catalog: &DiscountCatalog, facts: &EligibilityFacts) -> Vec<String> {
    catalog
        .rules()
        .iter()
        .filter(|rule| is_eligible(rule, facts))
        .map(|rule| rule.id.clone())
        .collect()
}

// =============================================================================
// Applied Set
// =============================================================================

/// Ids of the rules currently counted in the discount total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedDiscounts(BTreeSet<String>);

impl AppliedDiscounts {
    pub fn new() -> Self {
        AppliedDiscounts::default()
    }

    /// Replaces the set with exactly the eligible rules.
    ///
    /// Runs after every selection change and overwrites manual toggles.
    pub fn auto_apply(catalog: &DiscountCatalog, facts: &EligibilityFacts) -> Self {
        AppliedDiscounts(eligible_ids(catalog, facts).into_iter().collect())
    }

    /// Manually flips one rule. Returns whether anything changed.
    ///
    /// Unknown and ineligible rules are left alone.
    pub fn toggle(
        &mut self,
        rule_id: &str,
        catalog: &DiscountCatalog,
        facts: &EligibilityFacts,
    ) -> bool {
        let Some(rule) = catalog.get(rule_id) else {
            debug!(rule_id = %rule_id, "toggle of unknown discount ignored");
            return false;
        };
        if !is_eligible(rule, facts) {
            debug!(rule_id = %rule_id, "toggle of ineligible discount ignored");
            return false;
        }

        if !self.0.remove(rule_id) {
            self.0.insert(rule_id.to_string());
        }
        debug!(rule_id = %rule_id, applied = self.0.contains(rule_id), "discount toggled");
        true
    }

    #[inline]
    pub fn contains(&self, rule_id: &str) -> bool {
        self.0.contains(rule_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applied rules in catalog order.
    pub fn rules<'a>(&self, catalog: &'a DiscountCatalog) -> Vec<&'a DiscountRule> {
        catalog
            .rules()
            .iter()
            .filter(|rule| self.contains(&rule.id))
            .collect()
    }

    /// Applied rule codes in catalog order.
    pub fn codes(&self, catalog: &DiscountCatalog) -> Vec<String> {
        self.rules(catalog)
            .into_iter()
            .map(|rule| rule.code.clone())
            .collect()
    }
}

impl FromIterator<String> for AppliedDiscounts {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        AppliedDiscounts(iter.into_iter().collect())
    }
}

// =============================================================================
// Annotated Rule
// =============================================================================

/// One rule as the presentation layer shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub id: String,
    pub code: String,
    pub description: String,
    pub value: DiscountValue,
    pub eligible: bool,
    pub applied: bool,
    pub shortfalls: Vec<Shortfall>,

    /// Human-readable shortfalls, `None` when eligible.
    pub shortfall_message: Option<String>,

    /// What this rule takes off the current base price.
    pub amount: Money,
}

/// Annotates every rule, eligible ones first.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use wayfare_core::discount::DiscountCatalog;
/// use wayfare_core::eligibility::{evaluate, AppliedDiscounts, EligibilityFacts};
/// use wayfare_core::money::Money;
/// use wayfare_core::selection::SelectionState;
/// use wayfare_core::types::PaymentMethod;
///
/// let catalog = DiscountCatalog::ticketed();
/// let selection = SelectionState::new(PaymentMethod::Cash).set_guest_counts(5, 0);
/// let facts = EligibilityFacts::from_selection(&selection, Utc::now());
/// let applied = AppliedDiscounts::auto_apply(&catalog, &facts);
///
/// let rules = evaluate(&catalog, &facts, &applied, Money::from_minor(1_000));
/// assert_eq!(rules[0].code, "GROUP5");
/// assert!(rules[0].applied);
/// assert_eq!(rules[1].code, "CASH");
/// ```
pub fn evaluate(
    catalog: &DiscountCatalog,
    facts: &EligibilityFacts,
    applied: &AppliedDiscounts,
    base_price: Money,
) -> Vec<RuleEvaluation> {
    let (eligible, ineligible): (Vec<_>, Vec<_>) = catalog
        .rules()
        .iter()
        .map(|rule| annotate(rule, facts, applied, base_price))
        .partition(|evaluation| evaluation.eligible);

    eligible.into_iter().chain(ineligible).collect()
}

fn annotate(
    rule: &DiscountRule,
    facts: &EligibilityFacts,
    applied: &AppliedDiscounts,
    base_price: Money,
) -> RuleEvaluation {
    let shortfalls = check_rule(rule, facts);
    let eligible = shortfalls.is_empty();
    let shortfall_message = (!eligible).then(|| {
        shortfalls
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    });

    RuleEvaluation {
        id: rule.id.clone(),
        code: rule.code.clone(),
        description: rule.description.clone(),
        value: rule.value,
        eligible,
        applied: applied.contains(&rule.id),
        shortfalls,
        shortfall_message,
        amount: rule.value.amount_for(base_price),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
