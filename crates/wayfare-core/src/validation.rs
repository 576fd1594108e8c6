//! # Validation Module
//!
//! Boundary checks for data entering the engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (date pickers, selects)                         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine boundary (THIS MODULE)                                │
//! │  ├── DateRange::new        start < end                                 │
//! │  ├── InventoryCatalog::new capacity, prices, unique ids                │
//! │  └── DiscountCatalog::new  codes, percentages                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine internals                                             │
//! │  └── Filter / Evaluator / Aggregator assume valid data and never fail  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::money::Money;
//! use wayfare_core::validation::{validate_page_size, validate_price};
//!
//! assert!(validate_price("nightly price", Money::from_minor(120)).is_ok());
//! assert!(validate_price("nightly price", Money::from_minor(-1)).is_err());
//! assert!(validate_page_size(0).is_err());
//! ```

use std::collections::HashSet;

use crate::discount::{DiscountRule, DiscountValue};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AddOnService, InventoryUnit, TicketType};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest page size the pagination controller accepts.
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates that a catalog price is non-negative. Zero (free) is allowed.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a non-empty, trimmed identifier or code.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a page size.
///
/// ## Rules
/// - Must be positive (a zero page size has no page-count math)
/// - Must not exceed [`MAX_PAGE_SIZE`]
pub fn validate_page_size(page_size: usize) -> ValidationResult<()> {
    if page_size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page size".to_string(),
        });
    }
    if page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE as i64,
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Entry Validators
// =============================================================================

/// Validates an inventory unit.
///
/// ## Rules
/// - `id` and `unit_type` are required
/// - `capacity` ≥ 1
/// - `nightly_price` ≥ 0
///
/// Reservation ranges are already valid by construction of `DateRange`.
pub fn validate_inventory_unit(unit: &InventoryUnit) -> ValidationResult<()> {
    validate_required("unit id", &unit.id)?;
    validate_required("unit type", &unit.unit_type)?;

    if unit.capacity == 0 {
        return Err(ValidationError::MustBePositive {
            field: format!("capacity of unit {}", unit.id),
        });
    }

    validate_price(&format!("nightly price of unit {}", unit.id), unit.nightly_price)
}

/// Validates a ticket type: id required, price ≥ 0.
pub fn validate_ticket_type(ticket: &TicketType) -> ValidationResult<()> {
    validate_required("ticket id", &ticket.id)?;
    validate_price(&format!("price of ticket {}", ticket.id), ticket.unit_price)
}

/// Validates an add-on service: id required, price ≥ 0.
pub fn validate_add_on(add_on: &AddOnService) -> ValidationResult<()> {
    validate_required("add-on id", &add_on.id)?;
    validate_price(&format!("price of add-on {}", add_on.id), add_on.price)
}

/// Validates a discount rule.
///
/// ## Rules
/// - `id` and `code` are required
/// - percentage values at most 10000 bps (100%)
/// - fixed values non-negative
pub fn validate_discount_rule(rule: &DiscountRule) -> ValidationResult<()> {
    validate_required("discount id", &rule.id)?;
    validate_required("discount code", &rule.code)?;

    match rule.value {
        DiscountValue::Percentage { bps } if bps > 10_000 => Err(ValidationError::OutOfRange {
            field: format!("percentage of discount {}", rule.code),
            min: 0,
            max: 10_000,
        }),
        DiscountValue::Percentage { .. } => Ok(()),
        DiscountValue::Fixed { amount } => {
            validate_price(&format!("amount of discount {}", rule.code), amount)
        }
    }
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Rejects the first id that appears twice.
pub fn validate_unique_ids<'a>(
    field: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: id.to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::RuleCondition;
    use crate::types::TicketAudience;

    fn unit(id: &str, capacity: u32, price: i64) -> InventoryUnit {
        InventoryUnit {
            id: id.to_string(),
            name: format!("Room {}", id),
            unit_type: "Standard".to_string(),
            capacity,
            nightly_price: Money::from_minor(price),
            available: true,
            reservations: Vec::new(),
        }
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_minor(120)).is_ok());
        assert!(validate_price("price", Money::from_minor(-100)).is_err());
    }

    #[test]
    fn test_validate_inventory_unit() {
        assert!(validate_inventory_unit(&unit("R1", 2, 120)).is_ok());
        assert!(validate_inventory_unit(&unit("", 2, 120)).is_err());
        assert!(matches!(
            validate_inventory_unit(&unit("R1", 0, 120)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_inventory_unit(&unit("R1", 2, -5)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_ticket_and_add_on() {
        let ticket = TicketType {
            id: "adult".to_string(),
            name: "Adult".to_string(),
            unit_price: Money::from_minor(-1),
            quantity: 0,
            audience: TicketAudience::Adult,
        };
        assert!(validate_ticket_type(&ticket).is_err());

        let add_on = AddOnService {
            id: "guide".to_string(),
            name: "Tour guide".to_string(),
            price: Money::from_minor(200_000),
        };
        assert!(validate_add_on(&add_on).is_ok());
    }

    #[test]
    fn test_validate_discount_rule() {
        let ok = DiscountRule::new("OK", "", DiscountValue::percent(100), RuleCondition::always());
        assert!(validate_discount_rule(&ok).is_ok());

        let blank = DiscountRule::new(" ", "", DiscountValue::percent(5), RuleCondition::always());
        assert!(validate_discount_rule(&blank).is_err());

        let negative = DiscountRule::new("NEG", "", DiscountValue::fixed(-1), RuleCondition::always());
        assert!(validate_discount_rule(&negative).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(3).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids("unit id", ["R1", "R2", "R3"]).is_ok());
        assert_eq!(
            validate_unique_ids("unit id", ["R1", "R2", "R1"]),
            Err(ValidationError::Duplicate {
                field: "unit id".to_string(),
                value: "R1".to_string(),
            })
        );
    }
}
