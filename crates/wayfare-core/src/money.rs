//! # Money Module
//!
//! Provides the `Money` type for every price, tax and discount in the engine.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Stacked discounts make it worse: 10% + 15% of a float subtotal        │
//! │  rounds differently depending on evaluation order.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                     │
//! │    Every amount is an i64 count of the smallest currency unit.         │
//! │    Percentages are basis points and round half up exactly once.        │
//! │    Arithmetic saturates at the i64 bounds instead of wrapping.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::money::Money;
//!
//! let nightly = Money::from_minor(120);
//! let stay = nightly.multiply_quantity(5);      // 600
//! let discount = stay.percentage(1500);         // 15% → 90
//! assert_eq!((stay - discount).minor(), 510);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  InventoryUnit.nightly_price ──► × nights ──► subtotal                  │
/// │  TicketType.unit_price ────────► × quantity ─┘    │                     │
/// │  AddOnService.price ─────────────────────────┘    │                     │
/// │                                                   ▼                     │
/// │                         tax ◄── calculate_tax(10%)                      │
/// │                         discounts ◄── percentage(bps) / fixed           │
/// │                                                   │                     │
/// │                         final_total = max(0, subtotal + tax − disc)     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// let price = Money::from_minor(50_000);
    /// assert_eq!(price.minor(), 50_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps a negative amount to zero.
    ///
    /// Used for the final total: stacked discounts may exceed the gross
    /// amount, but a booking never costs less than nothing.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(-200_000).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_minor(7).clamp_non_negative().minor(), 7);
    /// ```
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Calculates tax, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// i128 intermediate so large stays cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    /// use wayfare_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(1_000_000);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1000)); // 10%
    /// assert_eq!(tax.minor(), 100_000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.percentage(rate.bps())
    }

    /// Returns `bps / 10000` of this amount, rounded half up.
    ///
    /// This is the discount amount of a percentage rule:
    /// `round(base × value / 100)` with `value` expressed in basis points.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// let base = Money::from_minor(1_234);
    /// assert_eq!(base.percentage(1000).minor(), 123); // 123.4 → 123
    /// assert_eq!(Money::from_minor(1_235).percentage(1000).minor(), 124); // 123.5 → 124
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let scaled = self.0 as i128 * bps as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        let saturated = if rounded < 0 { i64::MIN } else { i64::MAX };
        Money::from_minor(i64::try_from(rounded).unwrap_or(saturated))
    }

    /// Multiplies money by a quantity (nights, tickets), saturating.
    ///
    /// ## Example
    /// ```rust
    /// use wayfare_core::money::Money;
    ///
    /// let nightly = Money::from_minor(120);
    /// assert_eq!(nightly.multiply_quantity(2).minor(), 240);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows grouped minor units (e.g. `1,300,000`).
///
/// ## Note
/// Currency symbols and locale formatting belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1_300_000).to_string(), "1,300,000");
        assert_eq!(Money::from_minor(50_000).to_string(), "50,000");
        assert_eq!(Money::from_minor(999).to_string(), "999");
        assert_eq!(Money::from_minor(-1_500).to_string(), "-1,500");
        assert_eq!(Money::zero().to_string(), "0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.minor(), 2000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_minor(600);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.minor(), 60);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 15% of 999 = 149.85 → 150
        assert_eq!(Money::from_minor(999).percentage(1500).minor(), 150);
        // 10% of 1005 = 100.5 → 101
        assert_eq!(Money::from_minor(1005).percentage(1000).minor(), 101);
        // 5% of 1009 = 50.45 → 50
        assert_eq!(Money::from_minor(1009).percentage(500).minor(), 50);
    }

    #[test]
    fn test_percentage_of_large_amount_does_not_overflow() {
        let huge = Money::from_minor(i64::MAX / 2);
        let half = huge.percentage(5000);
        assert!(half.minor() > 0);
    }

    #[test]
    fn test_clamp_non_negative() {
        let gross = Money::from_minor(1_000_000) + Money::from_minor(100_000);
        let net = gross - Money::from_minor(1_300_000);
        assert!(net.is_negative());
        assert!(net.clamp_non_negative().is_zero());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_minor(5_000_000_000_000_000_000);
        assert_eq!(huge + huge, Money::from_minor(i64::MAX));
        assert_eq!(huge.multiply_quantity(3), Money::from_minor(i64::MAX));
        assert_eq!(huge * -3, Money::from_minor(i64::MIN));
        assert_eq!(Money::from_minor(i64::MIN) - huge, Money::from_minor(i64::MIN));

        let total: Money = [huge, huge, huge].iter().sum();
        assert_eq!(total, Money::from_minor(i64::MAX));
    }
}
