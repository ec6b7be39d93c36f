//! # Money Module
//!
//! Provides the `Money` type used for cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalogue serves decimal prices:                                   │
//! │    139.9 * 3 = 419.70000000000005  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    13990 * 3 = 41970 centavos (R$ 419,70)                               │
//! │                                                                         │
//! │  Prices are converted ONCE, at the catalogue boundary                   │
//! │  (`Money::from_price`), and every sum after that is integer math.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overflow
//! Amounts are bounded only by stock, so a line total can exceed `i64`.
//! Arithmetic saturates at `i64::MIN`/`i64::MAX` instead of panicking.
//!
//! ## Usage
//! ```rust
//! use rocketshoes_core::money::Money;
//!
//! let price = Money::from_price(139.9);
//! assert_eq!(price.cents(), 13990);
//!
//! let line_total = price * 3;
//! assert_eq!(line_total.format_brl(), "R$ 419,70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the real).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// let price = Money::from_cents(17990);
    /// assert_eq!(price.cents(), 17990);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a catalogue decimal price to Money, rounding to the nearest
    /// centavo.
    ///
    /// This is the only place a float enters the money path.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// assert_eq!(Money::from_price(179.9).cents(), 17990);
    /// assert_eq!(Money::from_price(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_price(price: f64) -> Self {
        Money((price * 100.0).round() as i64)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Multiplies money by a quantity, saturating on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(13990);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 27980);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the value as Brazilian currency, the way the storefront shows
    /// prices: `R$ 1.234,50`.
    ///
    /// ## Example
    /// ```rust
    /// use rocketshoes_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123450).format_brl(), "R$ 1.234,50");
    /// assert_eq!(Money::from_cents(-990).format_brl(), "-R$ 9,90");
    /// ```
    pub fn format_brl(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.reais().abs().to_string();

        // Thousands separator is '.', inserted every three digits from the right
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the storefront currency format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_brl())
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
        *self = *self + other;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
