//! # Money and Quantity
//!
//! Fixed-point value types for every monetary and quantity field in the ledger.
//!
//! ## Why Fixed Point?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A consignment balance is compared against ZERO to decide whether a     │
//! │  debt is closed. Cumulative rounding drift would flip that decision.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Fixed Point                                      │
//! │    Money    → i64 cents        (scale 2)                                │
//! │    Quantity → i64 thousandths  (scale 3, weight-based SKUs)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::money::{Money, Quantity};
//!
//! let unit_price = Money::from_cents(2000);      // $20.00
//! let qty = Quantity::from_millis(3_500);        // 3.5 units
//!
//! let line = unit_price.multiply_quantity(qty);  // $70.00
//! assert_eq!(line.cents(), 7000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Intermediate subtractions may dip below zero before
///   being clamped (`balance = max(0, net - paid - returned)`)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary field in the ledger flows through this type. Floating-point
/// money is forbidden everywhere in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ## Why
    /// The ledger never exposes a negative balance or a negative line total.
    /// An over-discounted line or an over-returned sale clamps at zero instead
    /// of going negative (the open refund question is a product decision, not
    /// an arithmetic one).
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).clamp_zero().cents(), 0);
    /// assert_eq!(Money::from_cents(500).clamp_zero().cents(), 500);
    /// ```
    #[inline]
    pub const fn clamp_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Returns the smaller of two money values.
    #[inline]
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Multiplies a unit price by a fractional quantity, rounding half up.
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow on large amounts:
    /// `(cents * qty_millis + 500) / 1000`
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::{Money, Quantity};
    ///
    /// let unit = Money::from_cents(333);            // $3.33
    /// let qty = Quantity::from_millis(1_500);       // 1.5
    /// assert_eq!(unit.multiply_quantity(qty).cents(), 500); // $5.00 (499.5 rounds up)
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Money {
        let cents = (self.0 as i128 * qty.millis() as i128 + 500) / 1000;
        Money::from_cents(cents as i64)
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The front-end formats currency for display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by whole counts (e.g. installment math).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

/// Summing tender lists and line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A product quantity in thousandths of a unit.
///
/// ## Why Fractional?
/// Weight-based SKUs sell fractional amounts (1.250 kg). Scale 3 matches the
/// smallest step the front-end accepts (0.001).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Quantity(millis)
    }

    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Quantity;
    ///
    /// assert_eq!(Quantity::from_units(3).millis(), 3000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Returns the value in thousandths of a unit.
    #[inline]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the quantity is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Display shows the quantity with three decimal places ("3.500").
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:03}", sign, (self.0 / 1000).abs(), (self.0 % 1000).abs())
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
