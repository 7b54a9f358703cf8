//! Fixed-point money type with 2 decimal places and banker's rounding.
//!
//! Uses `rust_decimal` internally. Every value is rounded half-to-even to
//! 2 fractional digits on construction and after every arithmetic operation,
//! so no `Money` observable outside an operation carries any other scale.
//! Values too large to hold 2 fractional digits are rejected rather than
//! stored at a coarser scale.

use crate::error::{BankError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A decimal amount that always carries exactly 2 decimal places.
///
/// Serializes as a plain string such as `"10.50"`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bank_ledger::Money;
///
/// assert_eq!(Money::from_str("10.125").unwrap().to_string(), "10.12");
/// assert_eq!(Money::from_str("10.135").unwrap().to_string(), "10.14");
/// assert_eq!(Money::from_str("7").unwrap().to_string(), "7.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::from_parts(0, 0, 0, false, 2));

    /// Largest representable value, `792281625142643375935439503.35`.
    pub const MAX: Self = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 2));

    /// Smallest representable value.
    pub const MIN: Self = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, true, 2));

    /// Creates a new `Money`, rounding half-to-even to 2 decimal places.
    ///
    /// Fails with `InvalidAmount` if the value lies outside
    /// [`Money::MIN`]..=[`Money::MAX`].
    pub fn new(value: Decimal) -> Result<Self> {
        Self::normalize(value).ok_or_else(|| {
            BankError::invalid_amount(format!(
                "{} cannot be held with {} decimal places",
                value,
                Self::SCALE
            ))
        })
    }

    fn normalize(value: Decimal) -> Option<Self> {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        // round_dp leaves shorter scales alone; pad them out
        normalized.rescale(Self::SCALE);
        // rescale gives up silently when the mantissa has no room left
        if normalized.scale() != Self::SCALE {
            return None;
        }
        if normalized.is_zero() {
            normalized.set_sign_positive(true);
        }
        Some(Money(normalized))
    }

    /// Validates an amount that may be zero but never negative, such as an
    /// opening balance. The sign is checked before rounding, so `-0.004` is
    /// rejected even though it would round to `0.00`.
    pub fn non_negative(value: Option<Decimal>) -> Result<Self> {
        let value = value.ok_or_else(|| BankError::invalid_amount("amount is required"))?;
        if value < Decimal::ZERO {
            return Err(BankError::invalid_amount(format!(
                "amount must not be negative, got {}",
                value
            )));
        }
        Money::new(value)
    }

    /// Validates an amount that must be strictly positive, such as a deposit,
    /// withdrawal or transfer amount. Values that round to `0.00` are rejected.
    pub fn positive(value: Option<Decimal>) -> Result<Self> {
        let value = value.ok_or_else(|| BankError::invalid_amount("amount is required"))?;
        let money = Money::new(value)?;
        money.ensure_positive()?;
        Ok(money)
    }

    pub(crate) fn ensure_positive(self) -> Result<()> {
        if self.is_positive() {
            Ok(())
        } else {
            Err(BankError::invalid_amount(format!(
                "amount must be greater than 0, got {}",
                self
            )))
        }
    }

    /// Returns the underlying decimal (scale 2).
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Exact addition, `None` if the sum cannot be held at scale 2.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).and_then(Self::normalize)
    }

    /// Exact subtraction, `None` if the difference cannot be held at scale 2.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).and_then(Self::normalize)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl TryFrom<Decimal> for Money {
    type Error = BankError;

    fn try_from(value: Decimal) -> Result<Self> {
        Money::new(value)
    }
}

impl FromStr for Money {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        let decimal = Decimal::from_str(s.trim()).map_err(|e| {
            BankError::invalid_amount(format!("'{}' is not a decimal: {}", s.trim(), e))
        })?;
        Money::new(decimal)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
