//! Type-safe money representation using integer minor units.
//!
//! Prices arrive from the commerce backend and from persisted carts as decimal
//! strings (`"19.99"`). They are parsed once, at the boundary, into [`Money`]
//! so cart arithmetic never touches floating point.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits kept by [`Money`].
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur when parsing a price string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price format: {0:?}")]
    InvalidFormat(String),
    /// The input is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(String),
    /// The input has sub-cent precision.
    #[error("price has more than two decimal places: {0}")]
    TooPrecise(String),
    /// The input does not fit in minor units.
    #[error("price is out of range: {0}")]
    OutOfRange(String),
}

/// An amount of money in minor units (cents).
///
/// Serializes as a two-decimal string, matching the backend's `Decimal`
/// scalar and the legacy stored cart format.
///
/// ```
/// use storecart_core::Money;
///
/// let price = Money::parse("19.99").unwrap();
/// assert_eq!(price.minor_units(), 1999);
/// assert_eq!(price.to_string(), "19.99");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Parse a decimal price string such as `"10"`, `"10.5"` or `"10.50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is not a decimal number
    /// - Is negative
    /// - Has more than two significant fractional digits
    /// - Does not fit in `i64` minor units
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::InvalidFormat(trimmed.to_owned()))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(trimmed.to_owned()));
        }

        if amount.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(PriceError::TooPrecise(trimmed.to_owned()));
        }

        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or_else(|| PriceError::OutOfRange(trimmed.to_owned()))
    }

    /// Convert a decimal amount, rounding half away from zero to whole cents.
    ///
    /// Saturates at the `i64` bounds.
    #[must_use]
    pub fn from_decimal_rounded(amount: Decimal) -> Self {
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero));

        match minor.and_then(|m| m.to_i64()) {
            Some(value) => Self(value),
            None if amount.is_sign_negative() => Self(i64::MIN),
            None => Self(i64::MAX),
        }
    }

    /// Returns the amount as a decimal with two fractional digits.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a line quantity, saturating.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Money {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The input is not three ASCII letters.
    #[error("currency code must be three ASCII letters, got {0:?}")]
    Invalid(String),
}

/// ISO 4217 currency code, stored uppercase.
///
/// The backend reports whatever currency the store sells in, so this is an
/// open set rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Invalid` unless the input is exactly three
    /// ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyError> {
        let trimmed = s.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::Invalid(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the three-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Display symbol for common currencies.
    #[must_use]
    pub fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "USD" | "CAD" | "AUD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            _ => None,
        }
    }

    /// Format an amount for display, e.g. `€19.99` or `CHF 19.99`.
    #[must_use]
    pub fn format(&self, amount: Money) -> String {
        self.symbol().map_or_else(
            || format!("{} {amount}", self.0),
            |symbol| format!("{symbol}{amount}"),
        )
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_owned())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
