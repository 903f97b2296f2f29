//! Line quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A line quantity, always at least 1.
///
/// Out-of-range input is clamped instead of rejected: a cart line with
/// quantity 0 never exists, removal is an explicit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Clamp an integer into `[1, u32::MAX]`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        u32::try_from(value.max(1)).map_or(Self(u32::MAX), Self)
    }

    /// Parse untrusted input such as a form field.
    ///
    /// The value is floored and clamped; anything non-numeric becomes 1.
    ///
    /// ```
    /// use storecart_core::Quantity;
    ///
    /// assert_eq!(Quantity::from_input("3").get(), 3);
    /// assert_eq!(Quantity::from_input("2.7").get(), 2);
    /// assert_eq!(Quantity::from_input("0").get(), 1);
    /// assert_eq!(Quantity::from_input("lots").get(), 1);
    /// ```
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        input
            .trim()
            .parse::<f64>()
            .map_or(Self::ONE, Self::from)
    }

    /// Returns the quantity as `u32`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Saturating addition, used when merging lines with the same id.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

// Persisted carts hold plain JSON numbers, which may be fractional or zero.
impl From<f64> for Quantity {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
    fn from(value: f64) -> Self {
        if !value.is_finite() || value < 1.0 {
            return Self::ONE;
        }
        let floored = value.floor().min(f64::from(u32::MAX));
        Self(floored as u32)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
