//! Monetary amounts.
//!
//! Amounts are held as integer minor units (hundredths) so that totals are
//! exact. Over JSON they travel as decimal major units.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount in minor units.
///
/// # Examples
///
/// ```
/// use innkeep::Money;
///
/// let price = Money::from_major(1000);
/// assert_eq!(price.checked_mul(3), Some(Money::from_major(3000)));
/// assert_eq!(price.to_string(), "1000.00");
/// assert!(Money::from_minor(i64::MAX).checked_add(price).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Creates an amount from a decimal major-unit value, rounding to the
    /// nearest minor unit.
    ///
    /// Returns `None` for non-finite values and for amounts whose minor
    /// units an `f64` cannot represent exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_decimal(value: f64) -> Option<Self> {
        let minor = (value * 100.0).round();
        if minor.is_finite() && minor.abs() <= MAX_EXACT_MINOR {
            Some(Self(minor as i64))
        } else {
            None
        }
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal major-unit value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    #[must_use]
    pub fn at_least_zero(self) -> Self {
        Self(self.0.max(0))
    }

    /// Adds two amounts, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts `rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Multiplies by a count, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, count: i64) -> Option<Self> {
        self.0.checked_mul(count).map(Self)
    }
}

// 2^53: larger minor-unit values lose precision as f64.
const MAX_EXACT_MINOR: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_decimal(value).ok_or_else(|| {
            serde::de::Error::custom(format!("amount {value} is out of range"))
        })
    }
}

impl rusqlite::ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.0))
    }
}

impl rusqlite::types::FromSql for Money {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        i64::column_result(value).map(Self)
    }
}
