//! Money type for representing monetary values.
//!
//! Uses an integer count of minor units (paisa, cents) to avoid floating-point
//! drift when summing line totals. On the wire a `Money` is a plain JSON
//! number in major units (`160` or `3150.5`), matching the persisted cart
//! record.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

/// Number of minor units in one major unit.
const MINOR_PER_MAJOR: i64 = 100;

/// Largest magnitude (in minor units) accepted when converting from a decimal.
/// Beyond this, `f64` can no longer represent every minor unit exactly.
const MAX_EXACT_MINOR: f64 = 9_000_000_000_000_000.0;

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "BDT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
        }
    }

    /// Get the currency symbol (e.g., "৳").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BDT => "\u{09f3}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BDT" => Some(Currency::BDT),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            _ => None,
        }
    }

    /// Format an amount with this currency's symbol (e.g., "৳160.00").
    pub fn format(&self, amount: Money) -> String {
        format!("{}{}", self.symbol(), amount)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    amount_minor: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Money = Money { amount_minor: 0 };

    /// Create an amount from minor units.
    pub const fn from_minor(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Create an amount from whole major units.
    pub const fn from_major(amount: i64) -> Self {
        Self {
            amount_minor: amount * MINOR_PER_MAJOR,
        }
    }

    /// Convert a decimal amount, rounding to the nearest minor unit.
    ///
    /// Returns `None` for non-finite values or values too large to represent
    /// exactly.
    ///
    /// ```
    /// use cakeshop_cart::Money;
    /// let price = Money::from_decimal(49.99).unwrap();
    /// assert_eq!(price.amount_minor(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        let minor = (amount * MINOR_PER_MAJOR as f64).round();
        if !minor.is_finite() || minor.abs() > MAX_EXACT_MINOR {
            return None;
        }
        Some(Self::from_minor(minor as i64))
    }

    /// Convert a decimal amount that must already be whole minor units.
    ///
    /// Returns `None` when `amount` carries more than two decimal places, as
    /// well as in every case [`from_decimal`](Self::from_decimal) rejects.
    ///
    /// ```
    /// use cakeshop_cart::Money;
    /// assert_eq!(Money::from_decimal_exact(49.99).unwrap().amount_minor(), 4999);
    /// assert!(Money::from_decimal_exact(19.999).is_none());
    /// ```
    pub fn from_decimal_exact(amount: f64) -> Option<Self> {
        Self::from_decimal(amount).filter(|m| m.to_decimal() == amount)
    }

    /// Amount in minor units.
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / MINOR_PER_MAJOR as f64
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Multiply by a quantity, saturating at the numeric bounds.
    pub fn saturating_mul(&self, factor: u32) -> Money {
        Money::from_minor(self.amount_minor.saturating_mul(i64::from(factor)))
    }

    /// Add, saturating at the numeric bounds.
    pub fn saturating_add(&self, other: Money) -> Money {
        Money::from_minor(self.amount_minor.saturating_add(other.amount_minor))
    }

    /// Sum an iterator of amounts, saturating at the numeric bounds.
    pub fn sum(iter: impl IntoIterator<Item = Money>) -> Money {
        iter.into_iter().fold(Money::ZERO, |acc, m| acc.saturating_add(m))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.amount_minor % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.amount_minor / MINOR_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.to_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        match Money::from_decimal(amount) {
            None => Err(de::Error::custom(format!("amount out of range: {}", amount))),
            Some(m) if m.to_decimal() != amount => Err(de::Error::custom(format!(
                "amount has more than two decimal places: {}",
                amount
            ))),
            Some(m) => Ok(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(160.0).unwrap().amount_minor(), 16000);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().amount_minor(), 30);
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(1e300).is_none());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_minor(4999).to_string(), "49.99");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
        assert_eq!(Currency::BDT.format(Money::from_major(60)), "\u{09f3}60.00");
    }

    #[test]
    fn test_money_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Money::from_major(160)).unwrap(), "160");
        assert_eq!(serde_json::to_string(&Money::from_minor(4999)).unwrap(), "49.99");
    }

    #[test]
    fn test_money_deserializes_integers_and_floats() {
        let a: Money = serde_json::from_str("3150").unwrap();
        let b: Money = serde_json::from_str("3150.00").unwrap();
        let c: Money = serde_json::from_str("49.99").unwrap();
        assert_eq!(a, Money::from_major(3150));
        assert_eq!(a, b);
        assert_eq!(c.amount_minor(), 4999);
        assert!(serde_json::from_str::<Money>("\"12\"").is_err());
    }

    #[test]
    fn test_money_rejects_sub_minor_amounts() {
        let err = serde_json::from_str::<Money>("0.125").unwrap_err();
        assert!(err.to_string().contains("more than two decimal places"));
        assert!(serde_json::from_str::<Money>("19.999").is_err());
        assert!(Money::from_decimal_exact(0.1 + 0.2).is_none());
        assert_eq!(Money::from_decimal_exact(-2.5), Some(Money::from_minor(-250)));
    }

    #[test]
    fn test_money_saturating_arithmetic() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.saturating_mul(2), max);
        assert_eq!(max + Money::from_minor(1), max);
        assert_eq!(
            Money::sum([Money::from_major(1), Money::from_minor(50)]),
            Money::from_minor(150)
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("bdt"), Some(Currency::BDT));
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
