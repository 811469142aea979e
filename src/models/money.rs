//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that group sums and the
//! reconciliation difference are exact. Formula results are computed in
//! floating point and rounded into `Money` according to a [`Rounding`] mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Display precision applied when a computed total becomes a `Money`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to the nearest whole currency unit
    #[default]
    Integer,
    /// Keep two decimal places
    TwoDecimal,
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::Integer => write!(f, "integer"),
            Rounding::TwoDecimal => write!(f, "two_decimal"),
        }
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "integer" | "int" | "whole" => Ok(Rounding::Integer),
            "two_decimal" | "2" | "cents" | "decimal" => Ok(Rounding::TwoDecimal),
            other => Err(format!(
                "unknown rounding '{}' (expected 'integer' or 'two_decimal')",
                other
            )),
        }
    }
}

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budgetline::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Round a computed amount into Money
    ///
    /// Halves round away from zero. NaN yields zero; infinities and
    /// magnitudes beyond the range of cents saturate.
    ///
    /// # Examples
    /// ```
    /// use budgetline::models::{Money, Rounding};
    /// assert_eq!(Money::from_f64(640.4, Rounding::Integer), Money::from_units(640));
    /// assert_eq!(Money::from_f64(640.456, Rounding::TwoDecimal).cents(), 64046);
    /// ```
    pub fn from_f64(value: f64, rounding: Rounding) -> Self {
        if value.is_nan() {
            return Self::zero();
        }
        match rounding {
            Rounding::Integer => Self((value.round() as i64).saturating_mul(100)),
            Rounding::TwoDecimal => Self((value * 100.0).round() as i64),
        }
    }

    /// Round an exact amount to the given precision
    ///
    /// Halves round away from zero.
    pub const fn round_to(self, rounding: Rounding) -> Self {
        match rounding {
            Rounding::TwoDecimal => self,
            Rounding::Integer => {
                let rem = self.0 % 100;
                let units = if rem >= 50 {
                    self.0 / 100 + 1
                } else if rem <= -50 {
                    self.0 / 100 - 1
                } else {
                    self.0 / 100
                };
                Self(units.saturating_mul(100))
            }
        }
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Get the amount as a floating-point number of units
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "1,234.50"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
        let s = cleaned.as_str();

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let (units_str, cents_str) = match s.split_once('.') {
            Some((units, cents)) => (units, Some(cents)),
            None => (s, None),
        };

        if !units_str.chars().all(|c| c.is_ascii_digit())
            || (units_str.is_empty() && cents_str.map_or(true, str::is_empty))
        {
            return Err(invalid());
        }
        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| invalid())?
        };

        // Pad or truncate cents to 2 digits
        let cents: i64 = match cents_str {
            None => 0,
            Some(fraction) => {
                if !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                fraction
                    .chars()
                    .chain(std::iter::repeat('0'))
                    .take(2)
                    .filter_map(|c| c.to_digit(10))
                    .fold(0, |acc, d| acc * 10 + i64::from(d))
            }
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format without a currency symbol, honoring the rounding mode
    ///
    /// Used for CSV export, where the column must stay numeric.
    pub fn format_plain(&self, rounding: Rounding) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        match rounding {
            Rounding::Integer if self.cents_part() == 0 => {
                format!("{}{}", sign, self.units().abs())
            }
            _ => format!("{}{}.{:02}", sign, self.units().abs(), self.cents_part()),
        }
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.units().abs()),
            self.cents_part()
        )
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_f64_rounding_modes() {
        assert_eq!(Money::from_f64(28800.0, Rounding::Integer).cents(), 2_880_000);
        assert_eq!(Money::from_f64(10.5, Rounding::Integer).cents(), 1100);
        assert_eq!(Money::from_f64(10.49, Rounding::Integer).cents(), 1000);
        assert_eq!(Money::from_f64(10.499, Rounding::TwoDecimal).cents(), 1050);
        assert_eq!(Money::from_f64(f64::NAN, Rounding::Integer), Money::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_units(1_234_567)), "$1,234,567.00");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(Money::from_units(640).format_plain(Rounding::Integer), "640");
        assert_eq!(
            Money::from_units(640).format_plain(Rounding::TwoDecimal),
            "640.00"
        );
        assert_eq!(
            Money::from_cents(-1005).format_plain(Rounding::TwoDecimal),
            "-10.05"
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("1,234.5").unwrap().cents(), 123_450);
        assert!(Money::parse("abc").is_err());
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("7.").unwrap().cents(), 700);
        assert_eq!(Money::parse("1.999").unwrap().cents(), 199);
    }

    #[test]
    fn test_parse_rejects_malformed_fraction() {
        assert!(Money::parse("1.5é").is_err());
        assert!(Money::parse("1.é5").is_err());
        assert!(Money::parse("10.-5").is_err());
        assert!(Money::parse("10.+5").is_err());
        assert!(Money::parse("+10").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = Money::from_f64(1e18, Rounding::Integer);
        assert_eq!(huge.cents(), i64::MAX);
        assert_eq!(Money::from_f64(1e30, Rounding::TwoDecimal).cents(), i64::MAX);
        assert_eq!(Money::from_f64(f64::INFINITY, Rounding::Integer).cents(), i64::MAX);
        assert_eq!((huge + huge).cents(), i64::MAX);
        assert_eq!((Money::zero() - huge - huge).cents(), i64::MIN);
        let mut sum = huge;
        sum += Money::from_units(1);
        assert_eq!(sum, huge);
        let total: Money = vec![huge, huge, Money::from_units(5)].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert!(!huge.format_with_symbol("$").is_empty());
    }

    #[test]
    fn test_round_to() {
        let m = Money::from_cents(123_456);
        assert_eq!(m.round_to(Rounding::TwoDecimal), m);
        assert_eq!(m.round_to(Rounding::Integer), Money::from_units(1235));
        assert_eq!(Money::from_cents(123_449).round_to(Rounding::Integer), Money::from_units(1234));
        assert_eq!(Money::from_cents(-150).round_to(Rounding::Integer), Money::from_units(-2));
    }

    #[test]
    fn test_rounding_from_str() {
        assert_eq!("integer".parse::<Rounding>().unwrap(), Rounding::Integer);
        assert_eq!(
            "two-decimal".parse::<Rounding>().unwrap(),
            Rounding::TwoDecimal
        );
        assert!("three".parse::<Rounding>().is_err());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
