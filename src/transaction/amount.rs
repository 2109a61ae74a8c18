//! Fixed-point monetary amounts.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

use crate::Error;

/// The largest amount accepted from users, just under one trillion dollars.
const MAX_CENTS: i64 = 99_999_999_999_999;

/// An amount of money stored as a whole number of cents.
///
/// Positive values are income, negative values are expenses. Sums are exact,
/// floating point only appears at the JSON and display boundaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// No money.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a whole number of cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert a dollar value to an amount, rounding to the nearest cent.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `value` is not finite or its magnitude
    /// is a trillion dollars or more.
    pub fn from_dollars(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        let cents = (value * 100.0).round();

        if cents.abs() > MAX_CENTS as f64 {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        Ok(Self(cents as i64))
    }

    /// The amount in dollars, for display and JSON.
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Plain decimals like "-12.345" are converted to cents without going
    /// through `f64`, anything else (e.g. "1e3") is parsed as a float.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        match parse_decimal_cents(trimmed) {
            Some(cents) if cents.abs() <= MAX_CENTS => Ok(Self(cents)),
            Some(_) => Err(Error::InvalidAmount(s.to_owned())),
            None => trimmed
                .parse::<f64>()
                .map_err(|_| Error::InvalidAmount(s.to_owned()))
                .and_then(Self::from_dollars),
        }
    }
}

/// Parse `[+-]digits[.digits]` into cents, rounding half away from zero on
/// the third decimal place.
fn parse_decimal_cents(s: &str) -> Option<i64> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);

    let cents = whole
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

    Some(if negative { -cents } else { cents })
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Saturates at the bounds of `i64` instead of overflowing.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a number or a numeric string")
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Amount::from_dollars(v).map_err(E::custom)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

/// Accepts both JSON numbers and numeric strings, e.g. `42.5` or `"42.50"`.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{Amount, MAX_CENTS};

    #[test]
    fn parses_decimal_strings_into_cents() {
        assert_eq!("42.50".parse(), Ok(Amount::from_cents(4250)));
        assert_eq!(" -0.29 ".parse(), Ok(Amount::from_cents(-29)));
        assert_eq!("7".parse(), Ok(Amount::from_cents(700)));
        assert_eq!("+.5".parse(), Ok(Amount::from_cents(50)));
        assert_eq!("3.".parse(), Ok(Amount::from_cents(300)));
        assert_eq!("1e3".parse(), Ok(Amount::from_cents(100_000)));
    }

    #[test]
    fn rounds_decimal_strings_without_float_error() {
        // 1.005 is 1.00499999... as an f64.
        assert_eq!("1.005".parse(), Ok(Amount::from_cents(101)));
        assert_eq!("-1.005".parse(), Ok(Amount::from_cents(-101)));
        assert_eq!("2.0049".parse(), Ok(Amount::from_cents(200)));
    }

    #[test]
    fn rejects_a_trillion_dollars_or_more() {
        assert_eq!(
            "999999999999.99".parse(),
            Ok(Amount::from_cents(MAX_CENTS))
        );
        assert!("1000000000000".parse::<Amount>().is_err());
        assert!("-1000000000000.00".parse::<Amount>().is_err());
        assert!("99999999999999999999999".parse::<Amount>().is_err());
        assert!(Amount::from_dollars(1e12).is_err());
        assert!(serde_json::from_str::<Amount>("90071992547409.91").is_err());
    }

    #[test]
    fn addition_saturates() {
        let big = Amount::from_cents(i64::MAX - 1);

        assert_eq!(big + Amount::from_cents(5), Amount::from_cents(i64::MAX));
        assert_eq!(
            Amount::from_cents(i64::MIN) + Amount::from_cents(-1),
            Amount::from_cents(i64::MIN)
        );

        let mut total = big;
        total += big;
        assert_eq!(total, Amount::from_cents(i64::MAX));
    }

    #[test]
    fn rounds_to_nearest_cent() {
        assert_eq!(Amount::from_dollars(0.125), Ok(Amount::from_cents(13)));
        assert_eq!(Amount::from_dollars(19.999), Ok(Amount::from_cents(2000)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            "twelve".parse::<Amount>(),
            Err(Error::InvalidAmount("twelve".to_owned()))
        );
        assert!(".".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("--1".parse::<Amount>().is_err());
        assert!(Amount::from_dollars(f64::NAN).is_err());
        assert!(Amount::from_dollars(f64::INFINITY).is_err());
        assert!(Amount::from_dollars(1e300).is_err());
    }

    #[test]
    fn sums_without_rounding_error() {
        let total: Amount = std::iter::repeat_n(Amount::from_dollars(0.1).unwrap(), 10).sum();

        assert_eq!(total, Amount::from_cents(100));
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Amount::from_cents(4250).to_string(), "42.50");
        assert_eq!(Amount::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_number: Amount = serde_json::from_str("42.5").unwrap();
        let from_integer: Amount = serde_json::from_str("-3").unwrap();
        let from_string: Amount = serde_json::from_str("\"42.50\"").unwrap();

        assert_eq!(from_number, Amount::from_cents(4250));
        assert_eq!(from_integer, Amount::from_cents(-300));
        assert_eq!(from_string, Amount::from_cents(4250));
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&Amount::from_cents(4250)).unwrap();

        assert_eq!(json, "42.5");
    }
}
