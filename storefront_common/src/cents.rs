use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::Add,
    str::FromStr,
};

use serde::{de, de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// Number of decimal places carried by every currency amount in the store.
pub const CURRENCY_DECIMALS: u32 = 2;
const CENTS_PER_UNIT: i64 = 10_i64.pow(CURRENCY_DECIMALS);

//--------------------------------------       Cents         ---------------------------------------------------------
/// A fixed-point currency amount, stored as an integer number of cents.
///
/// On the wire, amounts are plain JSON numbers in major units (`45.5` is 4550 cents). Deserialization also accepts
/// decimal strings (`"45.50"`), which avoids float rounding altogether.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(Cents: Add::add, Sub::sub);
op!(Cents: assign AddAssign::add_assign, SubAssign::sub_assign);
op!(Cents * i64: Mul::mul);

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Builds an amount from whole currency units, e.g. `Cents::from_units(10)` is 10.00.
    pub fn from_units(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    /// Converts a floating point amount in major units, rounding to the nearest cent.
    pub fn try_from_f64(value: f64) -> Result<Self, CentsConversionError> {
        if !value.is_finite() {
            return Err(CentsConversionError(format!("{value} is not a finite number")));
        }
        let scaled = (value * CENTS_PER_UNIT as f64).round();
        if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Err(CentsConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(scaled as i64))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = CENTS_PER_UNIT.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_unit, abs % per_unit)
    }
}

impl FromStr for Cents {
    type Err = CentsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || CentsConversionError(format!("'{s}' is not a valid amount"));
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if fraction.len() > CURRENCY_DECIMALS as usize || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let units: i64 = units.parse().map_err(|_| err())?;
        let fraction = format!("{fraction:0<2}");
        let fraction: i64 = fraction.parse().map_err(|_| err())?;
        let value = units.checked_mul(CENTS_PER_UNIT).and_then(|v| v.checked_add(fraction)).ok_or_else(err)?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

struct CentsVisitor;

impl<'de> Visitor<'de> for CentsVisitor {
    type Value = Cents;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a currency amount as a number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(CENTS_PER_UNIT).map(Cents).ok_or_else(|| E::custom(format!("{v} is out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Cents::try_from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CentsVisitor)
    }
}
