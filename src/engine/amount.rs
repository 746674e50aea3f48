use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Monetary amount of a transfer.
/// It is using internally an i64 in order to avoid floating point rounding error,
/// so summing `430.2` and `150.2` gives exactly `580.4`.
/// The Amount precision is four places past the decimal, extra digits are truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Overflow error while creating Amount")]
    Overflow,
}

impl Amount {
    pub const ZERO: Amount = Amount { store: 0 };

    /// Adds two amounts, clamping to the representable range instead of failing.
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount {
            store: self.store.saturating_add(other.store),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.store < 0
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(AmountError::Parse(s.into()))?
        }

        let mut parts = s.split('.');
        let left_part = parts.next().unwrap_or_default();
        let decimal_part = parts.next();

        // Checking for extra '.'
        if parts.next().is_some() {
            Err(AmountError::Parse(s.into()))?
        }

        // Checking if integer part is empty (ex: ".05")
        let left_str = if left_part.is_empty() { "0" } else { left_part };

        let total: i64 = match decimal_part {
            None => match left_str.parse::<i64>() {
                Ok(v) => match v.checked_mul(10_000) {
                    Some(val) => val,
                    None => Err(AmountError::Overflow)?,
                },
                Err(_) => Err(AmountError::Parse(s.into()))?,
            },
            Some(dec_str) => {
                if !dec_str.chars().all(|c| c.is_ascii_digit()) {
                    Err(AmountError::Parse(s.into()))?
                }

                // Ensure 4 digits for decimal part
                let mut dec_str: String = dec_str.chars().take(4).collect();
                while dec_str.len() < 4 {
                    dec_str.push('0');
                }

                match format!("{}{}", left_str, dec_str).parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => Err(AmountError::Parse(s.into()))?,
                }
            }
        };

        Ok(Self { store: total })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.store;
        let abs_val = value.unsigned_abs();

        let left_part = abs_val / 10_000;
        let decimal_part = abs_val % 10_000;

        if value < 0 {
            write!(f, "-{}.{:04}", left_part, decimal_part)
        } else {
            write!(f, "{}.{:04}", left_part, decimal_part)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal number or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::from_str(&v.to_string()).map_err(E::custom)
    }

    // f64 Display never uses exponent notation and prints the shortest
    // representation that round-trips, so 430.2 is read back as "430.2".
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(AmountError::Parse(v.to_string())));
        }
        Amount::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
