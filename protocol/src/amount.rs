//! # Amounts
//!
//! Every amount, fee, nonce and supply is held as an arbitrary-precision
//! [`BigInt`] in the asset's smallest unit. Callers may hand in a `BigInt`,
//! any fixed-width integer, or a decimal string; [`AmountInput::normalize`]
//! turns all three into a `BigInt`. Nothing ever passes through floating
//! point.
//!
//! Narrowing to a fixed-width wire integer happens only when a value is
//! serialized, through the `to_*` helpers below, which fail with
//! `AmountOutOfRange` instead of truncating.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer};

use crate::error::{Result, TxError};

/// An amount as supplied by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Big(BigInt),
    Int(i128),
    Decimal(String),
}

impl AmountInput {
    /// Normalizes to a `BigInt`. A decimal string must be an optional sign
    /// followed by digits; anything else is a validation error on `field`.
    pub fn normalize(&self, field: &str) -> Result<BigInt> {
        match self {
            Self::Big(value) => Ok(value.clone()),
            Self::Int(value) => Ok(BigInt::from(*value)),
            Self::Decimal(text) => {
                let trimmed = text.trim();
                let negative = trimmed.starts_with('-');
                let digits = trimmed.strip_prefix(&['-', '+'][..]).unwrap_or(trimmed);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TxError::validation(
                        field,
                        format!("{text:?} is not a decimal integer"),
                    ));
                }
                let magnitude = digits
                    .parse::<BigInt>()
                    .map_err(|e| TxError::validation(field, e.to_string()))?;
                Ok(if negative { -magnitude } else { magnitude })
            }
        }
    }
}

impl Default for AmountInput {
    fn default() -> Self {
        Self::Int(0)
    }
}

macro_rules! amount_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AmountInput {
                fn from(value: $ty) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

amount_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<usize> for AmountInput {
    fn from(value: usize) -> Self {
        Self::Big(BigInt::from(value))
    }
}

impl From<u128> for AmountInput {
    fn from(value: u128) -> Self {
        Self::Big(BigInt::from(value))
    }
}

impl From<BigInt> for AmountInput {
    fn from(value: BigInt) -> Self {
        Self::Big(value)
    }
}

impl From<&BigInt> for AmountInput {
    fn from(value: &BigInt) -> Self {
        Self::Big(value.clone())
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        Self::Decimal(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        Self::Decimal(value)
    }
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Loose {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match Loose::deserialize(deserializer)? {
            Loose::Signed(v) => Self::from(v),
            Loose::Unsigned(v) => Self::from(v),
            Loose::Text(v) => Self::Decimal(v),
        })
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

pub fn require_positive(field: &str, value: &BigInt) -> Result<()> {
    if value.is_positive() {
        Ok(())
    } else {
        Err(TxError::validation(field, format!("must be > 0, got {value}")))
    }
}

pub fn require_non_negative(field: &str, value: &BigInt) -> Result<()> {
    if value.is_negative() {
        Err(TxError::validation(field, format!("must be >= 0, got {value}")))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Narrowing
// ---------------------------------------------------------------------------

fn out_of_range(field: &str, value: &BigInt, target: &'static str) -> TxError {
    TxError::AmountOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        target,
    }
}

pub fn to_i64(field: &str, value: &BigInt) -> Result<i64> {
    value.to_i64().ok_or_else(|| out_of_range(field, value, "i64"))
}

pub fn to_u64(field: &str, value: &BigInt) -> Result<u64> {
    value.to_u64().ok_or_else(|| out_of_range(field, value, "u64"))
}

pub fn to_i32(field: &str, value: &BigInt) -> Result<i32> {
    value.to_i32().ok_or_else(|| out_of_range(field, value, "i32"))
}

pub fn to_u32(field: &str, value: &BigInt) -> Result<u32> {
    value.to_u32().ok_or_else(|| out_of_range(field, value, "u32"))
}

pub fn opt_to_i64(field: &str, value: Option<&BigInt>) -> Result<i64> {
    value.map_or(Ok(0), |v| to_i64(field, v))
}

/// Narrows to a plain JSON number for transports without big-integer support.
pub fn to_json_number(field: &str, value: &BigInt) -> Result<serde_json::Value> {
    if let Some(v) = value.to_i64() {
        Ok(v.into())
    } else if let Some(v) = value.to_u64() {
        Ok(v.into())
    } else {
        Err(out_of_range(field, value, "JSON number"))
    }
}

/// Sum of optional values; absent terms count as zero.
pub fn sum<'a>(values: impl IntoIterator<Item = Option<&'a BigInt>>) -> BigInt {
    values
        .into_iter()
        .flatten()
        .fold(BigInt::zero(), |acc, v| acc + v)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn normalizes_every_input_form() {
        let expected = BigInt::from(1_000_000u64);
        assert_eq!(AmountInput::from(1_000_000u64).normalize("a").unwrap(), expected);
        assert_eq!(AmountInput::from(1_000_000i32).normalize("a").unwrap(), expected);
        assert_eq!(AmountInput::from("1000000").normalize("a").unwrap(), expected);
        assert_eq!(AmountInput::from(expected.clone()).normalize("a").unwrap(), expected);
    }

    #[test]
    fn decimal_strings_beyond_u128_survive() {
        let big = "340282366920938463463374607431768211456000";
        let value = AmountInput::from(big).normalize("amount").unwrap();
        assert_eq!(value.to_string(), big);
    }

    #[test]
    fn rejects_fractional_and_garbage_strings() {
        for bad in ["1.5", "", "12a", "-", "1e6"] {
            let err = AmountInput::from(bad).normalize("amount").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "input {bad:?}");
            assert_eq!(err.field(), Some("amount"));
        }
    }

    #[test]
    fn signed_strings_parse() {
        assert_eq!(
            AmountInput::from(" -42 ").normalize("a").unwrap(),
            BigInt::from(-42)
        );
        assert_eq!(AmountInput::from("+7").normalize("a").unwrap(), BigInt::from(7));
    }

    #[test]
    fn positivity_checks() {
        assert!(require_positive("amount", &BigInt::from(1)).is_ok());
        assert!(require_positive("amount", &BigInt::from(0)).is_err());
        assert!(require_non_negative("nonce", &BigInt::from(0)).is_ok());
        assert!(require_non_negative("nonce", &BigInt::from(-1)).is_err());
    }

    #[test]
    fn narrowing_reports_overflow() {
        let huge = BigInt::from(u64::MAX) + 1;
        let err = to_u64("nonce", &huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmountOutOfRange);
        assert!(to_i64("fee", &BigInt::from(u64::MAX)).is_err());
        assert_eq!(to_json_number("x", &BigInt::from(u64::MAX)).unwrap(), u64::MAX);
        assert!(to_json_number("x", &huge).is_err());
    }

    #[test]
    fn sum_treats_missing_as_zero() {
        let a = BigInt::from(500_000);
        let b = BigInt::from(100_000);
        assert_eq!(sum([Some(&a), Some(&b)]), BigInt::from(600_000));
        assert_eq!(sum([Some(&a), None]), a);
        assert_eq!(sum([None, None]), BigInt::zero());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: AmountInput = serde_json::from_str("123").unwrap();
        let s: AmountInput = serde_json::from_str("\"123\"").unwrap();
        let u: AmountInput = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(n.normalize("a").unwrap(), s.normalize("a").unwrap());
        assert_eq!(u.normalize("a").unwrap(), BigInt::from(u64::MAX));
    }
}
