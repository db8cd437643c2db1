//! Field coercion rules.
//!
//! Every rule maps a loosely typed wire value onto the representation the
//! destination column expects. Rules are pure, and applying a rule to its own
//! output returns that output unchanged.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use model::core::value::Value;
use serde::Serialize;
use thiserror::Error;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoercionKind {
    /// Keys sent as numbers or numeric strings, possibly with a fractional
    /// part (`12.0`): parsed as a float, then truncated toward zero.
    IntegerKey,
    /// Exact decimal rounded to the column scale, rejected when it does not
    /// fit the column precision.
    DecimalQuantity { precision: u64, scale: i64 },
    /// `YYYY-MM-DD` strings; anything that is not a string passes through.
    IsoDate,
    /// Surrounding whitespace removed; null stays null.
    TrimmedString,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("expected {expected}, got {found}")]
    InvalidField { expected: String, found: String },
}

impl CoercionError {
    fn invalid(expected: impl Into<String>, value: &Value) -> Self {
        CoercionError::InvalidField {
            expected: expected.into(),
            found: describe(value),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string {s:?}"),
        Value::Null => "null".to_string(),
        other => format!(
            "{} {}",
            other.type_name(),
            other.as_string().unwrap_or_default()
        ),
    }
}

impl CoercionKind {
    pub fn apply(&self, value: Value) -> Result<Value, CoercionError> {
        if value.is_null() {
            return Ok(value);
        }

        match self {
            CoercionKind::IntegerKey => coerce_integer_key(value),
            CoercionKind::DecimalQuantity { precision, scale } => {
                coerce_decimal(value, *precision, *scale)
            }
            CoercionKind::IsoDate => coerce_date(value),
            CoercionKind::TrimmedString => Ok(coerce_trimmed(value)),
        }
    }
}

fn coerce_integer_key(value: Value) -> Result<Value, CoercionError> {
    const EXPECTED: &str = "an integer-like number";

    let float = match &value {
        Value::Int(_) => return Ok(value),
        Value::Float(_) | Value::String(_) | Value::Decimal(_) => value.as_f64(),
        _ => None,
    };

    match float.map(f64::trunc) {
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        Some(t) if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 => {
            Ok(Value::Int(t as i64))
        }
        _ => Err(CoercionError::invalid(EXPECTED, &value)),
    }
}

fn coerce_decimal(value: Value, precision: u64, scale: i64) -> Result<Value, CoercionError> {
    let decimal = match &value {
        Value::Int(_) | Value::Float(_) | Value::Decimal(_) | Value::String(_) => {
            value.as_big_decimal()
        }
        _ => None,
    }
    .ok_or_else(|| CoercionError::invalid("a decimal number", &value))?;

    let rounded: BigDecimal = decimal.with_scale_round(scale, RoundingMode::HalfUp);
    if rounded.digits() > precision {
        return Err(CoercionError::invalid(
            format!(
                "a decimal with at most {} digits before the point",
                precision as i64 - scale
            ),
            &value,
        ));
    }

    Ok(Value::Decimal(rounded))
}

fn coerce_date(value: Value) -> Result<Value, CoercionError> {
    match value {
        Value::String(ref s) if s.is_empty() => Ok(Value::Null),
        Value::String(ref s) => NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
            .map(Value::Date)
            .map_err(|_| CoercionError::invalid("a YYYY-MM-DD date", &value)),
        other => Ok(other),
    }
}

fn coerce_trimmed(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other
            .as_string()
            .map(|s| Value::String(s.trim().to_string()))
            .unwrap_or(Value::Null),
    }
}
