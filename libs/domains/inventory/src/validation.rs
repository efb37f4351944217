//! Field validators
//!
//! Each parser takes the raw JSON value and returns the typed field, or
//! `None` when the value breaks the field's rule. Callers decide which
//! message to report.

use regex::Regex;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::models::{ProductStatus, Quantity};

static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").unwrap());

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Whether a required field counts as supplied
///
/// Strings must contain something other than whitespace. Numbers always
/// count, and so does any other non-null value.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Text form used by the pattern checks; numbers and booleans are matched
/// on their JSON rendering
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Letters, digits and whitespace, at least one character
pub fn parse_name(value: &Value) -> Option<String> {
    text_of(value).filter(|name| NAME.is_match(name))
}

/// Non-negative whole number, given as a digit string or a JSON number
///
/// Strings keep their exact text. Numbers must be whole, so `50` and `50.0`
/// both become `"50"`; negative and fractional values are rejected.
pub fn parse_quantity(value: &Value) -> Option<Quantity> {
    let text = match value {
        Value::String(s) if DIGITS.is_match(s) => s.clone(),
        Value::Number(n) => match n.as_u64() {
            Some(whole) => whole.to_string(),
            None => n
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| format!("{:.0}", v.abs()))?,
        },
        _ => return None,
    };
    Quantity::from_digits(text)
}

/// `YYYY-MM-DD` shape; the calendar itself is not checked
pub fn parse_date(value: &Value) -> Option<String> {
    text_of(value).filter(|date| ISO_DATE.is_match(date))
}

/// One of the status labels, ignoring surrounding whitespace
pub fn parse_status(value: &Value) -> Option<ProductStatus> {
    match value {
        Value::String(s) => ProductStatus::from_str(s.trim()).ok(),
        _ => None,
    }
}
