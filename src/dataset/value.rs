//! Cell-level value typing for report datasets.
//!
//! Every table cell holds one [`CellValue`]. [`coerce`] maps an arbitrary
//! JSON value onto the most precise representation the report engine can
//! consume, degrading (integer, then decimal, then float) only when a
//! lossless representation is unavailable. Coercion is total: there is no
//! JSON value it can fail on.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent or explicit JSON null
    Null,
    /// Boolean value (true/false)
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// Exact decimal, used when a number does not fit `i64` losslessly
    Decimal(Decimal),
    /// Floating point fallback for numbers outside decimal range
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Absolute timestamp; date-only inputs are midnight
    Timestamp(NaiveDateTime),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Decimal(d) => write!(f, "{}", d),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Convert one JSON value into the cell representation the renderer
/// consumes. Never fails; the worst case is a stringified fallback.
pub fn coerce(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Boolean(*b),
        Value::Number(n) => coerce_number(n),
        Value::String(s) => match parse_timestamp(s) {
            Some(ts) => CellValue::Timestamp(ts),
            None => CellValue::String(s.clone()),
        },
        // The tabular model has no nested-value column type; keep nested
        // structures as their canonical JSON text rather than dropping them.
        nested => CellValue::String(nested.to_string()),
    }
}

fn coerce_number(n: &serde_json::Number) -> CellValue {
    if let Some(i) = n.as_i64() {
        return CellValue::Integer(i);
    }
    if let Some(u) = n.as_u64() {
        // Above i64::MAX but still exact
        return CellValue::Decimal(Decimal::from(u));
    }
    // Fractional literal: the shortest-roundtrip text of the number parses
    // back exactly when it fits decimal range
    if let Ok(d) = Decimal::from_str(&n.to_string()) {
        return CellValue::Decimal(d);
    }
    CellValue::Float(n.as_f64().unwrap_or(f64::NAN))
}

/// Best-effort timestamp sniffing over a fixed, locale-invariant parser
/// chain. Any string that happens to look like a date is reinterpreted as
/// one; callers rely on this for compatibility with existing payloads.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
