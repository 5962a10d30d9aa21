//! Raw lead representation
//!
//! A lead arrives as a mapping from field name to a loosely typed value.
//! Keys outside the frozen schema are ignored; schema keys may be absent
//! entirely and are treated as missing by the preprocessor.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A single raw attribute value: number, string, or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Numeric view of the value. Booleans coerce to 0.0/1.0; strings
    /// parse if they hold a number, otherwise the value is missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Number(_) => None,
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Categorical view of the value.
    pub fn as_category(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_category_number(*n),
            FieldValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// One raw lead: field name -> value. BTreeMap keeps serialization
/// order deterministic.
pub type RawLead = BTreeMap<String, FieldValue>;

/// Convert every row of a table into a raw lead, skipping the named
/// columns. Null cells become absent keys, which the preprocessor later
/// treats as missing.
pub fn leads_from_frame(df: &DataFrame, exclude: &[String]) -> PolarsResult<Vec<RawLead>> {
    let mut leads = vec![RawLead::new(); df.height()];

    for col_name in df.get_column_names() {
        let name = col_name.to_string();
        if exclude.contains(&name) {
            continue;
        }
        let series = df.column(col_name)?.as_materialized_series();

        match series.dtype() {
            DataType::Boolean => {
                for (i, value) in series.bool()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        leads[i].insert(name.clone(), FieldValue::Bool(v));
                    }
                }
            }
            DataType::String => {
                for (i, value) in series.str()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        leads[i].insert(name.clone(), FieldValue::Text(v.to_string()));
                    }
                }
            }
            dt if dt.is_primitive_numeric() => {
                let floats = series.cast(&DataType::Float64)?;
                for (i, value) in floats.f64()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        leads[i].insert(name.clone(), FieldValue::Number(v));
                    }
                }
            }
            _ => {
                let rendered = series.cast(&DataType::String)?;
                for (i, value) in rendered.str()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        leads[i].insert(name.clone(), FieldValue::Text(v.to_string()));
                    }
                }
            }
        }
    }

    Ok(leads)
}

/// Integer-valued floats render without a trailing ".0" so that a lead
/// carrying `5` and a training table carrying `"5"` land in the same
/// category level. Fit-time level extraction renders float columns
/// through this same function, so the two paths can never disagree on
/// a value's level name.
pub(crate) fn format_category_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
