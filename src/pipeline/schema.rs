//! Feature schema: the fixed, ordered field lists the model is fit on
//!
//! The schema is decided once at training time and persisted inside the
//! model artifact. It is never re-inferred at serving time, so the field
//! set cannot drift between train and serve.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};

/// Ordered numeric and categorical field lists. The union is exactly the
/// set of columns the preprocessor was fit on; order is significant and
/// reproduced identically at inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from explicit field lists.
    pub fn new(numeric: Vec<String>, categorical: Vec<String>) -> Self {
        Self {
            numeric,
            categorical,
        }
    }

    /// Infer the schema by scanning a training table's dtypes.
    ///
    /// Numeric and boolean columns land in the numeric group; string and
    /// categorical columns land in the categorical group. The target and
    /// any excluded columns (ids, timestamps) are skipped. Columns of any
    /// other dtype are ignored.
    pub fn infer(df: &DataFrame, target: &str, exclude: &[String]) -> Result<Self> {
        let excluded = |name: &str| name == target || exclude.iter().any(|e| e == name);

        let numeric: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| {
                (col.dtype().is_primitive_numeric() || col.dtype() == &DataType::Boolean)
                    && !excluded(col.name().as_str())
            })
            .map(|col| col.name().to_string())
            .collect();

        let categorical: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| {
                matches!(col.dtype(), DataType::String | DataType::Categorical(_, _))
                    && !excluded(col.name().as_str())
            })
            .map(|col| col.name().to_string())
            .collect();

        if numeric.is_empty() && categorical.is_empty() {
            return Err(ScoreError::Configuration(format!(
                "no usable feature columns found (target '{}', {} excluded)",
                target,
                exclude.len()
            )));
        }

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// All declared fields, numeric first, in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.numeric.iter().chain(self.categorical.iter())
    }

    /// Every declared field must exist in the table. A missing field is a
    /// caller error and must abort training, never silently skip.
    pub fn validate_against(&self, df: &DataFrame) -> Result<()> {
        let columns: Vec<&str> = df
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();

        for field in self.field_names() {
            if !columns.contains(&field.as_str()) {
                return Err(ScoreError::Configuration(format!(
                    "declared feature column '{}' not found in training table. Available columns: {:?}",
                    field, columns
                )));
            }
        }

        Ok(())
    }
}
