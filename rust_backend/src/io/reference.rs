use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::core::domain::{FieldValue, RecordRow};
use crate::parsing::text::normalize_identifier;
use crate::services::compare::values_equal;

/// Column names used to look up a reference row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceKeys {
    pub host: String,
    pub planet_letter: String,
    pub program: String,
}

impl Default for ReferenceKeys {
    fn default() -> Self {
        Self {
            host: "star_name".to_string(),
            planet_letter: "planet_letter".to_string(),
            program: "program".to_string(),
        }
    }
}

/// Previously recorded summary rows, one per (host, planet, program).
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<RecordRow>,
    keys: ReferenceKeys,
}

impl ReferenceTable {
    pub fn from_rows(rows: Vec<RecordRow>) -> Self {
        Self {
            rows,
            keys: ReferenceKeys::default(),
        }
    }

    pub fn with_keys(mut self, keys: ReferenceKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Load a reference table from a CSV file with a header row.
    ///
    /// Schema inference is disabled so every column is read as text, however
    /// late a placeholder or fractional value appears.
    pub fn from_csv(csv_path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(csv_path.into()))
            .with_context(|| format!("Failed to open reference CSV: {}", csv_path.display()))?
            .finish()
            .context("Failed to parse reference CSV into DataFrame")?;

        Self::from_dataframe(&df)
    }

    /// Every cell is read as text; `"X"` and empty cells become absent.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let name = column.name().to_string();
            let as_text = column
                .cast(&DataType::String)
                .with_context(|| format!("Failed to read column {} as text", name))?;
            let values = as_text.str()?.clone();
            columns.push((name, values));
        }

        let rows = (0..df.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, values)| (name.clone(), FieldValue::text(values.get(i))))
                    .collect()
            })
            .collect();

        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> &[RecordRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row recorded for `host`, `planet_letter` and `program`.
    ///
    /// Host names compare as identifiers and programs numerically, so
    /// `"WASP 96"` finds `"WASP96"` and `"02734"` finds `2734`.
    pub fn find(
        &self,
        host: &str,
        planet_letter: Option<&str>,
        program: &str,
    ) -> Option<&RecordRow> {
        let host = normalize_identifier(Some(host));
        let letter = FieldValue::text(planet_letter);
        let program = FieldValue::text(Some(program));

        self.rows.iter().find(|row| {
            let row_host = match row.get(&self.keys.host) {
                Some(FieldValue::Text(name)) => normalize_identifier(Some(name)),
                _ => None,
            };
            let row_letter = row.get(&self.keys.planet_letter).cloned().unwrap_or_default();
            let row_program = row.get(&self.keys.program).cloned().unwrap_or_default();

            host.is_some()
                && row_host == host
                && values_equal(&row_letter, &letter)
                && values_equal(&row_program, &program)
        })
    }
}
