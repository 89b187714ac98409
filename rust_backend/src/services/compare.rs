//! Column-by-column reconciliation of derived summaries against reference rows.

use serde::Serialize;

use crate::core::domain::{FieldValue, RecordRow};

/// Column prefixes for system, planet and star properties, which come from
/// external catalogues rather than the proposal documents.
pub const DEFAULT_SKIP_PREFIXES: [&str; 3] = ["sy_", "pl_", "st_"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    pub skip_prefixes: Vec<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CompareOptions {
    fn skips(&self, column: &str) -> bool {
        self.skip_prefixes.iter().any(|p| column.starts_with(p.as_str()))
    }
}

/// Outcome for one column present in both rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnComparison {
    pub column: String,
    pub reference: FieldValue,
    pub derived: FieldValue,
    pub equal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub columns: Vec<ColumnComparison>,
    /// Derived columns the reference row does not have.
    pub missing_in_reference: Vec<String>,
}

impl Reconciliation {
    pub fn mismatched_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.equal)
            .map(|c| c.column.as_str())
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.columns.iter().all(|c| c.equal)
    }
}

fn numeric(value: &FieldValue) -> Option<f64> {
    let number = match value {
        FieldValue::Integer(v) => *v as f64,
        FieldValue::Number(v) => *v,
        FieldValue::Text(text) => text.trim().parse::<f64>().ok()?,
        FieldValue::Absent => return None,
    };
    number.is_finite().then_some(number)
}

/// Loose equality used for reconciliation.
///
/// Two absent values are equal and absent never equals present. Values that
/// both read as finite numbers compare numerically, so `"10"` equals
/// `"10.00"` and `Integer(4)` equals `"4"`. Other text compares trimmed and
/// case-sensitive. A number never equals non-numeric text.
pub fn values_equal(reference: &FieldValue, derived: &FieldValue) -> bool {
    match (reference, derived) {
        (FieldValue::Absent, FieldValue::Absent) => true,
        (FieldValue::Absent, _) | (_, FieldValue::Absent) => false,
        _ => match (numeric(reference), numeric(derived)) {
            (Some(a), Some(b)) => a == b,
            (None, None) => match (reference, derived) {
                (FieldValue::Text(a), FieldValue::Text(b)) => a.trim() == b.trim(),
                _ => false,
            },
            _ => false,
        },
    }
}

/// Compares every derived column against the same column of `reference`.
pub fn reconcile(
    reference: &RecordRow,
    derived: &RecordRow,
    options: &CompareOptions,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (column, value) in derived.iter() {
        if options.skips(column) {
            continue;
        }
        match reference.get(column) {
            Some(expected) => result.columns.push(ColumnComparison {
                column: column.to_string(),
                reference: expected.clone(),
                derived: value.clone(),
                equal: values_equal(expected, value),
            }),
            None => result.missing_in_reference.push(column.to_string()),
        }
    }

    result
}
