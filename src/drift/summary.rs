use std::collections::BTreeSet;

use serde::Serialize;

use crate::drift::Discrepancy;
use crate::engine::DerivedField;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCorrections {
    pub field: DerivedField,
    pub corrections: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftSummary {
    pub total_rows: usize,
    pub corrections: usize,
    /// Share of checked cells that changed, in percent.
    pub correction_rate: f64,
    pub affected_names: usize,
    pub per_field: Vec<FieldCorrections>,
}

impl DriftSummary {
    pub fn is_clean(&self) -> bool {
        self.corrections == 0
    }
}

pub fn summarize(
    rows: usize,
    fields: &[DerivedField],
    discrepancies: &[Discrepancy],
) -> DriftSummary {
    let checked_cells = rows * fields.len();
    let correction_rate = if checked_cells == 0 {
        0.0
    } else {
        discrepancies.len() as f64 / checked_cells as f64 * 100.0
    };
    let affected_names = discrepancies
        .iter()
        .map(|d| d.name.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let per_field = fields
        .iter()
        .map(|field| FieldCorrections {
            field: *field,
            corrections: discrepancies.iter().filter(|d| d.field == *field).count(),
        })
        .collect();

    DriftSummary {
        total_rows: rows,
        corrections: discrepancies.len(),
        correction_rate,
        affected_names,
        per_field,
    }
}
