use serde::Serialize;

use crate::engine::{CorrectedBatch, DerivedField};
use crate::record::{date_key, Batch, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub name: String,
    pub bag_lot_no: String,
    pub field: DerivedField,
    pub original_value: String,
    pub corrected_value: String,
}

/// Text used to decide whether two values of `field` differ. Dates compare by
/// calendar day and ETAs by numeric value, so representation changes from a
/// spreadsheet round trip do not count as drift.
pub fn canonical_text(field: DerivedField, value: &FieldValue) -> String {
    if value.is_null() {
        return String::new();
    }
    if field.is_timestamp() || value.is_temporal() {
        return date_key(value);
    }
    if field.is_numeric() {
        if let FieldValue::Text(raw) = value {
            if let Ok(number) = raw.trim().parse::<f64>() {
                return FieldValue::Number(number).to_string();
            }
        }
    }
    value.to_string()
}

pub fn build_discrepancies(
    original: &Batch,
    corrected: &CorrectedBatch,
    fields: &[DerivedField],
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();
    for (record, processed) in original.iter().zip(corrected.iter()) {
        for field in fields {
            let original_value = canonical_text(*field, record.get(field.column()));
            let corrected_value = canonical_text(*field, &processed.corrected.get(*field));
            if original_value != corrected_value {
                let identity = record.identity();
                discrepancies.push(Discrepancy {
                    name: identity.name,
                    bag_lot_no: identity.bag_lot_no,
                    field: *field,
                    original_value,
                    corrected_value,
                });
            }
        }
    }
    discrepancies
}
