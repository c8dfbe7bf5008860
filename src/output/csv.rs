use anyhow::Result;

use crate::drift::Discrepancy;
use crate::engine::CorrectedBatch;
use crate::record::{Batch, Record};
use crate::schema::{display_label, export_columns, Column};

/// Corrected report in template layout, or with display labels and without
/// the internal calculation columns when `labels` is set.
pub fn corrected_to_csv(batch: &CorrectedBatch, labels: bool) -> Result<String> {
    write_records(batch.iter().map(|p| &p.record), labels)
}

pub fn batch_to_csv(batch: &Batch) -> Result<String> {
    write_records(batch.iter(), false)
}

fn write_records<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    labels: bool,
) -> Result<String> {
    let columns = if labels {
        export_columns()
    } else {
        Column::ALL.to_vec()
    };
    let mut writer = csv::Writer::from_writer(vec![]);
    if labels {
        writer.write_record(columns.iter().map(|c| display_label(*c)))?;
    } else {
        writer.write_record(columns.iter().map(|c| c.header()))?;
    }
    for record in records {
        writer.write_record(columns.iter().map(|c| record.text(*c)))?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn template_to_csv() -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(Column::headers())?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn discrepancies_to_csv(discrepancies: &[Discrepancy]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        Column::Name.header(),
        Column::BagLotNo.header(),
        "field",
        "original_value",
        "corrected_value",
    ])?;
    for d in discrepancies {
        writer.write_record([
            d.name.clone(),
            d.bag_lot_no.clone(),
            d.field.to_string(),
            d.original_value.clone(),
            d.corrected_value.clone(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
