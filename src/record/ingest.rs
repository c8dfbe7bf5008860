use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::record::{Batch, FieldValue, Record};
use crate::schema::{validate_columns, SchemaError, COLUMN_COUNT};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Template validation failed: {0}")]
    Schema(#[from] SchemaError),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Reads an active bag report CSV. The header must match the template
/// exactly; every data row must have one cell per template column.
pub fn read_batch<R: Read>(reader: R) -> Result<Batch, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect::<Vec<_>>();
    if let Err(err) = validate_columns(&headers) {
        warn!("template validation failed: {err}");
        return Err(err.into());
    }

    let mut records = Vec::new();
    for (idx, row) in csv_reader.records().enumerate() {
        let row = row?;
        let found = row.len();
        let values = row.iter().map(FieldValue::from_cell).collect::<Vec<_>>();
        let record = Record::from_values(values).ok_or(IngestError::RowWidth {
            row: idx + 1,
            expected: COLUMN_COUNT,
            found,
        })?;
        records.push(record);
    }

    info!(rows = records.len(), "ingested active bag report");
    Ok(Batch::new(records))
}

pub fn read_batch_from_str(data: &str) -> Result<Batch, IngestError> {
    read_batch(data.as_bytes())
}

pub fn read_batch_from_path(path: &Path) -> Result<Batch, IngestError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_batch(file)
}
