use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::drift::{Discrepancy, DriftSummary};
use crate::engine::CorrectedBatch;
use crate::schema::Column;

const PREVIEW_COLUMNS: [Column; 5] = [
    Column::Name,
    Column::BagLotNo,
    Column::LiveCurrentActivity,
    Column::LiveCurrentActivity1,
    Column::LiveCurrentActivity2,
];

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

pub fn render_discrepancy_table(discrepancies: &[Discrepancy]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Name", "Lot", "Field", "Original", "Corrected"]);
    for d in discrepancies {
        table.add_row(Row::from(vec![
            Cell::new(&d.name),
            Cell::new(&d.bag_lot_no),
            Cell::new(d.field.to_string()),
            Cell::new(or_dash(&d.original_value)).fg(Color::Red),
            Cell::new(or_dash(&d.corrected_value)).fg(Color::Green),
        ]));
    }
    table.to_string()
}

pub fn render_summary_table(summary: &DriftSummary) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total rows".to_string(), summary.total_rows.to_string()]);
    table.add_row(vec![
        "Corrections".to_string(),
        summary.corrections.to_string(),
    ]);
    table.add_row(vec![
        "Correction rate".to_string(),
        format!("{:.1}%", summary.correction_rate),
    ]);
    table.add_row(vec![
        "Affected bags".to_string(),
        summary.affected_names.to_string(),
    ]);

    let mut breakdown = new_table();
    breakdown.set_header(vec!["Field", "Corrections"]);
    for entry in &summary.per_field {
        breakdown.add_row(vec![entry.field.to_string(), entry.corrections.to_string()]);
    }
    format!("{table}\n{breakdown}")
}

pub fn render_preview_table(batch: &CorrectedBatch, limit: usize) -> String {
    let mut table = new_table();
    table.set_header(PREVIEW_COLUMNS.iter().map(|c| c.header()).collect::<Vec<_>>());
    for processed in batch.iter().take(limit) {
        table.add_row(
            PREVIEW_COLUMNS
                .iter()
                .map(|c| processed.record.text(*c))
                .collect::<Vec<_>>(),
        );
    }
    table.to_string()
}

pub fn render_template_table() -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Column"]);
    for (idx, column) in Column::ALL.iter().enumerate() {
        table.add_row(vec![(idx + 1).to_string(), column.header().to_string()]);
    }
    table.to_string()
}
