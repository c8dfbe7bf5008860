use tracing::info;

use crate::drift::{build_discrepancies, summarize};
use crate::engine::{CorrectedBatch, DerivedField, EngineError, RuleEngine};
use crate::output::ProcessReport;
use crate::record::Batch;

#[derive(Debug, Clone)]
pub struct ReportRun {
    pub corrected: CorrectedBatch,
    pub report: ProcessReport,
}

pub fn run_report(
    engine: &RuleEngine,
    batch: &Batch,
    fields: &[DerivedField],
) -> Result<ReportRun, EngineError> {
    let corrected = engine.process(batch)?;
    let discrepancies = build_discrepancies(batch, &corrected, fields);
    let summary = summarize(batch.len(), fields, &discrepancies);
    info!(
        rows = summary.total_rows,
        corrections = summary.corrections,
        affected = summary.affected_names,
        "drift report ready"
    );
    Ok(ReportRun {
        corrected,
        report: ProcessReport {
            summary,
            discrepancies,
        },
    })
}
