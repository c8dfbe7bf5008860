pub mod differ;
pub mod summary;

pub use differ::{build_discrepancies, canonical_text, Discrepancy};
pub use summary::{summarize, DriftSummary, FieldCorrections};
