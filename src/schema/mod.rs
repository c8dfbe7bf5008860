pub mod columns;
pub mod labels;
pub mod validate;

pub use columns::{Column, COLUMN_COUNT};
pub use labels::{display_label, export_columns, INTERNAL_COLUMNS};
pub use validate::{validate_columns, PositionMismatch, SchemaError};
