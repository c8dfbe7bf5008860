pub mod csv;
pub mod json;
pub mod table;

pub use self::csv::{batch_to_csv, corrected_to_csv, discrepancies_to_csv, template_to_csv};
pub use json::{render_json, render_template_json, ProcessReport};
pub use table::{
    render_discrepancy_table, render_preview_table, render_summary_table, render_template_table,
};
