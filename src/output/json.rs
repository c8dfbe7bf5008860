use anyhow::Result;
use serde::Serialize;

use crate::drift::{Discrepancy, DriftSummary};
use crate::schema::Column;

#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub summary: DriftSummary,
    pub discrepancies: Vec<Discrepancy>,
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_template_json() -> Result<String> {
    render_json(&Column::ALL[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::summarize;
    use crate::engine::DerivedField;

    #[test]
    fn report_serializes_field_headers() {
        let discrepancies = vec![Discrepancy {
            name: "BAG-1".to_string(),
            bag_lot_no: "LOT-1".to_string(),
            field: DerivedField::RouteBagEtaCalc,
            original_value: "38".to_string(),
            corrected_value: "51".to_string(),
        }];
        let report = ProcessReport {
            summary: summarize(1, &DerivedField::ALL, &discrepancies),
            discrepancies,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&report).expect("json")).expect("parse");
        assert_eq!(value["summary"]["corrections"], 1);
        assert_eq!(value["discrepancies"][0]["field"], "ROUTE_BAG_ETA_CALC");
        assert_eq!(value["summary"]["per_field"][4]["field"], "ROUTE_BAG_ETA_CALC");
    }

    #[test]
    fn template_renders_headers_in_order() {
        let value: serde_json::Value =
            serde_json::from_str(&render_template_json().expect("json")).expect("parse");
        let headers = value.as_array().expect("array");
        assert_eq!(headers.len(), 63);
        assert_eq!(headers[0], "name");
        assert_eq!(headers[1], "BAG_LOT_NO_BAG_MIRROR");
    }
}
