use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::engine::eta::Stage;
use crate::engine::rules::RowView;
use crate::schema::Column;

pub const RED_FLAG: &str = "Red Flag";
pub const INVESTIGATE: &str = "Investigate";
const NORMAL_CARGO: &str = "Normal Cargo";

/// Half-month reporting window label for an estimated receive date, e.g.
/// `1 - 15 March 2025` or `16 - 31 March 2025`.
pub fn half_month_window(date: NaiveDate) -> String {
    let month_year = date.format("%B %Y");
    if date.day() <= 15 {
        format!("1 - 15 {month_year}")
    } else {
        format!("16 - {} {month_year}", last_day_of_month(date))
    }
}

pub fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn grouped_receive_date(
    row: &RowView<'_>,
    stage: Stage,
    eta_days: f64,
    estimated: Option<NaiveDate>,
    today: NaiveDate,
) -> String {
    if stage.is_settled() {
        return row.activity().to_string();
    }
    if !row.is(Column::BagFlagStatus, NORMAL_CARGO) {
        return RED_FLAG.to_string();
    }
    let Some(date) = estimated else {
        if eta_days > 0.0 {
            debug!(
                name = %row.text(Column::Name),
                stage = %stage,
                eta_days,
                "transit time known but no estimated date; keeping activity as group"
            );
        }
        return row.activity().to_string();
    };
    if date < today {
        INVESTIGATE.to_string()
    } else {
        half_month_window(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DerivedValues;
    use crate::record::Record;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn normal_cargo() -> Record {
        Record::default().with(Column::BagFlagStatus, NORMAL_CARGO)
    }

    fn derived(activity: &str) -> DerivedValues {
        DerivedValues {
            live_current_activity: activity.to_string(),
            ..DerivedValues::default()
        }
    }

    #[test]
    fn buckets_by_half_month() {
        assert_eq!(half_month_window(ymd(2025, 3, 10)), "1 - 15 March 2025");
        assert_eq!(half_month_window(ymd(2025, 3, 15)), "1 - 15 March 2025");
        assert_eq!(half_month_window(ymd(2025, 3, 20)), "16 - 31 March 2025");
        assert_eq!(half_month_window(ymd(2025, 2, 20)), "16 - 28 February 2025");
        assert_eq!(half_month_window(ymd(2024, 2, 20)), "16 - 29 February 2024");
        assert_eq!(half_month_window(ymd(2025, 4, 16)), "16 - 30 April 2025");
        assert_eq!(half_month_window(ymd(2025, 12, 31)), "16 - 31 December 2025");
    }

    #[test]
    fn settled_stages_echo_activity() {
        let record = Record::default();
        let values = derived("Sailed");
        let row = RowView::new(&record, &values);
        let label = grouped_receive_date(&row, Stage::ArrivedAtPort, 0.0, None, ymd(2025, 3, 1));
        assert_eq!(label, "Sailed");
    }

    #[test]
    fn flagged_cargo_is_red_flag() {
        let today = ymd(2025, 3, 1);
        let values = derived("En-Route");
        for record in [
            Record::default(),
            Record::default().with(Column::BagFlagStatus, "Quality Hold"),
        ] {
            let row = RowView::new(&record, &values);
            let label =
                grouped_receive_date(&row, Stage::FirstLeg, 39.0, Some(ymd(2025, 3, 20)), today);
            assert_eq!(label, RED_FLAG);
        }
    }

    #[test]
    fn past_estimate_needs_investigation() {
        let record = normal_cargo();
        let values = derived("En-Route");
        let row = RowView::new(&record, &values);
        let today = ymd(2025, 3, 1);
        assert_eq!(
            grouped_receive_date(&row, Stage::FirstLeg, 39.0, Some(ymd(2025, 2, 28)), today),
            INVESTIGATE
        );
        assert_eq!(
            grouped_receive_date(&row, Stage::FirstLeg, 39.0, Some(today), today),
            "1 - 15 March 2025"
        );
    }

    #[test]
    fn missing_estimate_keeps_activity() {
        let record = normal_cargo();
        let values = derived("Loaded (Export)");
        let row = RowView::new(&record, &values);
        let label = grouped_receive_date(&row, Stage::LoadedExport, 51.0, None, ymd(2025, 3, 1));
        assert_eq!(label, "Loaded (Export)");
    }
}
