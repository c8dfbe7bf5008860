use tracing::trace;

use crate::engine::{DerivedField, DerivedValues};
use crate::record::Record;
use crate::schema::Column;

/// Read access to one record plus the derived values already corrected
/// earlier in the chain. Derived columns are never read from the record.
pub struct RowView<'a> {
    pub record: &'a Record,
    derived: &'a DerivedValues,
}

impl<'a> RowView<'a> {
    pub fn new(record: &'a Record, derived: &'a DerivedValues) -> Self {
        Self { record, derived }
    }

    pub fn present(&self, column: Column) -> bool {
        self.record.is_present(column)
    }

    pub fn null(&self, column: Column) -> bool {
        self.record.is_null(column)
    }

    pub fn is(&self, column: Column, literal: &str) -> bool {
        self.record.equals(column, literal)
    }

    pub fn text(&self, column: Column) -> String {
        self.record.text(column)
    }

    pub fn title(&self, column: Column) -> String {
        self.record.title(column)
    }

    pub fn name_contains(&self, marker: &str) -> bool {
        self.record.text(Column::Name).contains(marker)
    }

    pub fn activity(&self) -> &str {
        &self.derived.live_current_activity
    }

    pub fn activity_1(&self) -> &str {
        &self.derived.live_current_activity_1
    }
}

pub type Predicate = fn(&RowView<'_>) -> bool;
pub type Output = fn(&RowView<'_>) -> String;

/// One branch of a cascade: when `when` holds, the field becomes `then`.
pub struct Rule {
    pub name: &'static str,
    pub when: Predicate,
    pub then: Output,
}

impl Rule {
    pub fn new(name: &'static str, when: Predicate, then: Output) -> Self {
        Self { name, when, then }
    }
}

pub fn first_match<'r>(rules: &'r [Rule], row: &RowView<'_>) -> Option<&'r Rule> {
    rules.iter().find(|rule| (rule.when)(row))
}

/// Runs a cascade top-down; the first matching rule wins and no match yields
/// the empty string.
pub fn evaluate_cascade(field: DerivedField, rules: &[Rule], row: &RowView<'_>) -> String {
    match first_match(rules, row) {
        Some(rule) => {
            trace!(field = %field, rule = rule.name, "cascade matched");
            (rule.then)(row)
        }
        None => {
            trace!(field = %field, "no cascade rule matched");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<Rule> {
        vec![
            Rule::new("exported", |r| r.present(Column::BagExportTs), |_| {
                "first".to_string()
            }),
            Rule::new("indirect", |r| r.is(Column::RouteType, "INDIRECT"), |_| {
                "second".to_string()
            }),
        ]
    }

    #[test]
    fn earlier_rule_wins_when_several_match() {
        let record = Record::default()
            .with(Column::BagExportTs, "2025-01-01")
            .with(Column::RouteType, "INDIRECT");
        let derived = DerivedValues::default();
        let view = RowView::new(&record, &derived);
        let table = rules();
        assert_eq!(first_match(&table, &view).map(|r| r.name), Some("exported"));
        assert_eq!(
            evaluate_cascade(DerivedField::LiveCurrentActivity, &table, &view),
            "first"
        );
    }

    #[test]
    fn no_match_yields_empty_string() {
        let record = Record::default();
        let derived = DerivedValues::default();
        let view = RowView::new(&record, &derived);
        assert_eq!(
            evaluate_cascade(DerivedField::LiveCurrentActivity, &rules(), &view),
            ""
        );
    }
}
