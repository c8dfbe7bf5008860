pub mod dates;
pub mod ingest;
pub mod value;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::{Column, COLUMN_COUNT};

pub use dates::{calendar_date, date_key, parse_date_text};
pub use ingest::{read_batch, read_batch_from_path, read_batch_from_str, IngestError};
pub use value::{title_case, FieldValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            values: vec![FieldValue::Null; COLUMN_COUNT],
        }
    }
}

impl Record {
    /// Builds a record from cells in template order. Returns `None` when the
    /// cell count does not match the template.
    pub fn from_values(values: Vec<FieldValue>) -> Option<Self> {
        (values.len() == COLUMN_COUNT).then_some(Self { values })
    }

    pub fn with(mut self, column: Column, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: Column) -> &FieldValue {
        &self.values[column.index()]
    }

    pub fn set(&mut self, column: Column, value: impl Into<FieldValue>) {
        self.values[column.index()] = value.into();
    }

    pub fn is_null(&self, column: Column) -> bool {
        self.get(column).is_null()
    }

    pub fn is_present(&self, column: Column) -> bool {
        !self.is_null(column)
    }

    pub fn text(&self, column: Column) -> String {
        self.get(column).to_string()
    }

    pub fn title(&self, column: Column) -> String {
        title_case(&self.text(column))
    }

    /// Exact match of a text cell against a literal. Null never matches.
    pub fn equals(&self, column: Column, literal: &str) -> bool {
        self.get(column).as_text() == Some(literal)
    }

    pub fn identity(&self) -> BagIdentity {
        BagIdentity {
            name: self.text(Column::Name),
            bag_lot_no: self.text(Column::BagLotNo),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (Column, &FieldValue)> {
        Column::ALL.iter().copied().zip(self.values.iter())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (column, value) in self.cells() {
            map.serialize_entry(column.header(), value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BagIdentity {
    pub name: String,
    pub bag_lot_no: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub records: Vec<Record>,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl FromIterator<Record> for Batch {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
