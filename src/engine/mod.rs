//! The rule engine: recomputes the seven derived fields of every record.
//!
//! Fields are evaluated in a fixed order and each step reads only upstream
//! columns plus the values already corrected earlier in the same pass. The
//! stored derived columns of the input are never consulted, so stale values
//! cannot leak into later rules.

pub mod activity;
pub mod eta;
pub mod grouping;
pub mod rules;
pub mod truck;

use std::any::Any;
use std::fmt::{Display, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::info;

use crate::record::{Batch, FieldValue, Record};
use crate::schema::Column;

pub use eta::{RouteType, Stage};
pub use rules::{Rule, RowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedField {
    OffloadingTruckId,
    LiveCurrentActivity,
    LiveCurrentActivity1,
    LiveCurrentActivity2,
    RouteBagEtaCalc,
    EstPrnReceivedDate,
    EstPrnReceiveDateGrouped,
}

impl DerivedField {
    pub const ALL: [DerivedField; 7] = [
        DerivedField::OffloadingTruckId,
        DerivedField::LiveCurrentActivity,
        DerivedField::LiveCurrentActivity1,
        DerivedField::LiveCurrentActivity2,
        DerivedField::RouteBagEtaCalc,
        DerivedField::EstPrnReceivedDate,
        DerivedField::EstPrnReceiveDateGrouped,
    ];

    pub fn column(&self) -> Column {
        match self {
            Self::OffloadingTruckId => Column::OffloadingTruckId,
            Self::LiveCurrentActivity => Column::LiveCurrentActivity,
            Self::LiveCurrentActivity1 => Column::LiveCurrentActivity1,
            Self::LiveCurrentActivity2 => Column::LiveCurrentActivity2,
            Self::RouteBagEtaCalc => Column::RouteBagEtaCalc,
            Self::EstPrnReceivedDate => Column::EstPrnReceivedDate,
            Self::EstPrnReceiveDateGrouped => Column::EstPrnReceiveDateGrouped,
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::EstPrnReceivedDate)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::RouteBagEtaCalc)
    }
}

impl Display for DerivedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column().header())
    }
}

#[derive(Debug, Error)]
#[error("unknown derived field: {0}")]
pub struct DerivedFieldParseError(pub String);

impl FromStr for DerivedField {
    type Err = DerivedFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|field| field.column().header() == normalized)
            .ok_or_else(|| DerivedFieldParseError(s.to_string()))
    }
}

impl Serialize for DerivedField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column().header())
    }
}

impl<'de> Deserialize<'de> for DerivedField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedValues {
    pub offloading_truck_id: String,
    pub live_current_activity: String,
    pub live_current_activity_1: String,
    pub live_current_activity_2: String,
    pub route_bag_eta_calc: f64,
    pub est_prn_received_date: Option<NaiveDate>,
    pub est_prn_receive_date_grouped: String,
}

impl DerivedValues {
    pub fn get(&self, field: DerivedField) -> FieldValue {
        match field {
            DerivedField::OffloadingTruckId => FieldValue::text(&self.offloading_truck_id),
            DerivedField::LiveCurrentActivity => FieldValue::text(&self.live_current_activity),
            DerivedField::LiveCurrentActivity1 => FieldValue::text(&self.live_current_activity_1),
            DerivedField::LiveCurrentActivity2 => FieldValue::text(&self.live_current_activity_2),
            DerivedField::RouteBagEtaCalc => FieldValue::Number(self.route_bag_eta_calc),
            DerivedField::EstPrnReceivedDate => self.est_prn_received_date.into(),
            DerivedField::EstPrnReceiveDateGrouped => {
                FieldValue::text(&self.est_prn_receive_date_grouped)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("record {index} ({name}) failed: {message}")]
    RecordFailed {
        index: usize,
        name: String,
        message: String,
    },
}

/// A record with its derived columns overwritten, plus the corrected values
/// kept apart for diffing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRecord {
    pub record: Record,
    pub corrected: DerivedValues,
}

impl ProcessedRecord {
    pub fn new(mut record: Record, corrected: DerivedValues) -> Self {
        for field in DerivedField::ALL {
            record.set(field.column(), corrected.get(field));
        }
        Self { record, corrected }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrectedBatch {
    pub records: Vec<ProcessedRecord>,
}

impl CorrectedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessedRecord> {
        self.records.iter()
    }

    pub fn to_batch(&self) -> Batch {
        self.records.iter().map(|p| p.record.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    today: NaiveDate,
    parallel: bool,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl RuleEngine {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn derive(&self, record: &Record) -> DerivedValues {
        let mut derived = DerivedValues {
            offloading_truck_id: truck::offloading_truck_id(record),
            ..DerivedValues::default()
        };

        let value = activity::live_current_activity(&RowView::new(record, &derived));
        derived.live_current_activity = value;
        let value = activity::live_current_activity_1(&RowView::new(record, &derived));
        derived.live_current_activity_1 = value;
        let value = activity::live_current_activity_2(&RowView::new(record, &derived));
        derived.live_current_activity_2 = value;

        let stage = Stage::classify(&RowView::new(record, &derived));
        derived.route_bag_eta_calc = eta::route_bag_eta(stage, record);
        derived.est_prn_received_date =
            eta::estimated_prn_date(record, stage, derived.route_bag_eta_calc);

        let grouped = grouping::grouped_receive_date(
            &RowView::new(record, &derived),
            stage,
            derived.route_bag_eta_calc,
            derived.est_prn_received_date,
            self.today,
        );
        derived.est_prn_receive_date_grouped = grouped;
        derived
    }

    /// Processes every record independently. Output order matches input
    /// order; a panic in any record fails the whole batch.
    pub fn process(&self, batch: &Batch) -> Result<CorrectedBatch, EngineError> {
        info!(
            rows = batch.len(),
            parallel = self.parallel,
            today = %self.today,
            "processing batch"
        );
        let records = if self.parallel {
            batch
                .records
                .par_iter()
                .enumerate()
                .map(|(index, record)| self.process_record(index, record))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            batch
                .records
                .iter()
                .enumerate()
                .map(|(index, record)| self.process_record(index, record))
                .collect::<Result<Vec<_>, _>>()?
        };
        info!(rows = records.len(), "batch processed");
        Ok(CorrectedBatch { records })
    }

    fn process_record(
        &self,
        index: usize,
        record: &Record,
    ) -> Result<ProcessedRecord, EngineError> {
        let derived = catch_unwind(AssertUnwindSafe(|| self.derive(record))).map_err(|panic| {
            EngineError::RecordFailed {
                index,
                name: record.text(Column::Name),
                message: panic_message(panic.as_ref()),
            }
        })?;
        Ok(ProcessedRecord::new(record.clone(), derived))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
