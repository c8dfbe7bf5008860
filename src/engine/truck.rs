use crate::record::Record;
use crate::schema::Column;

/// Vehicle identifiers in pick priority: Zambia truck, DRC wagon, export
/// truck, shunt truck.
pub const OFFLOADING_PRIORITY: [Column; 4] = [
    Column::ZamTruckId,
    Column::DrcWagonId,
    Column::ExportTruckId,
    Column::ShuntTruckId,
];

pub fn offloading_truck_id(record: &Record) -> String {
    OFFLOADING_PRIORITY
        .iter()
        .find(|column| record.is_present(**column))
        .map(|column| record.text(*column))
        .unwrap_or_default()
}
