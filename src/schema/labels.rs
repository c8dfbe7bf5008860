use crate::schema::columns::Column;

/// Calculation columns that never leave the tool in the labelled export.
pub const INTERNAL_COLUMNS: [Column; 2] = [Column::BagLotNoFinal, Column::RouteBagEtaCalc];

/// Human-facing header used in the labelled export. Columns without a
/// dedicated label keep their template header.
pub fn display_label(column: Column) -> &'static str {
    match column {
        Column::Name => "Bag ID",
        Column::BagLotNo => "Lot Number",
        Column::MegaBagLotNo => "Mega Bag Lot Number",
        Column::KicoMineLoadingMonth => "Mine Loading Month",
        Column::ExportMineLoadingMonth => "Export Loading Month",
        Column::BagExportMonth => "Export Month",
        Column::BagPrnMonth => "Port Received Month",
        Column::TruckType => "Truck Type",
        Column::SubBuyer => "Sub Buyer",
        Column::TruckLoadingPoint => "Truck Loading Point",
        Column::LspName => "Logistics Provider",
        Column::RouteType => "Route Type",
        Column::BagFlagStatus => "Flag Status",
        Column::BagFlagStatusDetail => "Flag Status Detail",
        Column::LiveCurrentActivity => "Current Activity",
        Column::LiveCurrentActivity1 => "Current Activity (Detail)",
        Column::LiveCurrentActivity2 => "Current Activity (Location)",
        Column::EstPrnReceivedDate => "Est. Port Received Date",
        Column::EstPrnReceiveDateGrouped => "Est. Port Received Window",
        Column::OffloadingTruckId => "Offloading Truck / Wagon",
        Column::BagGrossWetInclSampleWmt => "Gross Wet incl. Sample (WMT)",
        Column::BagGrossExclSampleWmt => "Gross excl. Sample (WMT)",
        Column::BagNetExclSampleWmt => "Net excl. Sample (WMT)",
        Column::BagGrossWetInclSampleKg => "Gross Wet incl. Sample (KG)",
        Column::BagGrossExclSampleKg => "Gross excl. Sample (KG)",
        Column::DrcNetWeightExclSampleKg => "DRC Net excl. Sample (KG)",
        Column::MineLoadingTs => "Mine Loading Time",
        Column::MineLoadingTsExport => "Export Truck Loading Time",
        Column::PolytraArrivalTs => "Polytra Arrival Time",
        Column::PolytraExitTs => "Polytra Exit Time",
        Column::MineExitTs => "Mine Exit Time",
        Column::ShuntTruckOffloadTs => "Shunt Truck Offload Time",
        Column::BagExportTs => "Export Time",
        Column::RouteConsignee1 => "Zambia Consignee",
        Column::GrnGrossWeight => "GRN Gross Weight",
        Column::GrnNetWeight => "GRN Net Weight",
        Column::GrnWarehouseName => "Zambia Warehouse",
        Column::GrnReceivedDate => "GRN Received Date",
        Column::GdnLoadedDate => "GDN Loaded Date",
        Column::GdnDispatchDate => "GDN Dispatch Date",
        Column::PrnArrivalDate => "Port Arrival Date",
        Column::RoutePortWarehouse => "Planned Port Warehouse",
        Column::PrnWarehouseName => "Port Warehouse",
        Column::RoutePortDestination => "Port Destination",
        Column::RouteFinalDestination => "Final Destination",
        Column::PrnGrossWeight => "PRN Gross Weight",
        Column::PrnNetWeight => "PRN Net Weight",
        Column::PrnReceivedDate => "Port Received Date",
        Column::PdnLoadedDate => "PDN Loaded Date",
        Column::PdnDispatchDate => "PDN Dispatch Date",
        Column::PdnBcNumber => "BC Number",
        Column::PdnVesselName => "Vessel",
        Column::ExportTruckId => "Export Truck",
        Column::ShuntTruckId => "Shunt Truck",
        Column::DrcWagonId => "DRC Wagon",
        Column::WagonTrainNo => "Train Number",
        Column::ZamTruckId => "Zambia Truck",
        Column::BagSealNo => "Seal Number",
        Column::DmsApprovalStatus => "DMS Approval Status",
        Column::FinalIncoterm => "Incoterm",
        Column::StockComments => "Stock Comments",
        Column::BagLotNoFinal | Column::RouteBagEtaCalc => column.header(),
    }
}

pub fn export_columns() -> Vec<Column> {
    Column::ALL
        .iter()
        .copied()
        .filter(|c| !INTERNAL_COLUMNS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_drops_internal_columns() {
        let columns = export_columns();
        assert_eq!(columns.len(), Column::ALL.len() - INTERNAL_COLUMNS.len());
        assert!(!columns.contains(&Column::RouteBagEtaCalc));
        assert_eq!(columns[0], Column::Name);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = export_columns().into_iter().map(display_label).collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }
}
