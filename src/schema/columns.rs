use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

macro_rules! template_columns {
    ($($variant:ident => $header:literal,)+) => {
        /// A column of the active bag report template, in template order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Column {
            $($variant,)+
        }

        impl Column {
            pub const ALL: [Column; COLUMN_COUNT] = [$(Column::$variant,)+];

            pub fn header(&self) -> &'static str {
                match self {
                    $(Self::$variant => $header,)+
                }
            }
        }
    };
}

pub const COLUMN_COUNT: usize = 63;

template_columns! {
    Name => "name",
    BagLotNo => "BAG_LOT_NO_BAG_MIRROR",
    MegaBagLotNo => "MEGA_BAG_LOT_NO_BAG",
    BagLotNoFinal => "BAG_LOT_NO_BAG_MIRROR_FNL",
    KicoMineLoadingMonth => "KICO_MINE_LOADING_MONTH_BAG",
    ExportMineLoadingMonth => "EXPORT_MINE_LOADING_MONTH_BAG",
    BagExportMonth => "BAG_EXPORT_MONTH",
    BagPrnMonth => "BAG_PRN_MONTH",
    TruckType => "TRUCK_TYPE_BAG_MIRROR",
    SubBuyer => "SUB_BUYER_BAG_MIRROR",
    TruckLoadingPoint => "TRUCK_LOADING_POINT_BAG_MIRROR",
    LspName => "LSP_NAME_BAG_MIRROR",
    RouteType => "ROUTE_TYPE_BAG_MIRROR",
    BagFlagStatus => "BAG_FLAG_STATUS_UPL",
    BagFlagStatusDetail => "BAG_FLAG_STATUS_DETAIL",
    LiveCurrentActivity => "LIVE_CURRENT_ACTIVITY",
    LiveCurrentActivity1 => "LIVE_CURRENT_ACTIVITY_1",
    LiveCurrentActivity2 => "LIVE_CURRENT_ACTIVITY_2",
    RouteBagEtaCalc => "ROUTE_BAG_ETA_CALC",
    EstPrnReceivedDate => "EST_PRN_RECEIVED_DATE",
    EstPrnReceiveDateGrouped => "EST_PRN_RECEIVE_DATE_GROUPED",
    OffloadingTruckId => "OFFLOADING_TRUCK_ID",
    BagGrossWetInclSampleWmt => "BAG_GROSS_WET_KG_INCL_SAMPLE_WMT",
    BagGrossExclSampleWmt => "BAG_GROSS_EXCL_SAMPLE_WMT",
    BagNetExclSampleWmt => "BAG_NET_EXCL_SAMPLE_WMT",
    BagGrossWetInclSampleKg => "BAG_GROSS_WET_KG_INCL_SAMPLE_KG",
    BagGrossExclSampleKg => "BAG_GROSS_EXCL_SAMPLE_KG",
    DrcNetWeightExclSampleKg => "DRC DATA - NET WT EXCL. SAMPLE (KG)",
    MineLoadingTs => "MINE_LOADING_TS_BAG_MIRROR",
    MineLoadingTsExport => "MINE_LOADING_TS_EXPORT_BAG_MIRROR",
    PolytraArrivalTs => "LOADED_TRUCK_POLYTRA_ARRIVAL_TS_BAG_MIRROR",
    PolytraExitTs => "LOADED_TRUCK_POLYTRA_EXIT_TS_BAG_MIRROR",
    MineExitTs => "MINE_EXIT_TS_BAG_MIRROR",
    ShuntTruckOffloadTs => "SHUNT_TRK_OFFL_TS_BAG_MIRROR",
    BagExportTs => "BAG_EXPORT_TS",
    RouteConsignee1 => "ROUTE_CONSIGNEE_1_BAG_MIRROR",
    GrnGrossWeight => "GRN_WH_GROSS_WEIGHT",
    GrnNetWeight => "GRN_WH_NET_WEIGHT",
    GrnWarehouseName => "GRN_WAREHOUSE_NAME",
    GrnReceivedDate => "GRN_RECEIVED_DATE",
    GdnLoadedDate => "GDN_LOADED_DATE",
    GdnDispatchDate => "GDN_DISPATCH_DATE",
    PrnArrivalDate => "PRN_ARRIVAL_DATE",
    RoutePortWarehouse => "ROUTE_PORT_WAREHOUSE_BAG_MIRROR",
    PrnWarehouseName => "PRN_WAREHOUSE_NAME_SCOPE_2",
    RoutePortDestination => "ROUTE_PORT_DESTINATION_BAG_MIRROR",
    RouteFinalDestination => "ROUTE_FINAL_DESTINATION_BAG_MIRROR",
    PrnGrossWeight => "PRN_WH_GROSS_WEIGHT_SCOPE_2",
    PrnNetWeight => "PRN_WH_NET_WEIGHT",
    PrnReceivedDate => "PRN_RECEIVED_DATE_SCOPE_2",
    PdnLoadedDate => "PDN_LOADED_DATE",
    PdnDispatchDate => "PDN_DISPATCH_DATE",
    PdnBcNumber => "PDN_BC_NUMBER",
    PdnVesselName => "PDN_VESSEL_NAME",
    ExportTruckId => "EXPORT_TRUCK_ID_BAG_MIRROR",
    ShuntTruckId => "SHUNT_TRUCK_ID_BAG_MIRROR",
    DrcWagonId => "DRC_WAGON_ID_BAG_MIRROR",
    WagonTrainNo => "WG_TRAIN_NO_BAG_MIRROR",
    ZamTruckId => "ZAM_TRUCK_ID_BAG_MIRROR",
    BagSealNo => "BAG_SEAL_NO",
    DmsApprovalStatus => "DMS_APPVL_PROC_STATUS_AUTO_BAG_MIRROR",
    FinalIncoterm => "FINAL_INCOTERM",
    StockComments => "STOCK_COMMENTS",
}

impl Column {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn headers() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|c| c.header())
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.header())
    }
}
