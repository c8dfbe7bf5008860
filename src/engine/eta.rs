use std::fmt::{Display, Formatter};

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::engine::activity::{
    DIRECT, FIRST_LEG, IN_STOCK_MEGA_TERMINAL, IN_STOCK_PORT, IN_STOCK_ZAMBIA, LOADED_EXPORT,
    LOADED_SHUNT_TRUCK, LOADED_ZAMBIA, SAILED, SECOND_LEG,
};
use crate::engine::rules::RowView;
use crate::record::{calendar_date, Record};
use crate::schema::Column;

pub const INDIRECT_TRANSIT_DAYS: u32 = 51;
pub const DIRECT_TRANSIT_DAYS: u32 = 38;
pub const FIRST_LEG_DAYS: u32 = 39;
pub const DIRECT_LEG_DAYS: u32 = 26;
pub const ZAMBIA_TO_PORT_DAYS: u32 = 15;
pub const OFFLOAD_DAYS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Direct,
    Indirect,
    Other,
}

impl RouteType {
    pub fn of(record: &Record) -> Self {
        if record.equals(Column::RouteType, "INDIRECT") {
            Self::Indirect
        } else if record.equals(Column::RouteType, "DIRECT") {
            Self::Direct
        } else {
            Self::Other
        }
    }

    pub fn full_transit_days(self) -> u32 {
        match self {
            Self::Indirect => INDIRECT_TRANSIT_DAYS,
            Self::Direct => DIRECT_TRANSIT_DAYS,
            Self::Other => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ArrivedAtPort,
    MegaTerminalStock,
    AwaitingOffload,
    SecondLeg,
    LoadedZambia,
    StockZambia,
    FirstLeg,
    DirectTransit,
    LoadedExport,
    LoadedShunt,
    Unclassified,
}

impl Stage {
    /// Classifies a row from its corrected activity fields. First match wins.
    pub fn classify(row: &RowView<'_>) -> Self {
        let activity = row.activity();
        let activity_1 = row.activity_1();
        if row.present(Column::PrnReceivedDate) || activity == SAILED || activity == IN_STOCK_PORT
        {
            Self::ArrivedAtPort
        } else if activity == IN_STOCK_MEGA_TERMINAL {
            Self::MegaTerminalStock
        } else if activity_1.starts_with("Arrived ") && activity_1.ends_with(" Not Offloaded") {
            Self::AwaitingOffload
        } else if activity_1 == SECOND_LEG {
            Self::SecondLeg
        } else if activity == LOADED_ZAMBIA {
            Self::LoadedZambia
        } else if activity == IN_STOCK_ZAMBIA {
            Self::StockZambia
        } else if activity_1 == FIRST_LEG {
            Self::FirstLeg
        } else if activity_1 == DIRECT {
            Self::DirectTransit
        } else if activity == LOADED_EXPORT {
            Self::LoadedExport
        } else if activity == LOADED_SHUNT_TRUCK {
            Self::LoadedShunt
        } else {
            Self::Unclassified
        }
    }

    pub fn eta_days(self, route: RouteType) -> u32 {
        match self {
            Self::ArrivedAtPort | Self::Unclassified => 0,
            Self::MegaTerminalStock | Self::LoadedExport | Self::LoadedShunt => {
                route.full_transit_days()
            }
            Self::AwaitingOffload => OFFLOAD_DAYS,
            Self::SecondLeg | Self::LoadedZambia | Self::StockZambia => ZAMBIA_TO_PORT_DAYS,
            Self::FirstLeg => FIRST_LEG_DAYS,
            Self::DirectTransit => DIRECT_LEG_DAYS,
        }
    }

    /// The timestamp the estimate counts from. `None` for stages without an
    /// estimate.
    pub fn base_column(self) -> Option<Column> {
        match self {
            Self::ArrivedAtPort | Self::MegaTerminalStock | Self::Unclassified => None,
            Self::AwaitingOffload => Some(Column::PrnArrivalDate),
            Self::SecondLeg => Some(Column::GdnDispatchDate),
            Self::LoadedZambia => Some(Column::GdnLoadedDate),
            Self::StockZambia => Some(Column::GrnReceivedDate),
            Self::FirstLeg | Self::DirectTransit => Some(Column::BagExportTs),
            Self::LoadedExport => Some(Column::MineLoadingTsExport),
            Self::LoadedShunt => Some(Column::MineLoadingTs),
        }
    }

    /// Settled stages carry no estimated date and keep the activity as their
    /// grouped label.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::ArrivedAtPort | Self::MegaTerminalStock)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::ArrivedAtPort => "arrived_at_port",
            Self::MegaTerminalStock => "mega_terminal_stock",
            Self::AwaitingOffload => "awaiting_offload",
            Self::SecondLeg => "second_leg",
            Self::LoadedZambia => "loaded_zambia",
            Self::StockZambia => "stock_zambia",
            Self::FirstLeg => "first_leg",
            Self::DirectTransit => "direct_transit",
            Self::LoadedExport => "loaded_export",
            Self::LoadedShunt => "loaded_shunt",
            Self::Unclassified => "unclassified",
        };
        write!(f, "{label}")
    }
}

pub fn route_bag_eta(stage: Stage, record: &Record) -> f64 {
    f64::from(stage.eta_days(RouteType::of(record)))
}

pub fn estimated_prn_date(record: &Record, stage: Stage, eta_days: f64) -> Option<NaiveDate> {
    let column = stage.base_column()?;
    let base = match calendar_date(record.get(column)) {
        Some(date) => date,
        None => {
            debug!(
                name = %record.text(Column::Name),
                stage = %stage,
                column = column.header(),
                value = %record.get(column),
                "no usable base date for arrival estimate"
            );
            return None;
        }
    };
    // eta_days always comes from whole-day table values
    base.checked_add_days(Days::new(eta_days.max(0.0) as u64))
}
