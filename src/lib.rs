pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, Settings};

pub use crate::adapters::{console::ConsolePresenter, http::HttpJobBackend, vehicle_store::VehicleStore};
pub use crate::core::{
    aggregator::{GroupingMode, ResultAggregator},
    engine::LookupEngine,
    report::ReportExporter,
};
pub use crate::domain::model::{AggregatedVehicle, AggregatedView, AveragePrice, Vehicle};
pub use crate::utils::error::{LookupError, Result};
