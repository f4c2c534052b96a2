pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, DashboardConfig};

pub use adapters::SqliteSource;
pub use core::{dashboard::Dashboard, engine::ExportEngine, filters::FilterSet, pipeline::ExportPipeline};
pub use server::{create_router, AppState};
pub use utils::error::{DashError, Result};
