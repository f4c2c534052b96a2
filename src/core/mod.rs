pub mod aggregate;
pub mod charts;
pub mod dashboard;
pub mod engine;
pub mod filters;
pub mod pipeline;
pub mod table;

pub use crate::domain::model::{Snapshot, TransactionRow};
pub use crate::domain::ports::{ConfigProvider, DataSource, Pipeline, Storage};
pub use crate::utils::error::Result;
