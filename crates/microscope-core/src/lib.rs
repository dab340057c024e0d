pub mod cache;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod errors;
pub mod manager;
pub mod model;
pub mod shaper;
pub mod storage;

pub use errors::DashboardError;
pub use manager::{ClassificationManager, ClassificationReport, RecordStore};
pub use model::{DisplayRecord, Label, Record, RowLimit, Source, Variant};
pub use shaper::DashboardQuery;
