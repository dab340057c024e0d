//! Process exit codes. Part of the CLI contract.

use microscope_core::errors::{ConfigError, DashboardError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_COMMAND_FAILED: i32 = 1; // store, classifier or filesystem failure
pub const EXIT_CONFIG_ERROR: i32 = 2; // bad flags, filters, catalog names or backend

pub fn for_error(e: &anyhow::Error) -> i32 {
    if e.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }
    match e.downcast_ref::<DashboardError>() {
        Some(DashboardError::Io { .. }) | None => EXIT_COMMAND_FAILED,
        Some(_) => EXIT_CONFIG_ERROR,
    }
}
