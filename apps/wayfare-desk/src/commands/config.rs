//! # Config Commands
//!
//! Retrieves host configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current host configuration.
///
/// ## When Used
/// - Session startup (currency display, page size)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
