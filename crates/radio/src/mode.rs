//! Operator mode switches for the access point.
//!
//! Stateless: each call reads or writes the radio mode and nothing else.
//! The station retry machine is never involved.

use tracing::info;

use crate::error::RadioError;
use crate::radio::Radio;
use crate::types::WifiMode;

/// Flips the access point: dual mode becomes station-only and anything
/// else becomes dual mode. Returns the mode that was set.
pub fn toggle_access_point(radio: &dyn Radio) -> Result<WifiMode, RadioError> {
    if radio.mode()? == WifiMode::Dual {
        access_point_off(radio)?;
        Ok(WifiMode::StationOnly)
    } else {
        access_point_on(radio)?;
        Ok(WifiMode::Dual)
    }
}

/// Forces dual mode.
pub fn access_point_on(radio: &dyn Radio) -> Result<(), RadioError> {
    info!("access point on");
    radio.set_mode(WifiMode::Dual)
}

/// Forces station-only mode.
pub fn access_point_off(radio: &dyn Radio) -> Result<(), RadioError> {
    info!("access point off");
    radio.set_mode(WifiMode::StationOnly)
}
