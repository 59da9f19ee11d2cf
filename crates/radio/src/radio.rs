//! The [`Radio`] trait: control surface of the underlying network stack.

use crate::error::RadioError;
use crate::types::{AccessPointConfig, StationConfig, WifiMode};

/// Control surface of the device radio.
///
/// Every call is a thin, non-blocking request to the stack. Outcomes of
/// `connect` arrive later as [`StationEvent`](crate::StationEvent)s, not as
/// return values.
pub trait Radio: Send + Sync {
    /// Asks the stack to associate the station interface.
    fn connect(&self) -> Result<(), RadioError>;

    /// Current operating mode.
    fn mode(&self) -> Result<WifiMode, RadioError>;

    fn set_mode(&self, mode: WifiMode) -> Result<(), RadioError>;

    fn configure_access_point(&self, config: &AccessPointConfig) -> Result<(), RadioError>;

    fn configure_station(&self, config: &StationConfig) -> Result<(), RadioError>;

    /// Starts the radio with the applied configuration.
    fn start(&self) -> Result<(), RadioError>;

    /// Sets the DHCP hostname of the station interface.
    fn set_hostname(&self, hostname: &str) -> Result<(), RadioError>;

    /// MAC address of the access-point interface.
    fn access_point_mac(&self) -> Result<[u8; 6], RadioError>;
}
