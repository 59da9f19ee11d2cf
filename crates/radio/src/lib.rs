//! Network stack boundary for the uplink supervisor.
//!
//! Wraps the device radio behind the [`Radio`] trait and carries the
//! stateless pieces around it: station event payloads, access-point and
//! station configuration, stack bring-up, and the operator-facing mode
//! switches. Nothing here tracks connection state; that belongs to the
//! station supervisor.

pub mod ap;
pub mod bring_up;
pub mod error;
pub mod mode;
pub mod radio;
pub mod sim;
pub mod sta;
pub mod types;

pub use bring_up::{HOSTNAME_MAX_LEN, bring_up};
pub use error::RadioError;
pub use mode::{access_point_off, access_point_on, toggle_access_point};
pub use radio::Radio;
pub use sim::SimRadio;
pub use types::{
    AccessPointConfig, AuthMode, DisconnectInfo, DisconnectReason, NetworkConfig, StationConfig,
    StationEvent, WifiMode,
};
