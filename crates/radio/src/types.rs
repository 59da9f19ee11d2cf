//! Public types shared between the radio and the station supervisor.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Operating mode of the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    /// Radio is off.
    Off,
    /// Station only: the device joins an external network.
    StationOnly,
    /// Access point only.
    AccessPointOnly,
    /// Station and access point at the same time.
    Dual,
}

/// Authentication mode for an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Open,
    Wpa2Psk,
}

/// Access-point interface configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPointConfig {
    pub ssid: String,
    pub channel: u8,
    pub max_connections: u8,
    pub auth: AuthMode,
    pub pmf_required: bool,
}

/// Station interface configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    pub ssid: String,
    /// Empty for open networks.
    pub password: String,
    /// Weakest auth mode the station will accept when scanning.
    pub auth_threshold: AuthMode,
    pub scan_all_channels: bool,
    pub sort_by_signal: bool,
    pub pmf_capable: bool,
    pub pmf_required: bool,
    pub btm_enabled: bool,
    pub rm_enabled: bool,
}

/// Everything needed to bring the network stack up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hostname: String,
    pub ssid: String,
    /// Empty for open networks.
    pub password: String,
    /// Prefix for the generated access-point SSID.
    pub ap_prefix: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hostname: "uplink".into(),
            ssid: String::new(),
            password: String::new(),
            ap_prefix: "Uplink".into(),
        }
    }
}

/// Payload of a station-disconnected notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectInfo {
    /// Network the station was trying to reach.
    pub ssid: String,
    /// Raw reason code reported by the stack.
    pub reason: i32,
    /// Signal strength in dBm at the time of the disconnect.
    pub rssi: i32,
}

impl DisconnectInfo {
    pub fn new(ssid: impl Into<String>, reason: i32, rssi: i32) -> Self {
        Self {
            ssid: ssid.into(),
            reason,
            rssi,
        }
    }

    /// Decoded reason code.
    pub fn reason(&self) -> DisconnectReason {
        DisconnectReason::from_code(self.reason)
    }
}

/// Lifecycle notification emitted by the network stack.
///
/// Delivery is asynchronous and carries no ordering guarantee relative to
/// supervisor calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationEvent {
    /// Station interface is up.
    Started,
    /// Station lost (or failed to establish) its association.
    Disconnected(DisconnectInfo),
    /// IP configuration completed. `None` when the stack delivered no
    /// usable address.
    AddressAcquired { address: Option<Ipv4Addr> },
}

/// Decoded station disconnect reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    Unspecified,
    AuthExpire,
    AuthLeave,
    AssocExpire,
    AssocTooMany,
    FourWayHandshakeTimeout,
    GroupKeyUpdateTimeout,
    BeaconTimeout,
    NoApFound,
    AuthFail,
    AssocFail,
    HandshakeTimeout,
    ConnectionFail,
    ApTsfReset,
    Roaming,
    Other(i32),
}

impl DisconnectReason {
    pub const UNSPECIFIED: i32 = 1;
    pub const AUTH_EXPIRE: i32 = 2;
    pub const AUTH_LEAVE: i32 = 3;
    pub const ASSOC_EXPIRE: i32 = 4;
    pub const ASSOC_TOOMANY: i32 = 5;
    pub const FOUR_WAY_HANDSHAKE_TIMEOUT: i32 = 15;
    pub const GROUP_KEY_UPDATE_TIMEOUT: i32 = 16;
    pub const BEACON_TIMEOUT: i32 = 200;
    pub const NO_AP_FOUND: i32 = 201;
    pub const AUTH_FAIL: i32 = 202;
    pub const ASSOC_FAIL: i32 = 203;
    pub const HANDSHAKE_TIMEOUT: i32 = 204;
    pub const CONNECTION_FAIL: i32 = 205;
    pub const AP_TSF_RESET: i32 = 206;
    pub const ROAMING: i32 = 207;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::UNSPECIFIED => Self::Unspecified,
            Self::AUTH_EXPIRE => Self::AuthExpire,
            Self::AUTH_LEAVE => Self::AuthLeave,
            Self::ASSOC_EXPIRE => Self::AssocExpire,
            Self::ASSOC_TOOMANY => Self::AssocTooMany,
            Self::FOUR_WAY_HANDSHAKE_TIMEOUT => Self::FourWayHandshakeTimeout,
            Self::GROUP_KEY_UPDATE_TIMEOUT => Self::GroupKeyUpdateTimeout,
            Self::BEACON_TIMEOUT => Self::BeaconTimeout,
            Self::NO_AP_FOUND => Self::NoApFound,
            Self::AUTH_FAIL => Self::AuthFail,
            Self::ASSOC_FAIL => Self::AssocFail,
            Self::HANDSHAKE_TIMEOUT => Self::HandshakeTimeout,
            Self::CONNECTION_FAIL => Self::ConnectionFail,
            Self::AP_TSF_RESET => Self::ApTsfReset,
            Self::ROAMING => Self::Roaming,
            other => Self::Other(other),
        }
    }

    /// True for reasons that usually mean the credentials are wrong.
    pub fn is_auth_related(&self) -> bool {
        matches!(
            self,
            Self::AuthFail
                | Self::AuthExpire
                | Self::FourWayHandshakeTimeout
                | Self::HandshakeTimeout
        )
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "unspecified",
            Self::AuthExpire => "auth expired",
            Self::AuthLeave => "auth leave",
            Self::AssocExpire => "assoc expired",
            Self::AssocTooMany => "too many stations",
            Self::FourWayHandshakeTimeout => "4-way handshake timeout",
            Self::GroupKeyUpdateTimeout => "group key update timeout",
            Self::BeaconTimeout => "beacon timeout",
            Self::NoApFound => "no AP found",
            Self::AuthFail => "auth failed",
            Self::AssocFail => "assoc failed",
            Self::HandshakeTimeout => "handshake timeout",
            Self::ConnectionFail => "connection failed",
            Self::ApTsfReset => "AP TSF reset",
            Self::Roaming => "roaming",
            Self::Other(code) => return write!(f, "reason {code}"),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reason_codes_decode() {
        assert_eq!(DisconnectReason::from_code(202), DisconnectReason::AuthFail);
        assert_eq!(DisconnectReason::from_code(201), DisconnectReason::NoApFound);
        assert_eq!(
            DisconnectReason::from_code(15),
            DisconnectReason::FourWayHandshakeTimeout
        );
    }

    #[test]
    fn unknown_reason_code_is_preserved() {
        let reason = DisconnectReason::from_code(999);
        assert_eq!(reason, DisconnectReason::Other(999));
        assert_eq!(reason.to_string(), "reason 999");
    }

    #[test]
    fn auth_related_reasons() {
        assert!(DisconnectReason::AuthFail.is_auth_related());
        assert!(DisconnectReason::HandshakeTimeout.is_auth_related());
        assert!(!DisconnectReason::BeaconTimeout.is_auth_related());
        assert!(!DisconnectReason::Other(42).is_auth_related());
    }

    #[test]
    fn disconnect_info_decodes_reason() {
        let info = DisconnectInfo::new("home", DisconnectReason::NO_AP_FOUND, -80);
        assert_eq!(info.reason(), DisconnectReason::NoApFound);
        assert_eq!(info.ssid, "home");
    }
}
