//! Access-point interface configuration.

use tracing::error;

use crate::radio::Radio;
use crate::types::{AccessPointConfig, AuthMode};

/// Maximum SSID length in bytes.
pub const SSID_MAX_LEN: usize = 32;

pub const AP_CHANNEL: u8 = 1;
pub const AP_MAX_CONNECTIONS: u8 = 30;

/// Builds the access-point SSID from a prefix and the AP MAC address.
///
/// The suffix is the last two MAC bytes in upper-case hex. Without a MAC
/// the suffix is `default`. The result is cut to [`SSID_MAX_LEN`] bytes.
pub fn access_point_ssid(prefix: &str, mac: Option<[u8; 6]>) -> String {
    let ssid = match mac {
        Some(mac) => format!("{prefix}_{:02X}{:02X}", mac[4], mac[5]),
        None => format!("{prefix}_default"),
    };
    truncate_utf8(ssid, SSID_MAX_LEN)
}

/// Open access point on a fixed channel, named after the radio's MAC.
pub fn access_point_config(radio: &dyn Radio, prefix: &str) -> AccessPointConfig {
    let mac = match radio.access_point_mac() {
        Ok(mac) => Some(mac),
        Err(e) => {
            error!(error = %e, "failed to read access point MAC");
            None
        }
    };

    AccessPointConfig {
        ssid: access_point_ssid(prefix, mac),
        channel: AP_CHANNEL,
        max_connections: AP_MAX_CONNECTIONS,
        auth: AuthMode::Open,
        pmf_required: false,
    }
}

pub(crate) fn truncate_utf8(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}
