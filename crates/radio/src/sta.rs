//! Station interface configuration.

use tracing::{info, warn};

use crate::ap::{SSID_MAX_LEN, truncate_utf8};
use crate::types::{AuthMode, StationConfig};

/// Maximum password length in bytes (64 hex digits for a raw PSK).
pub const PASSWORD_MAX_LEN: usize = 64;

/// Minimum WPA2 passphrase length.
pub const PASSWORD_MIN_LEN: usize = 8;

impl StationConfig {
    /// Builds a station config for the given network.
    ///
    /// An empty password selects an open network; anything else requires
    /// at least WPA2-PSK. Credentials never fail the build: overlong values
    /// are cut to the stack's buffer sizes and a short passphrase is only
    /// logged, so the access point still comes up for re-provisioning. An
    /// empty SSID leaves the device unprovisioned.
    pub fn new(ssid: &str, password: &str) -> Self {
        if ssid.len() > SSID_MAX_LEN {
            warn!(len = ssid.len(), max = SSID_MAX_LEN, "station ssid truncated");
        }
        if password.len() > PASSWORD_MAX_LEN {
            warn!(
                len = password.len(),
                max = PASSWORD_MAX_LEN,
                "station password truncated"
            );
        }
        let ssid = truncate_utf8(ssid.to_string(), SSID_MAX_LEN);
        let password = truncate_utf8(password.to_string(), PASSWORD_MAX_LEN);

        let auth_threshold = if password.is_empty() {
            info!("no station password provided, using open network");
            AuthMode::Open
        } else {
            if password.len() < PASSWORD_MIN_LEN {
                warn!(
                    len = password.len(),
                    min = PASSWORD_MIN_LEN,
                    "station password shorter than a WPA2 passphrase, association will likely fail"
                );
            }
            info!("station password provided, using WPA2");
            AuthMode::Wpa2Psk
        };

        Self {
            ssid,
            password,
            auth_threshold,
            scan_all_channels: true,
            sort_by_signal: true,
            pmf_capable: true,
            pmf_required: false,
            btm_enabled: true,
            rm_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_open() {
        let cfg = StationConfig::new("cafe", "");
        assert_eq!(cfg.auth_threshold, AuthMode::Open);
        assert!(cfg.password.is_empty());
    }

    #[test]
    fn password_selects_wpa2() {
        let cfg = StationConfig::new("home", "hunter22");
        assert_eq!(cfg.auth_threshold, AuthMode::Wpa2Psk);
        assert!(cfg.scan_all_channels);
        assert!(cfg.sort_by_signal);
        assert!(cfg.pmf_capable);
        assert!(!cfg.pmf_required);
        assert!(cfg.btm_enabled && cfg.rm_enabled);
    }

    #[test]
    fn unprovisioned_ssid_accepted() {
        let cfg = StationConfig::new("", "");
        assert!(cfg.ssid.is_empty());
    }

    #[test]
    fn overlong_credentials_are_truncated() {
        let cfg = StationConfig::new(&"s".repeat(40), &"p".repeat(70));
        assert_eq!(cfg.ssid.len(), SSID_MAX_LEN);
        assert_eq!(cfg.password.len(), PASSWORD_MAX_LEN);
        assert_eq!(cfg.auth_threshold, AuthMode::Wpa2Psk);
    }

    #[test]
    fn short_password_is_kept() {
        let cfg = StationConfig::new("home", "short");
        assert_eq!(cfg.password, "short");
        assert_eq!(cfg.auth_threshold, AuthMode::Wpa2Psk);
    }
}
