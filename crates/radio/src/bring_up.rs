//! One-shot network stack initialisation.

use tracing::{error, info, warn};

use crate::ap::access_point_config;
use crate::error::RadioError;
use crate::radio::Radio;
use crate::types::{NetworkConfig, StationConfig, WifiMode};

/// Maximum DHCP hostname length in bytes.
pub const HOSTNAME_MAX_LEN: usize = 32;

/// Brings the stack up in dual mode: access point and station together.
///
/// An overlong hostname is rejected before the radio is touched. Station
/// credentials never stop bring-up, so the access point stays reachable.
/// Any radio failure up to and including `start` is returned; a hostname
/// that the stack refuses is only logged.
pub fn bring_up(radio: &dyn Radio, config: &NetworkConfig) -> Result<(), RadioError> {
    if config.hostname.len() > HOSTNAME_MAX_LEN {
        error!(len = config.hostname.len(), "hostname too long");
        return Err(RadioError::HostnameTooLong {
            len: config.hostname.len(),
            max: HOSTNAME_MAX_LEN,
        });
    }
    radio.set_mode(WifiMode::Dual)?;

    let ap = access_point_config(radio, &config.ap_prefix);
    info!(ssid = %ap.ssid, "access point on");
    radio.configure_access_point(&ap)?;

    let station = StationConfig::new(&config.ssid, &config.password);
    radio.configure_station(&station)?;
    info!(ssid = %station.ssid, "station configured");

    radio.start()?;

    match radio.set_hostname(&config.hostname) {
        Ok(()) => info!(hostname = %config.hostname, "hostname set"),
        Err(e) => warn!(error = %e, "failed to set hostname"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRadio;

    fn config() -> NetworkConfig {
        NetworkConfig {
            hostname: "miner-01".into(),
            ssid: "home".into(),
            password: "hunter22".into(),
            ap_prefix: "Uplink".into(),
        }
    }

    #[test]
    fn brings_up_dual_mode() {
        let radio = SimRadio::new();
        bring_up(&radio, &config()).unwrap();

        assert_eq!(radio.mode().unwrap(), WifiMode::Dual);
        assert!(radio.is_started());
        assert_eq!(radio.hostname().as_deref(), Some("miner-01"));
        assert_eq!(radio.station_config().unwrap().ssid, "home");
        assert!(radio.access_point_config().unwrap().ssid.starts_with("Uplink_"));
    }

    #[test]
    fn long_hostname_fails_before_touching_radio() {
        let radio = SimRadio::new();
        let mut cfg = config();
        cfg.hostname = "h".repeat(HOSTNAME_MAX_LEN + 1);

        let err = bring_up(&radio, &cfg).unwrap_err();
        assert!(matches!(err, RadioError::HostnameTooLong { len: 33, max: 32 }));
        assert_eq!(radio.mode().unwrap(), WifiMode::Off);
        assert!(!radio.is_started());
    }

    #[test]
    fn bad_credentials_still_bring_up_access_point() {
        let radio = SimRadio::new();
        let mut cfg = config();
        cfg.password = "short".into();
        cfg.ssid = "s".repeat(40);

        bring_up(&radio, &cfg).unwrap();
        assert_eq!(radio.mode().unwrap(), WifiMode::Dual);
        assert!(radio.is_started());
        assert!(radio.access_point_config().is_some());
        let station = radio.station_config().unwrap();
        assert_eq!(station.ssid.len(), 32);
        assert_eq!(station.password, "short");
    }

    #[test]
    fn start_failure_is_fatal() {
        let radio = SimRadio::new();
        radio.fail_start(true);
        let err = bring_up(&radio, &config()).unwrap_err();
        assert!(matches!(err, RadioError::Stack { .. }));
    }

    #[test]
    fn hostname_failure_is_not_fatal() {
        let radio = SimRadio::new();
        radio.fail_hostname(true);
        bring_up(&radio, &config()).unwrap();
        assert!(radio.is_started());
        assert!(radio.hostname().is_none());
    }
}
