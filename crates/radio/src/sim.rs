//! In-memory radio for host builds and tests.
//!
//! Records every request and applies it to a plain state struct. Station
//! events are not generated here; whoever drives the simulation feeds them
//! to the supervisor directly.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::RadioError;
use crate::radio::Radio;
use crate::types::{AccessPointConfig, StationConfig, WifiMode};

const DEFAULT_MAC: [u8; 6] = [0x24, 0x0a, 0xc4, 0x00, 0x00, 0x01];

#[derive(Debug)]
struct SimState {
    mode: WifiMode,
    started: bool,
    mac: Option<[u8; 6]>,
    hostname: Option<String>,
    ap: Option<AccessPointConfig>,
    station: Option<StationConfig>,
    fail_connect: bool,
    fail_start: bool,
    fail_hostname: bool,
}

/// Simulated radio.
#[derive(Debug)]
pub struct SimRadio {
    state: Mutex<SimState>,
    connect_calls: AtomicU32,
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                mode: WifiMode::Off,
                started: false,
                mac: Some(DEFAULT_MAC),
                hostname: None,
                ap: None,
                station: None,
                fail_connect: false,
                fail_start: false,
                fail_hostname: false,
            }),
            connect_calls: AtomicU32::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of `connect` requests received, failed ones included.
    pub fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn is_started(&self) -> bool {
        self.state().started
    }

    pub fn hostname(&self) -> Option<String> {
        self.state().hostname.clone()
    }

    pub fn access_point_config(&self) -> Option<AccessPointConfig> {
        self.state().ap.clone()
    }

    pub fn station_config(&self) -> Option<StationConfig> {
        self.state().station.clone()
    }

    /// `None` makes the MAC unreadable.
    pub fn set_mac(&self, mac: Option<[u8; 6]>) {
        self.state().mac = mac;
    }

    pub fn fail_connect(&self, fail: bool) {
        self.state().fail_connect = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.state().fail_start = fail;
    }

    pub fn fail_hostname(&self, fail: bool) {
        self.state().fail_hostname = fail;
    }
}

impl Default for SimRadio {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(message: &str) -> RadioError {
    RadioError::Stack {
        code: -1,
        message: message.into(),
    }
}

impl Radio for SimRadio {
    fn connect(&self) -> Result<(), RadioError> {
        let n = self.connect_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let state = self.state();
        debug!(call = n, "sim: connect requested");
        if state.fail_connect {
            return Err(injected("connect failed"));
        }
        if !state.started {
            return Err(RadioError::NotStarted);
        }
        Ok(())
    }

    fn mode(&self) -> Result<WifiMode, RadioError> {
        Ok(self.state().mode)
    }

    fn set_mode(&self, mode: WifiMode) -> Result<(), RadioError> {
        debug!(?mode, "sim: set mode");
        self.state().mode = mode;
        Ok(())
    }

    fn configure_access_point(&self, config: &AccessPointConfig) -> Result<(), RadioError> {
        self.state().ap = Some(config.clone());
        Ok(())
    }

    fn configure_station(&self, config: &StationConfig) -> Result<(), RadioError> {
        self.state().station = Some(config.clone());
        Ok(())
    }

    fn start(&self) -> Result<(), RadioError> {
        let mut state = self.state();
        if state.fail_start {
            return Err(injected("start failed"));
        }
        state.started = true;
        Ok(())
    }

    fn set_hostname(&self, hostname: &str) -> Result<(), RadioError> {
        let mut state = self.state();
        if state.fail_hostname {
            return Err(injected("hostname rejected"));
        }
        state.hostname = Some(hostname.to_string());
        Ok(())
    }

    fn access_point_mac(&self) -> Result<[u8; 6], RadioError> {
        self.state().mac.ok_or_else(|| injected("mac unavailable"))
    }
}
