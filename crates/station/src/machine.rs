//! Station connection state machine.
//!
//! Pure transition logic: each handler updates the state and retry counter
//! and returns a [`Step`] describing what the caller must do next. No I/O
//! happens here, which keeps the policy testable without a runtime.

use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use uplink_radio::DisconnectInfo;

use crate::config::SupervisorConfig;
use crate::types::{ConnectionState, GateOutcome, StationSnapshot, StationStatus, StatusUpdate};

/// Radio request that follows a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Issue a connect request now.
    Connect,
    /// Issue a connect request after the delay.
    RetryAfter(Duration),
}

/// Effect on the wait gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChange {
    Keep,
    Set(GateOutcome),
    Clear,
}

/// Side effects of one transition, applied in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub report: Option<StatusUpdate>,
    pub gate: GateChange,
    pub action: Action,
}

impl Step {
    /// No side effects.
    pub const NONE: Step = Step {
        report: None,
        gate: GateChange::Keep,
        action: Action::None,
    };
}

/// Owner of [`ConnectionState`] and the retry budget.
#[derive(Debug, Clone)]
pub struct StationMachine {
    state: ConnectionState,
    attempts_used: u32,
    max_attempts: u32,
    backoff: Duration,
}

impl StationMachine {
    /// Creates a machine in `Idle` with an unused budget.
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            state: ConnectionState::Idle,
            attempts_used: 0,
            max_attempts: config.max_attempts,
            backoff: config.backoff,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn snapshot(&self) -> StationSnapshot {
        StationSnapshot {
            state: self.state,
            attempts_used: self.attempts_used,
        }
    }

    /// Station interface came up: start a connection cycle.
    pub fn on_station_started(&mut self) -> Step {
        if self.state == ConnectionState::Failed {
            debug!("station started while failed, waiting for reset");
            return Step::NONE;
        }
        self.begin_connecting()
    }

    /// Disconnect, including a failed first attempt.
    ///
    /// Each disconnect consumes one attempt. Below the cap the station
    /// retries after the fixed backoff; the disconnect that reaches the cap
    /// fails the station. Disconnects while `Idle` or `Failed` belong to no
    /// running cycle and are dropped.
    pub fn on_disconnected(&mut self, info: &DisconnectInfo) -> Step {
        let reason = info.reason();
        match self.state {
            ConnectionState::Idle => {
                debug!(ssid = %info.ssid, %reason, "disconnect while idle, ignoring");
                return Step::NONE;
            }
            ConnectionState::Failed => {
                debug!(ssid = %info.ssid, %reason, "disconnect while failed, ignoring");
                return Step::NONE;
            }
            _ => {}
        }

        if reason.is_auth_related() {
            warn!(
                ssid = %info.ssid,
                rssi = info.rssi,
                reason = info.reason,
                "could not connect: {reason}, check the station password"
            );
        } else {
            info!(
                ssid = %info.ssid,
                rssi = info.rssi,
                reason = info.reason,
                "could not connect: {reason}"
            );
        }

        self.attempts_used = self.attempts_used.saturating_add(1).min(self.max_attempts);

        if self.attempts_used < self.max_attempts {
            let attempt = self.attempts_used;
            self.state = ConnectionState::Retrying { attempt };
            info!(attempt, max = self.max_attempts, "retrying station connection");
            Step {
                report: Some(StatusUpdate::new(StationStatus::Retrying, attempt)),
                gate: GateChange::Keep,
                action: Action::RetryAfter(self.backoff),
            }
        } else {
            self.state = ConnectionState::Failed;
            error!(max = self.max_attempts, "reached maximum retry attempts");
            Step {
                report: Some(StatusUpdate::new(StationStatus::Disconnected, 0)),
                gate: GateChange::Set(GateOutcome::Failed),
                action: Action::None,
            }
        }
    }

    /// IP configuration confirmed.
    ///
    /// Repeated acquisitions re-assert `Connected`. An address arriving
    /// after `Failed` is accepted as a spontaneous recovery. One arriving
    /// while `Idle` belongs to a cycle the operator already reset and is
    /// dropped.
    pub fn on_address_acquired(&mut self, address: Option<Ipv4Addr>) -> Step {
        let address = match address {
            Some(addr) if !addr.is_unspecified() => addr,
            other => {
                warn!(address = ?other, "address acquired without a usable address, ignoring");
                return Step::NONE;
            }
        };

        if self.state == ConnectionState::Idle {
            warn!(%address, "address acquired while idle, ignoring");
            return Step::NONE;
        }
        if self.state == ConnectionState::Failed {
            info!(%address, "station recovered after retry budget was exhausted");
        }

        self.attempts_used = 0;
        self.state = ConnectionState::Connected { address };
        info!(%address, "station connected");
        Step {
            report: Some(StatusUpdate::new(StationStatus::Connected, 0)),
            gate: GateChange::Set(GateOutcome::Connected),
            action: Action::None,
        }
    }

    /// Operator reset: back to `Idle` with a fresh budget. Does not connect.
    pub fn reset(&mut self) -> Step {
        info!(from = ?self.state, "station reset");
        self.state = ConnectionState::Idle;
        self.attempts_used = 0;
        Step {
            report: None,
            gate: GateChange::Clear,
            action: Action::None,
        }
    }

    /// Operator reconnect: reset, then start a new connection cycle.
    pub fn reconnect(&mut self) -> Step {
        self.reset();
        Step {
            gate: GateChange::Clear,
            ..self.begin_connecting()
        }
    }

    fn begin_connecting(&mut self) -> Step {
        self.state = ConnectionState::Connecting;
        debug!("requesting station connect");
        Step {
            report: Some(StatusUpdate::new(StationStatus::Connecting, 0)),
            gate: GateChange::Keep,
            action: Action::Connect,
        }
    }
}
