//! Supervisor runtime: one worker task owning the [`StationMachine`].
//!
//! Events and operator commands are queued on an unbounded channel and
//! handled strictly in arrival order. The backoff sleep runs inside the
//! handler, so events arriving during it wait their turn instead of being
//! reordered or coalesced. A queued `reset` or `reconnect` cuts the backoff
//! short and drops its pending connect request; the command itself is still
//! handled in queue order.

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use uplink_radio::{DisconnectInfo, Radio, StationEvent};

use crate::config::SupervisorConfig;
use crate::error::StationError;
use crate::gate::WaitGate;
use crate::machine::{Action, GateChange, StationMachine, Step};
use crate::reporter::StatusReporter;
use crate::types::{GateOutcome, StationSnapshot, WaitOutcome, WaitTimeout};

#[derive(Debug)]
enum Command {
    Event(StationEvent),
    Reset,
    Reconnect,
}

impl Command {
    fn is_operator(&self) -> bool {
        matches!(self, Self::Reset | Self::Reconnect)
    }
}

/// Worker side of the supervisor. Created and driven by [`Supervisor::spawn`].
pub struct Supervisor {
    machine: StationMachine,
    radio: Arc<dyn Radio>,
    reporter: Box<dyn StatusReporter>,
    gate: WaitGate,
    snapshot_tx: watch::Sender<StationSnapshot>,
    commands: mpsc::UnboundedReceiver<Command>,
    /// Operator commands sent but not yet dequeued.
    operator_pending: Arc<watch::Sender<usize>>,
    cancel: CancellationToken,
}

impl Supervisor {
    /// Validates `config` and spawns the worker on the current tokio
    /// runtime. The machine starts in `Idle`.
    ///
    /// Nothing is spawned when validation fails.
    pub fn spawn(
        radio: Arc<dyn Radio>,
        reporter: impl StatusReporter + 'static,
        config: SupervisorConfig,
    ) -> Result<SupervisorHandle, StationError> {
        config.validate()?;

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let machine = StationMachine::new(&config);
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let gate = WaitGate::new();
        let operator_pending = Arc::new(watch::Sender::new(0));
        let cancel = CancellationToken::new();

        let worker = Supervisor {
            machine,
            radio,
            reporter: Box::new(reporter),
            gate: gate.clone(),
            snapshot_tx,
            commands: commands_rx,
            operator_pending: operator_pending.clone(),
            cancel: cancel.clone(),
        };
        tokio::spawn(worker.run());

        info!(
            max_attempts = config.max_attempts,
            backoff = ?config.backoff,
            "station supervisor started"
        );

        Ok(SupervisorHandle {
            commands: commands_tx,
            gate,
            snapshot: snapshot_rx,
            operator_pending,
            cancel,
        })
    }

    async fn run(mut self) {
        loop {
            let command = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };
            trace!(?command, "handling station command");
            if command.is_operator() {
                self.operator_pending
                    .send_modify(|n| *n = n.saturating_sub(1));
            }

            let step = self.dispatch(command);
            if !self.apply(step).await {
                break;
            }
        }
        debug!("station supervisor stopped");
    }

    fn dispatch(&mut self, command: Command) -> Step {
        match command {
            Command::Event(StationEvent::Started) => self.machine.on_station_started(),
            Command::Event(StationEvent::Disconnected(info)) => {
                self.machine.on_disconnected(&info)
            }
            Command::Event(StationEvent::AddressAcquired { address }) => {
                self.machine.on_address_acquired(address)
            }
            Command::Reset => self.machine.reset(),
            Command::Reconnect => self.machine.reconnect(),
        }
    }

    /// Applies a step. Returns `false` if shutdown interrupted the backoff.
    /// A backoff cut short by a queued operator command skips its connect.
    async fn apply(&self, step: Step) -> bool {
        if let Some(update) = step.report {
            self.reporter.report(update);
        }

        match step.gate {
            GateChange::Keep => {}
            GateChange::Set(GateOutcome::Connected) => self.gate.signal_connected(),
            GateChange::Set(GateOutcome::Failed) => self.gate.signal_failed(),
            GateChange::Clear => self.gate.reset(),
        }

        self.snapshot_tx.send_replace(self.machine.snapshot());

        match step.action {
            Action::None => {}
            Action::Connect => self.connect(),
            Action::RetryAfter(delay) => {
                let mut operator = self.operator_pending.subscribe();
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return false,
                    _ = operator.wait_for(|n| *n > 0) => {
                        debug!("backoff interrupted by operator command, retry dropped");
                    }
                    _ = tokio::time::sleep(delay) => self.connect(),
                }
            }
        }
        true
    }

    fn connect(&self) {
        if let Err(e) = self.radio.connect() {
            warn!(error = %e, "station connect request failed");
        }
    }
}

/// Cloneable front end of a running supervisor.
///
/// The network stack feeds events through it, operators reset or reconnect
/// through it, and other subsystems wait on it.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    commands: mpsc::UnboundedSender<Command>,
    gate: WaitGate,
    snapshot: watch::Receiver<StationSnapshot>,
    operator_pending: Arc<watch::Sender<usize>>,
    cancel: CancellationToken,
}

impl SupervisorHandle {
    fn send(&self, command: Command) -> Result<(), StationError> {
        if self.cancel.is_cancelled() {
            return Err(StationError::Stopped);
        }
        let operator = command.is_operator();
        // Counted before it is queued so the worker never sees it dequeued
        // without the matching increment.
        if operator {
            self.operator_pending.send_modify(|n| *n += 1);
        }
        self.commands.send(command).map_err(|_| {
            if operator {
                self.operator_pending
                    .send_modify(|n| *n = n.saturating_sub(1));
            }
            StationError::Stopped
        })
    }

    /// Queues a raw stack event.
    pub fn deliver(&self, event: StationEvent) -> Result<(), StationError> {
        self.send(Command::Event(event))
    }

    pub fn station_started(&self) -> Result<(), StationError> {
        self.deliver(StationEvent::Started)
    }

    pub fn disconnected(&self, info: DisconnectInfo) -> Result<(), StationError> {
        self.deliver(StationEvent::Disconnected(info))
    }

    pub fn address_acquired(&self, address: Option<Ipv4Addr>) -> Result<(), StationError> {
        self.deliver(StationEvent::AddressAcquired { address })
    }

    /// Clears the retry budget and returns to `Idle` without connecting.
    /// A retry waiting out its backoff is dropped.
    pub fn reset(&self) -> Result<(), StationError> {
        self.send(Command::Reset)
    }

    /// Reset followed by a fresh connect request. A retry waiting out its
    /// backoff is dropped in favour of this one.
    pub fn reconnect(&self) -> Result<(), StationError> {
        self.send(Command::Reconnect)
    }

    /// Blocks until the station is connected or has failed, or `timeout`
    /// elapses.
    pub async fn wait(&self, timeout: impl Into<WaitTimeout>) -> WaitOutcome {
        self.gate.wait(timeout).await
    }

    pub fn gate(&self) -> &WaitGate {
        &self.gate
    }

    /// State after the most recently handled command.
    pub fn snapshot(&self) -> StationSnapshot {
        *self.snapshot.borrow()
    }

    /// Receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<StationSnapshot> {
        self.snapshot.clone()
    }

    /// Stops the worker, interrupting a pending backoff. Queued commands
    /// are discarded.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Resolves once the worker has exited.
    pub async fn stopped(&self) {
        self.commands.closed().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uplink_radio::SimRadio;

    use super::*;
    use crate::reporter::TracingReporter;
    use crate::types::ConnectionState;

    fn radio() -> Arc<SimRadio> {
        let radio = Arc::new(SimRadio::new());
        radio.start().unwrap();
        radio
    }

    #[tokio::test]
    async fn invalid_config_is_fatal() {
        let config = SupervisorConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let result = Supervisor::spawn(radio(), TracingReporter, config);
        assert!(matches!(result, Err(StationError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn starts_idle() {
        let handle = Supervisor::spawn(radio(), TracingReporter, SupervisorConfig::default()).unwrap();
        assert_eq!(handle.snapshot(), StationSnapshot::default());
        assert_eq!(handle.gate().outcome(), None);
    }

    #[tokio::test]
    async fn commands_after_shutdown_fail() {
        let handle = Supervisor::spawn(radio(), TracingReporter, SupervisorConfig::default()).unwrap();
        handle.shutdown();
        handle.stopped().await;
        assert!(matches!(handle.station_started(), Err(StationError::Stopped)));
        assert!(matches!(handle.reset(), Err(StationError::Stopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_backoff() {
        let sim = radio();
        let handle = Supervisor::spawn(sim.clone(), TracingReporter, SupervisorConfig::default()).unwrap();
        let mut watch = handle.watch();

        handle.station_started().unwrap();
        handle
            .disconnected(DisconnectInfo::new("home", 201, -90))
            .unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Retrying { attempt: 1 })
            .await
            .unwrap();

        handle.shutdown();
        tokio::time::timeout(Duration::from_millis(100), handle.stopped())
            .await
            .expect("worker should stop during backoff");
        // Only the initial connect; the retry never fired.
        assert_eq!(sim.connect_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_backoff_drops_pending_retry() {
        let sim = radio();
        let handle = Supervisor::spawn(sim.clone(), TracingReporter, SupervisorConfig::default()).unwrap();
        let mut watch = handle.watch();

        handle.station_started().unwrap();
        handle
            .disconnected(DisconnectInfo::new("home", 201, -90))
            .unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Retrying { attempt: 1 })
            .await
            .unwrap();
        assert_eq!(sim.connect_calls(), 1);

        handle.reset().unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Idle)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(sim.connect_calls(), 1);
        assert_eq!(handle.snapshot().state, ConnectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_during_backoff_replaces_pending_retry() {
        let sim = radio();
        let handle = Supervisor::spawn(sim.clone(), TracingReporter, SupervisorConfig::default()).unwrap();
        let mut watch = handle.watch();

        handle.station_started().unwrap();
        handle
            .disconnected(DisconnectInfo::new("home", 201, -90))
            .unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Retrying { attempt: 1 })
            .await
            .unwrap();

        handle.reconnect().unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Connecting)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        // Initial connect plus the reconnect; the dropped retry never fired.
        assert_eq!(sim.connect_calls(), 2);
        assert_eq!(handle.snapshot().attempts_used, 0);
    }

    #[tokio::test]
    async fn connect_failure_does_not_change_state() {
        let sim = radio();
        sim.fail_connect(true);
        let handle = Supervisor::spawn(sim.clone(), TracingReporter, SupervisorConfig::default()).unwrap();
        let mut watch = handle.watch();

        handle.station_started().unwrap();
        watch
            .wait_for(|s| s.state == ConnectionState::Connecting)
            .await
            .unwrap();
        assert_eq!(sim.connect_calls(), 1);
        assert_eq!(handle.snapshot().attempts_used, 0);
    }
}
