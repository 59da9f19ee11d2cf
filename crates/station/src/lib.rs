//! Station connection supervisor.
//!
//! Consumes station lifecycle events from the network stack, retries the
//! uplink a bounded number of times with a fixed backoff, reports every
//! transition to a [`StatusReporter`], and releases [`WaitGate`] waiters once
//! the station is connected or has given up.
//!
//! ```text
//!  network stack ──events──► SupervisorHandle ──mpsc──► worker task
//!                                                         │
//!                                     StationMachine::on_*() -> Step
//!                                                         │
//!                         ┌───────────────┬───────────────┼──────────────┐
//!                         ▼               ▼               ▼              ▼
//!                  StatusReporter     WaitGate      watch<Snapshot>  Radio::connect
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod machine;
pub mod reporter;
pub mod supervisor;
pub mod types;

pub use config::SupervisorConfig;
pub use error::StationError;
pub use gate::WaitGate;
pub use machine::{Action, GateChange, StationMachine, Step};
pub use reporter::{ChannelReporter, StatusReporter, TracingReporter};
pub use supervisor::{Supervisor, SupervisorHandle};
pub use types::{
    ConnectionState, GateOutcome, StationSnapshot, StationStatus, StatusUpdate, WaitOutcome,
    WaitTimeout,
};
