//! Line-oriented console standing in for the network stack and operator.
//!
//! Stack events and operator commands are typed one per line on stdin:
//!
//! ```text
//! started                 station interface up
//! drop <reason> [rssi]    station disconnected (numeric reason code)
//! ip [a.b.c.d]            address acquired (no address = malformed event)
//! reset | reconnect       operator station controls
//! ap toggle|on|off        operator access-point mode switch
//! wait [ms]               wait for connected/failed in the background
//! status | quit
//! ```

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use uplink_radio::{
    DisconnectInfo, Radio, SimRadio, access_point_off, access_point_on, toggle_access_point,
};
use uplink_station::{SupervisorHandle, WaitTimeout};

/// Default RSSI for `drop` without an explicit value.
const DEFAULT_RSSI: i32 = -70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Started,
    Drop { reason: i32, rssi: i32 },
    Address(Option<Ipv4Addr>),
    Reset,
    Reconnect,
    AccessPoint(ApSwitch),
    Wait(WaitTimeout),
    Status,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApSwitch {
    Toggle,
    On,
    Off,
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match verb {
        "started" => ConsoleCommand::Started,
        "drop" => {
            let reason = arg
                .ok_or("drop needs a reason code")?
                .parse()
                .map_err(|e| format!("bad reason code: {e}"))?;
            let rssi = match words.next() {
                Some(v) => v.parse().map_err(|e| format!("bad rssi: {e}"))?,
                None => DEFAULT_RSSI,
            };
            ConsoleCommand::Drop { reason, rssi }
        }
        "ip" => match arg {
            Some(v) => ConsoleCommand::Address(Some(
                v.parse().map_err(|e| format!("bad address: {e}"))?,
            )),
            None => ConsoleCommand::Address(None),
        },
        "reset" => ConsoleCommand::Reset,
        "reconnect" => ConsoleCommand::Reconnect,
        "ap" => ConsoleCommand::AccessPoint(match arg {
            Some("toggle") | None => ApSwitch::Toggle,
            Some("on") => ApSwitch::On,
            Some("off") => ApSwitch::Off,
            Some(other) => return Err(format!("unknown ap switch: {other}")),
        }),
        "wait" => ConsoleCommand::Wait(match arg {
            Some(v) => {
                WaitTimeout::from_millis(v.parse().map_err(|e| format!("bad timeout: {e}"))?)
            }
            None => WaitTimeout::Forever,
        }),
        "status" => ConsoleCommand::Status,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(handle: SupervisorHandle, radio: Arc<SimRadio>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        execute(&handle, radio.as_ref(), command)?;
    }
    Ok(())
}

fn execute(
    handle: &SupervisorHandle,
    radio: &SimRadio,
    command: ConsoleCommand,
) -> anyhow::Result<()> {
    match command {
        ConsoleCommand::Started => handle.station_started()?,
        ConsoleCommand::Drop { reason, rssi } => {
            let ssid = radio
                .station_config()
                .map(|c| c.ssid)
                .unwrap_or_default();
            handle.disconnected(DisconnectInfo::new(ssid, reason, rssi))?
        }
        ConsoleCommand::Address(address) => handle.address_acquired(address)?,
        ConsoleCommand::Reset => handle.reset()?,
        ConsoleCommand::Reconnect => handle.reconnect()?,
        ConsoleCommand::AccessPoint(switch) => {
            let result = match switch {
                ApSwitch::Toggle => toggle_access_point(radio).map(|_| ()),
                ApSwitch::On => access_point_on(radio),
                ApSwitch::Off => access_point_off(radio),
            };
            match result {
                Ok(()) => info!(mode = ?radio.mode()?, "radio mode changed"),
                Err(e) => warn!(error = %e, "mode switch failed"),
            }
        }
        ConsoleCommand::Wait(timeout) => {
            let handle = handle.clone();
            tokio::spawn(async move {
                let outcome = handle.wait(timeout).await;
                info!(?outcome, "wait finished");
            });
        }
        ConsoleCommand::Status => {
            let snapshot = handle.snapshot();
            info!(
                state = ?snapshot.state,
                attempts_used = snapshot.attempts_used,
                settled = snapshot.state.is_terminal(),
                mode = ?radio.mode()?,
                "station status"
            );
        }
        ConsoleCommand::Quit => {}
    }
    Ok(())
}
