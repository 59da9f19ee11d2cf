//! Agent configuration.
//!
//! Stored as TOML. The path comes from the first command-line argument or
//! `UPLINK_CONFIG`; without either, or if the file does not exist, the
//! defaults are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use uplink_radio::NetworkConfig;
use uplink_station::SupervisorConfig;
use uplink_station::config::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "UPLINK_CONFIG";

/// Agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub supervisor: SupervisorSection,
    pub network: NetworkConfig,
}

/// `[supervisor]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorSection {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_ms: u64::try_from(DEFAULT_BACKOFF.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl SupervisorSection {
    pub fn to_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

impl AgentConfig {
    /// Loads the config at `path`, falling back to defaults when there is
    /// no path or no file.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                let config: AgentConfig = toml::from_str(&content)?;
                tracing::debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Some(path) => {
                tracing::info!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

/// Config path from the command line or the environment.
pub fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.supervisor.max_attempts, 5);
        assert_eq!(config.supervisor.backoff_ms, 2500);
        assert_eq!(config.network.hostname, "uplink");
        assert!(config.network.ssid.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml_str = r#"
            [network]
            ssid = "home"
        "#;
        let config: AgentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.ssid, "home");
        assert_eq!(config.network.ap_prefix, "Uplink");
        assert_eq!(config.supervisor.max_attempts, 5);
    }

    #[test]
    fn supervisor_section_converts() {
        let section = SupervisorSection {
            max_attempts: 3,
            backoff_ms: 100,
        };
        let config = section.to_config();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff, Duration::from_millis(100));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[supervisor]\nmax_attempts = 7\n\n[network]\nhostname = \"miner-02\"\npassword = \"hunter22\""
        )
        .unwrap();

        let config = AgentConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.supervisor.max_attempts, 7);
        assert_eq!(config.supervisor.backoff_ms, 2500);
        assert_eq!(config.network.hostname, "miner-02");
        assert_eq!(config.network.password, "hunter22");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgentConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config.supervisor.max_attempts, 5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[supervisor\nmax_attempts = ").unwrap();
        assert!(AgentConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AgentConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AgentConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.network, config.network);
        assert_eq!(parsed.supervisor.max_attempts, config.supervisor.max_attempts);
    }
}
