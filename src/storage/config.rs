use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use crate::error::{RelayError, Result};

pub const CONFIG_FILE: &str = "ask-owner.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat id of the owner. Without it the relay is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default = "default_quick_prefix")]
    pub quick_prefix: String,
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_secs: u64,
}

fn default_owner_name() -> String {
    "the owner".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("notifications_log.json")
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("outbox")
}

fn default_max_records() -> usize {
    100
}

fn default_quick_prefix() -> String {
    "question:".to_string()
}

fn default_lock_ttl() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config {
            owner_id: None,
            owner_email: None,
            owner_name: default_owner_name(),
            log_file: default_log_file(),
            outbox_dir: default_outbox_dir(),
            max_records: default_max_records(),
            quick_prefix: default_quick_prefix(),
            lock_ttl_secs: default_lock_ttl(),
        }
    }
}

impl Config {
    /// Resolve relative paths against `base`.
    pub fn log_path(&self, base: &Path) -> PathBuf {
        base.join(&self.log_file)
    }

    pub fn outbox_path(&self, base: &Path) -> PathBuf {
        base.join(&self.outbox_dir)
    }
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();
    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Read the config file, then let `OWNER_TELEGRAM_ID` / `OWNER_EMAIL` override it.
pub fn load(path: &Path) -> Result<Config> {
    let mut config = read_config(path)?;
    apply_env(
        &mut config,
        std::env::var("OWNER_TELEGRAM_ID").ok(),
        std::env::var("OWNER_EMAIL").ok(),
    );
    Ok(config)
}

fn apply_env(config: &mut Config, owner_id: Option<String>, owner_email: Option<String>) {
    if let Some(raw) = owner_id {
        match parse_owner_id(&raw) {
            Ok(id) => config.owner_id = Some(id),
            Err(e) => {
                warn!(error = %e, "ignoring OWNER_TELEGRAM_ID, relay disabled");
                config.owner_id = None;
            }
        }
    }
    if let Some(email) = owner_email {
        let email = email.trim();
        config.owner_email = (!email.is_empty()).then(|| email.to_string());
    }
}

pub fn parse_owner_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| RelayError::InvalidOwnerId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.owner_id, None);
        assert_eq!(config.max_records, 100);
        assert_eq!(config.quick_prefix, "question:");
        assert_eq!(config.log_file, PathBuf::from("notifications_log.json"));
    }

    #[test]
    fn default_config_round_trips_through_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        write_default_config(&path).unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.owner_name, "the owner");
        assert_eq!(config.lock_ttl_secs, 30);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "owner_id = 42\nmax_records = 5\n").unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.owner_id, Some(42));
        assert_eq!(config.max_records, 5);
        assert_eq!(config.outbox_dir, PathBuf::from("outbox"));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config {
            owner_id: Some(1),
            ..Config::default()
        };
        apply_env(&mut config, Some(" 777 ".into()), Some("me@example.com".into()));
        assert_eq!(config.owner_id, Some(777));
        assert_eq!(config.owner_email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn invalid_env_owner_disables_relay() {
        let mut config = Config {
            owner_id: Some(1),
            ..Config::default()
        };
        apply_env(&mut config, Some("not-a-number".into()), None);
        assert_eq!(config.owner_id, None);
    }

    #[test]
    fn blank_email_is_none() {
        let mut config = Config::default();
        apply_env(&mut config, None, Some("  ".into()));
        assert_eq!(config.owner_email, None);
    }
}
