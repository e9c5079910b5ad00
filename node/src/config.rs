//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use civic_polls::PollPolicy;
use civic_types::{Identity, Namespace};

use crate::{LogFormat, NodeError};

/// Which record store the node runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory; everything is lost on exit.
    Memory,
    /// Durable LMDB environment under `data_dir`.
    Lmdb,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Lmdb => "lmdb",
        }
    }
}

/// Configuration for a civic node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Hex identity of the deployment authority whose admin approves favorite
    /// updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    /// Label every record address is derived under.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Data directory for the LMDB backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    /// Walk every stored record on startup and log any that fail to decode.
    #[serde(default = "default_true")]
    pub check_integrity: bool,

    /// Reject votes outside a poll's start/end window.
    #[serde(default)]
    pub enforce_poll_window: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_namespace() -> String {
    "civic".to_string()
}

fn default_backend() -> BackendKind {
    BackendKind::Lmdb
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./civic_data")
}

fn default_map_size() -> usize {
    256 * 1024 * 1024
}

fn default_max_dbs() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The configured deployment authority.
    pub fn authority(&self) -> Result<Identity, NodeError> {
        let hex = self
            .authority
            .as_deref()
            .ok_or_else(|| NodeError::Config("authority is not set".into()))?;
        Identity::from_hex(hex).map_err(|e| NodeError::Config(format!("authority: {}", e)))
    }

    /// The derivation namespace named by the `namespace` label.
    pub fn namespace(&self) -> Result<Namespace, NodeError> {
        Namespace::from_label(&self.namespace)
            .map_err(|e| NodeError::Config(format!("namespace: {}", e)))
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            enforce_time_window: self.enforce_poll_window,
        }
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            authority: None,
            namespace: default_namespace(),
            backend: default_backend(),
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
            check_integrity: default_true(),
            enforce_poll_window: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.backend, config.backend);
        assert_eq!(parsed.map_size, config.map_size);
        assert_eq!(parsed.authority, None);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.backend, BackendKind::Lmdb);
        assert_eq!(config.max_dbs, 4);
        assert_eq!(config.log_format, "human");
        assert!(!config.poll_policy().enforce_time_window);
        assert!(config.check_integrity);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            authority = "adadadadadadadadadadadadadadadadadadadadadadadadadadadadadadadad"
            backend = "memory"
            enforce_poll_window = true
            log_format = "json"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.authority().unwrap(), Identity::new([0xAD; 32]));
        assert!(config.poll_policy().enforce_time_window);
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn missing_or_bad_authority_is_config_error() {
        let config = NodeConfig::default();
        assert!(matches!(config.authority(), Err(NodeError::Config(_))));

        let config = NodeConfig::from_toml_str("authority = \"zz\"").unwrap();
        assert!(matches!(config.authority(), Err(NodeError::Config(_))));
    }

    #[test]
    fn namespace_label_is_validated() {
        let config = NodeConfig::default();
        assert_eq!(config.namespace().unwrap(), Namespace::default());

        let config = NodeConfig::from_toml_str(
            "namespace = \"civic-production-deployment-eu-west-1\"",
        )
        .unwrap();
        assert!(matches!(config.namespace(), Err(NodeError::Config(_))));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result = NodeConfig::from_toml_str("backend = \"postgres\"");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/civic.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
