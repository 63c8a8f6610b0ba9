//! Command line and config file handling.
//!
//! A hub is configured by command line flags, an optional JSON config file,
//! or both. Ports and host given on the command line always win.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mural_core::{CredentialTable, PeerSet};
use mural_runtime::NodeConfig;

/// Command line of the hub binary
#[derive(Parser, Debug)]
#[command(name = "mural-node", about = "Replicated message board hub")]
pub struct Cli {
    /// Host to listen on, shared by every peer
    #[arg(long)]
    pub host: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local listening port
    pub port: u16,

    /// Ports of the other hubs, in reconciliation order
    pub peers: Vec<u16>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// JSON config file format.
///
/// Example `hub.json`:
/// ```json
/// {
///   "host": "127.0.0.1",
///   "credentials": { "ana": "senha321", "carlos": "senha654" },
///   "peer_timeout_ms": 2000,
///   "propagation_concurrency": 8
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub credentials: Option<CredentialTable>,
    pub peer_timeout_ms: Option<u64>,
    pub propagation_concurrency: Option<usize>,
    pub max_frame_size: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Overlay the values present in the file onto `config`
    pub fn apply(self, config: &mut NodeConfig) -> Result<(), ConfigError> {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(credentials) = self.credentials {
            if credentials.is_empty() {
                return Err(ConfigError::Invalid("credential table is empty"));
            }
            config.credentials = credentials;
        }
        if let Some(ms) = self.peer_timeout_ms {
            config.peer_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = self.propagation_concurrency {
            if n == 0 {
                return Err(ConfigError::Invalid("propagation_concurrency must be positive"));
            }
            config.propagation_concurrency = n;
        }
        if let Some(size) = self.max_frame_size {
            config.max_frame_size = size;
        }
        Ok(())
    }
}

impl Cli {
    /// Resolve the final node config: defaults, then the file, then flags
    pub fn resolve(&self) -> Result<NodeConfig, ConfigError> {
        let mut config = NodeConfig::default();
        if let Some(ref path) = self.config {
            ConfigFile::load(path)?.apply(&mut config)?;
        }
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        config.port = self.port;
        config.peers = PeerSet::on_host(&config.host, &self.peers);
        Ok(config)
    }
}
