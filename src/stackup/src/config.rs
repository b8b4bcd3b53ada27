//! Run configuration, loaded from stackup.toml when present.
//!
//! Every field has a default, so a bare host with no config file gets the
//! core profile in /opt/stackup on port 80. CLI flags override file values.

use crate::error::ProvisionError;
use crate::stack::profile::StackProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Which service set to materialize.
    pub profile: StackProfile,

    /// Working directory for the generated descriptor and proxy config.
    pub workdir: PathBuf,

    /// External HTTP port the proxy listens on.
    pub http_port: u16,

    /// Per-service image overrides.
    pub images: ImageOverrides,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            profile: StackProfile::Core,
            workdir: PathBuf::from("/opt/stackup"),
            http_port: 80,
            images: ImageOverrides::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImageOverrides {
    pub nginx: Option<String>,
    pub gitea: Option<String>,
    pub kanboard: Option<String>,
    pub syncthing: Option<String>,
    pub openproject: Option<String>,
}

impl StackConfig {
    /// Load configuration. An explicit path must exist; otherwise the
    /// default search locations are tried and absence falls back on
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ProvisionError> {
        let candidates = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ProvisionError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                vec![path.to_path_buf()]
            }
            None => vec![
                PathBuf::from("stackup.toml"),
                PathBuf::from("/etc/stackup/stackup.toml"),
            ],
        };

        for path in candidates {
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                let config: StackConfig = toml::from_str(&content).map_err(|e| {
                    ProvisionError::Config(format!("failed to parse {}: {}", path.display(), e))
                })?;
                tracing::info!("[Config] Loaded {}", path.display());
                return Ok(config);
            }
        }

        tracing::debug!("[Config] No stackup.toml found, using defaults");
        Ok(Self::default())
    }
}
