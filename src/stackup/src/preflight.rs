//! Host preflight checks: effective privileges and OS identity.
//!
//! No side effects. A failed check surfaces as a `ProvisionError` and the
//! caller terminates with a nonzero exit before any package-manager state is
//! touched.

use crate::error::ProvisionError;
use nix::unistd::Uid;
use std::path::Path;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Debian releases the installer knows how to register the Docker apt
/// repository for. The codename feeds the apt source line when
/// VERSION_CODENAME is absent from os-release.
const SUPPORTED_VERSIONS: &[(&str, &str)] = &[
    ("11", "bullseye"),
    ("12", "bookworm"),
    ("13", "trixie"),
];

/// Parsed subset of /etc/os-release.
#[derive(Debug, Clone, Default)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
    pub version_codename: String,
    pub pretty_name: String,
}

impl OsRelease {
    /// Parse os-release key=value content. Quoted values are unquoted;
    /// unknown keys are ignored.
    pub fn parse(content: &str) -> Self {
        let mut os = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim() {
                "ID" => os.id = value.to_string(),
                "VERSION_ID" => os.version_id = value.to_string(),
                "VERSION_CODENAME" => os.version_codename = value.to_string(),
                "PRETTY_NAME" => os.pretty_name = value.to_string(),
                _ => {}
            }
        }
        os
    }

    pub fn load(path: &Path) -> Result<Self, ProvisionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProvisionError::UnsupportedOs(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&content))
    }

    /// Release codename for the apt source line, falling back on the
    /// supported-version table when os-release omits VERSION_CODENAME.
    pub fn codename(&self) -> Option<&str> {
        if !self.version_codename.is_empty() {
            return Some(&self.version_codename);
        }
        SUPPORTED_VERSIONS
            .iter()
            .find(|(version, _)| *version == self.version_id)
            .map(|(_, codename)| *codename)
    }
}

/// The installer mutates apt state and system groups, so it requires an
/// effective uid of 0.
pub fn check_privileges() -> Result<(), ProvisionError> {
    if Uid::effective().is_root() {
        Ok(())
    } else {
        Err(ProvisionError::Privilege(
            "stackup must run as root (try: sudo stackup)".to_string(),
        ))
    }
}

/// Accept only Debian releases from the supported-version table.
pub fn check_supported(os: &OsRelease) -> Result<(), ProvisionError> {
    if os.id != "debian" {
        let id = if os.id.is_empty() {
            "unknown"
        } else {
            os.id.as_str()
        };
        return Err(ProvisionError::UnsupportedOs(format!(
            "unsupported distribution '{}', expected debian",
            id
        )));
    }
    if !SUPPORTED_VERSIONS
        .iter()
        .any(|(version, _)| *version == os.version_id)
    {
        return Err(ProvisionError::UnsupportedOs(format!(
            "debian {} is not supported (supported: 11, 12, 13)",
            if os.version_id.is_empty() {
                "<no version>"
            } else {
                os.version_id.as_str()
            }
        )));
    }
    tracing::info!(
        "[Preflight] OS check passed: {}",
        if os.pretty_name.is_empty() {
            "debian"
        } else {
            os.pretty_name.as_str()
        }
    );
    Ok(())
}
