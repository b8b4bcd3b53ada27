//! Docker Engine installation.
//!
//! Sequential and fail-fast: refresh the apt index, install prerequisites,
//! trust the Docker signing key, register the vendor repository, refresh
//! again, install the runtime and its plugins, then grant the invoking user
//! docker group membership (best-effort). No rollback on failure.

use crate::error::ProvisionError;
use crate::exec::{run_checked, CommandRunner, CommandSpec};
use crate::preflight::OsRelease;
use async_trait::async_trait;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const DOCKER_GPG_URL: &str = "https://download.docker.com/linux/debian/gpg";
pub const KEYRING_DIR: &str = "/etc/apt/keyrings";
pub const SOURCES_PATH: &str = "/etc/apt/sources.list.d/docker.list";

const PREREQUISITES: &[&str] = &["ca-certificates", "curl", "gnupg"];
const DOCKER_PACKAGES: &[&str] = &[
    "docker-ce",
    "docker-ce-cli",
    "containerd.io",
    "docker-buildx-plugin",
    "docker-compose-plugin",
];

/// Fetches the repository signing key. Behind a trait so tests do not reach
/// the network.
#[async_trait]
pub trait KeyFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProvisionError>;
}

pub struct HttpKeyFetcher {
    client: reqwest::Client,
}

impl HttpKeyFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpKeyFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyFetcher for HttpKeyFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProvisionError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Apt source line trusting the fetched key.
pub fn repo_line(arch: &str, codename: &str, keyring: &Path) -> String {
    format!(
        "deb [arch={} signed-by={}] https://download.docker.com/linux/debian {} stable",
        arch,
        keyring.display(),
        codename
    )
}

fn apt(args: &[&str]) -> CommandSpec {
    CommandSpec::new("apt-get", args).env("DEBIAN_FRONTEND", "noninteractive")
}

pub struct DockerInstaller<'a> {
    runner: &'a dyn CommandRunner,
    key_fetcher: &'a dyn KeyFetcher,
    keyring_dir: PathBuf,
    sources_path: PathBuf,
    sudo_user: Option<String>,
}

impl<'a> DockerInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, key_fetcher: &'a dyn KeyFetcher) -> Self {
        Self {
            runner,
            key_fetcher,
            keyring_dir: PathBuf::from(KEYRING_DIR),
            sources_path: PathBuf::from(SOURCES_PATH),
            sudo_user: std::env::var("SUDO_USER")
                .ok()
                .filter(|user| !user.trim().is_empty()),
        }
    }

    /// Redirect keyring and source-list writes, for tests.
    pub fn with_paths(mut self, keyring_dir: PathBuf, sources_path: PathBuf) -> Self {
        self.keyring_dir = keyring_dir;
        self.sources_path = sources_path;
        self
    }

    pub fn with_sudo_user(mut self, user: Option<String>) -> Self {
        self.sudo_user = user;
        self
    }

    pub async fn install(&self, os: &OsRelease) -> Result<(), ProvisionError> {
        tracing::info!("[Packages] Refreshing package index");
        run_checked(self.runner, &apt(&["update"])).await?;

        tracing::info!("[Packages] Installing prerequisites: {}", PREREQUISITES.join(" "));
        let mut args = vec!["install", "-y"];
        args.extend_from_slice(PREREQUISITES);
        run_checked(self.runner, &apt(&args)).await?;

        self.register_repository(os).await?;

        run_checked(self.runner, &apt(&["update"])).await?;

        tracing::info!(
            "[Packages] Installing container runtime: {}",
            DOCKER_PACKAGES.join(" ")
        );
        let mut args = vec!["install", "-y"];
        args.extend_from_slice(DOCKER_PACKAGES);
        run_checked(self.runner, &apt(&args)).await?;

        self.grant_docker_group().await
    }

    /// Trust the vendor signing key and write the apt source line.
    async fn register_repository(&self, os: &OsRelease) -> Result<(), ProvisionError> {
        std::fs::create_dir_all(&self.keyring_dir)?;
        let mut perms = std::fs::metadata(&self.keyring_dir)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&self.keyring_dir, perms)?;

        let key = self.key_fetcher.fetch(DOCKER_GPG_URL).await?;
        let key_path = self.keyring_dir.join("docker.asc");
        std::fs::write(&key_path, key)?;
        tracing::info!("[Packages] Trusted Docker signing key at {}", key_path.display());

        let arch_out =
            run_checked(self.runner, &CommandSpec::new("dpkg", &["--print-architecture"])).await?;
        let arch = arch_out.stdout.trim().to_string();
        if arch.is_empty() {
            return Err(ProvisionError::Config(
                "dpkg reported no architecture".to_string(),
            ));
        }

        let codename = os.codename().ok_or_else(|| {
            ProvisionError::Config(format!(
                "no release codename known for debian {}",
                os.version_id
            ))
        })?;

        if let Some(parent) = self.sources_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = repo_line(&arch, codename, &key_path);
        std::fs::write(&self.sources_path, format!("{}\n", line))?;
        tracing::info!(
            "[Packages] Registered Docker apt repository ({} {})",
            codename,
            arch
        );
        Ok(())
    }

    /// Best-effort: continues with a warning when the invoking user cannot
    /// be determined.
    async fn grant_docker_group(&self) -> Result<(), ProvisionError> {
        match &self.sudo_user {
            Some(user) => {
                run_checked(
                    self.runner,
                    &CommandSpec::new("usermod", &["-aG", "docker", user.as_str()]),
                )
                .await?;
                tracing::info!(
                    "[Packages] Added {} to the docker group (re-login required)",
                    user
                );
            }
            None => {
                tracing::warn!(
                    "[Packages] Cannot determine the invoking user (SUDO_USER unset); \
                     skipping docker group membership"
                );
            }
        }
        Ok(())
    }
}
