//! The linear provisioning pipeline.
//!
//! Unchecked -> Privilege-Verified -> OS-Verified -> Address-Resolved ->
//! Dependencies-Installed -> Repository-Registered -> Runtime-Installed ->
//! Permissions-Granted -> Files-Materialized -> Stack-Launched.
//! Forward-on-success or abort-on-failure; no retries, no rollback.

use crate::config::StackConfig;
use crate::error::ProvisionError;
use crate::exec::CommandRunner;
use crate::materializer::Materializer;
use crate::netaddr::{self, AddressSource};
use crate::packages::{DockerInstaller, KeyFetcher};
use crate::preflight::{self, OsRelease};
use crate::stack::profile::StackPlan;
use crate::stack::secret::generate_secret;
use std::path::PathBuf;

/// Progress reporter for pipeline stages.
pub trait ProgressReporter: Send + Sync {
    fn emit(&self, percentage: u32, message: &str);
}

/// Reports progress as log lines.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn emit(&self, percentage: u32, message: &str) {
        tracing::info!("[{:>3}%] {}", percentage, message);
    }
}

pub struct PipelineOptions {
    pub address: AddressSource,
    pub os_release_path: PathBuf,
    /// Tests run the pipeline without root; production always requires it.
    pub require_root: bool,
    /// Write the generated files but skip package installation and launch.
    pub render_only: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            address: AddressSource::Auto,
            os_release_path: PathBuf::from(preflight::OS_RELEASE_PATH),
            require_root: true,
            render_only: false,
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub address: String,
    pub workdir: PathBuf,
    pub services: Vec<String>,
}

pub struct Pipeline<'a> {
    config: StackConfig,
    options: PipelineOptions,
    runner: &'a dyn CommandRunner,
    key_fetcher: &'a dyn KeyFetcher,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: StackConfig,
        options: PipelineOptions,
        runner: &'a dyn CommandRunner,
        key_fetcher: &'a dyn KeyFetcher,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            options,
            runner,
            key_fetcher,
            reporter,
        }
    }

    pub async fn run(&self) -> Result<RunSummary, ProvisionError> {
        self.reporter.emit(0, "Checking privileges");
        if self.options.require_root {
            preflight::check_privileges()?;
        }

        self.reporter.emit(3, "Checking OS compatibility");
        let os = OsRelease::load(&self.options.os_release_path)?;
        preflight::check_supported(&os)?;

        self.reporter.emit(5, "Resolving host address");
        let address = netaddr::resolve(&self.options.address, self.runner).await?;
        self.reporter
            .emit(10, &format!("Resolved host address {}", address));

        if self.options.render_only {
            self.reporter.emit(15, "Skipping package installation");
        } else {
            self.reporter.emit(15, "Installing container runtime");
            let installer = DockerInstaller::new(self.runner, self.key_fetcher);
            installer.install(&os).await?;
            self.reporter.emit(60, "Container runtime installed");
        }

        let secret = generate_secret();
        let plan = StackPlan::build(&self.config, &address, &secret);

        let materializer = Materializer::new(self.runner, self.config.workdir.clone());
        materializer.write(&plan)?;
        self.reporter.emit(80, "Stack files materialized");

        if self.options.render_only {
            self.reporter.emit(100, "Render-only run complete");
        } else {
            materializer.launch().await?;
            self.reporter.emit(100, "Stack launched");
        }

        Ok(RunSummary {
            address,
            workdir: self.config.workdir.clone(),
            services: plan.service_names(),
        })
    }
}
