//! Writes the generated files into the working directory and launches the
//! stack.
//!
//! Re-running overwrites the generated files; reconciliation of already
//! running containers is left to `docker compose` itself. Completion means
//! the compose command returned, nothing more - service health is not
//! verified.

use crate::error::ProvisionError;
use crate::exec::{run_checked, CommandRunner, CommandSpec};
use crate::stack::profile::StackPlan;
use crate::stack::{render_compose, render_proxy};
use std::path::PathBuf;

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const PROXY_FILE: &str = "nginx.conf";

pub struct Materializer<'a> {
    runner: &'a dyn CommandRunner,
    workdir: PathBuf,
}

impl<'a> Materializer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, workdir: PathBuf) -> Self {
        Self { runner, workdir }
    }

    /// Create the working directory and write both generated files,
    /// overwriting whatever a previous run left there.
    pub fn write(&self, plan: &StackPlan) -> Result<(), ProvisionError> {
        std::fs::create_dir_all(&self.workdir)?;

        let compose = render_compose(plan)?;
        std::fs::write(self.workdir.join(COMPOSE_FILE), compose)?;

        let proxy = render_proxy(plan)?;
        std::fs::write(self.workdir.join(PROXY_FILE), proxy)?;

        tracing::info!(
            "[Materializer] Wrote {} and {} to {}",
            COMPOSE_FILE,
            PROXY_FILE,
            self.workdir.display()
        );
        Ok(())
    }

    /// Bring the stack up detached.
    pub async fn launch(&self) -> Result<(), ProvisionError> {
        tracing::info!("[Materializer] Launching stack (docker compose up -d)");
        let spec = CommandSpec::new("docker", &["compose", "up", "-d"]).cwd(self.workdir.clone());
        run_checked(self.runner, &spec).await?;
        tracing::info!("[Materializer] Stack launched");
        Ok(())
    }
}
