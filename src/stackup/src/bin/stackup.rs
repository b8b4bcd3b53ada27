//! stackup CLI entry point.

use clap::Parser;
use stackup::exec::HostRunner;
use stackup::netaddr::AddressSource;
use stackup::packages::HttpKeyFetcher;
use stackup::pipeline::{LogReporter, Pipeline, PipelineOptions, RunSummary};
use stackup::stack::StackProfile;
use stackup::{logger, ProvisionError, StackConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stackup",
    version,
    about = "Provision a Debian host with Docker and launch the service stack"
)]
struct Args {
    /// Service profile to materialize
    #[arg(long, value_enum)]
    profile: Option<StackProfile>,

    /// Static IPv4 address, used verbatim (skips auto-detection)
    #[arg(long)]
    ip: Option<String>,

    /// Prompt for the address on stdin instead of auto-detecting
    #[arg(long, conflicts_with = "ip")]
    prompt: bool,

    /// Working directory for the generated files
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Path to a stackup.toml config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the generated files without installing packages or launching
    #[arg(long)]
    render_only: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(args.verbose);

    match run(args).await {
        Ok(summary) => {
            println!(
                "Stack is up at http://{}/ ({} services, files in {})",
                summary.address,
                summary.services.len(),
                summary.workdir.display()
            );
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<RunSummary, ProvisionError> {
    let mut config = StackConfig::load(args.config.as_deref())?;
    if let Some(profile) = args.profile {
        config.profile = profile;
    }
    if let Some(workdir) = args.workdir {
        config.workdir = workdir;
    }

    let address = if let Some(ip) = args.ip {
        AddressSource::Static(ip)
    } else if args.prompt {
        AddressSource::Prompt
    } else {
        AddressSource::Auto
    };

    let options = PipelineOptions {
        address,
        render_only: args.render_only,
        require_root: !args.render_only,
        ..PipelineOptions::default()
    };

    let runner = HostRunner;
    let key_fetcher = HttpKeyFetcher::new();
    let reporter = LogReporter;

    Pipeline::new(config, options, &runner, &key_fetcher, &reporter)
        .run()
        .await
}
