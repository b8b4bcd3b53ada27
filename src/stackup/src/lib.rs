//! stackup - provisions a Debian host with Docker Engine and materializes a
//! fixed multi-service stack (git hosting, kanban, file sync, optionally a
//! project-management suite) behind an nginx reverse proxy.
//!
//! One binary, parameterized by service profile and address-resolution
//! strategy. The pipeline is strictly linear: preflight, address resolution,
//! package installation, stack materialization, launch. Any failure aborts
//! the whole run.

pub mod config;
pub mod error;
pub mod exec;
pub mod logger;
pub mod materializer;
pub mod netaddr;
pub mod packages;
pub mod pipeline;
pub mod preflight;
pub mod stack;
pub mod templates;

pub use config::StackConfig;
pub use error::ProvisionError;
pub use pipeline::{Pipeline, PipelineOptions, RunSummary};
