//! Resolves the host IPv4 address used to template the stack.
//!
//! Auto-detection shells out to `ip` and pattern-matches its stdout: first
//! the default-route interface, then the first inet address on it. The
//! static and prompt variants accept any non-empty string verbatim; no
//! syntactic validation is applied beyond that.

use crate::error::ProvisionError;
use crate::exec::{run_checked, CommandRunner, CommandSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;

static INET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"inet\s+((?:\d{1,3}\.){3}\d{1,3})").expect("inet regex"));

/// Where the address comes from.
#[derive(Debug, Clone)]
pub enum AddressSource {
    /// Inspect the default route and take the interface's first IPv4 address.
    Auto,
    /// Operator-supplied value, used verbatim.
    Static(String),
    /// Ask on stdin.
    Prompt,
}

/// Interface name from `ip route show default` output: the token after
/// `dev` on the first default line.
pub fn parse_default_route(output: &str) -> Option<String> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("default"))?;
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "dev" {
            return tokens
                .next()
                .map(String::from)
                .filter(|name| !name.is_empty());
        }
    }
    None
}

/// First dotted quad after `inet` in `ip -4 addr show` output.
pub fn parse_inet_addr(output: &str) -> Option<String> {
    INET_RE
        .captures(output)
        .map(|captures| captures[1].to_string())
}

pub async fn resolve(
    source: &AddressSource,
    runner: &dyn CommandRunner,
) -> Result<String, ProvisionError> {
    match source {
        AddressSource::Static(addr) => {
            let addr = addr.trim();
            if addr.is_empty() {
                return Err(ProvisionError::Address(
                    "supplied address is empty".to_string(),
                ));
            }
            Ok(addr.to_string())
        }
        AddressSource::Prompt => {
            println!("Enter the static IPv4 address for this host:");
            prompt_for_address(&mut std::io::stdin().lock())
        }
        AddressSource::Auto => detect(runner).await,
    }
}

/// Read one line and accept it verbatim; empty after trimming is fatal.
pub fn prompt_for_address(input: &mut dyn BufRead) -> Result<String, ProvisionError> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(ProvisionError::Io)?;
    let addr = line.trim();
    if addr.is_empty() {
        Err(ProvisionError::Address("no address entered".to_string()))
    } else {
        Ok(addr.to_string())
    }
}

/// Auto-detect the primary address from host routing state.
pub async fn detect(runner: &dyn CommandRunner) -> Result<String, ProvisionError> {
    let route = run_checked(runner, &CommandSpec::new("ip", &["route", "show", "default"])).await?;
    let iface = parse_default_route(&route.stdout).ok_or_else(|| {
        ProvisionError::Address("no default-route interface found".to_string())
    })?;
    tracing::info!("[NetAddr] Default route interface: {}", iface);

    let addr_out = run_checked(
        runner,
        &CommandSpec::new("ip", &["-4", "addr", "show", "dev", iface.as_str()]),
    )
    .await?;
    let addr = parse_inet_addr(&addr_out.stdout).ok_or_else(|| {
        ProvisionError::Address(format!("no IPv4 address on interface {}", iface))
    })?;
    tracing::info!("[NetAddr] Detected host address: {}", addr);
    Ok(addr)
}
