//! Command-line interface definitions for shoal.
//!
//! Uses `clap` derive macros for declarative argument parsing. The CLI is
//! the collaborator that supplies the core with a target address, a port
//! set, and a timeout; anything malformed is rejected here, before any
//! scanning begins.

use crate::config;
use crate::error::ScanResult;
use crate::types::PortSet;
use clap::{Parser, ValueEnum};
use std::net::Ipv4Addr;
use std::time::Duration;

/// A concurrent TCP port scanner.
#[derive(Parser, Debug)]
#[command(name = "shoal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port scanner", long_about = None)]
pub struct Args {
    /// Target IPv4 address to scan
    #[arg(long, value_name = "IPV4")]
    pub ip: Ipv4Addr,

    /// Ports to scan (e.g., "80", "80,443", "1-1000", "22,80,8000-9000");
    /// a built-in set of common ports is scanned when omitted
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,

    /// Per-probe connection timeout in seconds (fractions allowed)
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        value_parser = parse_timeout,
        default_value = config::DEFAULT_TIMEOUT_SECS
    )]
    pub timeout: Duration,

    /// Maximum number of simultaneously in-flight probes
    #[arg(short, long, default_value_t = config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Verbose output (scan progress and per-probe diagnostics)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the port specification, falling back to the common set
    /// when none was given.
    pub fn port_set(&self) -> ScanResult<PortSet> {
        match &self.ports {
            Some(spec) => Ok(spec.parse()?),
            None => Ok(PortSet::common()),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON structured output
    Json,
}

/// Parse a positive (possibly fractional) number of seconds.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid timeout: {:?}", s))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Ok(Duration::from_secs_f64(secs))
}
