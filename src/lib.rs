//! # Shoal - A Concurrent TCP Port Scanner
//!
//! Shoal probes a set of TCP ports on a single target host and reports
//! the ports that accept a connection within a bounded time.
//!
//! ## Features
//!
//! - **Concurrent scan engine**: many connection attempts in flight at
//!   once, bounded by a configurable admission limit
//! - **Failure isolation**: refusals, timeouts, and transport errors are
//!   per-port outcomes, never scan-level failures
//! - **Flexible port specifications**: single ports, comma lists, and
//!   inclusive ranges ("22,80,8000-9000")
//! - **Cooperative cancellation**: an interrupt reports the open ports
//!   confirmed so far instead of discarding them
//! - **Table and JSON output**
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use shoal::{run_scan, PortSet, ScanJob, TcpProber};
//! use std::net::IpAddr;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target: IpAddr = "192.168.1.1".parse().unwrap();
//!     let prober = Arc::new(TcpProber::new(target, Duration::from_secs(2)));
//!
//!     let ports: PortSet = "22,80,443".parse().unwrap();
//!     let report = run_scan(prober, ScanJob::new(ports)).await.unwrap();
//!
//!     println!("open: {:?}", report.open_ports);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - `Port` and `PortSet` with validated parsing
//! - [`scanner`] - the probe executor and the concurrent scan coordinator
//! - [`config`] - built-in defaults shared with the CLI
//! - [`error`] - error types for specification and setup failures
//! - [`output`] - report rendering utilities
//! - [`cli`] - clap argument surface for the binary

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use scanner::{
    run_scan, CancelHandle, CancelToken, ProbeOutcome, Prober, ScanJob, ScanReport, TcpProber,
};
pub use types::{Port, PortError, PortSet};
