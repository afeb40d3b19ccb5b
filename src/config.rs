//! Built-in scan defaults.
//!
//! Shared by the engine and the CLI surface so the two never disagree.
//! The scanner keeps no state between runs, so there is nothing to
//! persist; defaults live here as constants.

use std::time::Duration;

/// Per-probe timeout applied when `--timeout` is omitted.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// String form of [`DEFAULT_TIMEOUT`] in seconds, for clap's help output.
pub const DEFAULT_TIMEOUT_SECS: &str = "2";

/// Upper bound on simultaneously in-flight probes when `--concurrency`
/// is omitted.
pub const DEFAULT_CONCURRENCY: usize = 1000;
