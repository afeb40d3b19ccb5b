//! Probe abstraction.
//!
//! Defines the outcome of a single connection attempt and the `Prober`
//! trait the coordinator dispatches through, so the probing mechanism can
//! be swapped out (and faked in tests).

use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Outcome of one connection attempt against one port.
///
/// Every per-probe network condition ends up in one of these variants;
/// none of them propagates as an error. Only `Open` contributes to the
/// final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The connection completed before the deadline.
    Open,
    /// The remote actively refused the connection.
    Closed,
    /// No response arrived before the deadline.
    TimedOut,
    /// Any other transport-level failure, with a coarse cause.
    Errored(String),
}

impl ProbeOutcome {
    /// Check if the probe confirmed an open port.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Errored(reason) => write!(f, "errored ({})", reason),
        }
    }
}

/// Trait for probe implementations.
///
/// A prober owns the target address and the per-attempt deadline; the
/// coordinator hands it one port at a time. Implementations must resolve
/// every attempt to a [`ProbeOutcome`] — never panic, never hang past
/// their deadline.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Attempt one connection and classify the result.
    async fn probe(&self, port: Port) -> ProbeOutcome;

    /// The address being probed, for reporting.
    fn target(&self) -> IpAddr;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProbeOutcome::Open.to_string(), "open");
        assert_eq!(ProbeOutcome::Closed.to_string(), "closed");
        assert_eq!(ProbeOutcome::TimedOut.to_string(), "timed out");
        assert_eq!(
            ProbeOutcome::Errored("network unreachable".into()).to_string(),
            "errored (network unreachable)"
        );
    }

    #[test]
    fn test_only_open_is_open() {
        assert!(ProbeOutcome::Open.is_open());
        assert!(!ProbeOutcome::Closed.is_open());
        assert!(!ProbeOutcome::TimedOut.is_open());
        assert!(!ProbeOutcome::Errored("x".into()).is_open());
    }
}
