//! TCP connect prober.
//!
//! Performs standard TCP connect probes using the operating system's
//! socket API via tokio. Completing the full handshake is the most
//! reliable way to confirm a listener and needs no special privileges.

use crate::scanner::probe::{ProbeOutcome, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Probes ports by attempting a full TCP connection.
///
/// Each probe owns a transient socket for the duration of the attempt;
/// the socket is released on every exit path (the stream is dropped on
/// success, and dropping the connect future on timeout or failure closes
/// the descriptor).
pub struct TcpProber {
    target: IpAddr,
    timeout: Duration,
}

impl TcpProber {
    /// Create a new TCP prober for the given target and per-attempt deadline.
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Map a connect error to an outcome. Refusal means a reachable host
    /// with no listener; everything else is a coarse transport failure.
    fn classify(err: &io::Error) -> ProbeOutcome {
        match err.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                ProbeOutcome::Closed
            }
            kind => ProbeOutcome::Errored(kind.to_string()),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, port: Port) -> ProbeOutcome {
        let addr = SocketAddr::new(self.target, port.as_u16());

        let outcome = match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                // No data exchanged; release the socket immediately.
                drop(stream);
                ProbeOutcome::Open
            }
            Ok(Err(e)) => Self::classify(&e),
            Err(_) => ProbeOutcome::TimedOut,
        };

        trace!(%addr, %outcome, "probe resolved");
        outcome
    }

    fn target(&self) -> IpAddr {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Instant;
    use tokio::net::TcpListener;

    fn loopback_prober(timeout: Duration) -> TcpProber {
        TcpProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), timeout)
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let prober = loopback_prober(Duration::from_secs(1));
        let outcome = prober.probe(Port::new_unchecked(port)).await;

        assert_eq!(outcome, ProbeOutcome::Open);
    }

    #[tokio::test]
    async fn test_probe_refused_port() {
        // Bind to grab a free port, then drop the listener so nothing is
        // listening when the probe arrives.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = loopback_prober(Duration::from_secs(1));
        let outcome = prober.probe(Port::new_unchecked(port)).await;

        assert_eq!(outcome, ProbeOutcome::Closed);
    }

    #[tokio::test]
    async fn test_probe_blackhole_resolves_within_deadline() {
        // 10.255.255.1 is a reserved private address that drops SYNs on
        // most networks; depending on routing it may instead be reported
        // unreachable. Either way the probe must resolve, not hang.
        let prober = TcpProber::new(
            IpAddr::V4(Ipv4Addr::new(10, 255, 255, 1)),
            Duration::from_millis(250),
        );

        let start = Instant::now();
        let outcome = prober.probe(Port::new_unchecked(81)).await;
        let elapsed = start.elapsed();

        assert!(matches!(
            outcome,
            ProbeOutcome::TimedOut | ProbeOutcome::Errored(_)
        ));
        assert!(elapsed < Duration::from_secs(5));
    }
}
