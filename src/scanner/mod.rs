//! Scanner module - the concurrent scan engine.
//!
//! Coordinates probe dispatch across a port set under a bounded
//! concurrency limit, collects every outcome, and assembles the final
//! report. Probes run as tokio tasks; a semaphore provides admission
//! control so an arbitrarily large port set cannot exhaust descriptors.

pub mod probe;
pub mod tcp;

pub use probe::{ProbeOutcome, Prober};
pub use tcp::TcpProber;

use crate::config;
use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortSet};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tracing::debug;

/// How many probe futures the dispatch stream keeps in its buffer.
/// Deliberately high; the semaphore controls actual concurrency.
const PROBE_BUFFER: usize = 1000;

/// Signals cancellation to a running scan.
///
/// Created together with its [`CancelToken`]; typically the CLI wires an
/// interrupt handler to `cancel()`. Cancellation is cooperative: ports
/// not yet dispatched are skipped and in-flight probes are abandoned at
/// their suspension point.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Create a handle/token pair.
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelToken { rx })
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes cancellation inside a running scan.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Check whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is signalled. If the handle is dropped
    /// without cancelling, this never resolves.
    pub async fn cancelled(mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Configuration for one scan invocation.
#[derive(Debug)]
pub struct ScanJob {
    ports: PortSet,
    concurrency: usize,
    show_progress: bool,
    cancel: Option<CancelToken>,
}

impl ScanJob {
    /// Create a job for the given port set with default settings.
    pub fn new(ports: PortSet) -> Self {
        Self {
            ports,
            concurrency: config::DEFAULT_CONCURRENCY,
            show_progress: false,
            cancel: None,
        }
    }

    /// Set the maximum number of simultaneously in-flight probes.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Show a progress bar while scanning.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Attach an external cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Complete scan results: the open ports plus per-outcome statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub ports_requested: usize,
    pub probes_completed: usize,
    /// Confirmed open ports, ascending.
    pub open_ports: Vec<u16>,
    pub closed: usize,
    pub timed_out: usize,
    pub errored: usize,
    pub duration_ms: u64,
    /// True when the scan was interrupted; `open_ports` then holds only
    /// the ports confirmed before the interrupt.
    pub cancelled: bool,
}

/// Execute a complete port scan.
///
/// Dispatches one probe per port through `prober`, at most
/// `job.concurrency` in flight at a time, and collects every outcome.
/// Per-probe failures (refusal, timeout, transport errors) are absorbed
/// into counters; a single port's failure never aborts the scan. The
/// returned report lists the confirmed open ports in ascending order.
pub async fn run_scan<P>(prober: Arc<P>, job: ScanJob) -> ScanResult<ScanReport>
where
    P: Prober + ?Sized + 'static,
{
    let ScanJob {
        ports,
        concurrency,
        show_progress,
        cancel,
    } = job;

    if concurrency == 0 {
        return Err(ScanError::InvalidConfig(
            "concurrency must be at least 1".to_string(),
        ));
    }

    let start = Instant::now();
    let target = prober.target().to_string();
    let ports_requested = ports.len();

    let progress = if show_progress {
        let pb = ProgressBar::new(ports_requested as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let cancel = cancel.unwrap_or_else(|| {
        let (_handle, token) = CancelHandle::new();
        token
    });

    let outcomes: Vec<(Port, ProbeOutcome)> = stream::iter(ports)
        .map(|port| {
            let sem = Arc::clone(&semaphore);
            let prober = Arc::clone(&prober);
            let cancel = cancel.clone();
            let progress = progress.clone();

            async move {
                // Acquire an admission slot before touching the network.
                let _permit = sem.acquire().await.unwrap();

                // Ports not yet dispatched when cancellation lands are
                // abandoned without an outcome.
                if cancel.is_cancelled() {
                    return None;
                }

                let outcome = prober.probe(port).await;

                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if outcome.is_open() {
                        pb.set_message(format!("Found open port: {}", port));
                    }
                }

                Some((port, outcome))
            }
        })
        .buffer_unordered(PROBE_BUFFER) // semaphore controls actual concurrency
        .take_until(cancel.clone().cancelled())
        .filter_map(|resolved| async move { resolved })
        .collect()
        .await;

    let mut open_ports: Vec<u16> = Vec::new();
    let (mut closed, mut timed_out, mut errored) = (0usize, 0usize, 0usize);

    for (port, outcome) in &outcomes {
        match outcome {
            ProbeOutcome::Open => open_ports.push(port.as_u16()),
            ProbeOutcome::Closed => closed += 1,
            ProbeOutcome::TimedOut => timed_out += 1,
            ProbeOutcome::Errored(reason) => {
                debug!(%port, %reason, "probe errored");
                errored += 1;
            }
        }
    }

    // The port set cannot contain duplicates, but the concurrent
    // collection must not introduce any either. Ordering is imposed once,
    // here, not maintained incrementally.
    open_ports.sort_unstable();
    open_ports.dedup();

    let cancelled = cancel.is_cancelled();

    if let Some(pb) = progress {
        if cancelled {
            pb.abandon_with_message("Scan interrupted");
        } else {
            pb.finish_with_message("Scan complete");
        }
    }

    if cancelled {
        debug!(
            completed = outcomes.len(),
            requested = ports_requested,
            "scan cancelled early"
        );
    }

    Ok(ScanReport {
        target,
        ports_requested,
        probes_completed: outcomes.len(),
        open_ports,
        closed,
        timed_out,
        errored,
        duration_ms: start.elapsed().as_millis() as u64,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted prober: configured ports report open, everything else
    /// closed, after a fixed delay. Tracks the peak number of concurrent
    /// probes.
    struct FakeProber {
        open: BTreeSet<u16>,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeProber {
        fn new(open: &[u16], delay: Duration) -> Self {
            Self {
                open: open.iter().copied().collect(),
                delay,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, port: Port) -> ProbeOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.open.contains(&port.as_u16()) {
                ProbeOutcome::Open
            } else {
                ProbeOutcome::Closed
            }
        }

        fn target(&self) -> IpAddr {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }

    /// Prober that cycles through every outcome variant by port number.
    struct MixedProber;

    #[async_trait]
    impl Prober for MixedProber {
        async fn probe(&self, port: Port) -> ProbeOutcome {
            match port.as_u16() % 4 {
                0 => ProbeOutcome::Open,
                1 => ProbeOutcome::Closed,
                2 => ProbeOutcome::TimedOut,
                _ => ProbeOutcome::Errored("host unreachable".to_string()),
            }
        }

        fn target(&self) -> IpAddr {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }

    /// Prober where low ports resolve instantly and the rest hang far
    /// past any reasonable test duration.
    struct SlowTailProber;

    #[async_trait]
    impl Prober for SlowTailProber {
        async fn probe(&self, port: Port) -> ProbeOutcome {
            if port.as_u16() <= 5 {
                ProbeOutcome::Open
            } else {
                tokio::time::sleep(Duration::from_secs(600)).await;
                ProbeOutcome::Closed
            }
        }

        fn target(&self) -> IpAddr {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }

    fn ports(spec: &str) -> PortSet {
        spec.parse().unwrap()
    }

    #[tokio::test]
    async fn test_open_ports_exact_and_ascending() {
        let prober = Arc::new(FakeProber::new(&[80, 22], Duration::from_millis(1)));
        let job = ScanJob::new(ports("20-25,79-81")).with_concurrency(16);

        let report = run_scan(Arc::clone(&prober), job).await.unwrap();

        assert_eq!(report.open_ports, vec![22, 80]);
        assert_eq!(report.ports_requested, 9);
        assert_eq!(report.probes_completed, 9);
        assert_eq!(report.closed, 7);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let prober = Arc::new(FakeProber::new(&[], Duration::from_millis(2)));
        let job = ScanJob::new(ports("1-20")).with_concurrency(1);

        run_scan(Arc::clone(&prober), job).await.unwrap();

        assert_eq!(prober.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_bound_does_not_change_results() {
        let serial = Arc::new(FakeProber::new(&[3, 7, 11], Duration::from_millis(1)));
        let parallel = Arc::new(FakeProber::new(&[3, 7, 11], Duration::from_millis(1)));

        let a = run_scan(serial, ScanJob::new(ports("1-12")).with_concurrency(1))
            .await
            .unwrap();
        let b = run_scan(parallel, ScanJob::new(ports("1-12")).with_concurrency(8))
            .await
            .unwrap();

        assert_eq!(a.open_ports, vec![3, 7, 11]);
        assert_eq!(a.open_ports, b.open_ports);
    }

    #[tokio::test]
    async fn test_per_probe_failures_are_absorbed() {
        let prober = Arc::new(MixedProber);
        let job = ScanJob::new(ports("1-40")).with_concurrency(8);

        let report = run_scan(prober, job).await.unwrap();

        // Ports 4, 8, ..., 40 report open; the rest split across the
        // failure variants without aborting anything.
        assert_eq!(report.open_ports, (1..=10).map(|n| n * 4).collect::<Vec<u16>>());
        assert_eq!(report.closed, 10);
        assert_eq!(report.timed_out, 10);
        assert_eq!(report.errored, 10);
        assert_eq!(report.probes_completed, 40);
    }

    #[tokio::test]
    async fn test_cancellation_reports_partial_results() {
        let prober = Arc::new(SlowTailProber);
        let (handle, token) = CancelHandle::new();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            handle.cancel();
        });

        let job = ScanJob::new(ports("1-50"))
            .with_concurrency(64)
            .with_cancel(token);

        let start = std::time::Instant::now();
        let report = run_scan(prober, job).await.unwrap();

        assert!(report.cancelled);
        // Only probes that resolved before the interrupt are reported.
        assert_eq!(report.open_ports, vec![1, 2, 3, 4, 5]);
        assert_eq!(report.probes_completed, 5);
        // The hung probes were abandoned, not awaited.
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_rejected() {
        let prober = Arc::new(FakeProber::new(&[], Duration::ZERO));
        let job = ScanJob::new(ports("1-4")).with_concurrency(0);

        let err = run_scan(prober, job).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_empty_port_set_is_not_an_error() {
        let prober = Arc::new(FakeProber::new(&[], Duration::ZERO));
        let report = run_scan(prober, ScanJob::new(PortSet::new())).await.unwrap();

        assert!(report.open_ports.is_empty());
        assert_eq!(report.ports_requested, 0);
        assert_eq!(report.probes_completed, 0);
        assert!(!report.cancelled);
    }
}
