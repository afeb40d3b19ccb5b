//! Shoal binary entrypoint.
//!
//! Parses the CLI surface, wires the interrupt handler to the scan's
//! cancellation token, runs the scan, and renders the report.

use anyhow::Result;
use clap::Parser;
use std::net::IpAddr;
use std::sync::Arc;

use shoal::cli::{Args, OutputFormat};
use shoal::output;
use shoal::scanner::{run_scan, CancelHandle, ScanJob, TcpProber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // A malformed specification terminates before any scanning begins.
    let ports = match args.port_set() {
        Ok(ports) => ports,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(2);
        }
    };

    let target = IpAddr::V4(args.ip);

    if args.output == OutputFormat::Table {
        output::print_scan_header(&target.to_string(), ports.len(), args.timeout.as_secs_f64());
    }

    // Ctrl-C abandons outstanding probes; ports confirmed open so far are
    // still reported.
    let (cancel_handle, cancel_token) = CancelHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::print_warning("interrupt received, finishing early");
            cancel_handle.cancel();
        }
    });

    let prober = Arc::new(TcpProber::new(target, args.timeout));
    let mut job = ScanJob::new(ports)
        .with_concurrency(args.concurrency)
        .with_cancel(cancel_token);
    if args.verbose && args.output == OutputFormat::Table {
        job = job.with_progress();
    }

    let report = run_scan(prober, job).await?;
    output::print_report(&report, args.output)?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "shoal=debug" } else { "shoal=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
