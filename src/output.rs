//! Output formatting module.
//!
//! Renders a scan report as a human-readable table or as JSON, plus the
//! styled error/warning printers used by the binary.

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

/// Format and print a scan report according to the specified format.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Table => print_table(report),
        OutputFormat::Json => print_json(report),
    }
}

/// Print the report as a table mapping the target IP to its open ports.
fn print_table(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "  {}", style("Open Ports").cyan().bold())?;
    writeln!(
        out,
        "  {}",
        style("────────────────────────────────────").dim()
    )?;
    writeln!(
        out,
        "  {:<18}  {}",
        style("IP").bold().magenta(),
        style("PORT").bold().magenta()
    )?;
    writeln!(
        out,
        "  {}",
        style("────────────────────────────────────").dim()
    )?;

    if report.open_ports.is_empty() {
        writeln!(out, "  {:<18}  {}", report.target, style("none").dim())?;
    } else {
        for (idx, port) in report.open_ports.iter().enumerate() {
            let ip = if idx == 0 { report.target.as_str() } else { "" };
            writeln!(out, "  {:<18}  {}", ip, style(port).green().bold())?;
        }
    }

    writeln!(
        out,
        "  {}",
        style("────────────────────────────────────").dim()
    )?;
    writeln!(
        out,
        "  {} probed in {:.2}s: {} open, {} closed, {} timed out, {} errored",
        report.probes_completed,
        report.duration_ms as f64 / 1000.0,
        style(report.open_ports.len()).green().bold(),
        style(report.closed).red(),
        style(report.timed_out).yellow(),
        style(report.errored).yellow()
    )?;

    if report.cancelled {
        writeln!(
            out,
            "  {} scan interrupted after {}/{} probes; results are partial",
            style("note:").yellow().bold(),
            report.probes_completed,
            report.ports_requested
        )?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print the report in JSON format.
fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("{}", json);
    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ports: usize, timeout_secs: f64) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("shoal").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target).white().bold()
    );
    println!(
        "{} Probing {} ports ({}s timeout each)...",
        style("•").dim(),
        style(ports).white().bold(),
        timeout_secs
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScanReport {
        ScanReport {
            target: "127.0.0.1".to_string(),
            ports_requested: 3,
            probes_completed: 3,
            open_ports: vec![22, 80],
            closed: 1,
            timed_out: 0,
            errored: 0,
            duration_ms: 120,
            cancelled: false,
        }
    }

    #[test]
    fn test_report_serializes_open_ports() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        assert!(json.contains("\"open_ports\":[22,80]"));
        assert!(json.contains("\"cancelled\":false"));
    }

    #[test]
    fn test_print_report_does_not_fail() {
        assert!(print_report(&sample_report(), OutputFormat::Table).is_ok());
        assert!(print_report(&sample_report(), OutputFormat::Json).is_ok());
    }
}
