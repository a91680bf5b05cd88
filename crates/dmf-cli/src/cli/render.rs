//! Console lines for run progress and the final report.

use dmf_core::fetch::FetchOutcome;
use dmf_core::pipeline::RunEvent;
use dmf_core::summary::RunSummary;

/// Human-readable byte count (B, KiB, MiB).
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1_048_576.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

fn attempts(n: u32) -> String {
    if n == 1 {
        "1 attempt".to_string()
    } else {
        format!("{} attempts", n)
    }
}

/// Line to print for `event`, if any.
pub fn event_line(event: &RunEvent<'_>) -> Option<String> {
    match *event {
        RunEvent::PhaseStarted(_) => None,
        RunEvent::ItemStarted { index, total, item } => {
            Some(format!("[{}/{}] {} ...", index + 1, total, item))
        }
        RunEvent::Discovered(plan) => Some(format!(
            "App {}: config {}, output {}",
            plan.app,
            plan.config_file.display(),
            plan.output_dir.display()
        )),
        RunEvent::Extracted { path, count } => {
            Some(format!("Found {} depot id(s) in {}", count, path.display()))
        }
        RunEvent::Resolved {
            resolved,
            unresolved,
        } => {
            if unresolved.is_empty() {
                Some(format!("Resolved {} manifest(s)", resolved))
            } else {
                let ids: Vec<&str> = unresolved.iter().map(|d| d.as_str()).collect();
                Some(format!(
                    "Resolved {} manifest(s); no public manifest for {}",
                    resolved,
                    ids.join(", ")
                ))
            }
        }
        RunEvent::ItemFinished {
            index,
            total,
            item,
            outcome,
        } => {
            let status = match outcome {
                FetchOutcome::Downloaded { bytes, attempts: n } => {
                    format!("downloaded {} ({})", format_bytes(*bytes), attempts(*n))
                }
                FetchOutcome::Skipped { bytes } => {
                    format!("already present ({})", format_bytes(*bytes))
                }
                FetchOutcome::Failed { error, attempts: n } => {
                    format!("FAILED after {}: {}", attempts(*n), error)
                }
            };
            Some(format!("[{}/{}] {} {}", index + 1, total, item, status))
        }
    }
}

/// Final report, one line per entry.
pub fn report(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Done in {:.1}s: {} item(s), {} downloaded ({}, {}/s), {} already present, {} failed",
        summary.elapsed().as_secs_f64(),
        summary.processed(),
        summary.downloaded,
        format_bytes(summary.bytes_downloaded),
        format_bytes(summary.bytes_per_sec() as u64),
        summary.skipped,
        summary.failed_count()
    )];
    if !summary.unresolved.is_empty() {
        let ids: Vec<&str> = summary.unresolved.iter().map(|d| d.as_str()).collect();
        lines.push(format!("Without public manifest: {}", ids.join(", ")));
    }
    if !summary.failed.is_empty() {
        lines.push("Failed:".to_string());
        for f in &summary.failed {
            lines.push(format!(
                "  {}_{}: {} ({})",
                f.depot,
                f.manifest,
                f.error,
                attempts(f.attempts)
            ));
        }
    }
    lines
}
