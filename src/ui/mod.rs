use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::core::{Finding, FindingsReport};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
    pub max_table_rows: usize,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(stderr, "  - re-run with `--verbose` to see more detail");
    let _ = writeln!(
        stderr,
        "  - see `speclens --help` for available commands and options"
    );
}

pub fn print_findings(report: &FindingsReport, cfg: &UiConfig, top_n: usize) {
    if cfg.quiet {
        return;
    }

    let mut out = io::stdout().lock();
    let counts = report
        .summary
        .by_status
        .iter()
        .map(|(status, count)| format!("{status}={count}"))
        .collect::<Vec<_>>()
        .join("  ");
    if counts.is_empty() {
        let _ = writeln!(out, "Summary: total={}", report.summary.total);
    } else {
        let _ = writeln!(out, "Summary: total={}  {counts}", report.summary.total);
    }

    let total = report.findings.len();
    let rows = cfg.max_table_rows.min(top_n).min(total);

    let _ = writeln!(out);
    if total > rows {
        let _ = writeln!(out, "Findings ({rows} of {total} shown):");
    } else {
        let _ = writeln!(out, "Findings ({total}):");
    }
    print_findings_table(&mut out, &report.findings, rows, cfg);
}

fn print_findings_table(out: &mut dyn Write, findings: &[Finding], rows: usize, cfg: &UiConfig) {
    let label_status = "Status";
    let label_category = "Category";
    let label_measurement = "Measurement";
    let label_evidence = "Evidence";
    let label_message = "Message";

    let shown = &findings[..rows.min(findings.len())];
    let status_w = column_width(shown.iter().map(|f| f.status.as_str()), label_status);
    let category_w = column_width(shown.iter().map(|f| f.qa_category.as_str()), label_category);
    let measurement_w = column_width(shown.iter().map(|f| f.measurement.as_str()), label_measurement);
    let evidence_w = column_width(shown.iter().map(|f| f.evidence_id.as_str()), label_evidence);

    let messages: Vec<String> = shown
        .iter()
        .map(|f| {
            if cfg.verbose {
                f.message.clone()
            } else {
                truncate_middle(&f.message, 60)
            }
        })
        .collect();
    let message_w = column_width(messages.iter().map(String::as_str), label_message);

    let _ = writeln!(
        out,
        "{}  {}  {}  {}  {}",
        pad_end_display(label_status, status_w),
        pad_end_display(label_category, category_w),
        pad_end_display(label_measurement, measurement_w),
        pad_end_display(label_evidence, evidence_w),
        label_message
    );
    let _ = writeln!(
        out,
        "{}  {}  {}  {}  {}",
        "-".repeat(status_w),
        "-".repeat(category_w),
        "-".repeat(measurement_w),
        "-".repeat(evidence_w),
        "-".repeat(message_w)
    );

    for (finding, message) in shown.iter().zip(&messages) {
        let status = pad_end_ansi(&format_status(&finding.status, cfg.color), status_w);
        let _ = writeln!(
            out,
            "{status}  {}  {}  {}  {message}",
            pad_end_display(&finding.qa_category, category_w),
            pad_end_display(&finding.measurement, measurement_w),
            pad_end_display(&finding.evidence_id, evidence_w),
        );
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, label: &str) -> usize {
    values
        .map(visible_width_ansi)
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi(label))
}

fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    let code = match status.to_ascii_lowercase().as_str() {
        "success" | "pass" | "passed" => "32",
        "failure" | "fail" | "failed" | "error" => "31",
        "info" => "36",
        "ignore" | "ignored" | "skipped" => "90",
        _ => return status.to_string(),
    };
    format!("\x1b[{code}m{status}\x1b[0m")
}

fn pad_end_ansi(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                let _ = chars.next();
                while let Some(ch2) = chars.next() {
                    if ch2 == 'm' {
                        break;
                    }
                }
                continue;
            }
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}

pub fn truncate_middle(s: &str, max_chars: usize) -> String {
    let len = s.chars().count();
    if len <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let left = keep / 2;
    let right = keep.saturating_sub(left);

    let prefix: String = s.chars().take(left).collect();
    let suffix: String = s
        .chars()
        .rev()
        .take(right)
        .collect::<String>()
        .chars()
        .rev()
        .collect();

    format!("{prefix}...{suffix}")
}
