use std::io;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{FindingsReport, ValidatedSpec};
use crate::interact::ConsoleInteraction;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "speclens",
    version,
    about = "Flatten validated QA specification artifacts into findings and render them"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract findings from a validated specification artifact and print them
    Findings(FindingsArgs),
    /// Emit a findings report as JSON or markdown
    Report(ReportArgs),
    /// Leave the current session and open a destination in the hosting UI
    Open(OpenArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct FindingsArgs {
    /// Artifact file, or `-` for stdin
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Artifact file, or `-` for stdin
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long)]
    pub markdown: bool,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    pub destination: String,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdin_is_tty = io::stdin().is_terminal();
    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let home_dir = crate::platform::effective_home_dir()?;

    let env_config_path = std::env::var_os("SPECLENS_CONFIG").map(std::path::PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;

    let ui_cfg = UiConfig {
        color,
        stdin_is_tty,
        stdout_is_tty,
        stderr_is_tty,
        max_table_rows: cfg.ui.max_table_rows,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Findings(args) => {
            let spec = read_artifact(&args.input)?;
            let report = crate::extract::report(&spec)?;
            if cli.json {
                write_json(&report)?;
            } else {
                crate::ui::print_findings(&report, &ui_cfg, args.top);
            }
        }
        Commands::Report(args) => {
            let spec = read_artifact(&args.input)?;
            let mut report = crate::extract::report(&spec)?;
            if !cfg.report.include_messages {
                strip_messages(&mut report);
            }
            if cli.json || !args.markdown {
                write_json(&report)?;
            } else {
                write_markdown_summary(&report)?;
            }
        }
        Commands::Open(args) => {
            if cli.json {
                return Err(crate::exit::invalid_args(
                    "open cannot be combined with --json",
                ));
            }
            if !(ui_cfg.stdin_is_tty && ui_cfg.stdout_is_tty) {
                return Err(crate::exit::invalid_args(
                    "open requires a TTY (stdin + stdout)",
                ));
            }

            let mut ui = ConsoleInteraction::new(Duration::from_secs(cli.timeout));
            crate::interact::cancel_submission(&mut ui, &args.destination)?;
        }
        Commands::Completion(_args) => {
            let shell = parse_shell(&_args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "speclens", &mut out);
        }
        Commands::Config(_args) => {
            if _args.show {
                if cli.json {
                    let stdout = std::io::stdout();
                    serde_json::to_writer_pretty(stdout.lock(), &cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `speclens config --show`");
            }
        }
    }

    Ok(())
}

fn read_artifact(path: &Path) -> Result<ValidatedSpec> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("failed to read artifact from stdin")?;
        buf
    } else {
        std::fs::read(path)
            .with_context(|| format!("failed to read artifact: {}", path.display()))?
    };
    crate::extract::parse_artifact(&bytes)
}

fn write_json(report: &FindingsReport) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(report)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn strip_messages(report: &mut FindingsReport) {
    for finding in &mut report.findings {
        finding.message.clear();
    }
}

fn write_markdown_summary(report: &FindingsReport) -> Result<()> {
    use std::io::Write;

    let markdown = format_markdown_summary(report);
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(markdown.as_bytes()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn format_markdown_summary(report: &FindingsReport) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();

    let _ = writeln!(out, "# speclens report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- tool version: {}", report.tool_version);
    let _ = writeln!(out, "- generated at: {}", report.generated_at);
    let _ = writeln!(out, "- total: {}", report.summary.total);
    for (status, count) in &report.summary.by_status {
        let _ = writeln!(out, "- {status}: {count}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Findings ({})", report.findings.len());
    if report.findings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "_No findings._");
    }

    // Extraction order is a contract; the markdown keeps it.
    for f in &report.findings {
        let _ = writeln!(out);
        let _ = writeln!(out, "### {} ({})", f.evidence_id, f.status);
        let _ = writeln!(out, "- qa category: {}", f.qa_category);
        let _ = writeln!(out, "- measurement: {}", f.measurement);
        if !f.message.is_empty() {
            let _ = writeln!(out, "- message: {}", f.message);
        }
    }

    let _ = writeln!(out);
    out
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}
