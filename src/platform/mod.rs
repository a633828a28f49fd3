use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use wait_timeout::ChildExt;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_command(cmd: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn process: {cmd}"))?;

    let status = match child
        .wait_timeout(timeout)
        .with_context(|| format!("failed to wait on process: {cmd}"))?
    {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow!("timed out after {timeout:?}: {cmd}"));
        }
    };

    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_string(&mut stdout);
    }
    let mut stderr = String::new();
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_string(&mut stderr);
    }

    Ok(CommandOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(all(unix, not(target_os = "macos")))]
const OPENER: &str = "xdg-open";
#[cfg(windows)]
const OPENER: &str = "explorer";

/// Hands a destination string to the OS opener, the terminal counterpart of
/// full-document navigation. The opener is waited on with a bounded timeout
/// and killed on expiry.
pub fn open_destination(destination: &str, timeout: Duration) -> Result<()> {
    let output = run_command(OPENER, &[destination], timeout)
        .with_context(|| format!("failed to open destination: {destination}"))
        .map_err(crate::exit::external_cmd_err)?;

    if output.exit_code != 0 {
        let mut msg = format!(
            "opener exited with code {}: {OPENER} {destination}",
            output.exit_code
        );
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            msg.push_str(&format!("\n{stderr}"));
        }
        return Err(crate::exit::external_cmd(msg));
    }
    Ok(())
}

pub fn effective_home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("HOME environment variable is not set"))
}
