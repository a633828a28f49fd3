use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;

/// User-interaction capability of the hosting environment. Implementations
/// provide blocking modal dialogs and full-navigation semantics so the form
/// helpers stay headlessly testable.
pub trait Interaction {
    /// Blocking, dismiss-only notification.
    fn alert(&mut self, message: &str) -> Result<()>;
    /// Blocking yes/no confirmation.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
    /// Leave the current view for `destination`.
    fn navigate(&mut self, destination: &str) -> Result<()>;
}

/// Announces a successful save of a named artifact.
pub fn notify_saved(
    ui: &mut dyn Interaction,
    artifact_type: &str,
    artifact_name: &str,
) -> Result<()> {
    ui.alert(&format!(
        "{artifact_type}, {artifact_name}, has been saved successfully."
    ))
}

/// Announces a generic input-validation failure.
pub fn notify_invalid_submission(ui: &mut dyn Interaction) -> Result<()> {
    ui.alert("One or more invalid fields in submission.")
}

/// Confirms abandoning an unsaved form, then redirects. The destination is
/// handed to the capability untransformed. Declining returns with no side
/// effect.
pub fn cancel_submission(ui: &mut dyn Interaction, redirect: &str) -> Result<()> {
    if ui.confirm("Are you sure you want to leave this page? All unsaved changes will be lost.")? {
        ui.navigate(redirect)?;
    }
    Ok(())
}

/// Terminal implementation of the capability: dialogs on stderr/stdin,
/// navigation via the OS opener.
#[derive(Debug, Clone)]
pub struct ConsoleInteraction {
    opener_timeout: Duration,
}

impl ConsoleInteraction {
    pub fn new(opener_timeout: Duration) -> Self {
        Self { opener_timeout }
    }
}

impl Interaction for ConsoleInteraction {
    fn alert(&mut self, message: &str) -> Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{message}")?;
        write!(stderr, "Press Enter to continue: ")?;
        stderr.flush()?;
        drop(stderr);

        let mut input = String::new();
        let _ = io::stdin().lock().read_line(&mut input)?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        for _ in 0..2 {
            let mut stderr = io::stderr().lock();
            write!(stderr, "{prompt} [y/N]: ")?;
            stderr.flush()?;
            drop(stderr);

            let mut input = String::new();
            let n = io::stdin().lock().read_line(&mut input)?;
            if n == 0 {
                return Ok(false);
            }
            if let Some(answer) = parse_answer(&input) {
                return Ok(answer);
            }
        }
        Ok(false)
    }

    fn navigate(&mut self, destination: &str) -> Result<()> {
        crate::platform::open_destination(destination, self.opener_timeout)
    }
}

/// Maps one line of console input to a confirmation answer. Empty input
/// declines; unrecognized input is `None` so the caller can reprompt.
pub fn parse_answer(input: &str) -> Option<bool> {
    let s = input.trim().to_ascii_lowercase();
    match s.as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}
