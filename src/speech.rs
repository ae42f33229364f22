use std::process::{Child, Command, Stdio};

use log::{debug, warn};

use crate::error::ClockError;
use crate::hardware::SpeechSink;

/// Text to speech through the `espeak` command line synthesizer.
pub struct Espeak {
    program: String,
    args: Vec<String>,
    pending: Option<Child>,
}

impl Default for Espeak {
    fn default() -> Self {
        Self::with_program("espeak", &["-a", "200", "-s", "130"])
    }
}

impl Espeak {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another program; the text is passed as its last argument.
    pub fn with_program(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            pending: None,
        }
    }

    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// Wait for a previous non-blocking announcement so two never overlap.
    fn finish_pending(&mut self) -> Result<(), ClockError> {
        if let Some(mut child) = self.pending.take() {
            let status = child.wait()?;
            if !status.success() {
                warn!("{} exited with {}", self.program, status);
            }
        }
        Ok(())
    }
}

impl SpeechSink for Espeak {
    fn speak(&mut self, text: &str) -> Result<(), ClockError> {
        self.finish_pending()?;
        debug!("Speaking: {}", text);
        self.pending = Some(self.command(text).spawn()?);
        Ok(())
    }

    fn speak_blocking(&mut self, text: &str) -> Result<(), ClockError> {
        self.finish_pending()?;
        debug!("Speaking (blocking): {}", text);
        let status = self.command(text).status()?;
        if !status.success() {
            warn!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

impl Drop for Espeak {
    fn drop(&mut self) {
        let _ = self.finish_pending();
    }
}
