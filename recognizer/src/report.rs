//! ELAN recognizer stdout protocol.
//!
//! ELAN watches a local recognizer's stdout for `PROGRESS:` and `RESULT:`
//! lines; everything else we have to say goes to the log file instead.

use anyhow::Result;
use std::io::Write;

/// Writes protocol lines to the stream ELAN is watching.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Report progress as a fraction in `[0, 1]` with a short message.
    pub fn progress(&mut self, fraction: f32, message: &str) -> Result<()> {
        writeln!(self.out, "PROGRESS: {fraction} {message}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Tell ELAN the run finished and the output tier is ready.
    pub fn done(&mut self) -> Result<()> {
        writeln!(self.out, "RESULT: DONE.")?;
        self.out.flush()?;
        Ok(())
    }

    /// Tell ELAN the run failed.
    pub fn failed(&mut self) -> Result<()> {
        writeln!(self.out, "RESULT: FAILED.")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
