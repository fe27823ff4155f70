//! Terminal presentation of due-soon alerts.

use std::io::Write;
use taskboard_core::{AlertSink, DueAlert, LogAlertSink};

/// Prints alerts above the prompt and mirrors them to the log.
pub struct TerminalAlertSink<W: Write> {
    out: W,
    log: LogAlertSink,
}

impl<W: Write> TerminalAlertSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            log: LogAlertSink,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for TerminalAlertSink<W> {
    fn notify(&mut self, alert: &DueAlert) {
        self.log.notify(alert);
        // Already logged above; a failed terminal write is dropped.
        let _ = writeln!(self.out, "\n!! {}", alert.message()).and_then(|()| self.out.flush());
    }
}
