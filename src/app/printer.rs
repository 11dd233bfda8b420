#[cfg(test)]
#[path = "printer_test.rs"]
mod tests;

use std::io::Write;

use eyre::{Context, Result};

use crate::models::Event;

pub type Output = Box<dyn Write + Send>;

/// Writes store events to the terminal. Streamed text goes to `out` as it
/// arrives, notices and failures go to `err`.
pub struct EventPrinter {
    out: Output,
    err: Output,
    mid_line: bool,
}

impl EventPrinter {
    pub fn new(out: Output, err: Output) -> Self {
        Self {
            out,
            err,
            mid_line: false,
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    pub fn print(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Notice(notice) => {
                self.end_line()?;
                writeln!(self.err, "[{}] {}", notice.kind().label(), notice.message())
                    .wrap_err("writing notice")?;
            }
            Event::StreamStarted(_) => {
                self.mid_line = false;
            }
            Event::StreamFragment(text) => {
                self.out.write_all(text.as_bytes()).wrap_err("writing fragment")?;
                self.out.flush().wrap_err("flushing output")?;
                if !text.is_empty() {
                    self.mid_line = !text.ends_with('\n');
                }
            }
            Event::StreamCompleted(_) => {
                self.end_line()?;
            }
            Event::StreamFailed(_, message) => {
                self.end_line()?;
                writeln!(self.err, "Error: {}", message).wrap_err("writing error")?;
            }
            Event::ConversationCreated(conversation) => {
                self.line(format!(
                    "Created conversation #{}: {}",
                    conversation.id(),
                    conversation.title()
                ))?;
            }
            Event::ConversationDeleted(id) => {
                self.line(format!("Deleted conversation #{}", id))?;
            }
            event => {
                log::trace!("Event: {:?}", event);
            }
        }
        Ok(())
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.end_line()?;
        writeln!(self.out, "{}", text.as_ref()).wrap_err("writing output")
    }

    pub fn error(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.end_line()?;
        writeln!(self.err, "{}", text.as_ref()).wrap_err("writing error")
    }

    /// Print without a trailing newline.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        self.end_line()?;
        self.out.write_all(text.as_bytes()).wrap_err("writing prompt")?;
        self.out.flush().wrap_err("flushing output")
    }

    fn end_line(&mut self) -> Result<()> {
        if self.mid_line {
            writeln!(self.out).wrap_err("writing output")?;
            self.mid_line = false;
        }
        Ok(())
    }
}
