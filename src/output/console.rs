use std::io::{IsTerminal, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::mpsc;
use tracing::debug;

use super::sink::OutputEvent;

/// Renders output events onto a writer, keeping the progress line on a single
/// row that later events break out of.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    interactive: bool,
    color: bool,
    progress_active: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    pub const fn new(out: W, interactive: bool, color: bool) -> Self {
        Self {
            out,
            interactive,
            color: interactive && color,
            progress_active: false,
        }
    }

    /// # Errors
    ///
    /// Returns an error when the underlying writer fails.
    pub fn render(&mut self, event: &OutputEvent) -> std::io::Result<()> {
        let line = event.line();
        match event {
            OutputEvent::Progress(_) => {
                if self.interactive {
                    queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                } else {
                    self.out.write_all(b"\r")?;
                }
                self.out.write_all(line.as_bytes())?;
                self.progress_active = true;
            }
            OutputEvent::Info(_) => self.write_line(&line, None)?,
            OutputEvent::UnexpectedStatus { .. } => self.write_line(&line, Some(Color::Yellow))?,
            OutputEvent::TransportFailure { .. } | OutputEvent::Stopped { .. } => {
                self.write_line(&line, Some(Color::Red))?;
            }
        }
        self.out.flush()
    }

    /// Terminates a pending progress line.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying writer fails.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.progress_active {
            self.out.write_all(b"\n")?;
            self.progress_active = false;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str, color: Option<Color>) -> std::io::Result<()> {
        if self.progress_active {
            self.out.write_all(b"\n")?;
            self.progress_active = false;
        }
        match color {
            Some(color) if self.color => {
                queue!(self.out, SetForegroundColor(color), Print(line), ResetColor)?;
            }
            Some(_) | None => self.out.write_all(line.as_bytes())?,
        }
        self.out.write_all(b"\n")
    }
}

/// Spawns the single task that owns stdout for the rest of the run. It exits
/// once every [`super::OutputSink`] clone is dropped.
pub fn spawn_console_writer(
    mut events: mpsc::Receiver<OutputEvent>,
    no_color: bool,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let stdout = std::io::stdout();
        let interactive = stdout.is_terminal();
        let mut renderer = ConsoleRenderer::new(stdout, interactive, !no_color);

        while let Some(event) = events.recv().await {
            if let Err(err) = renderer.render(&event) {
                debug!("Console write failed: {}", err);
                break;
            }
        }
        if let Err(err) = renderer.finish() {
            debug!("Console write failed: {}", err);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsSnapshot;
    use std::time::Duration;

    fn render_all(events: &[OutputEvent]) -> Result<String, String> {
        let mut renderer = ConsoleRenderer::new(Vec::new(), false, false);
        for event in events {
            renderer
                .render(event)
                .map_err(|err| format!("render failed: {}", err))?;
        }
        renderer
            .finish()
            .map_err(|err| format!("finish failed: {}", err))?;
        String::from_utf8(renderer.into_inner()).map_err(|err| err.to_string())
    }

    #[test]
    fn progress_lines_overwrite_each_other() -> Result<(), String> {
        let text = render_all(&[
            OutputEvent::Progress(StatsSnapshot::new(1, Duration::from_secs(1))),
            OutputEvent::Progress(StatsSnapshot::new(2, Duration::from_secs(1))),
        ])?;
        let expected = "\rCompleted 1 total requests in 1s (average 60.00 requests/minute)...\rCompleted 2 total requests in 1s (average 120.00 requests/minute)...\n";
        if text != expected {
            return Err(format!("Unexpected output: {:?}", text));
        }
        Ok(())
    }

    #[test]
    fn warning_breaks_out_of_progress_line() -> Result<(), String> {
        let text = render_all(&[
            OutputEvent::Progress(StatsSnapshot::new(3, Duration::from_secs(1))),
            OutputEvent::UnexpectedStatus {
                status: 500,
                url: "http://a/".to_owned(),
            },
            OutputEvent::TransportFailure {
                message: "connection refused".to_owned(),
            },
        ])?;
        let mut lines = text.lines();
        let first = lines.next().unwrap_or_default();
        if !first.starts_with("\rCompleted 3 total requests") {
            return Err(format!("Unexpected first line: {:?}", first));
        }
        if lines.next() != Some("Received non-200 response: 500 http://a/") {
            return Err(format!("Missing warning line: {:?}", text));
        }
        if lines.next() != Some("connection refused") {
            return Err(format!("Missing error line: {:?}", text));
        }
        if !text.ends_with("connection refused\n") {
            return Err("Output should end after the error line".to_owned());
        }
        Ok(())
    }
}
