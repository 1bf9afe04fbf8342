//! Frame output to a terminal device, falling back to stdout.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

/// Errors at the output boundary. Callers log these and drop the frame.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("write to {target} failed: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("output sink is closed")]
    Closed,
}

/// Clear the screen, home the cursor and hide it.
pub fn clear_sequence(out: &mut Vec<u8>) {
    // Writing into a Vec cannot fail.
    let _ = queue!(out, Clear(ClearType::All), MoveTo(0, 0), Hide);
}

/// Show the cursor and reset text attributes.
pub fn reset_sequence(out: &mut Vec<u8>) {
    let _ = queue!(out, Show, SetAttribute(Attribute::Reset));
}

/// Something frames can be written to.
pub trait OutputSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Flush and release the underlying handle. Later writes fail with
    /// [`SinkError::Closed`].
    fn close(&mut self);

    fn clear(&mut self) -> Result<(), SinkError> {
        let mut buf = Vec::new();
        clear_sequence(&mut buf);
        self.write(&buf)
    }

    /// Restore the cursor and attributes. Safe to call repeatedly.
    fn reset(&mut self) -> Result<(), SinkError> {
        let mut buf = Vec::new();
        reset_sequence(&mut buf);
        self.write(&buf)
    }

    /// Clear the screen and draw `frame` in a single write.
    fn present(&mut self, frame: &str) -> Result<(), SinkError> {
        let mut buf = Vec::with_capacity(frame.len() + 16);
        clear_sequence(&mut buf);
        buf.extend_from_slice(frame.as_bytes());
        self.write(&buf)
    }
}

enum Target {
    Device { path: PathBuf, file: File },
    Stdout(io::Stdout),
    Closed,
}

/// Sink that prefers a TTY device and falls back to stdout.
pub struct TerminalSink {
    target: Target,
}

impl TerminalSink {
    /// Open `device` for writing, or fall back to stdout with a warning.
    pub fn open(device: &Path) -> Self {
        match OpenOptions::new().write(true).open(device) {
            Ok(file) => {
                log::debug!("opened {}", device.display());
                Self {
                    target: Target::Device {
                        path: device.to_path_buf(),
                        file,
                    },
                }
            }
            Err(e) => {
                log::warn!(
                    "cannot open {} ({e}), writing frames to stdout",
                    device.display()
                );
                Self::stdout()
            }
        }
    }

    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout(io::stdout()),
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self.target, Target::Device { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.target, Target::Closed)
    }

    /// Human-readable name of where frames go.
    pub fn describe(&self) -> String {
        match &self.target {
            Target::Device { path, .. } => path.display().to_string(),
            Target::Stdout(_) => "stdout".to_string(),
            Target::Closed => "closed".to_string(),
        }
    }
}

impl OutputSink for TerminalSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        let result = match &mut self.target {
            Target::Device { file, .. } => file.write_all(bytes).and_then(|()| file.flush()),
            Target::Stdout(stdout) => {
                let mut lock = stdout.lock();
                lock.write_all(bytes).and_then(|()| lock.flush())
            }
            Target::Closed => return Err(SinkError::Closed),
        };
        result.map_err(|source| SinkError::Write {
            target: self.describe(),
            source,
        })
    }

    fn close(&mut self) {
        match std::mem::replace(&mut self.target, Target::Closed) {
            Target::Device { mut file, .. } => {
                let _ = file.flush();
            }
            Target::Stdout(stdout) => {
                let _ = stdout.lock().flush();
            }
            Target::Closed => {}
        }
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        if !self.is_closed() {
            let _ = self.reset();
            self.close();
        }
    }
}
