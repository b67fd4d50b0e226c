//! Clipboard transports for copied selections.

use base64::Engine;
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Clipboard operation errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// OSC 52 write failed.
    #[error("OSC 52 clipboard failed: {0}")]
    Osc52(String),
    /// System clipboard operation failed.
    #[error("System clipboard failed: {0}")]
    System(String),
}

/// Destination for copied text.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Text waiting to be written to a clipboard.
///
/// Produced by the selection engine when a copy is requested; the caller
/// decides when and where to execute it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending copy does nothing until executed"]
pub struct ClipboardCopy {
    text: String,
}

impl ClipboardCopy {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn execute(self, sink: &mut dyn ClipboardSink) -> Result<(), ClipboardError> {
        sink.set_text(&self.text)
    }
}

/// The OSC 52 sequence that asks the terminal to set its clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Terminal clipboard with a system clipboard fallback.
///
/// Tries in order:
/// 1. OSC 52 escape sequence written to the terminal (works over SSH)
/// 2. System clipboard via arboard
pub struct SystemClipboard<W: Write = io::Stdout> {
    terminal: W,
    use_osc52: bool,
}

impl SystemClipboard<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for SystemClipboard<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> SystemClipboard<W> {
    pub fn with_writer(terminal: W) -> Self {
        Self {
            terminal,
            use_osc52: true,
        }
    }

    /// Skip OSC 52 and go straight to the system clipboard.
    pub fn without_osc52(mut self) -> Self {
        self.use_osc52 = false;
        self
    }

    fn copy_osc52(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.terminal
            .write_all(osc52_sequence(text).as_bytes())
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        self.terminal
            .flush()
            .map_err(|e| ClipboardError::Osc52(e.to_string()))
    }

    fn copy_system(text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::System(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::System(e.to_string()))
    }
}

impl<W: Write> ClipboardSink for SystemClipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.use_osc52 {
            match self.copy_osc52(text) {
                Ok(()) => return Ok(()),
                Err(err) => debug!(error = %err, "OSC 52 copy failed, trying system clipboard"),
            }
        }
        Self::copy_system(text)
    }
}

/// In-memory clipboard, handy for tests and headless sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
