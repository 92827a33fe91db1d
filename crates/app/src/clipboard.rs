//! System clipboard access through the platform's command-line tools

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard tool available for {0}")]
    Unavailable(&'static str),

    #[error("Clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for copied drawings
pub trait Clipboard {
    /// Place PNG image bytes on the clipboard
    fn write_png(&mut self, png: &[u8]) -> Result<(), ClipboardError>;
    /// Place plain text on the clipboard
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by wl-copy, xclip, xsel or pbcopy
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(target_os = "macos")]
const PNG_TOOLS: &[(&str, &[&str])] = &[];
#[cfg(not(target_os = "macos"))]
const PNG_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &["--type", "image/png"]),
    ("xclip", &["-selection", "clipboard", "-t", "image/png"]),
];

#[cfg(target_os = "macos")]
const TEXT_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(not(target_os = "macos"))]
const TEXT_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl SystemClipboard {
    /// Pipe `data` into the first tool that launches and exits cleanly
    fn pipe(tools: &[(&str, &[&str])], data: &[u8], what: &'static str) -> Result<(), ClipboardError> {
        let mut last_error = None;
        for (program, args) in tools {
            let mut child = match Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(e) => {
                    debug!("{} unavailable: {}", program, e);
                    continue;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(data) {
                    last_error = Some(e);
                    let _ = child.wait();
                    continue;
                }
            }

            match child.wait() {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => debug!("{} exited with {}", program, status),
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(e) => Err(ClipboardError::Io(e)),
            None => Err(ClipboardError::Unavailable(what)),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn write_png(&mut self, png: &[u8]) -> Result<(), ClipboardError> {
        Self::pipe(PNG_TOOLS, png, "images")
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Self::pipe(TEXT_TOOLS, text.as_bytes(), "text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tools_is_unavailable() {
        let result = SystemClipboard::pipe(&[], b"data", "text");
        assert!(matches!(result, Err(ClipboardError::Unavailable("text"))));
    }

    #[test]
    fn test_missing_program_is_skipped() {
        let tools: &[(&str, &[&str])] = &[("doodle-pad-no-such-clipboard-tool", &[])];
        let result = SystemClipboard::pipe(tools, b"data", "text");
        assert!(matches!(result, Err(ClipboardError::Unavailable(_))));
    }
}
