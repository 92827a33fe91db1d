//! IPC message protocol for the doodle pad
//!
//! Defines all message types exchanged between the engine and its UI.
//! Messages travel as one JSON object per line, tagged with `type` and
//! carrying their payload in `data`.

mod error;
mod input;
mod messages;
mod types;

pub use error::*;
pub use input::*;
pub use messages::*;
pub use types::*;

/// Parse one line of UI input.
pub fn parse_ui_message(line: &str) -> Result<UiToPad, IpcError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(line)?)
}

/// Serialize an engine message to a single line (no trailing newline).
pub fn encode_message(message: &PadToUi) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}
