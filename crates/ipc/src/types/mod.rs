//! Type definitions for IPC messages.

mod notify;
mod tool;

pub use notify::*;
pub use tool::*;
