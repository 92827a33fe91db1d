//! Doodle pad painting core - the canvas surface manager
//!
//! This crate owns everything that touches pixels:
//! - [`surface`] - CPU 8-bit RGBA buffer with source-over and destination-out compositing
//! - [`raster`] - Anti-aliased capsule rasterization for stroke segments
//! - [`context`] - The [`Surface`]: buffer plus logical-to-physical transform
//! - [`input`] - Mouse/touch events normalized to pointer samples
//! - [`codec`] - Data URI encode/decode (PNG, JPEG)
//! - [`manager`] - Resize, tool state, stroke state machine, clear/export/import
//! - [`validation`] - Color and width parsing

pub mod codec;
pub mod constants;
pub mod context;
pub mod input;
pub mod manager;
pub mod raster;
pub mod surface;
pub mod types;
pub mod validation;

pub use codec::*;
pub use constants::*;
pub use context::*;
pub use input::*;
pub use manager::*;
pub use surface::*;
pub use types::*;
pub use validation::*;
