//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture and per-screen key mapping
//! - `display.rs`: Screen rendering

pub mod display;
pub mod input;

pub use display::Display;
pub use input::{Command, InputHandler};
