//! Pitch Tracker - practice-session pitch logging and reports
//!
//! Single-user, local-only. Sessions are logged pitch by pitch, end on
//! demand or at a pitch limit, and can be saved, exported or reviewed later.

pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod session;
pub mod store;
