//! Session Management: records, statistics, feedback and lifecycle
//!
//! # Components
//! - `pitch.rs`: PitchRecord and Session data model
//! - `stats.rs`: Totals, groups of five and per-type breakdown
//! - `feedback.rs`: Strike streaks, group cheers, report banners
//! - `state.rs`: SessionController state machine
//! - `errors.rs`: SessionError

pub mod errors;
pub mod feedback;
pub mod pitch;
pub mod state;
pub mod stats;

pub use errors::SessionError;
pub use pitch::{PitchRecord, PitchResult, PitchType, Session};
pub use state::{LifecycleState, Notice, Screen, SessionController};
pub use stats::{PitchStats, GROUP_SIZE};
