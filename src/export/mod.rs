//! Exports: CSV, text summary and their delivery
//!
//! # Components
//! - `csv.rs`: CSV rows and file naming
//! - `summary.rs`: human-readable report text
//! - `delivery.rs`: share / download / clipboard fallbacks

pub mod csv;
pub mod delivery;
pub mod summary;

pub use csv::{build_csv, csv_filename};
pub use delivery::{
    ClipboardSink, CommandShare, Delivery, DeliveryError, DeliveryOutcome, DownloadDir,
    DownloadSink, Payload, PayloadKind, ShareSink, SystemClipboard,
};
pub use summary::build_summary;

use crate::session::Session;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// `YYYY-MM-DD HH:MM` in the given offset
pub fn format_date_time(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d %H:%M").to_string()
}

/// Start time, plus `→ end` once the session has ended
pub fn session_window(session: &Session, offset: &FixedOffset) -> String {
    let start = format_date_time(&session.started_at, offset);
    match &session.ended_at {
        Some(end) => format!("{} → {}", start, format_date_time(end, offset)),
        None => start,
    }
}

/// Offset of the machine's local time zone right now
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}
