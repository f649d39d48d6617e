//! CSV rendering of a session

use super::format_date_time;
use crate::session::Session;
use chrono::FixedOffset;

const HEADER: [&str; 5] = [
    "Pitch #",
    "Timestamp",
    "Pitch Type",
    "Result",
    "Hit Location (Y/N)",
];

/// Fallback file stem when the session name has nothing usable
const DEFAULT_STEM: &str = "pitch-session";

/// Quote a field when it contains a comma, quote or newline
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header plus one row per pitch, `\n`-separated, no trailing newline
///
/// A `Notes` column is added only when some pitch has a note.
pub fn build_csv(session: &Session, offset: &FixedOffset) -> String {
    let with_notes = session.pitches.iter().any(|p| p.note.is_some());

    let mut header: Vec<&str> = HEADER.to_vec();
    if with_notes {
        header.push("Notes");
    }

    let mut lines = vec![header.join(",")];
    for pitch in &session.pitches {
        let mut fields = vec![
            escape_field(&pitch.n.to_string()),
            escape_field(&format_date_time(&pitch.at, offset)),
            escape_field(pitch.pitch_type.label()),
            escape_field(pitch.result.label()),
            escape_field(pitch.hit_flag()),
        ];
        if with_notes {
            fields.push(escape_field(pitch.note.as_deref().unwrap_or("")));
        }
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// `<sanitized-name>-<YYYY-MM-DD>.csv`
pub fn csv_filename(session: &Session) -> String {
    let cleaned: String = session
        .name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();

    let stem = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    let stem = if stem.is_empty() { DEFAULT_STEM } else { &stem };

    format!("{}-{}.csv", stem, session.started_at.format("%Y-%m-%d"))
}
