//! Plain-text session report for the clipboard

use super::session_window;
use crate::session::stats::{group_in_fives, PitchStats};
use crate::session::Session;
use chrono::FixedOffset;

pub const REPORT_TITLE: &str = "Pitch Tracker - Session Report";

/// Overall, grouped and per-pitch sections, `\n`-separated
pub fn build_summary(session: &Session, offset: &FixedOffset) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(REPORT_TITLE.to_string());
    lines.push(format!(
        "{} • {}",
        session.title(),
        session_window(session, offset)
    ));
    lines.push(String::new());

    let overall = PitchStats::from_pitches(&session.pitches);
    lines.push("Overall".to_string());
    lines.push(format!(
        "Total: {} | Strikes: {} | Balls: {} | Strike%: {}% | Hit(Y): {}",
        overall.total, overall.strikes, overall.balls, overall.strike_pct, overall.hits
    ));
    lines.push(String::new());

    lines.push("Grouped in 5s".to_string());
    let groups = group_in_fives(&session.pitches);
    if groups.is_empty() {
        lines.push("(No pitches)".to_string());
    }
    for group in &groups {
        lines.push(format!(
            "Group {} (Pitches {}–{}): Strikes {}, Balls {}, Strike% {}%",
            group.index,
            group.first_pitch(),
            group.last_pitch(),
            group.stats.strikes,
            group.stats.balls,
            group.stats.strike_pct
        ));
    }
    lines.push(String::new());

    lines.push("All pitches".to_string());
    if session.pitches.is_empty() {
        lines.push("(No pitches)".to_string());
    }
    for pitch in &session.pitches {
        let mut line = format!(
            "#{} — {} — {} — Hit:{}",
            pitch.n,
            pitch.pitch_type,
            pitch.result,
            pitch.hit_flag()
        );
        if let Some(note) = &pitch.note {
            line.push_str(&format!(" — {}", note));
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PitchRecord, PitchResult, PitchType};
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_empty_session_summary() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();
        let session = Session::new("", start);
        let text = build_summary(&session, &utc());
        let expected = [
            REPORT_TITLE,
            "Untitled session • 2024-05-01 17:00",
            "",
            "Overall",
            "Total: 0 | Strikes: 0 | Balls: 0 | Strike%: 0% | Hit(Y): 0",
            "",
            "Grouped in 5s",
            "(No pitches)",
            "",
            "All pitches",
            "(No pitches)",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_summary_lists_groups_and_pitches() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();
        let mut session = Session::new("Lesson", start);
        for n in 1..=7 {
            session.pitches.push(PitchRecord {
                n,
                at: start,
                pitch_type: PitchType::Screw,
                result: if n % 2 == 1 {
                    PitchResult::Strike
                } else {
                    PitchResult::Ball
                },
                hit_location: n == 1,
                note: (n == 7).then(|| "late break".to_string()),
            });
        }
        session.ended = true;
        session.ended_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 17, 40, 0).unwrap());

        let text = build_summary(&session, &utc());
        assert!(text.contains("Lesson • 2024-05-01 17:00 → 2024-05-01 17:40"));
        assert!(text.contains("Total: 7 | Strikes: 4 | Balls: 3 | Strike%: 57% | Hit(Y): 1"));
        assert!(text.contains("Group 1 (Pitches 1–5): Strikes 3, Balls 2, Strike% 60%"));
        assert!(text.contains("Group 2 (Pitches 6–7): Strikes 1, Balls 1, Strike% 50%"));
        assert!(text.contains("#1 — Screw — Strike — Hit:Y"));
        assert!(text.ends_with("#7 — Screw — Strike — Hit:N — late break"));
    }
}
