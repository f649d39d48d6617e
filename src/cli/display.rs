//! Terminal display and UI rendering
//!
//! Features:
//! - Setup, logging, report and history screens
//! - Running stats with the last five pitches
//! - Report banners colored by group result
//! - Transient notice line

use crate::export::{format_date_time, session_window};
use crate::session::feedback::Banner;
use crate::session::stats::{best_group, by_type, group_in_fives, last_five};
use crate::session::{LifecycleState, PitchStats, PitchType, Session, SessionController};
use chrono::FixedOffset;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Stdout, Write};

/// Writes one line per row, top to bottom
struct Painter {
    out: Stdout,
    row: u16,
}

impl Painter {
    fn new() -> Self {
        Painter {
            out: stdout(),
            row: 0,
        }
    }

    /// Print colored segments on the next row
    fn line(&mut self, segments: &[(Color, &str)]) -> io::Result<()> {
        execute!(self.out, cursor::MoveTo(0, self.row))?;
        for (color, text) in segments {
            execute!(self.out, SetForegroundColor(*color), Print(text), ResetColor)?;
        }
        self.row += 1;
        Ok(())
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        self.line(&[(Color::Reset, text)])
    }

    fn blank(&mut self) {
        self.row += 1;
    }

    fn rule(&mut self) -> io::Result<()> {
        self.line(&[(Color::Blue, &*"─".repeat(50))])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn pct_color(pct: u32) -> Color {
    if pct > 60 {
        Color::Green
    } else if pct > 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn stats_line(stats: &PitchStats) -> String {
    format!(
        "Strikes: {} • Balls: {} • Strike%: {}%",
        stats.strikes, stats.balls, stats.strike_pct
    )
}

/// Terminal display manager
///
/// Owns the alternate screen from `alternate()` until shutdown or drop.
pub struct Display {
    _private: (),
}

impl Display {
    /// Take over the whole terminal until shutdown
    pub fn alternate() -> io::Result<Self> {
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Display { _private: () })
    }

    /// Clear screen
    pub fn clear(&self) -> io::Result<()> {
        execute!(stdout(), terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    fn header(p: &mut Painter, subtitle: &str) -> io::Result<()> {
        p.line(&[(Color::Cyan, "⚾ Pitch Tracker")])?;
        p.line(&[(Color::DarkGrey, subtitle)])?;
        p.rule()
    }

    /// Name entry and setup actions
    pub fn show_setup(&self, name: &str, editing: bool, confirm_clear: bool) -> io::Result<()> {
        let mut p = Painter::new();
        Self::header(&mut p, "No session running")?;
        p.blank();

        let shown = if name.is_empty() && !editing {
            "(untitled)"
        } else {
            name
        };
        let cursor_mark = if editing { "▏" } else { "" };
        p.line(&[
            (Color::Yellow, "Session name: "),
            (Color::Reset, shown),
            (Color::Yellow, cursor_mark),
        ])?;
        p.blank();

        if confirm_clear {
            p.line(&[(
                Color::Red,
                "Delete all saved sessions from this device? y to confirm, any other key cancels",
            )])?;
        } else if editing {
            p.line(&[(Color::DarkGrey, "Type a name  |  Enter done  |  Esc cancel")])?;
        } else {
            p.line(&[(
                Color::DarkGrey,
                "n name  |  Enter start  |  h history  |  X clear all  |  q quit",
            )])?;
        }
        p.flush()
    }

    /// Pitch entry with running stats
    pub fn show_logging(
        &self,
        controller: &SessionController,
        note_edit: Option<&str>,
    ) -> io::Result<()> {
        let mut p = Painter::new();
        let Some(session) = controller.session() else {
            return Self::header(&mut p, "No session running");
        };

        let status = match controller.state() {
            LifecycleState::Active => "running",
            _ => "ended",
        };
        Self::header(&mut p, &format!("{} ({})", session.title(), status))?;

        let stats = PitchStats::from_pitches(&session.pitches);
        p.line(&[
            (Color::Magenta, "Pitches: "),
            (
                Color::Reset,
                &*format!("{}/{}", stats.total, controller.pitch_limit()),
            ),
            (Color::Reset, "  |  "),
            (pct_color(stats.strike_pct), &*stats_line(&stats)),
        ])?;
        p.blank();

        let selection = controller.selection();
        let mut types = String::new();
        for (i, t) in PitchType::KNOWN.iter().enumerate() {
            let picked = selection.pitch_type.as_ref() == Some(t);
            let label = if picked {
                format!("[{} {}] ", i + 1, t)
            } else {
                format!(" {} {}  ", i + 1, t)
            };
            types.push_str(&label);
        }
        p.line(&[(Color::Yellow, "Type:   "), (Color::Reset, types.as_str())])?;

        let result = selection
            .result
            .map(|r| r.label().to_string())
            .unwrap_or_else(|| "-".to_string());
        p.line(&[
            (Color::Yellow, "Result: "),
            (Color::Reset, result.as_str()),
            (Color::DarkGrey, "   (s strike, b ball)"),
        ])?;
        p.line(&[
            (Color::Yellow, "Hit location: "),
            (Color::Reset, if selection.hit_location { "Yes" } else { "No" }),
            (Color::DarkGrey, "   (y / n)"),
        ])?;
        match note_edit {
            Some(buffer) => p.line(&[
                (Color::Yellow, "Note: "),
                (Color::Reset, buffer),
                (Color::Yellow, "▏"),
            ])?,
            None => p.line(&[
                (Color::Yellow, "Note: "),
                (Color::Reset, selection.note.as_deref().unwrap_or("-")),
            ])?,
        }
        p.blank();

        p.line(&[(Color::Magenta, "Last 5")])?;
        let recent = last_five(&session.pitches);
        if recent.is_empty() {
            p.text("No pitches logged yet.")?;
        }
        for pitch in recent {
            let color = if pitch.is_strike() {
                Color::Green
            } else {
                Color::Red
            };
            p.line(&[(
                color,
                &*format!(
                    "#{} {} • {} • Hit:{}",
                    pitch.n,
                    pitch.pitch_type,
                    pitch.result,
                    pitch.hit_flag()
                ),
            )])?;
        }
        p.blank();

        let log_hint = if controller.can_log() {
            "Enter log"
        } else {
            "(pick type + result)"
        };
        p.line(&[(
            Color::DarkGrey,
            &*format!("{}  |  / note  |  u undo  |  e end  |  q quit", log_hint),
        )])?;
        p.flush()
    }

    /// Post-session report
    pub fn show_report(
        &self,
        session: &Session,
        offset: &FixedOffset,
        can_save: bool,
    ) -> io::Result<()> {
        let mut p = Painter::new();
        Self::header(
            &mut p,
            &format!("{} • {}", session.title(), session_window(session, offset)),
        )?;

        let overall = PitchStats::from_pitches(&session.pitches);
        p.line(&[(Color::Magenta, "Overall")])?;
        p.text(&format!(
            "Total pitches: {}  |  Strikes: {}  |  Balls: {}  |  Hit location (Y): {}",
            overall.total, overall.strikes, overall.balls, overall.hits
        ))?;
        p.line(&[
            (Color::Reset, "Strike %: "),
            (
                pct_color(overall.strike_pct),
                &*format!("{}%", overall.strike_pct),
            ),
        ])?;
        p.blank();

        p.line(&[(Color::Magenta, "Groups of 5")])?;
        let groups = group_in_fives(&session.pitches);
        if groups.is_empty() {
            p.text("No pitches recorded.")?;
        }
        let best = best_group(&groups);
        for group in &groups {
            let banner = Banner::for_group(group, best);
            let color = match banner {
                Banner::PersonalBest => Color::Cyan,
                Banner::Good => Color::Green,
                Banner::KeepGoing => Color::Yellow,
            };
            p.line(&[
                (color, banner.headline()),
                (
                    Color::Reset,
                    &*format!(
                        "  Group {} (pitches {}–{}): {}% strikes ({} strikes, {} balls)",
                        group.index,
                        group.first_pitch(),
                        group.last_pitch(),
                        group.stats.strike_pct,
                        group.stats.strikes,
                        group.stats.balls
                    ),
                ),
            ])?;
            let pitches: Vec<String> = group
                .pitches
                .iter()
                .map(|pt| format!("#{} {} {} {}", pt.n, pt.pitch_type, pt.result, pt.hit_flag()))
                .collect();
            p.line(&[(Color::DarkGrey, &*format!("    {}", pitches.join("  ")))])?;
        }
        p.blank();

        p.line(&[(Color::Magenta, "By pitch type")])?;
        p.line(&[(
            Color::DarkGrey,
            &*format!(
                "{:<8}{:>6}{:>9}{:>7}{:>9}{:>7}",
                "Type", "Total", "Strikes", "Balls", "Strike%", "Hit Y"
            ),
        )])?;
        for row in by_type(&session.pitches) {
            let s = row.stats;
            p.text(&format!(
                "{:<8}{:>6}{:>9}{:>7}{:>8}%{:>7}",
                row.pitch_type.label(),
                s.total,
                s.strikes,
                s.balls,
                s.strike_pct,
                s.hits
            ))?;
        }
        p.blank();

        let save_hint = if can_save { "w save" } else { "saved" };
        p.line(&[(
            Color::DarkGrey,
            &*format!(
                "c copy summary  |  x export CSV  |  {}  |  Enter new session  |  q quit",
                save_hint
            ),
        )])?;
        p.flush()
    }

    /// Saved sessions list
    pub fn show_history(
        &self,
        sessions: &[Session],
        selected: usize,
        offset: &FixedOffset,
    ) -> io::Result<()> {
        let mut p = Painter::new();
        Self::header(&mut p, "Saved sessions")?;

        if sessions.is_empty() {
            p.line(&[(Color::DarkGrey, "No saved sessions yet.")])?;
        }
        for (i, session) in sessions.iter().enumerate() {
            let stats = PitchStats::from_pitches(&session.pitches);
            let marker = if i == selected { "▶ " } else { "  " };
            let color = if i == selected {
                Color::Cyan
            } else {
                Color::Reset
            };
            p.line(&[
                (color, marker),
                (color, session.title()),
                (
                    Color::DarkGrey,
                    &*format!(
                        "  {} • {} pitches • Strike% {}%",
                        format_date_time(&session.started_at, offset),
                        stats.total,
                        stats.strike_pct
                    ),
                ),
            ])?;
        }
        p.blank();
        p.line(&[(
            Color::DarkGrey,
            "↑/↓ select  |  Enter open  |  d delete  |  Esc back  |  q quit",
        )])?;
        p.flush()
    }

    /// Latest notice at the bottom of the screen
    pub fn show_notice(&self, notice: Option<&str>) -> io::Result<()> {
        let Some(text) = notice else {
            return Ok(());
        };
        let (_, rows) = terminal::size()?;
        let mut out = stdout();
        execute!(
            out,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            SetForegroundColor(Color::White),
            Print(text),
            ResetColor
        )?;
        out.flush()
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> io::Result<()> {
        execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
