//! Saved-session utility for the pitch tracker
//!
//! Lists, prints, exports and deletes saved sessions without the
//! interactive screens.
//! Usage: pitch-history list | show <id> | export <id> [--summary] | delete <id> | clear

use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use pitch_tracker::config::Config;
use pitch_tracker::export::{self, Delivery, DeliveryOutcome, DownloadDir};
use pitch_tracker::logging;
use pitch_tracker::session::{PitchStats, Session};
use pitch_tracker::store::SessionStore;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pitch-history")]
#[command(about = "Inspect and manage saved pitch-tracker sessions")]
struct Args {
    /// Directory holding saved sessions
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/pitch-tracker/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Saved sessions, newest first
    List,
    /// Print a session's text summary
    Show { id: String },
    /// Write a session's CSV (or summary) into the export directory
    Export {
        id: String,
        /// Export the text summary instead of CSV
        #[arg(long)]
        summary: bool,
        /// Override the export directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete one saved session
    Delete { id: String },
    /// Delete every saved session
    Clear,
}

/// Write the CSV, or the text summary when `summary` is set
fn export_session(
    session: &Session,
    summary: bool,
    delivery: &mut Delivery,
    offset: &FixedOffset,
) -> DeliveryOutcome {
    if summary {
        delivery.deliver_summary(&export::build_summary(session, offset))
    } else {
        let csv = export::build_csv(session, offset);
        delivery.deliver_csv(&export::csv_filename(session), &csv)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    logging::init(args.verbose, None)?;

    let store = SessionStore::open(&config.data_dir);
    let offset = export::local_offset();

    match args.command {
        Action::List => {
            let sessions = store.load();
            if sessions.is_empty() {
                println!("No saved sessions yet.");
            }
            for session in &sessions {
                let stats = PitchStats::from_pitches(&session.pitches);
                println!(
                    "{}  {} • {} • {} pitches • Strike% {}%",
                    session.saved_id.as_deref().unwrap_or("-"),
                    session.title(),
                    export::format_date_time(&session.started_at, &offset),
                    stats.total,
                    stats.strike_pct
                );
            }
        }
        Action::Show { id } => {
            let session = store
                .get(&id)
                .ok_or_else(|| format!("No saved session with id {}", id))?;
            println!("{}", export::build_summary(&session, &offset));
        }
        Action::Export { id, summary, out } => {
            let session = store
                .get(&id)
                .ok_or_else(|| format!("No saved session with id {}", id))?;
            let dir = out.unwrap_or(config.export_dir);
            let mut delivery = Delivery::new(Box::new(DownloadDir::new(dir)));

            let outcome = export_session(&session, summary, &mut delivery, &offset);
            println!("{}", outcome);
            if let DeliveryOutcome::Failed(reason) = outcome {
                return Err(reason.into());
            }
        }
        Action::Delete { id } => {
            if store.delete(&id)? {
                println!("Deleted {}", id);
            } else {
                return Err(format!("No saved session with id {}", id).into());
            }
        }
        Action::Clear => {
            store.clear()?;
            println!("All saved sessions cleared");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pitch_tracker::export::delivery::SUMMARY_FILENAME;
    use pitch_tracker::session::{PitchRecord, PitchResult, PitchType};
    use std::fs;

    fn session() -> Session {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();
        let mut session = Session::new("Cage work", at);
        session.pitches.push(PitchRecord {
            n: 1,
            at,
            pitch_type: PitchType::Drop,
            result: PitchResult::Strike,
            hit_location: true,
            note: None,
        });
        session.ended = true;
        session.ended_at = Some(at);
        session
    }

    #[test]
    fn test_export_writes_csv_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut delivery = Delivery::new(Box::new(DownloadDir::new(dir.path())));
        let utc = FixedOffset::east_opt(0).unwrap();

        let outcome = export_session(&session(), false, &mut delivery, &utc);
        let path = dir.path().join("cage-work-2024-05-01.csv");
        assert_eq!(outcome, DeliveryOutcome::DownloadedCsv(path.clone()));
        assert!(fs::read_to_string(path).unwrap().contains("Drop,Strike,Y"));
    }

    #[test]
    fn test_export_summary_flag_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut delivery = Delivery::new(Box::new(DownloadDir::new(dir.path())));
        let utc = FixedOffset::east_opt(0).unwrap();

        let outcome = export_session(&session(), true, &mut delivery, &utc);
        let path = dir.path().join(SUMMARY_FILENAME);
        assert_eq!(outcome, DeliveryOutcome::DownloadedSummary(path.clone()));
        assert!(fs::read_to_string(path)
            .unwrap()
            .starts_with(export::summary::REPORT_TITLE));
    }
}
