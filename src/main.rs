//! Pitch Tracker - interactive practice-session logger
//!
//! Single-user terminal application. Sessions are logged pitch by pitch and
//! saved to a local JSON store.

use clap::Parser;
use pitch_tracker::cli::{Command, Display, InputHandler};
use pitch_tracker::config::Config;
use pitch_tracker::export::{self, Delivery, DownloadDir, SystemClipboard};
use pitch_tracker::logging;
use pitch_tracker::session::{Notice, Screen, Session, SessionController, SessionError};
use pitch_tracker::store::SessionStore;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long a notice stays on screen
const NOTICE_TTL: Duration = Duration::from_millis(1400);

#[derive(Parser, Debug)]
#[command(name = "pitch-tracker")]
#[command(about = "Log pitching practice sessions and review the numbers")]
struct Args {
    /// Pre-fill the session name
    #[arg(short, long)]
    name: Option<String>,

    /// Pitches before the session ends by itself
    #[arg(short, long)]
    limit: Option<usize>,

    /// Directory holding saved sessions
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for exported CSV and summary files
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/pitch-tracker/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level (the log file lives in the data directory)
    #[arg(short, long)]
    debug: bool,
}

/// Front-end state that is not part of the session itself
#[derive(Default)]
struct Ui {
    name: String,
    /// Name before editing started, restored on Esc
    editing_name: Option<String>,
    note: Option<String>,
    confirm_clear: bool,
    history: Vec<Session>,
    cursor: usize,
    notice: Option<(String, Instant)>,
}

impl Ui {
    fn text_entry(&self) -> bool {
        self.editing_name.is_some() || self.note.is_some()
    }

    fn show(&mut self, notices: Vec<Notice>) {
        if let Some(last) = notices.last() {
            self.notice = Some((last.to_string(), Instant::now()));
        }
    }

    fn fail(&mut self, err: SessionError) {
        warn!(error = %err, "action rejected");
        self.notice = Some((err.to_string(), Instant::now()));
    }

    fn apply(&mut self, outcome: Result<Vec<Notice>, SessionError>) {
        match outcome {
            Ok(notices) => self.show(notices),
            Err(e) => self.fail(e),
        }
    }

    fn refresh_history(&mut self, controller: &SessionController) {
        self.history = controller.saved_sessions();
        self.cursor = self.cursor.min(self.history.len().saturating_sub(1));
    }

    fn selected_id(&self) -> Option<String> {
        self.history.get(self.cursor).and_then(|s| s.saved_id.clone())
    }
}

fn build_delivery(config: &Config) -> Delivery {
    let mut delivery = Delivery::new(Box::new(DownloadDir::new(&config.export_dir)));
    if let Some(share) = config.share_sink() {
        delivery = delivery.with_share(Box::new(share));
    }
    if let Some(clipboard) = SystemClipboard::detect() {
        delivery = delivery.with_clipboard(Box::new(clipboard));
    }
    delivery
}

/// Apply one command; false means quit
fn handle(
    command: Command,
    controller: &mut SessionController,
    ui: &mut Ui,
    delivery: &mut Delivery,
) -> bool {
    let offset = export::local_offset();

    if let Command::Quit = command {
        return false;
    }

    // Text entry owns the keyboard until Enter or Esc
    if let Some(before) = ui.editing_name.clone() {
        match command {
            Command::Type(c) => ui.name.push(c),
            Command::Erase => {
                ui.name.pop();
            }
            Command::Submit => ui.editing_name = None,
            Command::Back => {
                ui.name = before;
                ui.editing_name = None;
            }
            _ => {}
        }
        return true;
    }
    if let Some(note) = ui.note.as_mut() {
        match command {
            Command::Type(c) => note.push(c),
            Command::Erase => {
                note.pop();
            }
            Command::Submit => {
                controller.set_note(ui.note.take());
            }
            Command::Back => ui.note = None,
            _ => {}
        }
        return true;
    }

    if ui.confirm_clear {
        ui.confirm_clear = false;
        if command == Command::Confirm {
            let outcome = controller.clear_all();
            ui.apply(outcome);
        }
        return true;
    }

    match (controller.screen(), command) {
        (Screen::Setup, Command::EditName) => ui.editing_name = Some(ui.name.clone()),
        (Screen::Setup, Command::Submit) => {
            let notices = controller.start(&ui.name);
            ui.show(notices);
        }
        (Screen::Setup, Command::OpenHistory) => {
            controller.open_history();
            ui.cursor = 0;
            ui.refresh_history(controller);
        }
        (Screen::Setup, Command::ClearAll) => ui.confirm_clear = true,

        (Screen::Logging, Command::PickType(t)) => controller.select_type(t),
        (Screen::Logging, Command::PickResult(r)) => controller.select_result(r),
        (Screen::Logging, Command::Hit(hit)) => controller.set_hit_location(hit),
        (Screen::Logging, Command::EditNote) => {
            ui.note = Some(controller.selection().note.clone().unwrap_or_default());
        }
        (Screen::Logging, Command::Submit) => {
            let outcome = controller.log_pitch();
            ui.apply(outcome);
        }
        (Screen::Logging, Command::Undo) => {
            let outcome = controller.undo();
            ui.apply(outcome);
        }
        (Screen::Logging, Command::End) => {
            let outcome = controller.end();
            ui.apply(outcome);
        }

        (Screen::Report, Command::CopySummary) => {
            let outcome = controller.copy_summary(delivery, &offset);
            ui.apply(outcome);
        }
        (Screen::Report, Command::ExportCsv) => {
            let outcome = controller.export_csv(delivery, &offset);
            ui.apply(outcome);
        }
        (Screen::Report, Command::Save) => {
            let outcome = controller.save();
            ui.apply(outcome);
        }
        (Screen::Report, Command::Submit) => {
            ui.name.clear();
            let notices = controller.back_to_start();
            ui.show(notices);
        }

        (Screen::History, Command::Up) => ui.cursor = ui.cursor.saturating_sub(1),
        (Screen::History, Command::Down) => {
            if ui.cursor + 1 < ui.history.len() {
                ui.cursor += 1;
            }
        }
        (Screen::History, Command::Submit) => {
            if let Some(id) = ui.selected_id() {
                let outcome = controller.load_saved(&id);
                ui.apply(outcome);
            }
        }
        (Screen::History, Command::Delete) => {
            if let Some(id) = ui.selected_id() {
                let outcome = controller.delete_saved(&id);
                ui.apply(outcome);
                ui.refresh_history(controller);
            }
        }
        (Screen::History, Command::Back) => controller.leave_history(),

        _ => {}
    }
    true
}

fn render(display: &Display, controller: &SessionController, ui: &Ui) -> std::io::Result<()> {
    let offset = export::local_offset();
    display.clear()?;

    match controller.screen() {
        Screen::Setup => display.show_setup(&ui.name, ui.editing_name.is_some(), ui.confirm_clear)?,
        Screen::Logging => display.show_logging(controller, ui.note.as_deref())?,
        Screen::Report => {
            if let Some(session) = controller.session() {
                display.show_report(session, &offset, !session.is_saved() && session.ended)?;
            }
        }
        Screen::History => display.show_history(&ui.history, ui.cursor, &offset)?,
    }

    display.show_notice(ui.notice.as_ref().map(|(text, _)| text.as_str()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(limit) = args.limit {
        config.pitch_limit = limit;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }
    config.validate()?;

    logging::init(args.debug, Some(config.log_path().as_path()))?;
    info!(
        data_dir = %config.data_dir.display(),
        limit = config.pitch_limit,
        "pitch tracker starting"
    );

    let store = SessionStore::open(&config.data_dir);
    let mut controller = SessionController::new(store, config.pitch_limit);
    let mut delivery = build_delivery(&config);
    let mut ui = Ui {
        name: args.name.unwrap_or_default(),
        ..Ui::default()
    };

    // Initialize display and input
    let display = Display::alternate()?;
    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();

    let mut dirty = true;
    'session: loop {
        if matches!(&ui.notice, Some((_, at)) if at.elapsed() > NOTICE_TTL) {
            ui.notice = None;
            dirty = true;
        }
        if dirty {
            render(&display, &controller, &ui)?;
            dirty = false;
        }

        let Some(key) = input.read_key()? else {
            continue;
        };
        let Some(command) = InputHandler::command(controller.screen(), ui.text_entry(), &key)
        else {
            continue;
        };

        if !handle(command, &mut controller, &mut ui, &mut delivery) {
            break 'session;
        }
        dirty = true;
    }

    // Cleanup
    InputHandler::disable_raw_mode()?;
    display.shutdown()?;

    let saved = controller.saved_sessions().len();
    println!("Thanks for practicing! {} saved session(s).", saved);
    Ok(())
}
