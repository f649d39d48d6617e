//! Session lifecycle
//!
//! Maintains:
//! - Which screen is showing (setup, logging, report, history)
//! - The in-memory session and whether it is a read-only saved copy
//! - Pending pitch selections and the strike streak
//!
//! Every handler runs to completion before the next key is read, and returns
//! the notices it produced for the front end to show.

use super::errors::SessionError;
use super::feedback::{group_cheer, GroupCheer, StreakTracker};
use super::pitch::{PitchRecord, PitchResult, PitchType, Session};
use crate::export::{self, Delivery, DeliveryOutcome};
use crate::store::SessionStore;
use chrono::{FixedOffset, Utc};
use std::fmt;
use tracing::{debug, info};

/// Screen currently in front of the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Logging,
    Report,
    History,
}

/// Where the in-memory session is in its life
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    NoSession,
    Active,
    Ended,
}

/// Transient user-facing message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    SessionStarted,
    PitchLogged(u32),
    StrikeStreak,
    GroupCheer { index: usize, strike_pct: u32 },
    GroupDone { index: usize },
    PitchUndone,
    SessionEnded,
    LimitReached(usize),
    Saved,
    LoadedSaved,
    Deleted,
    ClearedAll,
    NewSessionReady,
    Delivery(DeliveryOutcome),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SessionStarted => write!(f, "Let's go! Session started."),
            Notice::PitchLogged(n) => write!(f, "Logged pitch #{}", n),
            Notice::StrikeStreak => write!(f, "🎯 3 strikes in a row!"),
            Notice::GroupCheer { index, strike_pct } => {
                write!(f, "🔥 Group {}: {}% strikes. Love it.", index, strike_pct)
            }
            Notice::GroupDone { index } => {
                write!(f, "Group {} done. Next 5: attack the zone.", index)
            }
            Notice::PitchUndone => write!(f, "Undid last pitch"),
            Notice::SessionEnded => write!(f, "Session ended. Nice work."),
            Notice::LimitReached(limit) => write!(f, "{} pitches done. Big finish!", limit),
            Notice::Saved => write!(f, "Saved"),
            Notice::LoadedSaved => write!(f, "Loaded saved session"),
            Notice::Deleted => write!(f, "Deleted"),
            Notice::ClearedAll => write!(f, "All saved sessions cleared"),
            Notice::NewSessionReady => write!(f, "New session ready."),
            Notice::Delivery(outcome) => write!(f, "{}", outcome),
        }
    }
}

/// Pitch being composed before it is logged
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub pitch_type: Option<PitchType>,
    pub result: Option<PitchResult>,
    /// Defaults to No after every log
    pub hit_location: bool,
    pub note: Option<String>,
}

/// Drives one user's sessions from setup to history
pub struct SessionController {
    store: SessionStore,
    pitch_limit: usize,
    screen: Screen,
    current: Option<Session>,
    /// Current session was loaded from the store for viewing
    detached: bool,
    selection: Selection,
    streak: StreakTracker,
}

impl SessionController {
    pub fn new(store: SessionStore, pitch_limit: usize) -> Self {
        SessionController {
            store,
            pitch_limit: pitch_limit.max(1),
            screen: Screen::Setup,
            current: None,
            detached: false,
            selection: Selection::default(),
            streak: StreakTracker::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn pitch_limit(&self) -> usize {
        self.pitch_limit
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn state(&self) -> LifecycleState {
        match &self.current {
            None => LifecycleState::NoSession,
            Some(s) if s.ended || self.detached => LifecycleState::Ended,
            Some(_) => LifecycleState::Active,
        }
    }

    /// Begin a fresh session, dropping whatever was in memory
    pub fn start(&mut self, name: &str) -> Vec<Notice> {
        let session = Session::new(name, Utc::now());
        info!(name = %session.title(), "session started");

        self.current = Some(session);
        self.detached = false;
        self.selection = Selection::default();
        self.streak.reset();
        self.screen = Screen::Logging;
        vec![Notice::SessionStarted]
    }

    pub fn select_type(&mut self, pitch_type: PitchType) {
        self.selection.pitch_type = Some(pitch_type);
    }

    pub fn select_result(&mut self, result: PitchResult) {
        self.selection.result = Some(result);
    }

    pub fn set_hit_location(&mut self, hit: bool) {
        self.selection.hit_location = hit;
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.selection.note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    /// Both a type and a result are picked and the session takes pitches
    pub fn can_log(&self) -> bool {
        self.state() == LifecycleState::Active
            && self.selection.pitch_type.is_some()
            && self.selection.result.is_some()
    }

    /// Append the selected pitch, then run feedback and the auto-end check
    pub fn log_pitch(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.ensure_loggable()?;
        let (Some(pitch_type), Some(result)) =
            (self.selection.pitch_type.clone(), self.selection.result)
        else {
            return Err(SessionError::MissingSelection);
        };

        let selection = std::mem::take(&mut self.selection);
        let session = self.current.as_mut().ok_or(SessionError::NoSession)?;
        let pitch = PitchRecord {
            n: session.pitches.len() as u32 + 1,
            at: Utc::now(),
            pitch_type,
            result,
            hit_location: selection.hit_location,
            note: selection.note,
        };
        debug!(n = pitch.n, pitch_type = %pitch.pitch_type, result = %pitch.result, "pitch logged");
        session.pitches.push(pitch);

        let mut notices = vec![Notice::PitchLogged(session.pitches.len() as u32)];
        if self.streak.record(result) {
            notices.push(Notice::StrikeStreak);
        }
        match group_cheer(&session.pitches) {
            Some(GroupCheer::Hot { index, strike_pct }) => {
                notices.push(Notice::GroupCheer { index, strike_pct })
            }
            Some(GroupCheer::Done { index }) => notices.push(Notice::GroupDone { index }),
            None => {}
        }

        if session.pitches.len() >= self.pitch_limit {
            info!(limit = self.pitch_limit, "pitch limit reached");
            self.finish();
            notices.push(Notice::LimitReached(self.pitch_limit));
        }
        Ok(notices)
    }

    /// Drop the most recent pitch; nothing happens on an empty or ended session
    pub fn undo(&mut self) -> Result<Vec<Notice>, SessionError> {
        if self.state() != LifecycleState::Active {
            return match self.current {
                None => Err(SessionError::NoSession),
                Some(_) => Ok(Vec::new()),
            };
        }
        let Some(session) = self.current.as_mut() else {
            return Err(SessionError::NoSession);
        };
        let Some(removed) = session.pitches.pop() else {
            return Ok(Vec::new());
        };

        debug!(n = removed.n, "pitch undone");
        self.streak.reset();
        Ok(vec![Notice::PitchUndone])
    }

    /// Finish the session and show the report; already-ended is a no-op
    pub fn end(&mut self) -> Result<Vec<Notice>, SessionError> {
        match self.state() {
            LifecycleState::NoSession => Err(SessionError::NoSession),
            LifecycleState::Ended => Ok(Vec::new()),
            LifecycleState::Active => {
                self.finish();
                Ok(vec![Notice::SessionEnded])
            }
        }
    }

    fn finish(&mut self) {
        if let Some(session) = self.current.as_mut() {
            if session.ended {
                return;
            }
            session.ended = true;
            session.ended_at = Some(Utc::now());
            info!(pitches = session.pitches.len(), "session ended");
        }
        self.selection = Selection::default();
        self.screen = Screen::Report;
    }

    /// Write a snapshot of the ended session to the store, once
    pub fn save(&mut self) -> Result<Vec<Notice>, SessionError> {
        let session = self.current.as_mut().ok_or(SessionError::NoSession)?;
        if let Some(id) = &session.saved_id {
            return Err(SessionError::AlreadySaved(id.clone()));
        }
        if !session.ended {
            return Err(SessionError::NotEnded);
        }

        let saved_id = self.store.insert(session)?;
        info!(%saved_id, "session saved");
        session.saved_id = Some(saved_id);
        Ok(vec![Notice::Saved])
    }

    /// Report screen back to a blank setup screen
    pub fn back_to_start(&mut self) -> Vec<Notice> {
        self.go_to_setup();
        vec![Notice::NewSessionReady]
    }

    pub fn open_history(&mut self) {
        self.screen = Screen::History;
    }

    /// History back to setup
    pub fn leave_history(&mut self) {
        self.go_to_setup();
    }

    fn go_to_setup(&mut self) {
        self.current = None;
        self.detached = false;
        self.selection = Selection::default();
        self.streak.reset();
        self.screen = Screen::Setup;
    }

    /// Saved sessions, newest first
    pub fn saved_sessions(&self) -> Vec<Session> {
        self.store.load()
    }

    /// Open a saved session read-only on the report screen
    pub fn load_saved(&mut self, saved_id: &str) -> Result<Vec<Notice>, SessionError> {
        let session = self
            .store
            .get(saved_id)
            .ok_or_else(|| SessionError::UnknownId(saved_id.to_string()))?;

        debug!(%saved_id, "saved session loaded");
        self.current = Some(session);
        self.detached = true;
        self.selection = Selection::default();
        self.streak.reset();
        self.screen = Screen::Report;
        Ok(vec![Notice::LoadedSaved])
    }

    /// Remove one saved session by id
    pub fn delete_saved(&mut self, saved_id: &str) -> Result<Vec<Notice>, SessionError> {
        if !self.store.delete(saved_id)? {
            return Err(SessionError::UnknownId(saved_id.to_string()));
        }
        info!(%saved_id, "saved session deleted");
        Ok(vec![Notice::Deleted])
    }

    /// Remove every saved session
    pub fn clear_all(&mut self) -> Result<Vec<Notice>, SessionError> {
        self.store.clear()?;
        info!("all saved sessions cleared");
        Ok(vec![Notice::ClearedAll])
    }

    /// Export the current session as CSV through `delivery`
    pub fn export_csv(
        &self,
        delivery: &mut Delivery,
        offset: &FixedOffset,
    ) -> Result<Vec<Notice>, SessionError> {
        let session = self.current.as_ref().ok_or(SessionError::NoSession)?;
        let csv = export::build_csv(session, offset);
        let outcome = delivery.deliver_csv(&export::csv_filename(session), &csv);
        Ok(vec![Notice::Delivery(outcome)])
    }

    /// Copy the text summary through `delivery`
    pub fn copy_summary(
        &self,
        delivery: &mut Delivery,
        offset: &FixedOffset,
    ) -> Result<Vec<Notice>, SessionError> {
        let session = self.current.as_ref().ok_or(SessionError::NoSession)?;
        let text = export::build_summary(session, offset);
        Ok(vec![Notice::Delivery(delivery.deliver_summary(&text))])
    }

    fn ensure_loggable(&self) -> Result<(), SessionError> {
        match &self.current {
            None => Err(SessionError::NoSession),
            Some(_) if self.detached => Err(SessionError::Detached),
            Some(s) if s.ended => Err(SessionError::SessionEnded),
            Some(_) => Ok(()),
        }
    }
}
