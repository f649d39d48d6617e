//! Handing exports to the outside world
//!
//! Three sinks, tried in a fixed order:
//! - share: an external command that takes the exported file
//! - clipboard: the desktop clipboard via arboard
//! - download: a plain file in the export directory
//!
//! Every path ends in a `DeliveryOutcome` the front end shows as a notice;
//! nothing here returns an error to the caller.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name used when the summary falls back to a download
pub const SUMMARY_FILENAME: &str = "pitch-summary.txt";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("share command failed: {0}")]
    Share(String),
}

/// What kind of payload is being delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Csv,
    Text,
}

/// A named export ready for delivery
#[derive(Clone, Debug)]
pub struct Payload {
    pub kind: PayloadKind,
    pub filename: String,
    pub body: String,
}

/// Where an export ended up
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    ShareOpened,
    DownloadedCsv(PathBuf),
    SummaryCopied,
    ClipboardBlockedDownloaded(PathBuf),
    DownloadedSummary(PathBuf),
    Failed(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::ShareOpened => write!(f, "Share opened"),
            DeliveryOutcome::DownloadedCsv(path) => {
                write!(f, "Downloaded CSV to {}", path.display())
            }
            DeliveryOutcome::SummaryCopied => write!(f, "Summary copied"),
            DeliveryOutcome::ClipboardBlockedDownloaded(path) => write!(
                f,
                "Clipboard blocked. Downloaded summary file to {}",
                path.display()
            ),
            DeliveryOutcome::DownloadedSummary(path) => {
                write!(f, "Downloaded summary file to {}", path.display())
            }
            DeliveryOutcome::Failed(reason) => write!(f, "Export failed: {}", reason),
        }
    }
}

/// Native share target
pub trait ShareSink {
    /// Whether this sink can take payloads of `kind`
    fn accepts(&self, kind: PayloadKind) -> bool;
    fn share(&mut self, payload: &Payload) -> Result<(), DeliveryError>;
}

/// Text clipboard
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError>;
}

/// File "download" target
pub trait DownloadSink {
    /// Write `body` under `filename`, returning the final path
    fn save(&mut self, filename: &str, body: &str) -> Result<PathBuf, DeliveryError>;
}

/// Writes downloads into a directory
#[derive(Clone, Debug)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DownloadDir { dir: dir.into() }
    }
}

impl DownloadSink for DownloadDir {
    fn save(&mut self, filename: &str, body: &str) -> Result<PathBuf, DeliveryError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, body)?;
        Ok(path)
    }
}

/// Shares by running an external command with the exported file's path
///
/// The file is written into `stage_dir` first and stays there. The command
/// runs detached from the terminal: stdin and stdout are null, and stderr is
/// captured for the error message.
#[derive(Clone, Debug)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
    kinds: Vec<PayloadKind>,
    stage_dir: PathBuf,
}

impl CommandShare {
    /// Parse a whitespace-separated command line; None when blank
    pub fn parse(
        command: &str,
        kinds: Vec<PayloadKind>,
        stage_dir: impl Into<PathBuf>,
    ) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CommandShare {
            program,
            args: parts.collect(),
            kinds,
            stage_dir: stage_dir.into(),
        })
    }

    fn stage(&self, payload: &Payload) -> Result<PathBuf, DeliveryError> {
        fs::create_dir_all(&self.stage_dir)?;
        let path = self.stage_dir.join(&payload.filename);
        fs::write(&path, &payload.body)?;
        Ok(path)
    }
}

impl ShareSink for CommandShare {
    fn accepts(&self, kind: PayloadKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn share(&mut self, payload: &Payload) -> Result<(), DeliveryError> {
        let path = self.stage(payload)?;
        info!(program = %self.program, path = %path.display(), "running share command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| DeliveryError::Share(format!("{}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(DeliveryError::Share(format!("{} exited with {}", self.program, output.status)))
        } else {
            Err(DeliveryError::Share(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )))
        }
    }
}

/// Desktop clipboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// None when no clipboard is reachable (headless, ssh)
    pub fn detect() -> Option<Self> {
        match arboard::Clipboard::new() {
            Ok(inner) => Some(SystemClipboard { inner }),
            Err(e) => {
                debug!(error = %e, "no system clipboard");
                None
            }
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), DeliveryError> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }
}

/// Routes exports through the available sinks
pub struct Delivery {
    share: Option<Box<dyn ShareSink>>,
    clipboard: Option<Box<dyn ClipboardSink>>,
    download: Box<dyn DownloadSink>,
}

impl Delivery {
    pub fn new(download: Box<dyn DownloadSink>) -> Self {
        Delivery {
            share: None,
            clipboard: None,
            download,
        }
    }

    pub fn with_share(mut self, share: Box<dyn ShareSink>) -> Self {
        self.share = Some(share);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Share if a capable sink exists, otherwise download
    pub fn deliver_csv(&mut self, filename: &str, csv: &str) -> DeliveryOutcome {
        let payload = Payload {
            kind: PayloadKind::Csv,
            filename: filename.to_string(),
            body: csv.to_string(),
        };

        if let Some(share) = self.share.as_mut().filter(|s| s.accepts(payload.kind)) {
            match share.share(&payload) {
                Ok(()) => {
                    info!(filename, "csv handed to share command");
                    return DeliveryOutcome::ShareOpened;
                }
                Err(e) => warn!(error = %e, "share failed, downloading instead"),
            }
        }

        match self.download.save(filename, csv) {
            Ok(path) => DeliveryOutcome::DownloadedCsv(path),
            Err(e) => {
                warn!(error = %e, "csv download failed");
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }

    /// Copy to the clipboard, downloading when that is blocked or missing
    pub fn deliver_summary(&mut self, text: &str) -> DeliveryOutcome {
        let blocked = match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.write_text(text) {
                Ok(()) => return DeliveryOutcome::SummaryCopied,
                Err(e) => {
                    warn!(error = %e, "clipboard write failed, downloading summary");
                    true
                }
            },
            None => false,
        };

        match self.download.save(SUMMARY_FILENAME, text) {
            Ok(path) if blocked => DeliveryOutcome::ClipboardBlockedDownloaded(path),
            Ok(path) => DeliveryOutcome::DownloadedSummary(path),
            Err(e) => {
                warn!(error = %e, "summary download failed");
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
