//! Pitch and session records
//!
//! The serialized form uses camelCase keys so a session list written by
//! one version of the tool stays readable by the next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Title used when a session has no usable name
pub const UNTITLED: &str = "Untitled session";

/// Pitch type label
///
/// Six types are known to the logger. Anything else found in stored data is
/// kept verbatim in `Other` so it survives a load/save cycle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PitchType {
    Fastball,
    Changeup,
    Drop,
    Rise,
    Screw,
    Curve,
    Other(String),
}

impl PitchType {
    /// Known types in display order
    pub const KNOWN: [PitchType; 6] = [
        PitchType::Fastball,
        PitchType::Changeup,
        PitchType::Drop,
        PitchType::Rise,
        PitchType::Screw,
        PitchType::Curve,
    ];

    /// Short label shown on buttons and in exports
    pub fn label(&self) -> &str {
        match self {
            PitchType::Fastball => "FB",
            PitchType::Changeup => "CH",
            PitchType::Drop => "Drop",
            PitchType::Rise => "Rise",
            PitchType::Screw => "Screw",
            PitchType::Curve => "Curve",
            PitchType::Other(label) => label,
        }
    }

    /// Parse a label; unknown labels become `Other`
    pub fn from_label(label: &str) -> Self {
        PitchType::KNOWN
            .iter()
            .find(|t| t.label() == label)
            .cloned()
            .unwrap_or_else(|| PitchType::Other(label.to_string()))
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PitchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PitchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(PitchType::from_label(&label))
    }
}

/// Outcome of a pitch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchResult {
    Strike,
    Ball,
}

impl PitchResult {
    pub fn label(&self) -> &'static str {
        match self {
            PitchResult::Strike => "Strike",
            PitchResult::Ball => "Ball",
        }
    }
}

impl fmt::Display for PitchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One logged pitch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchRecord {
    /// 1-based position within the session
    pub n: u32,
    pub at: DateTime<Utc>,
    pub pitch_type: PitchType,
    pub result: PitchResult,
    /// Pitch landed on the called location
    pub hit_location: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PitchRecord {
    pub fn is_strike(&self) -> bool {
        self.result == PitchResult::Strike
    }

    /// `Y` or `N` for the hit-location flag
    pub fn hit_flag(&self) -> &'static str {
        if self.hit_location {
            "Y"
        } else {
            "N"
        }
    }
}

/// One practice session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub name: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended: bool,
    #[serde(default)]
    pub pitches: Vec<PitchRecord>,
    /// Assigned when the session is written to the store
    #[serde(default)]
    pub saved_id: Option<String>,
}

impl Session {
    /// Fresh, empty session started at `now`
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        Session {
            name: name.trim().to_string(),
            started_at: now,
            ended_at: None,
            ended: false,
            pitches: Vec::new(),
            saved_id: None,
        }
    }

    /// Trimmed name, or the untitled placeholder
    pub fn title(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            UNTITLED
        } else {
            trimmed
        }
    }

    pub fn pitch_count(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_saved(&self) -> bool {
        self.saved_id.is_some()
    }
}
