use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SkillError;

/// Internal calendar identifier, e.g. "madison-1". Spoken aliases map onto
/// these through the name resolver; raw strings never cross API boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepetitionRule {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepetitionRule {
    /// iCalendar FREQ tag for this rule.
    pub fn freq_tag(&self) -> &'static str {
        match self {
            RepetitionRule::Daily => "DAILY",
            RepetitionRule::Weekly => "WEEKLY",
            RepetitionRule::Monthly => "MONTHLY",
            RepetitionRule::Yearly => "YEARLY",
        }
    }
}

/// A pair of instants with `start < end`, enforced by the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SkillError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(SkillError::InvalidInterval { start, end })
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// An event in flight between slot resolution and the calendar backend.
/// Persistence belongs to the backend; nothing here outlives the request.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub name: String,
    pub interval: TimeInterval,
    pub repetition_rule: Option<RepetitionRule>,
}

/// One record from a backend listing. Start/end stay loose here because the
/// server owns the data; records are re-checked when formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedEvent {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
