use chrono::{DateTime, Utc};
use thiserror::Error;

/// Typed failures for one request. Slot absence is not an error; the
/// handlers report it as a reply so the framework can re-prompt.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("no calendar found for {0}")]
    UnknownOwner(String),

    #[error("could not parse the given time range")]
    UnrecognizedTimeFrame(String),

    #[error("unable to parse the utterance")]
    MalformedUtterance,

    #[error("invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("no valid local time for {0}")]
    InvalidLocalTime(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("calendar backend error: {0}")]
    Backend(String),
}
