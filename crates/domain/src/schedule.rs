//! Schedule — a street's automatic on/off configuration.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidArgumentError, LampGridError};

/// Automatic on/off times for a street, HH:MM granularity, local clock.
///
/// `on_time == off_time` is a valid degenerate schedule that never fires,
/// and intervals wrapping midnight (`18:00` on, `06:00` off) are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub on_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub off_time: NaiveTime,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            enabled: false,
            on_time: NaiveTime::MIN,
            off_time: NaiveTime::MIN,
        }
    }
}

impl Schedule {
    /// Parse a schedule from wire strings, validating both times.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] when either time is not
    /// `HH:MM`.
    pub fn parse(enabled: bool, on_time: &str, off_time: &str) -> Result<Self, LampGridError> {
        Ok(Self {
            enabled,
            on_time: parse_time(on_time)?,
            off_time: parse_time(off_time)?,
        })
    }

    /// Whether the two edge times coincide, in which case no transition
    /// ever fires.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.on_time == self.off_time
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, InvalidArgumentError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| InvalidArgumentError::MalformedTime(value.to_string()))
}

/// Serde codec rendering [`NaiveTime`] as `"HH:MM"` on the wire.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&text, "%H:%M")
            .map_err(|_| de::Error::custom(format!("malformed time `{text}`, expected HH:MM")))
    }
}
