//! Commands — the control operations a light accepts, plus the per-light
//! report produced by street-wide dispatch.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidArgumentError, LampGridError};
use crate::id::{LightId, StreetId};

/// A validated control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
    SetBrightness(u8),
}

impl Command {
    /// Parse and validate the wire pair `(command, value)`.
    ///
    /// Validation happens here, before any light is touched: unknown names,
    /// a value supplied to `turn_on`/`turn_off`, and a missing or
    /// out-of-range `set_brightness` value are all rejected.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] describing the offending
    /// input.
    pub fn parse(command: &str, value: Option<i64>) -> Result<Self, LampGridError> {
        match command {
            "turn_on" => match value {
                None => Ok(Self::TurnOn),
                Some(_) => Err(InvalidArgumentError::UnexpectedValue("turn_on").into()),
            },
            "turn_off" => match value {
                None => Ok(Self::TurnOff),
                Some(_) => Err(InvalidArgumentError::UnexpectedValue("turn_off").into()),
            },
            "set_brightness" => match value {
                None => Err(InvalidArgumentError::MissingValue.into()),
                Some(v) if (0..=100).contains(&v) => {
                    Ok(Self::SetBrightness(u8::try_from(v).unwrap_or(100)))
                }
                Some(v) => Err(InvalidArgumentError::BrightnessOutOfRange(v).into()),
            },
            other => Err(InvalidArgumentError::UnknownCommand(other.to_string()).into()),
        }
    }

    /// The wire name of the command.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::SetBrightness(_) => "set_brightness",
        }
    }
}

/// One failed light within a street-wide command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightFailure {
    pub light_id: LightId,
    /// Stable error kind slug, as produced by
    /// [`LampGridError::kind`](crate::error::LampGridError::kind).
    pub error: String,
    pub message: String,
}

/// Per-light outcome of a street-wide command.
///
/// Failures are collected, never dropped: a broken light must not prevent
/// the rest of the street from being controlled, and the caller sees both
/// sides of the split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetCommandReport {
    pub street_id: StreetId,
    pub succeeded: Vec<LightId>,
    pub failed: Vec<LightFailure>,
}

impl StreetCommandReport {
    /// Start an empty report for the given street.
    #[must_use]
    pub fn new(street_id: StreetId) -> Self {
        Self {
            street_id,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record a light that accepted the command.
    pub fn record_success(&mut self, light_id: LightId) {
        self.succeeded.push(light_id);
    }

    /// Record a light that rejected the command.
    pub fn record_failure(&mut self, light_id: LightId, error: &LampGridError) {
        self.failed.push(LightFailure {
            light_id,
            error: error.kind().to_string(),
            message: error.message(),
        });
    }

    /// Whether at least one light failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
