//! Common error types used across the workspace.
//!
//! Each error kind maps to a stable wire slug via [`LampGridError::kind`]
//! so that boundary adapters can expose machine-readable failures without
//! leaking internal formatting.

use crate::id::LightId;

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum LampGridError {
    /// A request was rejected before any mutation took place.
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The addressed street or light does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The addressed light is broken and rejects control commands.
    #[error("device unavailable")]
    DeviceUnavailable(#[from] DeviceUnavailableError),
}

impl LampGridError {
    /// Stable machine-readable kind, used verbatim on the wire.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::DeviceUnavailable(_) => "device_unavailable",
        }
    }

    /// Human-readable message identifying the offending input or entity.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidArgument(err) => err.to_string(),
            Self::NotFound(err) => err.to_string(),
            Self::DeviceUnavailable(err) => err.to_string(),
        }
    }
}

/// Rejected input, detected before any state change.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgumentError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("command `{0}` does not take a value")]
    UnexpectedValue(&'static str),
    #[error("command `set_brightness` requires a value")]
    MissingValue,
    #[error("brightness {0} is outside the range 0-100")]
    BrightnessOutOfRange(i64),
    #[error("malformed time `{0}`, expected HH:MM")]
    MalformedTime(String),
    #[error("identifier must not be empty")]
    EmptyId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("duplicate identifier `{0}`")]
    DuplicateId(String),
}

/// An addressed entity that does not exist.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"Street"` or `"Light"`.
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

/// A command addressed to a light that is out of service.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("light `{light_id}` is broken and rejects commands")]
pub struct DeviceUnavailableError {
    pub light_id: LightId,
}
