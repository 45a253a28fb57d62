//! Light — an individual street-light fixture.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::{DeviceUnavailableError, InvalidArgumentError, LampGridError};
use crate::id::LightId;

/// Brightness applied by `turn_on` when no non-zero setting is stored.
pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Operational status of a fixture, maintained by an external monitoring
/// collaborator and read-only from the command path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightStatus {
    #[default]
    Working,
    Broken,
}

impl LightStatus {
    /// Whether the fixture accepts control commands.
    #[must_use]
    pub fn is_working(self) -> bool {
        matches!(self, Self::Working)
    }
}

impl std::fmt::Display for LightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Working => f.write_str("working"),
            Self::Broken => f.write_str("broken"),
        }
    }
}

/// A single light fixture owned by exactly one street.
///
/// `brightness` holds the *stored* setting: turning power off leaves it in
/// place so that turning power back on restores the previous level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Light {
    pub id: LightId,
    pub position: String,
    pub power: bool,
    pub brightness: u8,
    pub status: LightStatus,
}

impl Light {
    /// Create a builder for constructing a [`Light`].
    #[must_use]
    pub fn builder() -> LightBuilder {
        LightBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] when `id` is empty or
    /// `brightness` exceeds 100.
    pub fn validate(&self) -> Result<(), LampGridError> {
        if self.id.is_empty() {
            return Err(InvalidArgumentError::EmptyId.into());
        }
        if self.brightness > 100 {
            return Err(InvalidArgumentError::BrightnessOutOfRange(i64::from(self.brightness)).into());
        }
        Ok(())
    }

    /// Whether the light counts as working for rollup statistics
    /// (powered and not broken).
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.power && self.status.is_working()
    }

    /// Apply a validated command to this light.
    ///
    /// A single-light command is all-or-nothing: the broken check happens
    /// before any field is touched.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::DeviceUnavailable`] when the light is broken.
    pub fn apply(&mut self, command: Command) -> Result<(), LampGridError> {
        if !self.status.is_working() {
            return Err(DeviceUnavailableError {
                light_id: self.id.clone(),
            }
            .into());
        }
        match command {
            Command::TurnOn => {
                self.power = true;
                if self.brightness == 0 {
                    self.brightness = DEFAULT_BRIGHTNESS;
                }
            }
            Command::TurnOff => {
                // Stored brightness is kept for restoration on the next turn_on.
                self.power = false;
            }
            Command::SetBrightness(value) => {
                // Pre-setting brightness while off is allowed; power is untouched.
                self.brightness = value;
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Light`].
#[derive(Debug, Default)]
pub struct LightBuilder {
    id: Option<LightId>,
    position: Option<String>,
    power: bool,
    brightness: u8,
    status: LightStatus,
}

impl LightBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<LightId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    #[must_use]
    pub fn power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub fn status(mut self, status: LightStatus) -> Self {
        self.status = status;
        self
    }

    /// Consume the builder, validate, and return a [`Light`].
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::InvalidArgument`] if `id` is missing or
    /// invariants fail.
    pub fn build(self) -> Result<Light, LampGridError> {
        let light = Light {
            id: self.id.unwrap_or_else(|| LightId::from("")),
            position: self.position.unwrap_or_default(),
            power: self.power,
            brightness: self.brightness,
            status: self.status,
        };
        light.validate()?;
        Ok(light)
    }
}
