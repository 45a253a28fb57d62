//! Fleet provisioning — seeds the light registry from a TOML file at boot.
//!
//! Lights enter the system here and are never deleted afterwards; a light's
//! `status` is provisioning data maintained outside the command path. A
//! missing fleet file is not an error: the server starts with an empty
//! registry and logs a warning.

use serde::Deserialize;

use lampgrid_app::ports::StreetRepository;
use lampgrid_domain::error::LampGridError;
use lampgrid_domain::light::{Light, LightStatus};
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

/// Parsed fleet file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FleetFile {
    pub streets: Vec<StreetSeed>,
}

/// One street entry in the fleet file.
#[derive(Debug, Deserialize)]
pub struct StreetSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lights: Vec<LightSeed>,
    #[serde(default)]
    pub auto_schedule: Schedule,
}

/// One light entry in the fleet file.
#[derive(Debug, Deserialize)]
pub struct LightSeed {
    pub id: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub power: bool,
    #[serde(default)]
    pub brightness: u8,
    #[serde(default)]
    pub status: LightStatus,
}

impl StreetSeed {
    fn into_street(self) -> Result<Street, LampGridError> {
        let mut builder = Street::builder()
            .id(self.id)
            .name(self.name)
            .auto_schedule(self.auto_schedule);
        for light in self.lights {
            builder = builder.light(
                Light::builder()
                    .id(light.id)
                    .position(light.position)
                    .power(light.power)
                    .brightness(light.brightness)
                    .status(light.status)
                    .build()?,
            );
        }
        builder.build()
    }
}

/// Load the fleet file at `path` and create every street in the registry.
///
/// Returns the number of streets provisioned. A missing file yields zero
/// streets and a warning instead of an error.
///
/// # Errors
///
/// Returns [`FleetError`] when the file cannot be read, fails to parse, or
/// contains an entry that violates domain invariants.
pub async fn provision<R: StreetRepository>(repo: &R, path: &str) -> Result<usize, FleetError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path, "fleet file not found, starting with an empty registry");
            return Ok(0);
        }
        Err(err) => return Err(FleetError::Io(err)),
    };

    let file: FleetFile = toml::from_str(&content)?;
    let mut provisioned = 0;
    for seed in file.streets {
        let street = seed.into_street()?;
        repo.create(street).await?;
        provisioned += 1;
    }
    Ok(provisioned)
}

/// Fleet provisioning errors.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    /// File I/O failure.
    #[error("failed to read fleet file")]
    Io(#[from] std::io::Error),
    /// TOML parse failure.
    #[error("failed to parse fleet file")]
    Parse(#[from] toml::de::Error),
    /// A street or light entry violates domain invariants.
    #[error("invalid fleet entry")]
    Invalid(#[from] LampGridError),
}
