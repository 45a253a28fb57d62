//! Command service — validated control dispatch to one light or a whole
//! street.

use lampgrid_domain::command::{Command, StreetCommandReport};
use lampgrid_domain::error::{LampGridError, NotFoundError};
use lampgrid_domain::id::{LightId, StreetId};
use lampgrid_domain::light::Light;
use lampgrid_domain::street::Street;

use crate::ports::StreetRepository;

/// Result of a street-wide command: the post-sweep street snapshot plus the
/// per-light report.
#[derive(Debug, Clone)]
pub struct StreetCommandOutcome {
    pub street: Street,
    pub report: StreetCommandReport,
}

/// Application service dispatching commands through the registry's
/// per-light mutation path.
///
/// Both manual commands and the schedule engine go through this service, so
/// every mutation sees the same validation.
pub struct CommandService<R> {
    repo: R,
}

impl<R: StreetRepository> CommandService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Apply a command to a single light, returning the updated light.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::NotFound`] for an unknown street or light
    /// and [`LampGridError::DeviceUnavailable`] for a broken light; in both
    /// cases nothing is mutated.
    #[tracing::instrument(skip(self), fields(command = command.name()))]
    pub async fn apply_to_light(
        &self,
        street_id: &StreetId,
        light_id: &LightId,
        command: Command,
    ) -> Result<Light, LampGridError> {
        self.repo.apply_to_light(street_id, light_id, command).await
    }

    /// Apply a command to every light on a street, in stored order.
    ///
    /// Each light goes through the same per-light path as a manual command.
    /// Failures are collected into the report and never abort the sweep, so
    /// a broken light cannot prevent the rest of the street from being
    /// controlled.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::NotFound`] when the street does not exist.
    /// Per-light failures are reported, not returned.
    #[tracing::instrument(skip(self), fields(command = command.name()))]
    pub async fn apply_to_street(
        &self,
        street_id: &StreetId,
        command: Command,
    ) -> Result<StreetCommandOutcome, LampGridError> {
        let street = self.get_street(street_id).await?;

        let mut report = StreetCommandReport::new(street_id.clone());
        for light_id in street.light_ids() {
            match self.repo.apply_to_light(street_id, &light_id, command).await {
                Ok(_) => report.record_success(light_id),
                Err(err) => report.record_failure(light_id, &err),
            }
        }

        // Fresh snapshot so the caller needs no follow-up read.
        let street = self.get_street(street_id).await?;
        Ok(StreetCommandOutcome { street, report })
    }

    async fn get_street(&self, id: &StreetId) -> Result<Street, LampGridError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Street",
                id: id.to_string(),
            }
            .into()
        })
    }
}
