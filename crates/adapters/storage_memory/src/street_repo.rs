//! In-memory implementation of [`StreetRepository`].

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use lampgrid_app::ports::StreetRepository;
use lampgrid_domain::command::Command;
use lampgrid_domain::error::{InvalidArgumentError, LampGridError, NotFoundError};
use lampgrid_domain::id::{LightId, StreetId};
use lampgrid_domain::light::Light;
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

/// Registry holding every street and its lights in process memory.
///
/// Streets live in provisioning order inside one `RwLock`, so reads see
/// either the state before or after a mutation, never between. Guards are
/// released before any future is returned, hence never held across an
/// await point. Lock poisoning is absorbed: the registry holds plain data
/// that stays consistent even if a panicking thread held the guard.
#[derive(Debug, Default)]
pub struct InMemoryStreetRepository {
    streets: Arc<RwLock<Vec<Street>>>,
}

impl Clone for InMemoryStreetRepository {
    fn clone(&self) -> Self {
        Self {
            streets: Arc::clone(&self.streets),
        }
    }
}

impl InMemoryStreetRepository {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(entity: &'static str, id: &impl ToString) -> LampGridError {
        NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into()
    }
}

impl StreetRepository for InMemoryStreetRepository {
    fn create(&self, street: Street) -> impl Future<Output = Result<Street, LampGridError>> + Send {
        let result = {
            let mut streets = self
                .streets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if streets.iter().any(|existing| existing.id == street.id) {
                Err(InvalidArgumentError::DuplicateId(street.id.to_string()).into())
            } else {
                streets.push(street.clone());
                Ok(street)
            }
        };
        async move { result }
    }

    fn get_by_id(
        &self,
        id: &StreetId,
    ) -> impl Future<Output = Result<Option<Street>, LampGridError>> + Send {
        let result = {
            let streets = self.streets.read().unwrap_or_else(PoisonError::into_inner);
            streets.iter().find(|street| &street.id == id).cloned()
        };
        async move { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Street>, LampGridError>> + Send {
        let result = {
            let streets = self.streets.read().unwrap_or_else(PoisonError::into_inner);
            streets.clone()
        };
        async move { Ok(result) }
    }

    fn apply_to_light(
        &self,
        street_id: &StreetId,
        light_id: &LightId,
        command: Command,
    ) -> impl Future<Output = Result<Light, LampGridError>> + Send {
        let result = {
            let mut streets = self
                .streets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            streets
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| Self::not_found("Street", street_id))
                .and_then(|street| {
                    street
                        .light_mut(light_id)
                        .ok_or_else(|| Self::not_found("Light", light_id))
                        .and_then(|light| light.apply(command).map(|()| light.clone()))
                })
        };
        async move { result }
    }

    fn update_schedule(
        &self,
        street_id: &StreetId,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Street, LampGridError>> + Send {
        let result = {
            let mut streets = self
                .streets
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            streets
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| Self::not_found("Street", street_id))
                .map(|street| {
                    street.auto_schedule = schedule;
                    street.clone()
                })
        };
        async move { result }
    }
}
