//! Street service — read use-cases and schedule replacement.

use lampgrid_domain::error::{LampGridError, NotFoundError};
use lampgrid_domain::id::StreetId;
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

use crate::ports::StreetRepository;

/// Application service for street queries and schedule updates.
pub struct StreetService<R> {
    repo: R,
}

impl<R: StreetRepository> StreetService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List all streets in stable order. Rollup statistics are derived by
    /// the caller from each returned snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_streets(&self) -> Result<Vec<Street>, LampGridError> {
        self.repo.get_all().await
    }

    /// Look up a street by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::NotFound`] when no street with `id` exists.
    pub async fn get_street(&self, id: &StreetId) -> Result<Street, LampGridError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Street",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Replace a street's schedule with the full `enabled`/`on_time`/
    /// `off_time` triple — partial updates are not accepted at any
    /// boundary. Returns the post-mutation street.
    ///
    /// # Errors
    ///
    /// Returns [`LampGridError::NotFound`] when no street with `id` exists.
    pub async fn update_schedule(
        &self,
        id: &StreetId,
        schedule: Schedule,
    ) -> Result<Street, LampGridError> {
        self.repo.update_schedule(id, schedule).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lampgrid_domain::command::Command;
    use lampgrid_domain::id::LightId;
    use lampgrid_domain::light::Light;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryStreetRepo {
        store: Arc<Mutex<Vec<Street>>>,
    }

    impl StreetRepository for InMemoryStreetRepo {
        fn create(&self, street: Street) -> impl Future<Output = Result<Street, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.push(street.clone());
            async move { Ok(street) }
        }

        fn get_by_id(
            &self,
            id: &StreetId,
        ) -> impl Future<Output = Result<Option<Street>, LampGridError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|street| &street.id == id).cloned();
            async move { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Street>, LampGridError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.clone();
            async move { Ok(result) }
        }

        fn apply_to_light(
            &self,
            street_id: &StreetId,
            light_id: &LightId,
            command: Command,
        ) -> impl Future<Output = Result<Light, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = store
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Street",
                        id: street_id.to_string(),
                    }
                    .into()
                })
                .and_then(|street| {
                    street
                        .light_mut(light_id)
                        .ok_or_else(|| {
                            NotFoundError {
                                entity: "Light",
                                id: light_id.to_string(),
                            }
                            .into()
                        })
                        .and_then(|light| light.apply(command).map(|()| light.clone()))
                });
            async move { result }
        }

        fn update_schedule(
            &self,
            street_id: &StreetId,
            schedule: Schedule,
        ) -> impl Future<Output = Result<Street, LampGridError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = store
                .iter_mut()
                .find(|street| &street.id == street_id)
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Street",
                        id: street_id.to_string(),
                    }
                    .into()
                })
                .map(|street| {
                    street.auto_schedule = schedule;
                    street.clone()
                });
            async move { result }
        }
    }

    fn elm_street() -> Street {
        Street::builder()
            .id("elm")
            .name("Elm Street")
            .light(Light::builder().id("elm_1").position("north end").build().unwrap())
            .build()
            .unwrap()
    }

    async fn make_service() -> StreetService<InMemoryStreetRepo> {
        let repo = InMemoryStreetRepo::default();
        repo.create(elm_street()).await.unwrap();
        StreetService::new(repo)
    }

    #[tokio::test]
    async fn should_list_streets_in_insertion_order() {
        let repo = InMemoryStreetRepo::default();
        repo.create(elm_street()).await.unwrap();
        repo.create(
            Street::builder()
                .id("birch")
                .name("Birch Avenue")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

        let svc = StreetService::new(repo);
        let streets = svc.list_streets().await.unwrap();
        assert_eq!(streets.len(), 2);
        assert_eq!(streets[0].id, StreetId::from("elm"));
        assert_eq!(streets[1].id, StreetId::from("birch"));
    }

    #[tokio::test]
    async fn should_get_street_by_id() {
        let svc = make_service().await;
        let street = svc.get_street(&StreetId::from("elm")).await.unwrap();
        assert_eq!(street.name, "Elm Street");
    }

    #[tokio::test]
    async fn should_return_not_found_when_street_missing() {
        let svc = make_service().await;
        let result = svc.get_street(&StreetId::from("nowhere")).await;
        assert!(matches!(result, Err(LampGridError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_replace_schedule_and_return_updated_street() {
        let svc = make_service().await;
        let schedule = Schedule::parse(true, "18:00", "06:00").unwrap();

        let street = svc
            .update_schedule(&StreetId::from("elm"), schedule)
            .await
            .unwrap();
        assert_eq!(street.auto_schedule, schedule);

        let reread = svc.get_street(&StreetId::from("elm")).await.unwrap();
        assert_eq!(reread.auto_schedule, schedule);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_schedule_of_missing_street() {
        let svc = make_service().await;
        let schedule = Schedule::parse(true, "18:00", "06:00").unwrap();
        let result = svc
            .update_schedule(&StreetId::from("nowhere"), schedule)
            .await;
        assert!(matches!(result, Err(LampGridError::NotFound(_))));
    }
}
