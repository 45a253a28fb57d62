//! Shared application state for axum handlers.

use std::sync::Arc;

use lampgrid_app::ports::StreetRepository;
use lampgrid_app::services::command_service::CommandService;
use lampgrid_app::services::street_service::StreetService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the services themselves do not need to be
/// `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<R> {
    /// Street queries and schedule replacement.
    pub street_service: Arc<StreetService<R>>,
    /// Command dispatch to single lights and whole streets.
    pub command_service: Arc<CommandService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            street_service: Arc::clone(&self.street_service),
            command_service: Arc::clone(&self.command_service),
        }
    }
}

impl<R> AppState<R>
where
    R: StreetRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(street_service: StreetService<R>, command_service: CommandService<R>) -> Self {
        Self {
            street_service: Arc::new(street_service),
            command_service: Arc::new(command_service),
        }
    }
}
