//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod streets;

use axum::Router;
use axum::routing::{get, post};

use lampgrid_app::ports::StreetRepository;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: StreetRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/streets", get(streets::list::<R>))
        .route("/streets/{id}", get(streets::get::<R>))
        .route("/streets/{id}/command", post(streets::command_street::<R>))
        .route(
            "/streets/{id}/lights/{light_id}/command",
            post(streets::command_light::<R>),
        )
        .route("/streets/{id}/schedule", post(streets::update_schedule::<R>))
}
