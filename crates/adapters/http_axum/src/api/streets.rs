//! JSON REST handlers for streets, light commands, and schedules.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use lampgrid_app::ports::StreetRepository;
use lampgrid_domain::command::{Command, StreetCommandReport};
use lampgrid_domain::error::LampGridError;
use lampgrid_domain::id::{LightId, StreetId};
use lampgrid_domain::light::Light;
use lampgrid_domain::schedule::Schedule;
use lampgrid_domain::street::Street;

use crate::error::ApiError;
use crate::state::AppState;

/// One street in the list view: rollup statistics without the lights.
#[derive(Serialize)]
pub struct StreetSummary {
    pub id: StreetId,
    pub name: String,
    pub total_lights: usize,
    pub working_lights: usize,
    pub broken_lights: usize,
    pub efficiency: u8,
    pub auto_schedule: Schedule,
}

impl From<&Street> for StreetSummary {
    fn from(street: &Street) -> Self {
        let stats = street.stats();
        Self {
            id: street.id.clone(),
            name: street.name.clone(),
            total_lights: stats.total_lights,
            working_lights: stats.working_lights,
            broken_lights: stats.broken_lights,
            efficiency: stats.efficiency,
            auto_schedule: street.auto_schedule,
        }
    }
}

/// Full street view: summary fields plus the owned lights.
#[derive(Serialize)]
pub struct StreetDetail {
    pub id: StreetId,
    pub name: String,
    pub lights: Vec<Light>,
    pub total_lights: usize,
    pub working_lights: usize,
    pub broken_lights: usize,
    pub efficiency: u8,
    pub auto_schedule: Schedule,
}

impl From<Street> for StreetDetail {
    fn from(street: Street) -> Self {
        let stats = street.stats();
        Self {
            id: street.id,
            name: street.name,
            lights: street.lights,
            total_lights: stats.total_lights,
            working_lights: stats.working_lights,
            broken_lights: stats.broken_lights,
            efficiency: stats.efficiency,
            auto_schedule: street.auto_schedule,
        }
    }
}

/// Request body for light and street commands.
#[derive(Deserialize)]
pub struct CommandRequest {
    pub command: String,
    pub value: Option<i64>,
}

/// Request body for schedule replacement — always the full triple.
#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub enabled: bool,
    pub on_time: String,
    pub off_time: String,
}

/// Body of a street-wide command response.
#[derive(Serialize)]
pub struct StreetCommandBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub street: StreetDetail,
    pub report: StreetCommandReport,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<StreetSummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<StreetDetail>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the street-wide command endpoint.
pub enum CommandStreetResponse {
    /// Every light accepted the command.
    Ok(Json<StreetCommandBody>),
    /// At least one light failed; the body carries the per-light split.
    PartialFailure(Json<StreetCommandBody>),
}

impl IntoResponse for CommandStreetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::PartialFailure(json) => (StatusCode::MULTI_STATUS, json).into_response(),
        }
    }
}

/// Possible responses from the single-light command endpoint.
pub enum CommandLightResponse {
    Ok(Json<Light>),
}

impl IntoResponse for CommandLightResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the schedule update endpoint.
pub enum UpdateScheduleResponse {
    Ok(Json<Schedule>),
}

impl IntoResponse for UpdateScheduleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/streets`
pub async fn list<R>(State(state): State<AppState<R>>) -> Result<ListResponse, ApiError>
where
    R: StreetRepository + Send + Sync + 'static,
{
    let streets = state.street_service.list_streets().await?;
    let summaries = streets.iter().map(StreetSummary::from).collect();
    Ok(ListResponse::Ok(Json(summaries)))
}

/// `GET /api/streets/{id}`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: StreetRepository + Send + Sync + 'static,
{
    let street_id: StreetId = id.parse().map_err(LampGridError::from)?;
    let street = state.street_service.get_street(&street_id).await?;
    Ok(GetResponse::Ok(Json(street.into())))
}

/// `POST /api/streets/{id}/command`
pub async fn command_street<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<CommandStreetResponse, ApiError>
where
    R: StreetRepository + Send + Sync + 'static,
{
    let street_id: StreetId = id.parse().map_err(LampGridError::from)?;
    let command = Command::parse(&req.command, req.value)?;

    let outcome = state
        .command_service
        .apply_to_street(&street_id, command)
        .await?;

    let failed = outcome.report.failed.len();
    let total = failed + outcome.report.succeeded.len();
    let body = Json(StreetCommandBody {
        error: outcome.report.has_failures().then_some("partial_failure"),
        message: outcome
            .report
            .has_failures()
            .then(|| format!("{failed} of {total} lights rejected `{}`", command.name())),
        street: outcome.street.into(),
        report: outcome.report,
    });

    if failed > 0 {
        Ok(CommandStreetResponse::PartialFailure(body))
    } else {
        Ok(CommandStreetResponse::Ok(body))
    }
}

/// `POST /api/streets/{id}/lights/{light_id}/command`
pub async fn command_light<R>(
    State(state): State<AppState<R>>,
    Path((id, light_id)): Path<(String, String)>,
    Json(req): Json<CommandRequest>,
) -> Result<CommandLightResponse, ApiError>
where
    R: StreetRepository + Send + Sync + 'static,
{
    let street_id: StreetId = id.parse().map_err(LampGridError::from)?;
    let light_id: LightId = light_id.parse().map_err(LampGridError::from)?;
    let command = Command::parse(&req.command, req.value)?;

    let light = state
        .command_service
        .apply_to_light(&street_id, &light_id, command)
        .await?;
    Ok(CommandLightResponse::Ok(Json(light)))
}

/// `POST /api/streets/{id}/schedule`
pub async fn update_schedule<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(req): Json<ScheduleRequest>,
) -> Result<UpdateScheduleResponse, ApiError>
where
    R: StreetRepository + Send + Sync + 'static,
{
    let street_id: StreetId = id.parse().map_err(LampGridError::from)?;
    let schedule = Schedule::parse(req.enabled, &req.on_time, &req.off_time)?;

    let street = state
        .street_service
        .update_schedule(&street_id, schedule)
        .await?;
    Ok(UpdateScheduleResponse::Ok(Json(street.auto_schedule)))
}
