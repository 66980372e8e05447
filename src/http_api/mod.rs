use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::export::{self, ExportError};
use crate::request::{PlanOutcome, PlanRequest, RequestError};
use crate::AppConfig;

#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<AppConfig>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    fn config(&self) -> Arc<RwLock<AppConfig>> {
        self.config.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseListing {
    program: String,
    course: String,
    total_hours: f64,
    allowed_days: Vec<u8>,
}

impl From<RequestError> for ApiError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Config(err @ ConfigError::UnknownProgram(_))
            | RequestError::Config(err @ ConfigError::UnknownCourse { .. }) => {
                ApiError::NotFound(err.to_string())
            }
            RequestError::Config(err) => ApiError::Internal(err.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        warn!(status = status.as_u16(), %message, "request rejected");
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config).put(replace_config))
        .route("/courses", get(list_courses))
        .route("/schedule", post(build_schedule))
        .route("/schedule/csv", post(schedule_csv))
        .route("/schedule/ics", post(schedule_ics))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, config: AppConfig) -> std::io::Result<()> {
    let state = AppState::new(config);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<AppConfig> {
    let config = state.config();
    let current = config.read().clone();
    Json(current)
}

async fn replace_config(
    State(state): State<AppState>,
    Json(replacement): Json<AppConfig>,
) -> Result<Json<AppConfig>, ApiError> {
    replacement.validate()?;
    let config = state.config();
    {
        let mut guard = config.write();
        *guard = replacement.clone();
    }
    info!(programs = replacement.programs.len(), "configuration replaced");
    Ok(Json(replacement))
}

async fn list_courses(State(state): State<AppState>) -> Json<Vec<CourseListing>> {
    let config = state.config();
    let guard = config.read();
    let listings = guard
        .programs
        .iter()
        .flat_map(|program| {
            program.courses.iter().map(|course| CourseListing {
                program: program.name.clone(),
                course: course.name.clone(),
                total_hours: course.total_hours,
                allowed_days: course
                    .allowed_days
                    .iter()
                    .map(|wd| crate::calendar::weekday_number(*wd))
                    .collect(),
            })
        })
        .collect();
    Json(listings)
}

fn plan_outcome(state: &AppState, request: &PlanRequest) -> Result<PlanOutcome, ApiError> {
    let config = state.config();
    let guard = config.read();
    let resolved = request.resolve(&guard)?;
    let today = guard.today()?;
    Ok(resolved.run(&guard.scheduler(), today))
}

async fn build_schedule(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanOutcome>, ApiError> {
    Ok(Json(plan_outcome(&state, &request)?))
}

fn attachment(content_type: &'static str, file_name: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn schedule_csv(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Response, ApiError> {
    let outcome = plan_outcome(&state, &request)?;
    let body = outcome.csv()?;
    Ok(attachment("text/csv", outcome.csv_file_name(), body))
}

async fn schedule_ics(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Response, ApiError> {
    let outcome = plan_outcome(&state, &request)?;
    let dtstamp = {
        let config = state.config();
        let guard = config.read();
        guard.now_local()?
    };
    let body = outcome.ics(&export::batch_token(dtstamp), dtstamp);
    Ok(attachment("text/calendar", outcome.ics_file_name(), body))
}
