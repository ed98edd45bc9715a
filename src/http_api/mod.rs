use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    Scenario, ScenarioOutcome, ScheduleError, ScheduleReport, SchedulerConfig, Task, TaskId,
    evaluate_scenarios, fastest, plan_schedule, prepare_baseline, validate_tasks,
};

#[derive(Clone, Default)]
pub struct AppState {
    tasks: Arc<RwLock<Vec<Task>>>,
    config: Arc<RwLock<SchedulerConfig>>,
}

impl AppState {
    pub fn new(tasks: Vec<Task>, config: SchedulerConfig) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Current tasks and configuration, copied out of the locks.
    fn snapshot(&self) -> (Vec<Task>, SchedulerConfig) {
        let tasks = self.tasks.read().clone();
        let config = self.config.read().clone();
        (tasks, config)
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
    Conflict(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::CycleDetected { .. } => ApiError::Conflict(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksReplaced {
    pub count: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ScenarioRequest {
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioResponse {
    pub outcomes: Vec<ScenarioOutcome>,
    pub fastest: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).put(replace_tasks))
        .route("/tasks/:id", get(get_task))
        .route("/config", get(get_config).put(update_config))
        .route("/schedule", post(compute_schedule))
        .route("/scenarios", post(compare_scenarios))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.tasks.read().clone())
}

async fn replace_tasks(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<TasksReplaced>, ApiError> {
    let report = validate_tasks(&tasks)?;
    let count = tasks.len();
    *state.tasks.write() = tasks;
    Ok(Json(TasksReplaced {
        count,
        warnings: report.warnings(),
    }))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::new(task_id);
    let found = state.tasks.read().iter().find(|task| task.id == id).cloned();
    match found {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {id} not found"))),
    }
}

async fn get_config(State(state): State<AppState>) -> Json<SchedulerConfig> {
    Json(state.config.read().clone())
}

async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<SchedulerConfig>,
) -> Result<Json<SchedulerConfig>, ApiError> {
    config
        .validate()
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    *state.config.write() = config.clone();
    Ok(Json(config))
}

async fn compute_schedule(State(state): State<AppState>) -> Result<Json<ScheduleReport>, ApiError> {
    let (tasks, config) = state.snapshot();
    debug!(tasks = tasks.len(), "schedule requested");
    let report = plan_schedule(&tasks, &config)?;
    Ok(Json(report))
}

async fn compare_scenarios(
    State(state): State<AppState>,
    Json(request): Json<ScenarioRequest>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    if request.scenarios.is_empty() {
        return Err(ApiError::invalid("at least one scenario is required"));
    }
    let (tasks, config) = state.snapshot();
    debug!(tasks = tasks.len(), scenarios = request.scenarios.len(), "scenarios requested");
    let prepared = prepare_baseline(&tasks, &config)?;
    let outcomes = evaluate_scenarios(&prepared.tasks, &prepared.baseline, &request.scenarios);
    let fastest = fastest(&outcomes).map(|outcome| outcome.label.clone());
    Ok(Json(ScenarioResponse {
        outcomes,
        fastest,
        warnings: prepared.warnings,
    }))
}
