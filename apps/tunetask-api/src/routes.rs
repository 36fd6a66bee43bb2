use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use tunetask_domain::task::TaskStatus;
use tunetask_service::{
	CreateRequest, Error, ListRequest, ListResponse, ReembedReport, SearchRequest,
	SearchResponse, TaskItem, UpdateRequest,
};

#[derive(Debug, Deserialize)]
struct UpdateBody {
	title: String,
	#[serde(default)]
	description: String,
	status: TaskStatus,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Validation { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::InvalidQuery { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_QUERY", message),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::DuplicateId { message } =>
				ApiError::new(StatusCode::CONFLICT, "DUPLICATE_ID", message),
			Error::Provider { message } =>
				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_ERROR", message),
			Error::SearchUnavailable { message } =>
				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "SEARCH_UNAVAILABLE", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Internal storage error.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/tasks", post(create_task).get(list_tasks))
		.route("/v1/tasks/search", post(search_tasks))
		.route("/v1/tasks/{task_id}", get(get_task).put(update_task).delete(delete_task))
		.route("/v1/admin/reembed", post(reembed))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_task(
	State(state): State<AppState>,
	Json(payload): Json<CreateRequest>,
) -> Result<(StatusCode, Json<TaskItem>), ApiError> {
	let item = state.service.create(payload).await?;

	Ok((StatusCode::CREATED, Json(item)))
}

async fn list_tasks(
	State(state): State<AppState>,
	Query(query): Query<ListRequest>,
) -> Result<Json<ListResponse>, ApiError> {
	let response = state.service.list(query).await?;

	Ok(Json(response))
}

async fn get_task(
	State(state): State<AppState>,
	Path(task_id): Path<Uuid>,
) -> Result<Json<TaskItem>, ApiError> {
	let item = state.service.get(task_id).await?;

	Ok(Json(item))
}

async fn update_task(
	State(state): State<AppState>,
	Path(task_id): Path<Uuid>,
	Json(payload): Json<UpdateBody>,
) -> Result<Json<TaskItem>, ApiError> {
	let req = UpdateRequest {
		task_id,
		title: payload.title,
		description: payload.description,
		status: payload.status,
	};
	let item = state.service.update(req).await?;

	Ok(Json(item))
}

async fn delete_task(
	State(state): State<AppState>,
	Path(task_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.delete(task_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn search_tasks(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn reembed(State(state): State<AppState>) -> Result<Json<ReembedReport>, ApiError> {
	let report = state.service.reembed_missing().await?;

	Ok(Json(report))
}
