//! HTTP routes.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use loctree_domain::{DomainError, Location, LocationId, LocationNode};

use super::dto::{CreateLocationRequest, PatchLocationRequest};
use crate::app::App;
use crate::use_cases::hierarchy::{HierarchyError, LocationChanges};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/location", get(list_locations).post(create_location))
        .route(
            "/location/{id}",
            get(get_location)
                .put(replace_location)
                .patch(patch_location)
                .delete(remove_location),
        )
        .route("/location/{id}/ancestors", get(list_ancestors))
        .route("/location/{id}/descendants", get(list_descendants))
        .layer(middleware::from_fn(render_error_body))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Queries
// =============================================================================

async fn list_locations(State(app): State<Arc<App>>) -> Result<Json<Vec<LocationNode>>, ApiError> {
    let roots = app.hierarchy.list_roots().await?;
    Ok(Json(roots))
}

async fn get_location(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<LocationNode>, ApiError> {
    let node = app.hierarchy.get(parse_id(&id)?).await?;
    Ok(Json(node))
}

async fn list_ancestors(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let ancestors = app.hierarchy.ancestors(parse_id(&id)?).await?;
    Ok(Json(ancestors))
}

async fn list_descendants(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let descendants = app.hierarchy.descendants(parse_id(&id)?).await?;
    Ok(Json(descendants))
}

// =============================================================================
// Mutations
// =============================================================================

async fn create_location(
    State(app): State<Arc<App>>,
    body: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    let Json(request) = body?;
    let (fields, parent_id) = request.into_fields()?;

    let created = app.hierarchy.create(fields, parent_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn replace_location(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    body: Result<Json<CreateLocationRequest>, JsonRejection>,
) -> Result<Json<Location>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = body?;
    let (fields, parent_id) = request.into_fields()?;

    let updated = app
        .hierarchy
        .update(id, LocationChanges::from(fields), parent_id)
        .await?;
    Ok(Json(updated))
}

async fn patch_location(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    body: Result<Json<PatchLocationRequest>, JsonRejection>,
) -> Result<Json<Location>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = body?;
    let (changes, parent_id) = request.into_changes()?;

    let updated = app.hierarchy.update(id, changes, parent_id).await?;
    Ok(Json(updated))
}

async fn remove_location(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.hierarchy.remove(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<LocationId, ApiError> {
    Ok(LocationId::from_str(raw)?)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    timestamp: String,
    path: String,
    message: String,
}

/// Carried on the response until [`render_error_body`] knows the request path.
#[derive(Clone)]
struct ErrorDetails {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let mut response = status.into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails { status, message });
        response
    }
}

/// Middleware that turns an [`ApiError`] response into the JSON error body.
async fn render_error_body(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    let Some(details) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };

    let body = ErrorBody {
        status_code: details.status.as_u16(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        path,
        message: details.message,
    };
    (details.status, Json(body)).into_response()
}

impl From<HierarchyError> for ApiError {
    fn from(e: HierarchyError) -> Self {
        let message = e.to_string();
        match e {
            HierarchyError::NotFound(_) | HierarchyError::ParentNotFound(_) => {
                tracing::debug!(error = %message, "Location lookup failed");
                ApiError::NotFound(message)
            }
            HierarchyError::CyclicParent { .. }
            | HierarchyError::DuplicateKey { .. }
            | HierarchyError::RemovalFailed { .. } => {
                tracing::warn!(error = %message, "Location request conflicts with stored state");
                ApiError::Conflict(message)
            }
            HierarchyError::Repo(_) => {
                tracing::error!(error = %message, "Location store failure");
                ApiError::Internal(message)
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        tracing::debug!(error = %e, "Rejected invalid input");
        ApiError::BadRequest(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        tracing::debug!(error = %e, "Request body failed validation");
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(error = %e, "Malformed request body");
        ApiError::BadRequest(e.body_text())
    }
}
