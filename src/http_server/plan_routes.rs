//! Plan HTTP routes
//!
//! CRUD surface over the plan engine. Auth and schema validation run
//! before the engine is touched; conditional semantics flow through the
//! `If-Match` / `If-None-Match` headers and the `ETag` response header.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthError, IdentityVerifier, Principal};
use crate::engine::{PlanEngine, ReadOutcome};
use crate::fingerprint::VersionTag;
use crate::observability::Logger;
use crate::schema::{DocumentValidator, PLAN_PATCH_SCHEMA, PLAN_SCHEMA};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// State shared across plan handlers
pub struct PlanServiceState {
    pub engine: PlanEngine,
    pub validator: Arc<dyn DocumentValidator>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

// ==================
// Routes
// ==================

/// Create plan routes
pub fn plan_routes(state: Arc<PlanServiceState>) -> Router {
    Router::new()
        .route("/plan", post(create_plan_handler))
        .route(
            "/plan/{id}",
            get(get_plan_handler)
                .put(replace_plan_handler)
                .patch(patch_plan_handler)
                .delete(delete_plan_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn authenticate(state: &PlanServiceState, headers: &HeaderMap) -> ApiResult<Principal> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingBearer)?;

    let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingBearer)?;
    Ok(state.verifier.verify(token)?)
}

fn conditional_tag(headers: &HeaderMap, name: HeaderName) -> Option<VersionTag> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(VersionTag::from_header)
}

fn tagged(status: StatusCode, tag: &VersionTag, body: impl Serialize) -> Response {
    (status, [(header::ETAG, tag.to_string())], Json(body)).into_response()
}

// ==================
// Handlers
// ==================

async fn create_plan_handler(
    State(state): State<Arc<PlanServiceState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let principal = authenticate(&state, &headers)?;
    state.validator.validate(PLAN_SCHEMA, &body)?;

    let record = state.engine.create(&body)?;

    let request_id = Uuid::new_v4().to_string();
    Logger::info(
        "plan_created",
        &[
            ("request_id", request_id.as_str()),
            ("caller", principal.subject.as_str()),
            ("tag", record.tag.as_str()),
        ],
    );

    Ok(tagged(StatusCode::CREATED, &record.tag, record.body))
}

async fn get_plan_handler(
    State(state): State<Arc<PlanServiceState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let if_none_match = conditional_tag(&headers, header::IF_NONE_MATCH);
    match state.engine.fetch(&id, if_none_match.as_ref())? {
        ReadOutcome::NotModified => Ok(StatusCode::NOT_MODIFIED.into_response()),
        ReadOutcome::Found(record) => Ok(tagged(StatusCode::OK, &record.tag, record.body)),
    }
}

async fn replace_plan_handler(
    State(state): State<Arc<PlanServiceState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let principal = authenticate(&state, &headers)?;
    state.validator.validate(PLAN_SCHEMA, &body)?;

    let if_match = conditional_tag(&headers, header::IF_MATCH);
    let record = state.engine.replace(&id, &body, if_match.as_ref())?;

    Logger::info(
        "plan_replaced",
        &[
            ("caller", principal.subject.as_str()),
            ("plan_id", id.as_str()),
            ("tag", record.tag.as_str()),
        ],
    );

    Ok(tagged(
        StatusCode::OK,
        &record.tag,
        MessageResponse {
            message: "Plan updated successfully".to_string(),
        },
    ))
}

async fn patch_plan_handler(
    State(state): State<Arc<PlanServiceState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let principal = authenticate(&state, &headers)?;
    state.validator.validate(PLAN_PATCH_SCHEMA, &body)?;

    let if_match = conditional_tag(&headers, header::IF_MATCH);
    let record = state.engine.patch(&id, &body, if_match.as_ref())?;

    Logger::info(
        "plan_patched",
        &[
            ("caller", principal.subject.as_str()),
            ("plan_id", id.as_str()),
            ("tag", record.tag.as_str()),
        ],
    );

    Ok(tagged(StatusCode::OK, &record.tag, record.body))
}

async fn delete_plan_handler(
    State(state): State<Arc<PlanServiceState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let principal = authenticate(&state, &headers)?;

    let if_match = conditional_tag(&headers, header::IF_MATCH);
    state.engine.delete(&id, if_match.as_ref())?;

    Logger::info(
        "plan_deleted",
        &[
            ("caller", principal.subject.as_str()),
            ("plan_id", id.as_str()),
        ],
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}
