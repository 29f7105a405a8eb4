use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde_json::json;

use super::domain::ApplicationId;
use super::form::ApplicationForm;
use super::reconcile::ReconcileError;
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationIntakeService, IntakeError};

/// Router builder exposing HTTP endpoints for application intake.
pub fn application_router<R>(service: Arc<ApplicationIntakeService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(show_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ApplicationIntakeService<R>>>,
    Form(form): Form<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.create(form) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ApplicationIntakeService<R>>>,
    Path(application_id): Path<String>,
    Form(form): Form<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.update(&ApplicationId(application_id), form) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn show_handler<R>(
    State(service): State<Arc<ApplicationIntakeService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ApplicationIntakeService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ApplicationIntakeService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.delete(&ApplicationId(application_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: IntakeError) -> Response {
    let (status, payload) = match &err {
        IntakeError::Invalid(errors) => (StatusCode::BAD_REQUEST, json!({ "errors": errors })),
        IntakeError::Malformed(_) => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
        IntakeError::Reconcile(ReconcileError::DuplicateVin { vins }) => (
            StatusCode::CONFLICT,
            json!({ "error": err.to_string(), "vins": vins }),
        ),
        IntakeError::Reconcile(ReconcileError::DuplicateVehicle(_)) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        IntakeError::Reconcile(ReconcileError::CapacityExceeded { .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": err.to_string() }),
        ),
        IntakeError::Reconcile(ReconcileError::UnknownVehicle(_))
        | IntakeError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
        }
        IntakeError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "application already exists" }),
        ),
        IntakeError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
    };

    (status, Json(payload)).into_response()
}
