use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, ErrorResponse, HealthResponse, NoteResponse, UpdateNoteRequest},
    service::{NoteService, NoteServiceError},
};


#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        description = "Backend API for a simple notes application"
    ),
    paths(
        health_check,
        get_all_notes,
        get_one_note,
        create_note,
        update_note,
        delete_note
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "health", description = "Service health and readiness checks"),
        (name = "notes", description = "CRUD operations for notes")
    )
)]
pub struct ApiDoc;

/// Maps a service failure onto a status code and a `{"detail": ...}` body.
fn error_response(err: NoteServiceError, failure: &str) -> Response {
    let (status, detail) = match &err {
        NoteServiceError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        NoteServiceError::EmptyUpdate => (StatusCode::BAD_REQUEST, err.to_string()),
        NoteServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Note not found".to_string()),
        NoteServiceError::Storage(_)
        | NoteServiceError::Invariant(_)
        | NoteServiceError::Task(_) => {
            tracing::error!("{failure}: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, failure.to_string())
        }
    };

    (status, Json(ErrorResponse::new(detail))).into_response()
}

/// Extractor rejections keep axum's status code but use the `{"detail": ...}` body.
fn rejection_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse::new(detail))).into_response()
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tag = "health"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            message: "Healthy".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, most recently updated first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => error_response(e, "Failed to list notes"),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return rejection_response(e.status(), e.body_text()),
    };

    match service.get_one_note(id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => error_response(e, "Failed to get note"),
    }
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 422, description = "Title or content out of bounds", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(e) => return rejection_response(e.status(), e.body_text()),
    };

    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => error_response(e, "Failed to create note"),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "No fields provided to update", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 422, description = "Title or content out of bounds", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return rejection_response(e.status(), e.body_text()),
    };
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(e) => return rejection_response(e.status(), e.body_text()),
    };

    match service.update_note(id, payload).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => error_response(e, "Failed to update note"),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(e) => return rejection_response(e.status(), e.body_text()),
    };

    match service.delete_note(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e, "Failed to delete note"),
    }
}
