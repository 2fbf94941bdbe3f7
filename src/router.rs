use axum::{
    Router,
    http::{HeaderValue, header::InvalidHeaderValue},
    routing::get,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{handlers::rest, service::NoteService};

/// Builds the HTTP surface: health check, `/api/notes` CRUD and the API docs.
///
/// Cross-origin requests are accepted from `cors_origin` only, with any
/// method and header.
pub fn build_router(
    service: Arc<NoteService>,
    cors_origin: &str,
) -> Result<Router, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([HeaderValue::from_str(cors_origin)?]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let router = Router::new()
        .route("/", get(rest::health_check))
        .route(
            "/api/notes",
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            "/api/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
