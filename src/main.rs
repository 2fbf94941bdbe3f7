mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod router;
mod service;

use std::sync::Arc;

use repository::Repository;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Using database at {}", cfg.database_path);

    // Repository setup and schema initialization, once before serving
    let repo = Repository::new(&cfg.database_path);
    repo.prepare()
        .and_then(|()| repo.ensure_schema())
        .unwrap_or_else(|e| {
            tracing::error!("Failed to initialize database at {}: {e}", repo.path().display());
            panic!("failed to initialize database: {e}");
        });

    // Service creation
    let service = Arc::new(NoteService::new(repo));

    // Router config
    let app = router::build_router(service, &cfg.cors_origin).unwrap_or_else(|e| {
        tracing::error!("Invalid CORS origin '{}': {e}", cfg.cors_origin);
        panic!("invalid CORS origin: {e}");
    });

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr())
        .await
        .expect("failed to bind to address");
    let addr = listener.local_addr().expect("listener has no local address");

    // Starting router
    tracing::info!("Notes API starting, listening on {}", addr);
    axum::serve(listener, app)
        .await
        .expect("failed to start server");
}
