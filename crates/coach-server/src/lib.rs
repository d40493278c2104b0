pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Wizard sessions
        .route(
            "/api/wizards",
            get(routes::wizards::list_wizards).post(routes::wizards::open_wizard),
        )
        .route(
            "/api/wizards/{id}",
            get(routes::wizards::get_wizard).delete(routes::wizards::delete_wizard),
        )
        .route(
            "/api/wizards/{id}/draft",
            patch(routes::wizards::update_draft),
        )
        .route("/api/wizards/{id}/tags", post(routes::wizards::toggle_tag))
        .route(
            "/api/wizards/{id}/header/preview",
            post(routes::wizards::preview_header),
        )
        .route(
            "/api/wizards/{id}/header/confirm",
            post(routes::wizards::confirm_header),
        )
        .route(
            "/api/wizards/{id}/header/discard",
            post(routes::wizards::discard_header),
        )
        // Blocks
        .route("/api/wizards/{id}/blocks", post(routes::wizards::add_block))
        .route(
            "/api/wizards/{id}/blocks/{block}",
            patch(routes::wizards::update_block)
                .delete(routes::wizards::remove_block),
        )
        .route(
            "/api/wizards/{id}/blocks/{block}/position",
            put(routes::wizards::move_block),
        )
        // Calendar
        .route(
            "/api/wizards/{id}/days/{day}",
            post(routes::wizards::assign_day).delete(routes::wizards::clear_day),
        )
        .route(
            "/api/wizards/{id}/days/{day}/{block}",
            delete(routes::wizards::unassign_day),
        )
        // Navigation and saving
        .route("/api/wizards/{id}/next", post(routes::wizards::next))
        .route("/api/wizards/{id}/previous", post(routes::wizards::previous))
        .route("/api/wizards/{id}/start-new", post(routes::wizards::start_new))
        .route(
            "/api/wizards/{id}/notice/dismiss",
            post(routes::wizards::dismiss_notice),
        )
        .route("/api/wizards/{id}/save-draft", post(routes::wizards::save_draft))
        .route("/api/wizards/{id}/publish", post(routes::wizards::publish))
        // Records
        .route("/api/records", get(routes::records::list_records))
        .route("/api/records/{id}", get(routes::records::get_record))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the authoring API on `port`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the authoring API on a pre-bound listener.
///
/// Lets the caller read the actual port first (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("coach API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
