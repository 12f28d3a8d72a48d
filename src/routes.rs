use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use serde_json::json;

use crate::{
    handler::{
        auth::auth_handler,
        support::{support_handler, support_query_handler},
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The submission form is public; board reads and triage updates are not.
    let support_routes = support_handler().merge(
        support_query_handler().layer(middleware::from_fn(auth)),
    );

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/support", support_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest_service(
            "/uploads",
            ServeDir::new(app_state.attachments.upload_dir()),
        )
        .nest("/api", api_route)
}
