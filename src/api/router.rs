//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! `POST /login` is the only public route; everything else requires a
//! valid session cookie.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` via `with_state`.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the API router for the given application state.
pub fn api_router(state: Arc<AppState>) -> Router {
    build_router(ApiContext::new(state))
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need access to the shared context
/// (e.g. to establish sessions directly).
#[cfg(test)]
pub(crate) fn api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/logout", post(endpoints::auth::logout))
        .route("/dashboard", get(endpoints::dashboard::overview))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail).put(endpoints::patients::update),
        )
        .route(
            "/patients/:id/prescriptions",
            get(endpoints::patients::prescriptions),
        )
        .route(
            "/medicines",
            get(endpoints::medicines::list).post(endpoints::medicines::create),
        )
        .route(
            "/medicines/:id",
            get(endpoints::medicines::detail).put(endpoints::medicines::update),
        )
        .route(
            "/prescriptions",
            get(endpoints::prescriptions::list).post(endpoints::prescriptions::create),
        )
        .route("/prescriptions/:id", get(endpoints::prescriptions::detail))
        .route(
            "/pharmacies",
            get(endpoints::pharmacies::list).post(endpoints::pharmacies::create),
        )
        // Static segment must be routed alongside `:id`; matchit gives
        // the static route precedence.
        .route("/pharmacies/nearest", get(endpoints::pharmacies::nearest))
        .route(
            "/pharmacies/:id",
            get(endpoints::pharmacies::detail).put(endpoints::pharmacies::update),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_login))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    let public = Router::new()
        .route("/login", post(endpoints::auth::login))
        .with_state(ctx.clone())
        .layer(axum::Extension(ctx));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(CorsLayer::permissive())
}
