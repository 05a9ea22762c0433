//! HTTP API layer.
//!
//! Exposes the clinic's business logic as JSON endpoints. Everything
//! except `POST /login` sits behind the session-cookie middleware.
//!
//! The router is composable: `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
