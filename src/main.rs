use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use clinica::api::api_router;
use clinica::config::AppConfig;
use clinica::seed;
use clinica::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::info!(db = %config.db_path.display(), port, "starting clinica");

    let state = Arc::new(AppState::new(config));

    // First open runs migrations; seeding is idempotent.
    let seeded = match state.open_db() {
        Ok(conn) => match seed::seed_all(&conn) {
            Ok(n) => n,
            Err(err) => {
                tracing::error!(%err, "seeding failed");
                std::process::exit(1);
            }
        },
        Err(err) => {
            tracing::error!(%err, "database initialization failed");
            std::process::exit(1);
        }
    };
    if seeded > 0 {
        tracing::info!(rows = seeded, "seeded reference data");
    }

    let app = api_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(%err, "server error");
        std::process::exit(1);
    }
}
