use std::path::PathBuf;
use std::time::Duration;

use crate::geo::Coordinate;

/// Application-level constants
pub const APP_NAME: &str = "Clinica";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Fallback reference point for the nearest-pharmacy finder:
/// the clinic's own location in central Bengaluru.
const DEFAULT_HOME_LATITUDE: f64 = 12.9716;
const DEFAULT_HOME_LONGITUDE: f64 = 77.5946;

const DEFAULT_SECRET: &str = "dev-secret-change-me";

/// Get the application data directory
/// ~/Clinica/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => PathBuf::from(".").join(APP_NAME),
    }
}

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub cache_ttl: Duration,
    pub home: Coordinate,
    pub secret: String,
}

impl AppConfig {
    /// Load configuration from `CLINICA_*` environment variables, with
    /// defaults suitable for local development. Unparseable values fall
    /// back to the default with a warning rather than aborting startup.
    pub fn from_env() -> Self {
        let db_path = std::env::var("CLINICA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("clinic.db"));

        let port = env_parsed("CLINICA_PORT", DEFAULT_PORT);
        let cache_ttl =
            Duration::from_secs(env_parsed("CLINICA_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS));
        let home = Coordinate {
            latitude: env_parsed("CLINICA_HOME_LAT", DEFAULT_HOME_LATITUDE),
            longitude: env_parsed("CLINICA_HOME_LNG", DEFAULT_HOME_LONGITUDE),
        };

        let secret = match std::env::var("CLINICA_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("CLINICA_SECRET not set, using development default");
                DEFAULT_SECRET.to_string()
            }
        };

        Self {
            db_path,
            port,
            cache_ttl,
            home,
            secret,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: app_data_dir().join("clinic.db"),
            port: DEFAULT_PORT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            home: Coordinate {
                latitude: DEFAULT_HOME_LATITUDE,
                longitude: DEFAULT_HOME_LONGITUDE,
            },
            secret: DEFAULT_SECRET.to_string(),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(var = name, value = %raw, "unparseable value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
