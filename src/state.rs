//! Shared application state.
//!
//! `AppState` is wrapped in `Arc` at startup and shared by all request
//! handlers. SQLite connections are not `Sync`, so handlers open a fresh
//! connection per request from the stored path. WAL mode keeps that cheap
//! for a single-instance deployment.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::db::{self, DatabaseError};

pub struct AppState {
    db_path: PathBuf,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            db_path: config.db_path.clone(),
            config,
        }
    }

    /// Open a database connection for the current request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("clinic.db"),
            ..AppConfig::default()
        };
        (dir, AppState::new(config))
    }

    #[test]
    fn open_db_creates_and_migrates() {
        let (_dir, state) = temp_state();
        let conn = state.open_db().unwrap();
        assert_eq!(crate::db::sqlite::get_current_version(&conn), 1);
    }

    #[test]
    fn reopen_sees_existing_data() {
        let (_dir, state) = temp_state();
        {
            let conn = state.open_db().unwrap();
            crate::db::repository::insert_doctor(
                &conn,
                &crate::models::NewDoctor {
                    username: "kaashvi".into(),
                    name: "Dr. Kaashvi Srivastava".into(),
                    password: "unused".into(),
                    specialization: Some("General Medicine".into()),
                    contact: None,
                    email: None,
                },
                "hash",
            )
            .unwrap();
        }
        let conn = state.open_db().unwrap();
        assert_eq!(crate::db::repository::count_doctors(&conn).unwrap(), 1);
    }
}
