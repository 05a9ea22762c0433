//! Shared types for the HTTP API layer.

use std::sync::{Arc, Mutex};

use crate::auth::SessionStore;
use crate::cache::ListingCache;
use crate::state::AppState;

/// Shared context for all API routes and middleware.
/// Wraps `AppState` plus API-level in-memory stores.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub listings: Arc<Mutex<ListingCache>>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        let ttl = state.config.cache_ttl;
        Self {
            state,
            sessions: Arc::new(Mutex::new(SessionStore::default())),
            listings: Arc::new(Mutex::new(ListingCache::new(ttl))),
        }
    }

    /// Look up a cached listing. A poisoned lock degrades to a cache
    /// miss so the request is still served from the database.
    pub fn cache_get(&self, key: &str) -> Option<serde_json::Value> {
        match self.listings.lock() {
            Ok(cache) => cache.get(key),
            Err(_) => None,
        }
    }

    pub fn cache_put(&self, key: String, value: serde_json::Value) {
        if let Ok(mut cache) = self.listings.lock() {
            cache.put(key, value);
        }
    }

    /// Drop every cached listing. Called after any write so readers
    /// never see stale data past the write.
    pub fn cache_invalidate(&self) {
        if let Ok(mut cache) = self.listings.lock() {
            cache.invalidate_all();
        }
    }
}

/// Authenticated doctor context, injected into request extensions
/// by the auth middleware after session validation.
#[derive(Debug, Clone)]
pub struct DoctorContext {
    pub doctor_id: i64,
    pub username: String,
    pub name: String,
}
