//! Doctor authentication.
//!
//! Passwords are hashed with PBKDF2-HMAC-SHA256 and a per-password random
//! salt, verified with a constant-time comparison. Sessions are opaque
//! random bearer tokens handed out in an HttpOnly cookie; only the SHA-256
//! hash of a token is kept server-side, with a sliding expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Default session lifetime: 1 hour, refreshed on each authenticated
/// request.
pub const SESSION_TTL_SECS: u64 = 3600;

const SCHEME: &str = "pbkdf2-sha256";

fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD_NO_PAD
}

/// Hash a password into the stored encoding:
/// `pbkdf2-sha256$<iterations>$<b64 salt>$<b64 hash>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut salt);
    hash_password_with_salt(password, &salt, PBKDF2_ITERATIONS)
}

fn hash_password_with_salt(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut derived);
    format!(
        "{SCHEME}${iterations}${}${}",
        b64().encode(salt),
        b64().encode(derived)
    )
}

/// Verify a password against a stored hash, constant-time on the digest
/// comparison. Malformed stored hashes verify as false rather than
/// erroring: a corrupt row must not become a login bypass.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME || parts.next().is_some() {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (b64().decode(salt), b64().decode(hash)) else {
        return false;
    };
    if expected.len() != HASH_LENGTH {
        return false;
    }

    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    derived.ct_eq(&expected).into()
}

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a session token for server-side storage.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// The authenticated doctor bound to a session.
#[derive(Debug, Clone)]
pub struct Session {
    pub doctor_id: i64,
    pub username: String,
    pub name: String,
    expires_at: Instant,
}

/// In-memory session store keyed by token hash.
///
/// State is process-local by design: the clinic runs a single instance,
/// and a restart simply asks doctors to log in again.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Establish a session for a doctor. Returns the bearer token; only
    /// its hash is retained.
    pub fn establish(&mut self, doctor_id: i64, username: &str, name: &str) -> String {
        // Opportunistic cleanup keeps the map from accumulating dead
        // sessions across long uptimes.
        if self.sessions.len() > 100 {
            self.purge_expired();
        }

        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            Session {
                doctor_id,
                username: username.to_string(),
                name: name.to_string(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Validate a token and slide its expiry forward. Returns the bound
    /// session, or `None` for unknown/expired tokens.
    pub fn validate(&mut self, token: &str) -> Option<Session> {
        let key = hash_token(token);
        let session = self.sessions.get_mut(&key)?;
        if Instant::now() >= session.expires_at {
            self.sessions.remove(&key);
            return None;
        }
        session.expires_at = Instant::now() + self.ttl;
        Some(session.clone())
    }

    /// Revoke a session (logout). Unknown tokens are a no-op.
    pub fn revoke(&mut self, token: &str) {
        self.sessions.remove(&hash_token(token));
    }

    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| s.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(SESSION_TTL_SECS))
    }
}
