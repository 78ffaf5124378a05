//! Signed client-held sessions
//!
//! The only server-side state is the signing key. A logged-in browser holds
//! an HS256 JWT in the `shelf_session` cookie whose claims name the user id;
//! every request verifies the signature and expiry instead of looking the
//! session up. One-shot flash notices ride in a second signed cookie.

use anyhow::Result;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::models::UserId;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "shelf_session";
/// Cookie carrying a pending flash notice
pub const FLASH_COOKIE: &str = "shelf_flash";

const MIN_SECRET_LEN: usize = 32;
const FLASH_TTL_SECONDS: u64 = 300;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key used to sign session and flash cookies
    pub secret: String,
    /// Session lifetime in seconds (default: 7 days)
    pub ttl_seconds: u64,
    /// Whether cookies are marked `Secure`
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing key, at least 32 bytes (required)
    /// - `SESSION_TTL_SECONDS`: session lifetime in seconds (default: 604800)
    /// - `SESSION_COOKIE_SECURE`: `true` to mark cookies `Secure` (default: false)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {} bytes", MIN_SECRET_LEN);
        }

        let ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604800);

        let secure_cookie = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(SessionConfig {
            secret,
            ttl_seconds,
            secure_cookie,
        })
    }
}

/// Claims of a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: UserId,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Severity of a flash notice, used as a CSS class when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "error",
        }
    }
}

/// A message shown once on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    flash: Flash,
    exp: u64,
}

/// Issues and verifies session and flash cookies
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        SessionManager {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Sign a session token for `user_id`
    pub fn issue_token(&self, user_id: UserId) -> Result<String> {
        let now = unix_now()?;
        let claims = SessionClaims {
            user_id,
            iat: now,
            exp: now.saturating_add(self.config.ttl_seconds),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a session token and return the user id it names
    pub fn validate_token(&self, token: &str) -> Option<UserId> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                debug!(
                    "Session for user {} issued at {}",
                    data.claims.user_id, data.claims.iat
                );
                Some(data.claims.user_id)
            }
            Err(e) => {
                debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// Attach a fresh session cookie for `user_id`
    pub fn start_session(&self, jar: CookieJar, user_id: UserId) -> Result<CookieJar> {
        let token = self.issue_token(user_id)?;
        Ok(jar.add(self.cookie(SESSION_COOKIE, token)))
    }

    /// The user id of a valid session cookie, if any
    pub fn current_user_id(&self, jar: &CookieJar) -> Option<UserId> {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| self.validate_token(cookie.value()))
    }

    /// Tell the client to drop its session cookie
    pub fn end_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    /// Queue a flash notice for the next rendered page
    pub fn set_flash(&self, jar: CookieJar, flash: Flash) -> CookieJar {
        let claims = match unix_now() {
            Ok(now) => FlashClaims {
                flash,
                exp: now + FLASH_TTL_SECONDS,
            },
            Err(e) => {
                warn!("Dropping flash message: {}", e);
                return jar;
            }
        };

        match self.encode_claims(&claims) {
            Ok(token) => jar.add(self.cookie(FLASH_COOKIE, token)),
            Err(e) => {
                warn!("Dropping flash message: {}", e);
                jar
            }
        }
    }

    /// Read the pending flash notice and clear it
    pub fn take_flash(&self, jar: CookieJar) -> (CookieJar, Option<Flash>) {
        let Some(cookie) = jar.get(FLASH_COOKIE) else {
            return (jar, None);
        };

        let flash = decode::<FlashClaims>(cookie.value(), &self.decoding_key, &self.validation)
            .map(|data| data.claims.flash)
            .ok();

        (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure_cookie)
            .build()
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}
