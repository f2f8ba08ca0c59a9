//! Admin session cookie configuration.
//!
//! Settings come from `SESSION_*` environment variables read through
//! [`mockable::Env`]. Debug builds fall back to permissive defaults with a
//! warning; release builds insist on every toggle and a real signing key.

use std::path::PathBuf;
use std::str::FromStr;

use actix_session::SessionMiddleware;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_COOKIE_NAME: &str = "session";
const DEFAULT_TTL_HOURS: i64 = 12;
const MAX_TTL_HOURS: i64 = 24 * 30;
const FINGERPRINT_BYTES: usize = 8;

const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "whole hours between 1 and 720";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use blog_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Resolved session cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for the cookie store.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
    /// Lifetime of an admin session.
    pub ttl_hours: i64,
}

impl SessionSettings {
    /// Build the cookie-backed session middleware.
    #[must_use]
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(CookieDuration::hours(self.ttl_hours)),
            )
            .build()
    }

    /// Short hex fingerprint of the signing key, safe to log.
    ///
    /// ```
    /// use actix_web::cookie::{Key, SameSite};
    /// use blog_backend::inbound::http::session_config::SessionSettings;
    ///
    /// let settings = SessionSettings {
    ///     key: Key::generate(),
    ///     cookie_secure: true,
    ///     same_site: SameSite::Strict,
    ///     ttl_hours: 12,
    /// };
    /// let fingerprint = settings.key_fingerprint();
    /// assert_eq!(fingerprint.len(), 16);
    /// ```
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        digest
            .iter()
            .take(FINGERPRINT_BYTES)
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without a secure cookie in a release build.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use blog_backend::inbound::http::session_config::{
///     BuildMode, session_settings_from_env,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).unwrap();
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl_hours, 12);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = lenient(env, mode, COOKIE_SECURE_ENV, BOOL_EXPECTED, parse_bool, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = lenient(
        env,
        mode,
        ALLOW_EPHEMERAL_ENV,
        BOOL_EXPECTED,
        parse_bool,
        false,
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl_hours = ttl_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    })
}

/// Read and parse `name`, substituting `default` in debug builds when the
/// variable is missing or malformed.
fn lenient<E, T, P>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    expected: &'static str,
    parse: P,
    default: T,
) -> Result<T, SessionConfigError>
where
    E: Env,
    T: std::fmt::Debug,
    P: Fn(&str) -> Option<T>,
{
    let Some(value) = env.string(name) else {
        if mode.is_debug() {
            warn!(variable = name, default = ?default, "session toggle not set; using default");
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    match parse(&value) {
        Some(parsed) => Ok(parsed),
        None if mode.is_debug() => {
            warn!(variable = name, value = %value, default = ?default, "invalid session toggle; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let same_site = lenient(env, mode, SAMESITE_ENV, SAMESITE_EXPECTED, parse_same_site, default)?;
    if same_site == SameSite::None && !cookie_secure {
        if !mode.is_debug() {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop the session");
    }
    Ok(same_site)
}

/// The lifetime is optional in every build mode; only malformed values fail.
fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<i64, SessionConfigError> {
    match env.string(TTL_HOURS_ENV) {
        None => Ok(DEFAULT_TTL_HOURS),
        Some(value) => match parse_ttl_hours(&value) {
            Some(hours) => Ok(hours),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid SESSION_TTL_HOURS; using default");
                Ok(DEFAULT_TTL_HOURS)
            }
            None => Err(SessionConfigError::InvalidEnv {
                name: TTL_HOURS_ENV,
                value,
                expected: TTL_EXPECTED,
            }),
        },
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key; admins are signed out on restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_ttl_hours(value: &str) -> Option<i64> {
    i64::from_str(value.trim())
        .ok()
        .filter(|hours| (1..=MAX_TTL_HOURS).contains(hours))
}
