//! Admin authentication primitives.
//!
//! The blog has a single author account. Its username and the SHA-256 digest
//! of its password come from configuration; plain-text passwords only ever
//! live in [`LoginCredentials`] for the duration of a login request.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Credentials submitted to the login endpoint.
///
/// The username is trimmed; the password keeps caller whitespace and is
/// wiped from memory on drop.
///
/// # Examples
/// ```
/// use blog_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" editor ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "editor");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Submitted username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Submitted password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while parsing configured admin credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminCredentialsError {
    /// The configured username was blank.
    #[error("admin username must not be empty")]
    EmptyUsername,
    /// The configured digest was not 64 hex characters.
    #[error("admin password digest must be 64 hexadecimal characters")]
    InvalidDigest,
}

/// Configured admin account: username plus SHA-256 password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password_sha256: [u8; 32],
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_sha256", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    /// Parse a username and a hex-encoded SHA-256 password digest.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::{AdminCredentials, LoginCredentials};
    ///
    /// // sha256("password")
    /// let digest = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
    /// let admin = AdminCredentials::from_hex_digest("admin", digest).unwrap();
    /// let attempt = LoginCredentials::try_from_parts("admin", "password").unwrap();
    /// assert!(admin.verify(&attempt));
    /// ```
    pub fn from_hex_digest(
        username: &str,
        password_sha256_hex: &str,
    ) -> Result<Self, AdminCredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AdminCredentialsError::EmptyUsername);
        }
        let mut password_sha256 = [0_u8; 32];
        hex::decode_to_slice(password_sha256_hex.trim(), &mut password_sha256)
            .map_err(|_| AdminCredentialsError::InvalidDigest)?;
        Ok(Self {
            username: username.to_owned(),
            password_sha256,
        })
    }

    /// Configured username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `true` when `attempt` matches the configured account.
    ///
    /// Digest bytes are compared without early exit.
    pub fn verify(&self, attempt: &LoginCredentials) -> bool {
        let digest = Sha256::digest(attempt.password().as_bytes());
        let mismatch = digest
            .iter()
            .zip(self.password_sha256.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b));
        let username_matches = attempt.username() == self.username;
        username_matches & (mismatch == 0)
    }
}

/// Identity stored in the session after a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(String);

impl AdminId {
    /// Wrap a username; blank input is rejected.
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        (!username.trim().is_empty()).then_some(Self(username))
    }
}

impl AsRef<str> for AdminId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
