//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `BLOG_*` environment variables and config
//! files, e.g. `BLOG_DATABASE_URL` or `--database-url`.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    AdminCredentials, AdminCredentialsError, DEFAULT_EXCERPT_LENGTH, DEFAULT_SLUG_MAX_ATTEMPTS,
    SlugPolicy,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const MIN_EXCERPT_LENGTH: usize = 20;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// Only one admin setting is present.
    #[error("admin login needs both BLOG_ADMIN_USERNAME and BLOG_ADMIN_PASSWORD_SHA256")]
    PartialAdmin,
    /// The admin settings are malformed.
    #[error(transparent)]
    Admin(#[from] AdminCredentialsError),
    /// The slug attempt budget is zero.
    #[error("slug_max_attempts must be at least 1")]
    SlugAttempts,
    /// The excerpt length is below the minimum.
    #[error("excerpt_length must be at least {MIN_EXCERPT_LENGTH}")]
    ExcerptLength,
}

/// Settings for the blog server and its maintenance binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; articles live in memory when absent.
    pub database_url: Option<String>,
    /// Directory receiving uploaded images.
    pub upload_dir: Option<PathBuf>,
    /// Admin account name.
    pub admin_username: Option<String>,
    /// Hex SHA-256 digest of the admin password.
    pub admin_password_sha256: Option<String>,
    /// Suffixes tried before slug allocation gives up.
    pub slug_max_attempts: Option<u32>,
    /// Target excerpt length in characters.
    #[ortho_config(default = 150)]
    pub excerpt_length: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            upload_dir: None,
            admin_username: None,
            admin_password_sha256: None,
            slug_max_attempts: None,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

impl AppSettings {
    /// Listening address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Fails when the configured value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL with blank values treated as unset.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Upload directory, defaulting to `uploads`.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Configured admin account; `None` disables login.
    ///
    /// # Errors
    ///
    /// Fails when only one of the two values is set or the digest is
    /// malformed.
    pub fn admin_credentials(&self) -> Result<Option<AdminCredentials>, SettingsError> {
        match (&self.admin_username, &self.admin_password_sha256) {
            (None, None) => Ok(None),
            (Some(username), Some(digest)) => {
                Ok(Some(AdminCredentials::from_hex_digest(username, digest)?))
            }
            _ => Err(SettingsError::PartialAdmin),
        }
    }

    /// Slug allocation policy.
    ///
    /// # Errors
    ///
    /// Rejects a zero attempt budget.
    pub fn slug_policy(&self) -> Result<SlugPolicy, SettingsError> {
        match self.slug_max_attempts.unwrap_or(DEFAULT_SLUG_MAX_ATTEMPTS) {
            0 => Err(SettingsError::SlugAttempts),
            attempts => Ok(SlugPolicy::new(attempts)),
        }
    }

    /// Excerpt length in characters.
    ///
    /// # Errors
    ///
    /// Rejects lengths too short to hold a sentence.
    pub fn excerpt_length(&self) -> Result<usize, SettingsError> {
        if self.excerpt_length < MIN_EXCERPT_LENGTH {
            return Err(SettingsError::ExcerptLength);
        }
        Ok(self.excerpt_length)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "BLOG_BIND_ADDR",
        "BLOG_DATABASE_URL",
        "BLOG_UPLOAD_DIR",
        "BLOG_ADMIN_USERNAME",
        "BLOG_ADMIN_PASSWORD_SHA256",
        "BLOG_SLUG_MAX_ATTEMPTS",
        "BLOG_EXCERPT_LENGTH",
    ];

    const PASSWORD_DIGEST: &str =
        "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("blog-backend")]).expect("config should load")
    }

    fn cleared_except(
        overrides: &[(&'static str, &str)],
    ) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            "0.0.0.0:8080".parse().expect("socket addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.upload_dir(), PathBuf::from("uploads"));
        assert!(settings.admin_credentials().expect("no admin").is_none());
        assert_eq!(
            settings.slug_policy().expect("policy").max_attempts(),
            DEFAULT_SLUG_MAX_ATTEMPTS
        );
        assert_eq!(
            settings.excerpt_length().expect("length"),
            DEFAULT_EXCERPT_LENGTH
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("BLOG_BIND_ADDR", "127.0.0.1:3000"),
            ("BLOG_DATABASE_URL", "postgres://blog@localhost/blog"),
            ("BLOG_UPLOAD_DIR", "/srv/blog/uploads"),
            ("BLOG_ADMIN_USERNAME", "editor"),
            ("BLOG_ADMIN_PASSWORD_SHA256", PASSWORD_DIGEST),
            ("BLOG_SLUG_MAX_ATTEMPTS", "5"),
            ("BLOG_EXCERPT_LENGTH", "200"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            3000
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://blog@localhost/blog")
        );
        assert_eq!(settings.upload_dir(), PathBuf::from("/srv/blog/uploads"));
        let admin = settings
            .admin_credentials()
            .expect("valid admin")
            .expect("admin configured");
        assert_eq!(admin.username(), "editor");
        assert_eq!(settings.slug_policy().expect("policy").max_attempts(), 5);
        assert_eq!(settings.excerpt_length().expect("length"), 200);
    }

    #[rstest]
    #[case(AppSettings { admin_username: Some("editor".to_owned()), ..AppSettings::default() })]
    #[case(AppSettings { admin_password_sha256: Some(PASSWORD_DIGEST.to_owned()), ..AppSettings::default() })]
    fn half_configured_admin_is_rejected(#[case] settings: AppSettings) {
        assert!(matches!(
            settings.admin_credentials(),
            Err(SettingsError::PartialAdmin)
        ));
    }

    #[rstest]
    #[case(AppSettings { bind_addr: Some("localhost".to_owned()), ..AppSettings::default() }, "bind")]
    #[case(AppSettings { slug_max_attempts: Some(0), ..AppSettings::default() }, "slug")]
    #[case(AppSettings { excerpt_length: 5, ..AppSettings::default() }, "excerpt")]
    #[case(
        AppSettings {
            admin_username: Some("editor".to_owned()),
            admin_password_sha256: Some("not-hex".to_owned()),
            ..AppSettings::default()
        },
        "admin"
    )]
    fn invalid_values_are_reported(#[case] settings: AppSettings, #[case] which: &str) {
        let failed = match which {
            "bind" => settings.bind_addr().is_err(),
            "slug" => settings.slug_policy().is_err(),
            "excerpt" => settings.excerpt_length().is_err(),
            _ => settings.admin_credentials().is_err(),
        };
        assert!(failed, "{which} should be rejected");
    }

    #[rstest]
    fn blank_database_url_counts_as_absent() {
        let settings = AppSettings {
            database_url: Some("  ".to_owned()),
            ..AppSettings::default()
        };
        assert!(settings.database_url().is_none());
    }
}
