//! Application settings loaded via OrthoConfig.
//!
//! Values come from `DROPME_*` environment variables, command-line flags or
//! a configuration file, in the precedence OrthoConfig applies.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the DropMe server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DROPME")]
pub struct AppSettings {
    /// PostgreSQL connection URL. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Maximum recycling submissions per user per UTC day. Zero refuses
    /// every submission.
    #[ortho_config(default = 10)]
    pub max_recycles_per_day: u32,
    /// Apply embedded migrations on startup when a database is configured.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Database URL with blank values treated as unset.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured daily submission cap, passed through unchanged.
    #[must_use]
    pub const fn daily_limit(&self) -> u32 {
        self.max_recycles_per_day
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use crate::domain::DEFAULT_DAILY_LIMIT;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 4] = [
        "DROPME_DATABASE_URL",
        "DROPME_BIND_ADDR",
        "DROPME_MAX_RECYCLES_PER_DAY",
        "DROPME_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("dropme-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), None);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.daily_limit(), DEFAULT_DAILY_LIMIT);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "DROPME_DATABASE_URL",
                Some("postgres://localhost/dropme".to_owned()),
            ),
            ("DROPME_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("DROPME_MAX_RECYCLES_PER_DAY", Some("3".to_owned())),
            ("DROPME_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Some("postgres://localhost/dropme"));
        assert_eq!(
            settings.bind_addr().expect("configured address"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.daily_limit(), 3);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    #[case(Some("   ".to_owned()), None)]
    #[case(Some(" postgres://db/dropme ".to_owned()), Some("postgres://db/dropme"))]
    fn database_url_ignores_blank_values(
        #[case] raw: Option<String>,
        #[case] expected: Option<&str>,
    ) {
        let settings = AppSettings {
            database_url: raw,
            bind_addr: None,
            max_recycles_per_day: 10,
            run_migrations: true,
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    fn malformed_bind_addr_is_an_error() {
        let settings = AppSettings {
            database_url: None,
            bind_addr: Some("localhost".to_owned()),
            max_recycles_per_day: 0,
            run_migrations: true,
        };
        assert!(settings.bind_addr().is_err());
    }

    #[rstest]
    fn zero_daily_limit_is_kept() {
        let _guard = lock_env([
            ("DROPME_DATABASE_URL", None),
            ("DROPME_BIND_ADDR", None),
            ("DROPME_MAX_RECYCLES_PER_DAY", Some("0".to_owned())),
            ("DROPME_RUN_MIGRATIONS", None),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.daily_limit(), 0);
    }
}
