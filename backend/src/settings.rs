//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `REGISTRAR_*` environment variables, command-line flags
//! and configuration files, in OrthoConfig's usual precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRAR")]
pub struct AppSettings {
    /// Socket address to bind.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string. Without one the server keeps its data
    /// in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Bootstrap admin email; the admin is only ensured when a password is
    /// also configured.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: Option<String>,
}

/// Credentials for the admin account ensured at startup.
pub struct AdminBootstrapSettings {
    pub email: String,
    pub name: String,
    pub password: Zeroizing<String>,
}

/// Failure interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("REGISTRAR_ADMIN_EMAIL and REGISTRAR_ADMIN_PASSWORD must be set together")]
    PartialAdmin,
}

impl AppSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.trim();
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL, treating a blank value as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Admin bootstrap credentials, when configured.
    pub fn admin_bootstrap(&self) -> Result<Option<AdminBootstrapSettings>, SettingsError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Ok(Some(AdminBootstrapSettings {
                email: email.clone(),
                name: self
                    .admin_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_owned()),
                password: Zeroizing::new(password.clone()),
            })),
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialAdmin),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "REGISTRAR_BIND_ADDR",
        "REGISTRAR_DATABASE_URL",
        "REGISTRAR_POOL_MAX_SIZE",
        "REGISTRAR_ADMIN_EMAIL",
        "REGISTRAR_ADMIN_PASSWORD",
        "REGISTRAR_ADMIN_NAME",
    ];

    fn load_with(overrides: &[(&'static str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("registrar")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.admin_bootstrap().expect("consistent").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("REGISTRAR_BIND_ADDR", "127.0.0.1:9000"),
            ("REGISTRAR_DATABASE_URL", "postgres://registrar@db/registrar"),
            ("REGISTRAR_POOL_MAX_SIZE", "4"),
            ("REGISTRAR_ADMIN_EMAIL", "root@example.com"),
            ("REGISTRAR_ADMIN_PASSWORD", "changeme"),
        ]);

        assert_eq!(settings.bind_addr().expect("address").port(), 9000);
        assert_eq!(
            settings.database_url(),
            Some("postgres://registrar@db/registrar")
        );
        assert_eq!(settings.pool_max_size, Some(4));
        let admin = settings
            .admin_bootstrap()
            .expect("consistent")
            .expect("configured");
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.name, DEFAULT_ADMIN_NAME);
        assert_eq!(admin.password.as_str(), "changeme");
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = load_with(&[("REGISTRAR_DATABASE_URL", "  ")]);

        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn half_configured_admin_is_rejected() {
        let settings = load_with(&[("REGISTRAR_ADMIN_EMAIL", "root@example.com")]);

        assert!(matches!(
            settings.admin_bootstrap(),
            Err(SettingsError::PartialAdmin)
        ));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let settings = load_with(&[("REGISTRAR_BIND_ADDR", "localhost")]);

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
