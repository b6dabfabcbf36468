use serde::Deserialize;
use skyhold_booking::BookingRules;
use skyhold_shared::Masked;
use std::env;
use std::path::PathBuf;

use crate::StoreResult;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackendKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackendKind,
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".skyhold/session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackendKind::default(),
            path: default_session_path(),
        }
    }
}

/// The mock admin account.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: Masked<String>,
}

fn default_admin_name() -> String { "John Doe".to_string() }
fn default_admin_email() -> String { "johndoe@example.com".to_string() }
fn default_admin_password() -> Masked<String> { Masked::from("securePass123") }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_name: default_admin_name(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "skyhold_app=info,skyhold_booking=info,skyhold_catalog=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load() -> StoreResult<Self> {
        Self::load_from("config")
    }

    /// Layered load: `{dir}/default`, `{dir}/{RUN_MODE}`, `{dir}/local`, then
    /// `SKYHOLD__*` environment variables. Every file is optional.
    pub fn load_from(dir: &str) -> StoreResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // e.g. `SKYHOLD__BOOKING__HOLD_SECONDS=90`
            .add_source(config::Environment::with_prefix("SKYHOLD").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhold_booking::ExpiryPolicy;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.booking.hold_seconds, 120);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.auth.admin_email, "johndoe@example.com");
    }

    #[test]
    fn test_layers_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
                [booking]
                hold_seconds = 90
                expiry_policy = "keep_draft_for_retry"

                [session]
                backend = "file"
                path = "/tmp/skyhold-session.json"
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("local.toml"),
            r#"
                [booking]
                hold_seconds = 60
            "#,
        )
        .unwrap();

        let config = Config::load_from(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.booking.hold_seconds, 60);
        assert_eq!(config.booking.tick_millis, 1000);
        assert_eq!(config.booking.expiry_policy, ExpiryPolicy::KeepDraftForRetry);
        assert_eq!(config.session.backend, SessionBackendKind::File);
        assert_eq!(config.session.path, PathBuf::from("/tmp/skyhold-session.json"));
    }

    #[test]
    fn test_admin_password_is_masked_in_debug() {
        let config = Config::default();
        assert!(!format!("{:?}", config.auth).contains("securePass123"));
    }
}
