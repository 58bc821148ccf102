// config.rs
use std::env;

use crate::errors::{AppError, Result};

pub const DEFAULT_DATABASE_NAME: &str = "rov_league";
pub const DEFAULT_PORT: u16 = 10000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub require_admin_auth: bool,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| AppError::configuration("DATABASE_URL must be set"))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::configuration(format!("PORT must be a number, got '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        let require_admin_auth = match get("REQUIRE_ADMIN_AUTH").as_deref() {
            None => true,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(AppError::configuration(format!(
                    "REQUIRE_ADMIN_AUTH must be true or false, got '{}'",
                    other
                )))
            }
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if require_admin_auth => {
                return Err(AppError::configuration(
                    "JWT_SECRET must be set when admin auth is enabled",
                ))
            }
            None => String::new(),
        };

        Ok(AppConfig {
            database_url,
            database_name: get("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            jwt_secret,
            require_admin_auth,
            admin_username: get("ADMIN_USERNAME"),
            admin_password: get("ADMIN_PASSWORD"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let c = config(&[("DATABASE_URL", "mongodb://localhost"), ("JWT_SECRET", "s")]).unwrap();
        assert_eq!(c.database_name, DEFAULT_DATABASE_NAME);
        assert_eq!(c.port, DEFAULT_PORT);
        assert!(c.require_admin_auth);
        assert_eq!(c.bind_address(), "0.0.0.0:10000");
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(config(&[]), Err(AppError::ConfigurationError(_))));
    }

    #[test]
    fn secret_only_required_with_auth() {
        assert!(config(&[("DATABASE_URL", "mongodb://x")]).is_err());
        let c = config(&[("DATABASE_URL", "mongodb://x"), ("REQUIRE_ADMIN_AUTH", "false")]).unwrap();
        assert!(!c.require_admin_auth);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config(&[("DATABASE_URL", "mongodb://x"), ("JWT_SECRET", "s"), ("PORT", "http")]);
        assert!(err.is_err());
    }
}
