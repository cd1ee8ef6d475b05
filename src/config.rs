use std::{env, path::PathBuf};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub materials_dir: PathBuf,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub password: PasswordConfig,
    pub seed_demo_data: bool,
    pub admin_regno: Option<String>,
    pub admin_password: Option<SecretString>,
    pub production: bool,
}

/// argon2id cost parameters used when hashing new passwords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PasswordConfig::default();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data.db".to_string()),
            database_max_connections: parsed_var("DATABASE_MAX_CONNECTIONS", 5),
            materials_dir: env::var("MATERIALS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/materials")),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parsed_var("WEB_SERVER_PORT", 3000),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: parsed_var("JWT_EXPIRATION_HOURS", 168),
            password: PasswordConfig {
                memory_cost_kib: parsed_var("PASSWORD_MEMORY_KIB", defaults.memory_cost_kib),
                time_cost: parsed_var("PASSWORD_TIME_COST", defaults.time_cost),
                parallelism: parsed_var("PASSWORD_PARALLELISM", defaults.parallelism),
            },
            seed_demo_data: parsed_var("SEED_DEMO_DATA", true),
            admin_regno: non_empty_var("ADMIN_REGNO"),
            admin_password: non_empty_var("ADMIN_PASSWORD").map(SecretString::from),
            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }

    /// Rejects secrets that are only acceptable on a developer machine.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value; set it to a secure random string"
                    .to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}); it must be at least 32 characters",
                jwt_secret.len()
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    pub fn test_config() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            materials_dir: env::temp_dir().join("elearn-portal-test-materials"),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 3000,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            password: PasswordConfig {
                memory_cost_kib: 64,
                time_cost: 1,
                parallelism: 1,
            },
            seed_demo_data: false,
            admin_regno: None,
            admin_password: None,
            production: false,
        }
    }
}
