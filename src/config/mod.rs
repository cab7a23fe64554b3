use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::policy::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub hook_server: ServerConfig,
    pub auth: AuthConfig,
    pub members: MembersConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    None,
    ApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    pub role: Role,
    #[serde(skip_serializing)]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersConfig {
    /// JSON array of member profiles to seed the directory with
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_limit")]
    pub default_limit: usize,
    #[serde(default = "ReportConfig::max_limit")]
    pub max_limit: usize,
}

impl ReportConfig {
    const fn default_limit() -> usize {
        100
    }

    const fn max_limit() -> usize {
        1000
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit(),
            max_limit: Self::max_limit(),
        }
    }
}

/// Parse `role:key,role:key`. Entries with an unknown role are skipped.
pub fn parse_api_keys(raw: &str) -> Vec<ApiKeyConfig> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let Some((role, key)) = entry.split_once(':') else {
                tracing::warn!("Ignoring API key entry without a role prefix");
                return None;
            };
            match Role::parse(role) {
                Some(role) if !key.trim().is_empty() => Some(ApiKeyConfig {
                    role,
                    key: key.trim().to_string(),
                }),
                Some(_) => None,
                None => {
                    tracing::warn!("Ignoring API key with unknown role '{role}'");
                    None
                }
            }
        })
        .collect()
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match env_or("DATABASE_BACKEND", "sqlite").to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                tracing::warn!(
                    "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres"
                );
                DatabaseBackend::Sqlite
            }
        };

        let database_url = env_or("DATABASE_URL", "sqlite://./member_visits.db");
        let max_connections = env_parse("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let api_host = env_or("API_HOST", "127.0.0.1");
        let api_port = env_parse("API_PORT", 8080u16)?;

        let hook_host = env_or("HOOK_HOST", "127.0.0.1");
        let hook_port = env_parse("HOOK_PORT", 8081u16)?;

        let auth_mode = match env_or("AUTH_MODE", "none").to_lowercase().as_str() {
            "none" => AuthMode::None,
            "apikey" | "api_key" | "api-key" => AuthMode::ApiKey,
            other => {
                tracing::warn!(
                    "Unknown AUTH_MODE '{other}', falling back to 'none'. Supported values: none, apikey"
                );
                AuthMode::None
            }
        };

        let api_keys = std::env::var("API_KEYS")
            .map(|raw| parse_api_keys(&raw))
            .unwrap_or_default();

        if matches!(auth_mode, AuthMode::ApiKey) && api_keys.is_empty() {
            anyhow::bail!("API_KEYS must contain at least one role:key entry when AUTH_MODE=apikey");
        }

        let seed_file = std::env::var("MEMBERS_FILE").ok().filter(|v| !v.is_empty());

        let default_limit = env_parse("REPORT_DEFAULT_LIMIT", ReportConfig::default_limit())?;
        let max_limit = env_parse("REPORT_MAX_LIMIT", ReportConfig::max_limit())?;

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            hook_server: ServerConfig {
                host: hook_host,
                port: hook_port,
            },
            auth: AuthConfig {
                mode: auth_mode,
                api_keys,
            },
            members: MembersConfig { seed_file },
            report: ReportConfig {
                default_limit,
                max_limit,
            },
        })
    }
}
