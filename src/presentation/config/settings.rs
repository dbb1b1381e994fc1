use config::Environment as EnvironmentSource;
use config::{Config, ConfigError, File, Map};
use serde::Deserialize;

use super::Environment;

/// Variables read by earlier deployments, mapped onto their settings keys.
const LEGACY_ENV_ALIASES: [(&str, &str); 5] = [
    ("DATABASE_NAME", "database.name"),
    ("USER_NAME", "database.user"),
    ("PASSWORD", "database.password"),
    ("DATABASE_PORT", "database.port"),
    ("TABLE_NAME", "database.table_name"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub upstream: UpstreamSettings,
    pub transcoder: TranscoderSettings,
    pub extraction: ExtractionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub provider: DatabaseProviderSetting,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub table_name: String,
    pub max_connections: u32,
    pub ensure_schema: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProviderSetting {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: String,
    pub local_path: String,
    pub gcs_service_account_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Local,
    Gcs,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub target_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderSettings {
    pub ffmpeg_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub deadline_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub verbose: bool,
    pub json_format: bool,
}

impl Settings {
    /// Layers defaults, the optional `appsettings.<env>` file and `APP_*`
    /// variables (`APP_DATABASE__HOST`, `APP_SERVER__PORT`, ...). Legacy
    /// unprefixed variables, when set, take precedence over all of them.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| {
                Some((key.into_string().ok()?, value.into_string().ok()?))
            })
            .collect();
        Self::load_from_vars(environment, vars)
    }

    /// Same layering as [`Settings::load`], reading variables from `vars`
    /// instead of the process environment.
    pub fn load_from_vars(
        environment: Environment,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 1234)?
            .set_default("database.provider", "postgres")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "audube")?
            .set_default("database.table_name", "audio_info")?
            .set_default("database.max_connections", 10)?
            .set_default("database.ensure_schema", true)?
            .set_default("storage.provider", "local")?
            .set_default("storage.bucket", "extracted-audios")?
            .set_default("storage.local_path", "./audios")?
            .set_default("upstream.base_url", "https://www.youtube.com")?
            .set_default("upstream.target_type", "video/mp4")?
            .set_default("transcoder.ffmpeg_path", "ffmpeg")?
            .set_default("extraction.deadline_secs", 600)?
            .set_default("logging.verbose", false)?
            .set_default("logging.json_format", false)?
            .add_source(File::with_name(environment.config_file()).required(false));

        for (variable, key) in LEGACY_ENV_ALIASES {
            builder = builder.set_override_option(key, vars.get(variable).cloned())?;
        }

        builder
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()
    }
}
