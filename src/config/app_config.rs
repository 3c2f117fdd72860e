use config::Config;
use error_stack::{report, ResultExt};
use serde::de::IntoDeserializer;
use serde::Deserialize;
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "Config";
pub const ENV_PREFIX: &str = "BROKER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file '{0}'")]
    Load(String),
    #[error("Failed to deserialize config file '{0}'")]
    Deserialize(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: super::sheets_config::SpreadsheetConfig,
}

impl AppConfig {
    /// Loads the file named by `CONFIG_PATH` (default `Config`), with
    /// `BROKER__SECTION__KEY` environment variables taking precedence.
    pub fn from_env() -> error_stack::Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&config_path)
    }

    pub fn load(config_path: &str) -> error_stack::Result<Self, ConfigError> {
        let value = Config::builder()
            .add_source(config::File::with_name(config_path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .change_context_lazy(|| ConfigError::Load(config_path.to_string()))?
            .try_deserialize::<serde_json::Value>()
            .change_context_lazy(|| ConfigError::Load(config_path.to_string()))?;

        Self::from_value(value).attach_printable_lazy(|| format!("Config file: {}", config_path))
    }

    /// Deserializes with field-path tracking so a bad entry names its location.
    pub fn from_value(value: serde_json::Value) -> error_stack::Result<Self, ConfigError> {
        let mut track = Track::new();
        let path_de = PathDeserializer::new(value.into_deserializer(), &mut track);

        AppConfig::deserialize(path_de).map_err(|e| {
            let path_str = track
                .path()
                .iter()
                .map(|seg| match seg {
                    Segment::Seq { index } => format!("[{}]", index),
                    Segment::Map { key } => format!(".{}", key),
                    Segment::Enum { variant } => format!("::{}", variant),
                    Segment::Unknown => String::from("<?>"),
                })
                .collect::<String>();

            report!(ConfigError::Deserialize(e.to_string()))
                .attach_printable(format!("Field path: {}", path_str.trim_start_matches('.')))
        })
    }
}
