use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Active store location: `DATABASE_PATH` for sqlite, `CSV_PATH` for csv.
    pub store_path: String,
    pub archive_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Csv,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let store_backend = match env_map
            .get("STORE_BACKEND")
            .map(|s| s.as_str())
            .unwrap_or("sqlite")
        {
            "sqlite" => StoreBackend::Sqlite,
            "csv" => StoreBackend::Csv,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORE_BACKEND".to_string(),
                    format!("must be sqlite or csv, got {}", other),
                ))
            }
        };

        let path_var = match store_backend {
            StoreBackend::Sqlite => "DATABASE_PATH",
            StoreBackend::Csv => "CSV_PATH",
        };
        let store_path = env_map
            .get(path_var)
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv(path_var.to_string()))?;

        let archive_dir = match env_map.get("ARCHIVE_DIR") {
            Some(dir) => dir.clone(),
            None => default_archive_dir(&store_path),
        };

        Ok(Config {
            port,
            store_backend,
            store_path,
            archive_dir,
        })
    }
}

/// Archives default to sitting next to the active store.
fn default_archive_dir(store_path: &str) -> String {
    match Path::new(store_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().to_string(),
        _ => ".".to_string(),
    }
}
