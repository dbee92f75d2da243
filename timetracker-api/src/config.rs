use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3000"]

[database]
# Defaults to the platform data directory when unset
# path = "/var/lib/timetracker/timetracker.db"

[auth]
bcrypt_cost = 12
session_idle_minutes = 120
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub database: Option<DatabaseConfig>,
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_session_idle_minutes() -> i64 {
    120
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
            session_idle_minutes: default_session_idle_minutes(),
        }
    }
}

impl ApiConfig {
    /// Load the config from `path` (or the platform default), writing a
    /// commented default file first when none exists.
    pub fn load(path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn auth(&self) -> AuthConfig {
        self.auth.clone().unwrap_or_default()
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.as_ref().and_then(|db| db.path.clone())
    }

    /// The effective configuration rendered as TOML, for `--print-config`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("timetracker").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_writes_and_reads_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.toml");

        let (config, loaded_from) = ApiConfig::load(Some(path.clone())).unwrap();

        assert_eq!(loaded_from, path);
        assert!(path.exists());
        assert_eq!(config.server().port, 8080);
        assert_eq!(config.auth().bcrypt_cost, 12);
        assert_eq!(config.auth().session_idle_minutes, 120);
        assert!(config.database_path().is_none());
        assert_eq!(
            config.cors.unwrap().allowed_origins,
            vec!["http://localhost:3000".to_string()]
        );
    }

    #[test]
    fn test_load_existing_config_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"/tmp/tt.db\"\n\n[auth]\nbcrypt_cost = 4\n",
        )
        .unwrap();

        let (config, _) = ApiConfig::load(Some(path)).unwrap();

        assert_eq!(config.database_path(), Some(PathBuf::from("/tmp/tt.db")));
        assert_eq!(config.auth().bcrypt_cost, 4);
        assert_eq!(config.auth().session_idle_minutes, 120);
        assert_eq!(config.server().host, "127.0.0.1");
        assert!(config.to_toml().unwrap().contains("bcrypt_cost = 4"));
    }
}
