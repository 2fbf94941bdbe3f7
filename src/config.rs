use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_path: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3001
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let database_path = env::var("NOTES_API_DATABASE_PATH")
        .map_err(|_| "NOTES_API_DATABASE_PATH environment variable is required")?;

    let port = match env::var("NOTES_API_PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse NOTES_API_PORT: {e}"))?,
        Err(_) => default_port(),
    };

    Ok(Config {
        database_path,
        host: env::var("NOTES_API_HOST").unwrap_or_else(|_| default_host()),
        port,
        cors_origin: env::var("NOTES_API_CORS_ORIGIN").unwrap_or_else(|_| default_cors_origin()),
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env().map_err(|e| -> Box<dyn std::error::Error> {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_with_only_database_path_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("database_path: data/notes.db\n").unwrap();

        assert_eq!(cfg.database_path, "data/notes.db");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3001");
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn load_from_file_reads_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "database_path: /var/lib/notes/notes.db\n\
             host: 127.0.0.1\n\
             port: 8080\n\
             cors_origin: https://notes.example.com\n",
        )
        .unwrap();

        let cfg = load_from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.database_path, "/var/lib/notes/notes.db");
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.cors_origin, "https://notes.example.com");
    }

    #[test]
    fn missing_database_path_is_an_error() {
        assert!(serde_yaml::from_str::<Config>("port: 8080\n").is_err());
    }
}
