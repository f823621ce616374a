use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub serve: ServeConfig,
    pub logging: LoggingConfig,
}

/// Listen address configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Static file serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    /// Root directory request paths are resolved against
    pub root: String,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (bracketed, common, json)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file path (without extension).
    ///
    /// Precedence, lowest to highest: built-in defaults, the optional
    /// config file, `SERVER__*` environment variables, then the plain
    /// `PORT` and `HOST` variables operators usually set.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("serve.root", ".")?
            .set_default(
                "serve.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "bracketed")?;

        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(host: &str, port: u16) -> Config {
        Config {
            server: ServerConfig {
                host: host.to_string(),
                port,
            },
            serve: ServeConfig {
                root: ".".to_string(),
                index_files: vec!["index.html".to_string()],
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_format: "bracketed".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
        }
    }

    #[test]
    fn test_socket_addr() {
        let cfg = test_config("0.0.0.0", 8000);
        assert_eq!(cfg.socket_addr().unwrap().port(), 8000);
        assert!(cfg.socket_addr().unwrap().ip().is_unspecified());
    }

    #[test]
    fn test_socket_addr_rejects_bad_host() {
        let cfg = test_config("not a host", 8000);
        assert!(cfg.socket_addr().is_err());
    }
}
