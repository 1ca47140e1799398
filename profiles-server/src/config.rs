use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIRECTORY: &str = "data";
pub const DB_FILE_NAME: &str = "profiles.db";

/// Settings for `start`, resolved from command-line flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub http_host: String,
    pub http_port: u16,
    pub data_directory: PathBuf,
    /// Mark cookies `Secure`. Only for deployments behind HTTPS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    pub fn http_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.http_host, self.http_port);
        addr.parse()
            .with_context(|| format!("Invalid HTTP listen address {:?}", addr))
    }

    pub fn db_file(&self) -> PathBuf {
        self.data_directory.join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(
            config.http_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.db_file(), PathBuf::from("data/profiles.db"));
    }

    #[test]
    fn rejects_bad_host() {
        let config = ServerConfig {
            http_host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.http_addr().is_err());
    }
}
