//! Configuration file management.
//!
//! `config.toml` lives in the data directory. Every section and field is
//! optional and falls back to the defaults below.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub invites: InviteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// JSON-RPC listener.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Unix socket path. Empty = `$data_dir/gather.sock`.
    #[serde(default)]
    pub socket_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Bearer credential checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim. Empty = not checked.
    #[serde(default)]
    pub issuer: String,
    /// Expected audience (id tokens) or `client_id` (access tokens).
    /// Empty = not checked.
    #[serde(default)]
    pub client_id: String,
    /// Token verifier: `static` (also when empty) or `jwks`.
    #[serde(default)]
    pub verifier: String,
    /// JSON Web Key Set file read by the `jwks` verifier.
    #[serde(default)]
    pub jwks_path: String,
    /// Pre-issued credentials accepted by the static verifier.
    #[serde(default)]
    pub tokens: Vec<StaticToken>,
}

/// One credential known to the static verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticToken {
    pub token: String,
    pub sub: String,
    #[serde(default = "default_token_use")]
    pub token_use: String,
    /// Overrides the configured client id in the issued claims.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Expiry as Unix seconds. `None` = never.
    #[serde(default)]
    pub exp: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// Prefix for shareable invite links; the code is appended as a path
    /// segment.
    #[serde(default = "default_invite_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_token_use() -> String {
    "access".to_string()
}

fn default_invite_base_url() -> String {
    "gather://join".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            base_url: default_invite_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the socket path.
    pub fn socket_path(&self) -> PathBuf {
        if self.server.socket_path.is_empty() {
            self.data_dir().join("gather.sock")
        } else {
            PathBuf::from(&self.server.socket_path)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("GATHER_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Gather")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".gather")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/gather"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.invites.base_url, "gather://join");
        assert_eq!(config.logging.log_level, "info");
        assert!(config.auth.issuer.is_empty());
        assert!(config.auth.tokens.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let config = DaemonConfig::parse(
            r#"
            [storage]
            data_dir = "/var/lib/gather"

            [auth]
            client_id = "mobile"

            [[auth.tokens]]
            token = "dev-alice"
            sub = "alice"
            "#,
        )
        .expect("parse");

        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/gather"));
        assert_eq!(config.socket_path(), PathBuf::from("/var/lib/gather/gather.sock"));
        assert_eq!(config.auth.tokens[0].token_use, "access");
        assert!(config.auth.verifier.is_empty());
        assert_eq!(config.invites.base_url, "gather://join");
    }

    #[test]
    fn test_jwks_section() {
        let config = DaemonConfig::parse(
            r#"
            [auth]
            issuer = "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_pool"
            verifier = "jwks"
            jwks_path = "/etc/gather/jwks.json"
            "#,
        )
        .expect("parse");

        assert_eq!(config.auth.verifier, "jwks");
        assert_eq!(config.auth.jwks_path, "/etc/gather/jwks.json");
        assert!(config.auth.tokens.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = DaemonConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: DaemonConfig = toml::from_str(&toml_str).expect("parse");
    }
}
