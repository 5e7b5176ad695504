//! User settings: server credentials and proxies.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Settings directory below the home directory
const SETTINGS_DIR: &str = ".release-rollback";

/// Settings file name
const SETTINGS_FILE: &str = "settings.toml";

/// Parsed user settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Credentials keyed by repository id
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Outbound proxies
    #[serde(default)]
    pub proxies: Vec<Proxy>,
}

/// Credentials for one repository id
#[derive(Clone, Deserialize)]
pub struct Server {
    /// Repository id
    pub id: String,
    /// User name
    #[serde(default)]
    pub username: Option<String>,
    /// Password
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Outbound HTTP proxy
#[derive(Clone, Deserialize)]
pub struct Proxy {
    /// Only active proxies are used
    #[serde(default = "default_active")]
    pub active: bool,
    /// `http` or `https`
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Proxy host
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Proxy user name
    #[serde(default)]
    pub username: Option<String>,
    /// Proxy password
    #[serde(default)]
    pub password: Option<String>,
    /// `|` separated hosts that bypass the proxy
    #[serde(default)]
    pub non_proxy_hosts: Option<String>,
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("active", &self.active)
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("non_proxy_hosts", &self.non_proxy_hosts)
            .finish()
    }
}

fn default_active() -> bool {
    true
}

fn default_protocol() -> String {
    "http".to_string()
}

impl Settings {
    /// Default settings location: `~/.release-rollback/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from the default location; a missing file yields empty settings
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                log::debug!("No user settings at {}", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load settings from an explicit file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })?;
        // The rendered toml error quotes the offending line, which may hold a password.
        toml::from_str(&text).map_err(|e| {
            let reason = match e.span() {
                Some(span) => format!(
                    "line {}: {}",
                    line_of(&text, span.start),
                    e.message()
                ),
                None => e.message().to_string(),
            };
            ConfigError::Parse {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    /// Server entry for a repository id
    pub fn server(&self, id: &str) -> Option<&Server> {
        self.servers.iter().find(|server| server.id == id)
    }

    /// First active proxy
    pub fn active_proxy(&self) -> Option<&Proxy> {
        self.proxies.iter().find(|proxy| proxy.active)
    }
}

/// One-based line number of a byte offset
fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|byte| **byte == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"
[[servers]]
id = "snapshots"
username = "snap"
password = "snap-secret"

[[servers]]
id = "releases"
username = "deployer"
password = "hunter2"

[[proxies]]
active = false
host = "old-proxy"
port = 3128

[[proxies]]
host = "proxy.example.com"
port = 8080
non_proxy_hosts = "localhost|*.internal"
"#;

    #[test]
    fn test_server_lookup_by_id() {
        let settings: Settings = toml::from_str(SETTINGS).expect("parse");
        let server = settings.server("releases").expect("server");
        assert_eq!(server.username.as_deref(), Some("deployer"));
        assert!(settings.server("missing").is_none());
    }

    #[test]
    fn test_first_active_proxy_wins() {
        let settings: Settings = toml::from_str(SETTINGS).expect("parse");
        let proxy = settings.active_proxy().expect("proxy");
        assert_eq!(proxy.host, "proxy.example.com");
        assert_eq!(proxy.protocol, "http");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let settings: Settings = toml::from_str(SETTINGS).expect("parse");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Settings::load(&dir.path().join("settings.toml")).expect_err("missing");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_parse_error_names_line_without_quoting_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[[servers]]\nid = \"releases\"\npassword = \"hunter2\n").expect("write");

        let err = Settings::load(&path).expect_err("malformed");
        let rendered = err.to_string();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(rendered.contains("line "));
        assert!(!rendered.contains("hunter2"));
    }
}
