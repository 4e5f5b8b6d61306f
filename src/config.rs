//! Client credentials stored as JSON in the user config directory

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

const APP_CONFIG_DIR: &str = "spotify-autoplay";
const FILE_NAME: &str = "config.json";
const TOKEN_CACHE_FILE: &str = "token_cache.json";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

/// Resolved locations of everything the app keeps on disk
#[derive(Clone, Debug)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub token_cache: PathBuf,
}

impl ConfigPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_file: dir.join(FILE_NAME),
            token_cache: dir.join(TOKEN_CACHE_FILE),
        }
    }

    pub fn resolve() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("No config directory found"))?;
        Ok(Self::in_dir(&base.join(APP_CONFIG_DIR)))
    }
}

impl AppConfig {
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// A missing file loads as the default, empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                redirect_uri: default_redirect_uri(),
                ..Default::default()
            });
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Ask for any missing credential on stdin and persist the result.
    pub fn prompt_missing(&mut self, path: &Path) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        println!("Spotify API credentials are required.");
        println!("Create an app at https://developer.spotify.com/dashboard");
        println!("and add {} as a redirect URI.\n", self.redirect_uri);

        if self.client_id.trim().is_empty() {
            self.client_id = prompt("Client ID: ")?;
        }
        if self.client_secret.trim().is_empty() {
            self.client_secret = prompt("Client Secret: ")?;
        }
        if !self.is_complete() {
            return Err(anyhow!("Client ID and secret must not be empty"));
        }
        self.save(path)?;
        println!("Saved credentials to {}", path.display());
        Ok(())
    }

    /// Port of a loopback redirect URI, if it has one
    pub fn redirect_port(&self) -> Option<u16> {
        let rest = self.redirect_uri.strip_prefix("http://")?;
        let host = rest.split('/').next()?;
        host.rsplit_once(':')?.1.parse().ok()
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spotify-autoplay-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_is_incomplete_default() {
        let paths = ConfigPaths::in_dir(&temp_dir("missing"));
        let config = AppConfig::load(&paths.config_file).unwrap();
        assert!(!config.is_complete());
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn save_then_load() {
        let dir = temp_dir("roundtrip");
        let paths = ConfigPaths::in_dir(&dir);
        let config = AppConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            redirect_uri: DEFAULT_REDIRECT_URI.into(),
        };
        config.save(&paths.config_file).unwrap();
        assert_eq!(AppConfig::load(&paths.config_file).unwrap(), config);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"client_id":"abc"}"#).unwrap();
        assert_eq!(config.client_id, "abc");
        assert!(config.client_secret.is_empty());
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert!(!config.is_complete());
    }

    #[test]
    fn redirect_port_is_parsed() {
        let config = AppConfig {
            redirect_uri: DEFAULT_REDIRECT_URI.into(),
            ..Default::default()
        };
        assert_eq!(config.redirect_port(), Some(8888));
        let config = AppConfig {
            redirect_uri: "https://example.com/cb".into(),
            ..Default::default()
        };
        assert_eq!(config.redirect_port(), None);
    }
}
