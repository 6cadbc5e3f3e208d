//! Configuration loading and Catalog API endpoint resolution

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::i18n::Language;
use crate::{Error, Result};

/// Development Catalog API endpoint
pub const DEVELOPMENT_API_URL: &str = "http://localhost:3000";

/// Production Catalog API endpoint
pub const PRODUCTION_API_URL: &str = "https://song-api-uptb.onrender.com";

pub const API_URL_ENV: &str = "SONGDECK_API_URL";
pub const ASSET_URL_ENV: &str = "SONGDECK_ASSET_URL";
pub const LANG_ENV: &str = "SONGDECK_LANG";
pub const PROFILE_ENV: &str = "SONGDECK_PROFILE";

/// Deployment profile selecting the default endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Profile::Development => DEVELOPMENT_API_URL,
            Profile::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            _ => Err(Error::Config(format!("Unknown profile: {}", s))),
        }
    }
}

/// Contents of `config.toml`
///
/// ```toml
/// profile = "production"
/// api_url = "https://songs.example.com"
/// asset_url = "https://cdn.example.com"
/// language = "es"
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub profile: Option<Profile>,
    pub api_url: Option<String>,
    pub asset_url: Option<String>,
    pub language: Option<Language>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub asset_url: Option<String>,
    pub language: Option<Language>,
    pub profile: Option<Profile>,
    /// Config file to use instead of the platform default; must exist
    pub config_path: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Catalog API base URL, without trailing slash
    pub api_base_url: String,
    /// Host serving cover images, without trailing slash
    pub asset_base_url: String,
    pub language: Language,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Defaults for a profile
    pub fn for_profile(profile: Profile) -> Self {
        let url = profile.default_api_url().to_string();
        Self {
            api_base_url: url.clone(),
            asset_base_url: url,
            language: Language::default(),
            request_timeout: None,
        }
    }

    /// Resolve configuration following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Profile default (fallback)
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let file = match &overrides.config_path {
            Some(path) => ConfigFile::load(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "Loading config file");
                    ConfigFile::load(&path)?
                }
                None => ConfigFile::default(),
            },
        };

        Self::resolve_with(overrides, &file, |name| std::env::var(name).ok())
    }

    /// Resolution with an injectable environment lookup
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let profile = match (&overrides.profile, env(PROFILE_ENV)) {
            (Some(profile), _) => *profile,
            (None, Some(value)) => value.parse()?,
            (None, None) => file.profile.unwrap_or_default(),
        };

        let api_base_url = overrides
            .api_url
            .clone()
            .or_else(|| env(API_URL_ENV))
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| profile.default_api_url().to_string());
        let api_base_url = normalize_url(&api_base_url)?;

        // Covers are served by the API host unless configured otherwise
        let asset_base_url = match overrides
            .asset_url
            .clone()
            .or_else(|| env(ASSET_URL_ENV))
            .or_else(|| file.asset_url.clone())
        {
            Some(url) => normalize_url(&url)?,
            None => api_base_url.clone(),
        };

        let language = match (&overrides.language, env(LANG_ENV)) {
            (Some(language), _) => *language,
            (None, Some(value)) => value.parse()?,
            (None, None) => file.language.unwrap_or_default(),
        };

        let request_timeout = overrides
            .request_timeout
            .or_else(|| file.request_timeout_secs.map(Duration::from_secs));

        Ok(Self {
            api_base_url,
            asset_base_url,
            language,
            request_timeout,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Config(format!("Not an http(s) URL: {}", url)));
    }
    Ok(trimmed.to_string())
}

/// Platform config file location (`~/.config/songdeck/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songdeck").join("config.toml"))
}
