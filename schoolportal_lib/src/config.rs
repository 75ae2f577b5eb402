//! Crawl configuration: a TOML file with every field defaulted, then
//! `SCHOOLPORTAL_*` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use schoolportal_api::types::UserId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "schoolportal.toml";

/// Errors reading or interpreting the configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride { key: String, value: String },
}

/// Portal paths, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePaths {
    pub landing: String,
    pub timetable: String,
    pub notices: String,
    pub grades: String,
    pub attendance: String,
    pub reports: String,
    pub classes: String,
    pub calendar: String,
}

impl Default for PagePaths {
    fn default() -> Self {
        Self {
            landing: "/portal/default.asp".to_string(),
            timetable: "/portal/timetable.asp".to_string(),
            notices: "/portal/notices.asp".to_string(),
            grades: "/portal/results.asp".to_string(),
            attendance: "/portal/attendance.asp".to_string(),
            reports: "/portal/reports.asp".to_string(),
            classes: "/portal/classes.asp".to_string(),
            calendar: "/portal/calendar.asp".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: Option<String>,
    pub user_id: Option<UserId>,
    pub session_cookie: Option<String>,
    pub sync_url: Option<String>,
    pub sync_token: Option<String>,
    /// Month value the portal maps to its reference month. Opaque: only
    /// offsets from it are ever computed.
    pub calendar_anchor_month: i64,
    pub calendar_months_before: i64,
    pub calendar_months_after: i64,
    pub notice_window_days: i64,
    /// `view` values for the classes page; each is fetched once.
    pub classes_views: Vec<String>,
    pub request_delay_ms: u64,
    pub fetch_timeout_secs: u64,
    pub retry_max: usize,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    pub paths: PagePaths,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_id: None,
            session_cookie: None,
            sync_url: None,
            sync_token: None,
            calendar_anchor_month: 251,
            calendar_months_before: 3,
            calendar_months_after: 6,
            notice_window_days: 7,
            classes_views: vec!["current".to_string(), "all".to_string()],
            request_delay_ms: 500,
            fetch_timeout_secs: 30,
            retry_max: 0,
            retry_base_ms: 1000,
            retry_max_ms: 30_000,
            paths: PagePaths::default(),
        }
    }
}

impl PortalConfig {
    /// Loads `path`, or `schoolportal.toml` in the working directory if it
    /// exists, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SCHOOLPORTAL_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = text("SCHOOLPORTAL_BASE_URL") {
            self.base_url = Some(value);
        }
        if let Some(value) = text("SCHOOLPORTAL_USER_ID") {
            self.user_id = Some(parse_override("SCHOOLPORTAL_USER_ID", &value)?);
        }
        if let Some(value) = text("SCHOOLPORTAL_SESSION_COOKIE") {
            self.session_cookie = Some(value);
        }
        if let Some(value) = text("SCHOOLPORTAL_SYNC_URL") {
            self.sync_url = Some(value);
        }
        if let Some(value) = text("SCHOOLPORTAL_SYNC_TOKEN") {
            self.sync_token = Some(value);
        }
        if let Some(value) = text("SCHOOLPORTAL_DELAY_MS") {
            self.request_delay_ms = parse_override("SCHOOLPORTAL_DELAY_MS", &value)?;
        }
        if let Some(value) = text("SCHOOLPORTAL_TIMEOUT_SECS") {
            self.fetch_timeout_secs = parse_override("SCHOOLPORTAL_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = text("SCHOOLPORTAL_RETRY_MAX") {
            self.retry_max = parse_override("SCHOOLPORTAL_RETRY_MAX", &value)?;
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}
