use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::state::UiTheme;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const API_URL_ENV: &str = "TALKRIX_API_URL";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub page_size: usize,
    pub theme: UiTheme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            theme: UiTheme::Classic,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub session_path: Option<PathBuf>,
}

impl Config {
    /// Applies an environment override for the backend URL. Blank values are
    /// ignored.
    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.max(1)
    }
}
