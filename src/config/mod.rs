#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".pet-adopt/session.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub featured_limit: u32,
    pub session_file: String,
    pub default_location: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 30,
            page_size: 12,
            featured_limit: 6,
            session_file: DEFAULT_SESSION_FILE.to_string(),
            default_location: None,
        }
    }
}

impl ClientConfig {
    /// 附近寵物的地點：指令參數優先，其次為設定檔
    pub fn nearby_location(&self, requested: Option<String>) -> Result<String> {
        let location = requested
            .or_else(|| self.default_location.clone())
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        validation::validate_required_field("default_location", &location).cloned()
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validation::validate_range("page_size", self.page_size, 1, 100)?;
        validation::validate_range("featured_limit", self.featured_limit, 1, 50)?;
        validation::validate_path("session_file", &self.session_file)?;
        Ok(())
    }
}

impl ConfigProvider for ClientConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn featured_limit(&self) -> u32 {
        self.featured_limit
    }

    fn session_file(&self) -> &str {
        &self.session_file
    }

    fn default_location(&self) -> Option<&str> {
        self.default_location.as_deref()
    }
}
