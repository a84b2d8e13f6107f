//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::DEFAULT_MAX_QUERY_CHARS;
use crate::core::scroll::DEFAULT_SCROLL_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Tunables for page sessions.
///
/// Every field is optional in YAML; missing fields take their defaults.
///
/// # Example
/// ```yaml
/// scroll_threshold: 20
/// max_query_chars: 256
/// latest_jobs_limit: 6
/// event_capacity: 1024
/// api_base_url: http://localhost:8000/api/v1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ViewConfig {
    /// Scroll offset past which the navigation bar switches style
    #[validate(range(min = 0.0))]
    pub scroll_threshold: f64,

    /// Cap on the stored search query, in characters
    #[validate(range(min = 1))]
    pub max_query_chars: usize,

    /// Entries shown by "latest jobs" views
    #[validate(range(min = 1))]
    pub latest_jobs_limit: usize,

    /// Buffer size of each session's event bus
    #[validate(range(min = 1))]
    pub event_capacity: usize,

    /// Base URL of the listing API
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub api_base_url: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
            latest_jobs_limit: 6,
            event_capacity: 1024,
            api_base_url: None,
        }
    }
}

impl ViewConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
