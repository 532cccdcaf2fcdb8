use serde::{Deserialize, Serialize};

use super::defaults;

/// Log output configuration. `ENVCAT_LOG` overrides `filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: defaults::DEFAULT_LOG_FILTER.to_string(),
            json: defaults::DEFAULT_LOG_JSON,
        }
    }
}
