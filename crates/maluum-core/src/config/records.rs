//! Academic records retrieval configuration.

use serde::{Deserialize, Serialize};

/// Records retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Session queries the portal lists as placeholders; never fetched.
    #[serde(default = "default_unwanted_queries")]
    pub unwanted_session_queries: Vec<String>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            unwanted_session_queries: default_unwanted_queries(),
        }
    }
}

fn default_unwanted_queries() -> Vec<String> {
    vec![
        "?ses=1111/1111&sem=1".to_string(),
        "?ses=0000/0000&sem=0".to_string(),
    ]
}
