//! Output format value object

use serde::{Deserialize, Serialize};

/// How a structured result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable `key: value` listing (default)
    #[default]
    Text,
    /// The result mapping as pretty-printed JSON
    Json,
}
