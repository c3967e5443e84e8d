//! Transcript export configuration.

use serde::{Deserialize, Serialize};

/// Naming of exported conversation files.
///
/// The default file name is `<document stem><suffix><N>.<extension>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub suffix: String,
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            suffix: "_chat".into(),
            extension: "txt".into(),
        }
    }
}
