use crate::detect::ExtractorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DetectDemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub extractor: ExtractorParams,
    #[serde(default)]
    pub output: DetectOutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectOutputConfig {
    /// Where to write the per-stage JSON trace, if anywhere.
    pub trace_json: Option<PathBuf>,
    /// Where to write the overlay mask as a PNG, if anywhere.
    pub overlay_png: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DetectDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
