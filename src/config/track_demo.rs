use crate::detect::ExtractorParams;
use crate::track::TrackerParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct TrackDemoConfig {
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub extractor: ExtractorParams,
    #[serde(default)]
    pub tracker: TrackerParams,
    pub output: TrackOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct TrackOutputConfig {
    pub trajectories_json: PathBuf,
}

/// Synthetic sequence to run the tracker over.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub frames: usize,
    pub width: usize,
    pub height: usize,
    pub background: u8,
    pub foreground: u8,
    pub targets: Vec<TargetPath>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frames: 12,
            width: 320,
            height: 240,
            background: 230,
            foreground: 20,
            targets: vec![
                TargetPath::default(),
                TargetPath {
                    start: [220.0, 170.0],
                    velocity: [3.0, -2.0],
                    heading: 2.2,
                    arms: 6,
                    ring_radius: 24.0,
                    leg_len: 10.0,
                    ..TargetPath::default()
                },
            ],
        }
    }
}

/// One target drifting linearly through the sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetPath {
    pub start: [f32; 2],
    /// Center displacement per frame, in pixels.
    pub velocity: [f32; 2],
    /// Heading in radians, held constant across the sequence.
    pub heading: f32,
    pub arms: usize,
    pub ring_radius: f32,
    pub leg_len: f32,
    pub leg_width: f32,
}

impl Default for TargetPath {
    fn default() -> Self {
        Self {
            start: [80.0, 70.0],
            velocity: [4.0, 2.0],
            heading: 0.4,
            arms: 5,
            ring_radius: 20.0,
            leg_len: 12.0,
            leg_width: 3.0,
        }
    }
}

pub fn load_config(path: &Path) -> Result<TrackDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
