//! JSON configuration loaders for the demo binaries.

pub mod detect_demo;
pub mod track_demo;
