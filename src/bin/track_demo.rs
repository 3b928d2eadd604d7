use microtrack::config::track_demo::{self, TargetPath};
use microtrack::detect::ObjectExtractor;
use microtrack::io::write_json_file;
use microtrack::synthetic::{render_frame, TargetSpec};
use microtrack::track::IdentityTracker;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = track_demo::load_config(Path::new(&config_path))?;
    let seq = &config.sequence;

    let mut extractor = ObjectExtractor::new(config.extractor.clone());
    let mut tracker = IdentityTracker::new(
        config.tracker.clone(),
        seq.width as u32,
        seq.height as u32,
    );
    let mut trajectories: BTreeMap<String, Vec<[f32; 2]>> = BTreeMap::new();

    for frame_idx in 0..seq.frames {
        let specs: Vec<TargetSpec> = seq
            .targets
            .iter()
            .map(|target| spec_at(target, frame_idx))
            .collect();
        let frame = render_frame(seq.width, seq.height, seq.background, seq.foreground, &specs);

        let result = extractor.extract(&frame.as_view());
        tracker.reconcile(&result.detections);
        for identity in tracker.identities() {
            trajectories
                .entry(identity.key.to_string())
                .or_default()
                .push([identity.center.x, identity.center.y]);
        }
        println!(
            "frame {:>2}: detections={} identities={}",
            frame_idx,
            result.detections.len(),
            tracker.len()
        );
    }

    let report = TrajectoryReport {
        frames: seq.frames,
        identities: trajectories.len(),
        trajectories,
    };
    write_json_file(&config.output.trajectories_json, &report)?;
    println!(
        "Trajectories written to {}",
        config.output.trajectories_json.display()
    );

    Ok(())
}

fn spec_at(path: &TargetPath, frame_idx: usize) -> TargetSpec {
    let t = frame_idx as f32;
    TargetSpec {
        center: [
            path.start[0] + path.velocity[0] * t,
            path.start[1] + path.velocity[1] * t,
        ],
        heading: path.heading,
        ring_radius: path.ring_radius,
        leg_len: path.leg_len,
        leg_width: path.leg_width,
        arms: path.arms,
        ..TargetSpec::default()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrajectoryReport {
    frames: usize,
    identities: usize,
    trajectories: BTreeMap<String, Vec<[f32; 2]>>,
}

fn usage() -> String {
    "Usage: track_demo <config.json>".to_string()
}
