use microtrack::config::detect_demo::{self, DetectDemoConfig};
use microtrack::detect::{FrameDetections, ObjectExtractor};
use microtrack::io::{load_grayscale_image, save_mask_png, write_json_file};
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
    let config: DetectDemoConfig = detect_demo::load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let mut extractor = ObjectExtractor::new(config.extractor.clone());
    let result = extractor.extract(&gray.as_view());

    print_summary(&result);

    if let Some(path) = &config.output.trace_json {
        write_json_file(path, &result.trace)?;
        println!("\nTrace written to {}", path.display());
    }
    if let Some(path) = &config.output.overlay_png {
        save_mask_png(&result.overlay, path)?;
        println!("Overlay written to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &FrameDetections) {
    println!("Detection summary");
    println!("  robots: {}", result.detections.len());
    for (idx, det) in result.detections.iter().enumerate() {
        println!(
            "  [{idx}] center=({:.1}, {:.1}) radius={:.1} heading={:.1} deg",
            det.center.x,
            det.center.y,
            det.radius,
            det.orientation.to_degrees()
        );
    }

    let seg = &result.trace.segmentation;
    println!(
        "\nSegmentation: components={} area_rejected={} numeric_skipped={} foreground_px={}",
        seg.components, seg.rejected_area, seg.skipped_numeric, seg.foreground_px
    );

    let cls = &result.trace.classification;
    println!(
        "Conformity: accepted={}/{} (axis_ratio={} solidity={} solid_center={} branch_points={} degenerate_axis={})",
        cls.accepted,
        cls.evaluated,
        cls.rejections.axis_ratio,
        cls.rejections.solidity,
        cls.rejections.solid_center,
        cls.rejections.branch_points,
        cls.rejections.degenerate_axis
    );

    let t = &result.trace.timings;
    println!(
        "Timings (ms): segmentation={:.3} classification={:.3} overlay={:.3} total={:.3}",
        t.segmentation_ms, t.classification_ms, t.overlay_ms, t.total_ms
    );
}

fn usage() -> String {
    "Usage: detect_demo <config.json>".to_string()
}
