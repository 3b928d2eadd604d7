use microtrack::detect::{ExtractorParams, ObjectExtractor};
use microtrack::synthetic::{render_frame, TargetSpec};

fn main() {
    // Demo stub: renders one synthetic target and runs the pipeline on it
    let target = TargetSpec {
        center: [120.0, 90.0],
        heading: 0.6,
        ..TargetSpec::default()
    };
    let frame = render_frame(240, 180, 230, 20, &[target]);

    let mut extractor = ObjectExtractor::new(ExtractorParams::default());
    let result = extractor.extract(&frame.as_view());
    println!(
        "robots={} total_ms={:.3}",
        result.detections.len(),
        result.trace.timings.total_ms
    );
}
