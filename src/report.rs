//! HTML rendering of an [`Evaluation`].

use std::fmt::Write;

use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use crate::{
    evaluation::Evaluation,
    statistics::{Histogram, SummaryStatistics},
};

const HISTOGRAM_WIDTH: f64 = 480.0;
const HISTOGRAM_HEIGHT: f64 = 240.0;
const HISTOGRAM_MARGIN: f64 = 40.0;

/// Facts about the run shown in the report header.
#[derive(Clone, Debug, Default)]
pub struct ReportContext {
    pub gt_dir: String,
    pub computed: String,
    /// Name of the ground truth camera format.
    pub gt_format: String,
    /// Number of ground truth cameras read.
    pub num_ground_truth: usize,
    /// Number of views in the reconstruction.
    pub num_views: usize,
    /// Number of reconstructed poses.
    pub num_poses: usize,
}

/// Renders the evaluation report as a standalone HTML page.
///
/// The page has the run summary, the similarity transform, the residual
/// statistics, two histograms and one row per camera.
pub fn render_report(evaluation: &Evaluation, context: &ReportContext) -> String {
    let mut html = String::new();
    // Writing into a String can't fail.
    let _ = write_report(&mut html, evaluation, context);
    html
}

fn write_report(
    html: &mut String,
    evaluation: &Evaluation,
    context: &ReportContext,
) -> std::fmt::Result {
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>External calibration report</title>")?;
    writeln!(
        html,
        "<style>body {{ font-family: sans-serif; }} table {{ border-collapse: collapse; }} \
         td, th {{ border: 1px solid #999; padding: 2px 8px; text-align: right; }}</style>"
    )?;
    writeln!(html, "</head>\n<body>")?;
    writeln!(html, "<h1>External calibration report</h1>")?;

    writeln!(html, "<h2>Input</h2>\n<ul>")?;
    writeln!(html, "<li>Ground truth: {}</li>", escape_html(&context.gt_dir))?;
    writeln!(html, "<li>Camera format: {}</li>", escape_html(&context.gt_format))?;
    writeln!(html, "<li>Reconstruction: {}</li>", escape_html(&context.computed))?;
    writeln!(
        html,
        "<li>Ground truth cameras: {}, reconstructed poses: {} of {} views, matched cameras: {}</li>",
        context.num_ground_truth,
        context.num_poses,
        context.num_views,
        evaluation.len()
    )?;
    writeln!(html, "</ul>")?;

    let transform = &evaluation.transform;
    writeln!(html, "<h2>Registration</h2>")?;
    writeln!(html, "<p>Scale: {:.6}</p>", transform.scale())?;
    writeln!(html, "<p>Rotation:</p>\n<table>")?;
    let rotation = transform.rotation().matrix();
    for row in 0..3 {
        writeln!(
            html,
            "<tr><td>{:.6}</td><td>{:.6}</td><td>{:.6}</td></tr>",
            rotation[(row, 0)],
            rotation[(row, 1)],
            rotation[(row, 2)]
        )?;
    }
    writeln!(html, "</table>")?;
    let translation = transform.translation();
    writeln!(
        html,
        "<p>Translation: [{:.6}, {:.6}, {:.6}]</p>",
        translation.x, translation.y, translation.z
    )?;

    writeln!(html, "<h2>Statistics</h2>\n<table>")?;
    writeln!(
        html,
        "<tr><th></th><th>min</th><th>max</th><th>mean</th><th>median</th><th>rms</th></tr>"
    )?;
    write_statistics_row(html, "Position", &evaluation.position_stats)?;
    write_statistics_row(html, "Rotation (deg)", &evaluation.rotation_stats)?;
    writeln!(html, "</table>")?;

    writeln!(html, "<h2>Histograms</h2>")?;
    writeln!(html, "<h3>Position residuals</h3>")?;
    writeln!(html, "{}", histogram_svg(&evaluation.position_histogram, "#2266aa"))?;
    writeln!(html, "<h3>Rotation residuals (degrees)</h3>")?;
    writeln!(html, "{}", histogram_svg(&evaluation.rotation_histogram, "#aa4422"))?;

    writeln!(html, "<h2>Cameras</h2>\n<table>")?;
    writeln!(
        html,
        "<tr><th>Camera</th><th>Position residual</th><th>Rotation residual (deg)</th></tr>"
    )?;
    for record in &evaluation.records {
        writeln!(
            html,
            "<tr><td>{}</td><td>{:.6}</td><td>{:.6}</td></tr>",
            escape_html(&record.key),
            record.position,
            record.rotation
        )?;
    }
    writeln!(html, "</table>")?;

    writeln!(html, "</body>\n</html>")
}

fn write_statistics_row(
    html: &mut String,
    label: &str,
    stats: &SummaryStatistics,
) -> std::fmt::Result {
    writeln!(
        html,
        "<tr><th>{label}</th><td>{:.6}</td><td>{:.6}</td><td>{:.6}</td><td>{:.6}</td><td>{:.6}</td></tr>",
        stats.min, stats.max, stats.mean, stats.median, stats.rms
    )
}

/// Draws a histogram as an inline SVG bar chart.
pub fn histogram_svg(histogram: &Histogram, color: &str) -> String {
    let plot_width = HISTOGRAM_WIDTH - 2.0 * HISTOGRAM_MARGIN;
    let plot_height = HISTOGRAM_HEIGHT - 2.0 * HISTOGRAM_MARGIN;
    let bar_width = plot_width / histogram.num_bins() as f64;
    let max_count = histogram.max_count().max(1) as f64;
    let baseline = HISTOGRAM_HEIGHT - HISTOGRAM_MARGIN;

    let mut bars = Group::new().set("fill", color);
    for (index, count) in histogram.counts.iter().enumerate() {
        let height = plot_height * *count as f64 / max_count;
        bars = bars.add(
            Rectangle::new()
                .set("x", HISTOGRAM_MARGIN + bar_width * index as f64)
                .set("y", baseline - height)
                .set("width", bar_width)
                .set("height", height)
                .set("stroke", "white"),
        );
    }

    let axes = Group::new()
        .set("stroke", "black")
        .set("stroke-width", 1)
        .add(
            Line::new()
                .set("x1", HISTOGRAM_MARGIN)
                .set("y1", baseline)
                .set("x2", HISTOGRAM_WIDTH - HISTOGRAM_MARGIN)
                .set("y2", baseline),
        )
        .add(
            Line::new()
                .set("x1", HISTOGRAM_MARGIN)
                .set("y1", baseline)
                .set("x2", HISTOGRAM_MARGIN)
                .set("y2", HISTOGRAM_MARGIN),
        );

    let label = |content: String, x: f64, y: f64, anchor: &str| {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-size", 11)
            .set("font-family", "sans-serif")
            .set("text-anchor", anchor.to_string())
    };

    Document::new()
        .set("width", HISTOGRAM_WIDTH)
        .set("height", HISTOGRAM_HEIGHT)
        .set("viewBox", (0.0, 0.0, HISTOGRAM_WIDTH, HISTOGRAM_HEIGHT))
        .add(bars)
        .add(axes)
        .add(label(
            format!("{:.4}", histogram.lower),
            HISTOGRAM_MARGIN,
            baseline + 15.0,
            "start",
        ))
        .add(label(
            format!("{:.4}", histogram.upper),
            HISTOGRAM_WIDTH - HISTOGRAM_MARGIN,
            baseline + 15.0,
            "end",
        ))
        .add(label(
            histogram.max_count().to_string(),
            HISTOGRAM_MARGIN - 5.0,
            HISTOGRAM_MARGIN,
            "end",
        ))
        .to_string()
}

/// Escapes the characters with a meaning in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::IdentifiedPose;
    use crate::evaluation::{evaluate, EvalParams};
    use crate::unit_test::{sample_ground_truth, sample_similarity, synthesize_estimate};
    use crate::transform::SimilarityTransform;
    use rstest::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("/data/gt"), "/data/gt");
    }

    #[test]
    fn test_histogram_svg_has_one_bar_per_bin() {
        let histogram = Histogram::new(&[0.0, 0.5, 1.0], 4);
        let svg = histogram_svg(&histogram, "red");

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("1.0000"));
    }

    #[rstest]
    fn test_render_report(
        sample_ground_truth: Vec<IdentifiedPose>,
        sample_similarity: SimilarityTransform,
    ) {
        let correspondences = synthesize_estimate(&sample_ground_truth, &sample_similarity);
        let evaluation = evaluate(&correspondences, &EvalParams::default()).unwrap();
        let context = ReportContext {
            gt_dir: "/data/<gt>".to_string(),
            computed: "/data/sfm_data.json".to_string(),
            gt_format: "Strecha camera (png)".to_string(),
            num_ground_truth: sample_ground_truth.len(),
            num_views: sample_ground_truth.len(),
            num_poses: sample_ground_truth.len(),
        };

        let html = render_report(&evaluation, &context);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("/data/&lt;gt&gt;"));
        assert!(html.contains(&format!("Scale: {:.6}", evaluation.transform.scale())));
        assert_eq!(html.matches("<svg").count(), 2);
        for gt in &sample_ground_truth {
            assert!(html.contains(&format!("<tr><td>{}</td>", gt.key)));
        }
    }
}
