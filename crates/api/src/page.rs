//! Dashboard HTML
//!
//! Server-side rendering of the single dashboard page. Charts are plain
//! HTML bars and an inline SVG scatter, so the page has no script or
//! asset dependencies.

use data_validator::ValidationConfig;
use feature_engine::{RawInput, FEATURE_COLUMNS};
use insights::{InsightError, InsightReport};

use crate::{ApiError, PredictionOutcome};

const STYLE: &str = r#"
body { background-color: #141414; color: #E5E5E5; font-family: sans-serif; margin: 0; }
header { background-color: #000000; padding: 20px; border-radius: 10px; margin: 16px; }
h1, h3, h4 { color: #E50914; }
.layout { display: flex; gap: 24px; margin: 16px; }
aside { background-color: #1f1f1f; padding: 16px; border-radius: 10px; min-width: 260px; }
main { flex: 1; }
label { display: block; margin-top: 10px; }
input, select { background-color: #333333; color: #FFFFFF; border: 1px solid #333333; padding: 6px; width: 100%; }
button { background-color: #E50914; color: white; border: none; border-radius: 6px; padding: 10px 16px; margin-top: 16px; cursor: pointer; }
button:hover { background-color: #B20710; }
table { border-collapse: collapse; }
th, td { border: 1px solid #333333; padding: 6px 10px; text-align: right; }
.banner { padding: 12px; border-radius: 6px; margin: 12px 0; }
.ok { background-color: #16361f; color: #7bd88f; }
.fail { background-color: #3d0f12; color: #ff8a8f; }
.warn { background-color: #3a3110; color: #f5d76e; }
.bar { background-color: #E50914; height: 18px; }
.bar-row { display: flex; align-items: center; gap: 8px; margin: 4px 0; }
.bar-label { width: 220px; }
footer { text-align: center; color: #808080; padding: 16px; }
"#;

/// Colours for failure types in the scatter, by distribution rank
const PALETTE: [&str; 8] = [
    "#4C78A8", "#F58518", "#54A24B", "#B279A2", "#72B7B2", "#EECA3B", "#9D755D", "#BAB0AC",
];

const SCATTER_WIDTH: f64 = 640.0;
const SCATTER_HEIGHT: f64 = 400.0;
const SCATTER_MARGIN: f64 = 40.0;

/// Everything one render of the dashboard shows
pub struct DashboardPage<'a> {
    pub machine_types: &'a [String],
    pub input: &'a RawInput,
    pub bounds: &'a ValidationConfig,
    /// Present when the predict trigger was sent
    pub prediction: Option<Result<PredictionOutcome, ApiError>>,
    pub show_charts: bool,
    /// Present when charts were requested
    pub charts: Option<Result<InsightReport, ApiError>>,
}

impl DashboardPage<'_> {
    /// Render the full document
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(16 * 1024);
        html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
        html.push_str("<title>Predictive Maintenance App</title>");
        html.push_str(&format!("<style>{}</style></head><body>", STYLE));
        html.push_str(
            "<header><h1>Easy Machine Failure Predictor</h1>\
             <p>Welcome to the <b>Predictive Maintenance Dashboard</b>, powered by machine learning!</p>\
             <p>Enter the sensor readings of a machine to check whether it is likely to fail, \
             and if so, which failure type to expect.</p></header>",
        );

        html.push_str("<form method=\"get\" action=\"/\"><div class=\"layout\">");
        self.render_form(&mut html);
        html.push_str("<main>");
        self.render_summary(&mut html);
        self.render_prediction(&mut html);
        self.render_charts(&mut html);
        html.push_str("</main></div></form>");

        html.push_str("<footer>Predictive Maintenance Dashboard</footer></body></html>");
        html
    }

    fn render_form(&self, html: &mut String) {
        html.push_str("<aside><h3>Enter Sensor Readings</h3>");

        html.push_str("<label for=\"machine_type\">Machine Type</label><select id=\"machine_type\" name=\"machine_type\">");
        for class in self.machine_types {
            let selected = if *class == self.input.machine_type { " selected" } else { "" };
            html.push_str(&format!(
                "<option value=\"{0}\"{1}>{0}</option>",
                escape(class),
                selected
            ));
        }
        html.push_str("</select>");

        let b = self.bounds;
        number_input(html, "air_temperature", "Air Temperature [K]", self.input.air_temperature, b.air_temperature_range, "0.1");
        number_input(html, "process_temperature", "Process Temperature [K]", self.input.process_temperature, b.process_temperature_range, "0.1");
        number_input(
            html,
            "rotational_speed",
            "Rotational Speed [rpm]",
            self.input.rotational_speed as f64,
            (b.rotational_speed_range.0 as f64, b.rotational_speed_range.1 as f64),
            "1",
        );
        number_input(html, "torque", "Torque [Nm]", self.input.torque, b.torque_range, "0.1");
        number_input(
            html,
            "tool_wear",
            "Tool Wear [min]",
            self.input.tool_wear as f64,
            (b.tool_wear_range.0 as f64, b.tool_wear_range.1 as f64),
            "1",
        );

        let checked = if self.show_charts { " checked" } else { "" };
        html.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"show_charts\" value=\"on\" style=\"width:auto\"{}> Show Sensor Data Charts</label>",
            checked
        ));
        html.push_str("<button type=\"submit\" name=\"predict\" value=\"1\">Predict Machine Status</button></aside>");
    }

    fn render_summary(&self, html: &mut String) {
        let input = self.input;
        html.push_str("<h3>Input Summary</h3><table><tr>");
        for column in FEATURE_COLUMNS {
            html.push_str(&format!("<th>{}</th>", escape(column)));
        }
        html.push_str(&format!(
            "</tr><tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr></table>",
            escape(&input.machine_type),
            input.air_temperature,
            input.process_temperature,
            input.rotational_speed as f64,
            input.torque,
            input.tool_wear as f64,
        ));
    }

    fn render_prediction(&self, html: &mut String) {
        match &self.prediction {
            None => {}
            Some(Ok(outcome)) => match &outcome.prediction.failure_type {
                None => html.push_str(
                    "<div class=\"banner ok\">The machine is working fine. No failure expected.</div>",
                ),
                Some(failure_type) => html.push_str(&format!(
                    "<div class=\"banner fail\">Warning: Failure expected! Type: <b>{}</b></div>",
                    escape(failure_type)
                )),
            },
            Some(Err(e)) => html.push_str(&format!(
                "<div class=\"banner fail\">Prediction unavailable: {}</div>",
                escape(&e.to_string())
            )),
        }
    }

    fn render_charts(&self, html: &mut String) {
        html.push_str("<h3>Sensor Insights from Real Data</h3>");
        match &self.charts {
            None => {}
            Some(Err(ApiError::Insight(InsightError::DatasetMissing { .. }))) => html.push_str(
                "<div class=\"banner warn\">Sample CSV not found. Charts are not available.</div>",
            ),
            Some(Err(e)) => html.push_str(&format!(
                "<div class=\"banner warn\">Charts are not available: {}</div>",
                escape(&e.to_string())
            )),
            Some(Ok(report)) => {
                render_distribution(html, report);
                render_scatter(html, report);
                render_rpm(html, report);
            }
        }
    }
}

fn number_input(html: &mut String, name: &str, label: &str, value: f64, range: (f64, f64), step: &str) {
    html.push_str(&format!(
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{value}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" required>",
        name = name,
        label = label,
        value = value,
        min = range.0,
        max = range.1,
        step = step,
    ));
}

fn render_distribution(html: &mut String, report: &InsightReport) {
    html.push_str("<h4>Failure Type Distribution</h4>");
    let max = report
        .failure_distribution
        .first()
        .map(|c| c.count)
        .unwrap_or(0)
        .max(1);

    for entry in &report.failure_distribution {
        let width = entry.count as f64 / max as f64 * 100.0;
        html.push_str(&format!(
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <div class=\"bar\" style=\"width:{:.1}%\"></div><span>{}</span></div>",
            escape(&entry.failure_type),
            width * 0.6,
            entry.count
        ));
    }
}

fn render_scatter(html: &mut String, report: &InsightReport) {
    html.push_str("<h4>Temperature vs Torque by Failure</h4>");

    let overlay = report.overlay.map(|o| (o.air_temperature, o.torque));
    let points = report
        .scatter
        .iter()
        .map(|p| (p.air_temperature, p.torque))
        .chain(overlay);
    let Some((x_range, y_range)) = extent(points) else {
        return;
    };

    let project = |x: f64, y: f64| {
        let px = SCATTER_MARGIN + scale(x, x_range) * (SCATTER_WIDTH - 2.0 * SCATTER_MARGIN);
        let py = SCATTER_HEIGHT - SCATTER_MARGIN - scale(y, y_range) * (SCATTER_HEIGHT - 2.0 * SCATTER_MARGIN);
        (px, py)
    };

    html.push_str(&format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" style=\"background:#1f1f1f\">",
        w = SCATTER_WIDTH,
        h = SCATTER_HEIGHT
    ));
    html.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" fill=\"#E5E5E5\" font-size=\"12\" text-anchor=\"middle\">Air temperature [K] ({:.1} to {:.1})</text>",
        SCATTER_WIDTH / 2.0,
        SCATTER_HEIGHT - 10.0,
        x_range.0,
        x_range.1
    ));
    html.push_str(&format!(
        "<text x=\"12\" y=\"{}\" fill=\"#E5E5E5\" font-size=\"12\" transform=\"rotate(-90 12 {})\" text-anchor=\"middle\">Torque [Nm] ({:.1} to {:.1})</text>",
        SCATTER_HEIGHT / 2.0,
        SCATTER_HEIGHT / 2.0,
        y_range.0,
        y_range.1
    ));

    for point in &report.scatter {
        let (px, py) = project(point.air_temperature, point.torque);
        html.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\" fill-opacity=\"0.6\"><title>{} ({} rpm)</title></circle>",
            px,
            py,
            colour(report, &point.failure_type),
            escape(&point.failure_type),
            point.rotational_speed
        ));
    }

    if let Some((x, y)) = overlay {
        let (px, py) = project(x, y);
        html.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"7\" fill=\"red\" stroke=\"white\"><title>Your Input</title></circle>",
            px, py
        ));
    }
    html.push_str("</svg><p>");

    for (rank, entry) in report.failure_distribution.iter().enumerate() {
        html.push_str(&format!(
            "<span style=\"color:{}\">&#9679;</span> {} &nbsp; ",
            PALETTE[rank % PALETTE.len()],
            escape(&entry.failure_type)
        ));
    }
    if overlay.is_some() {
        html.push_str("<span style=\"color:red\">&#9679;</span> Your Input");
    }
    html.push_str("</p>");
}

fn render_rpm(html: &mut String, report: &InsightReport) {
    html.push_str("<h4>Input vs Average RPM</h4>");
    if let Some(rpm) = report.rpm.input_rpm {
        html.push_str(&format!("<p>Your RPM: <b>{}</b></p>", rpm));
    }
    if let Some(avg) = report.rpm.average_rpm {
        html.push_str(&format!("<p>Average RPM: <b>{:.2}</b></p>", avg));
    }
}

fn colour(report: &InsightReport, failure_type: &str) -> &'static str {
    let rank = report
        .failure_distribution
        .iter()
        .position(|c| c.failure_type == failure_type)
        .unwrap_or(0);
    PALETTE[rank % PALETTE.len()]
}

/// Min/max of both axes, or `None` without points
fn extent(points: impl Iterator<Item = (f64, f64)>) -> Option<((f64, f64), (f64, f64))> {
    points
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(None, |acc, (x, y)| match acc {
            None => Some(((x, x), (y, y))),
            Some(((x0, x1), (y0, y1))) => Some(((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))),
        })
}

/// Position of `v` in `range` as 0..=1; degenerate ranges map to the middle
fn scale(v: f64, range: (f64, f64)) -> f64 {
    let span = range.1 - range.0;
    if span <= f64::EPSILON {
        0.5
    } else {
        (v - range.0) / span
    }
}

/// Escape text for HTML bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
