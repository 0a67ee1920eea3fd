//! HTML report generation using Tera templates.
//!
//! The template is registered under an `.html` name so Tera autoescapes
//! every interpolated value; URLs, error text and labels come from
//! untrusted input.

use super::format_duration;
use crate::error::ReportResult;
use crate::types::{OutcomeKind, ScanReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "scan_report.html";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
struct Row {
    url: String,
    label: String,
    status: String,
    css_class: &'static str,
    status_code: u16,
    time: String,
    details: String,
}

fn css_class(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Success => "status-success",
        OutcomeKind::PartialSuccess => "status-partial",
        OutcomeKind::RequestFailed | OutcomeKind::RequestBuildError => "status-failed",
    }
}

/// Render the report as a self-contained HTML document.
pub fn render_html(report: &ScanReport, generated_at: DateTime<Utc>) -> ReportResult<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let rows: Vec<Row> = report
        .outcomes()
        .iter()
        .map(|o| {
            let details = if o.is_success() && !o.body.is_empty() {
                let mut text = format!("Content length: {} bytes", o.content_size());
                if o.truncated {
                    text.push_str(" (truncated)");
                }
                text
            } else {
                o.error.clone().unwrap_or_default()
            };
            Row {
                url: o.url.clone(),
                label: o.label.clone().unwrap_or_default(),
                status: o.kind.to_string(),
                css_class: css_class(o.kind),
                status_code: o.status_code,
                time: o.captured_at.format("%H:%M:%S").to_string(),
                details,
            }
        })
        .collect();

    let mut context = Context::new();
    context.insert("total", &report.target_count());
    context.insert("successful", &report.success_count());
    context.insert("failed", &report.failure_count());
    context.insert("success_rate", &format!("{:.1}", report.success_rate()));
    context.insert("started_at", &report.started_at().format(TIME_FORMAT).to_string());
    context.insert("finished_at", &report.finished_at().format(TIME_FORMAT).to_string());
    context.insert("duration", &format_duration(report.duration()));
    context.insert("cancelled", &report.is_cancelled());
    context.insert("generated_at", &generated_at.format(TIME_FORMAT).to_string());
    context.insert("rows", &rows);
    context.insert("version", env!("CARGO_PKG_VERSION"));

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>torscout - Scan Report</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #0f172a; color: #e2e8f0; line-height: 1.6; }
        .container { max-width: 1200px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #4c1d95 0%, #1e293b 100%); padding: 36px 30px; border-radius: 12px; margin-bottom: 24px; text-align: center; }
        .header h1 { font-size: 2em; letter-spacing: 2px; }
        .header .meta { opacity: 0.7; margin-top: 10px; font-size: 0.9em; }
        .banner { background: #78350f; padding: 12px 20px; border-radius: 8px; margin-bottom: 20px; }
        .summary { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; margin-bottom: 24px; }
        .card { background: #1e293b; padding: 22px 15px; border-radius: 10px; text-align: center; }
        .card .count { font-size: 2.2em; font-weight: 800; }
        .card .label { font-size: 0.8em; text-transform: uppercase; letter-spacing: 1px; opacity: 0.7; }
        .card.ok .count { color: #22c55e; }
        .card.bad .count { color: #ef4444; }
        .progress { background: #334155; border-radius: 6px; height: 12px; margin-bottom: 24px; overflow: hidden; }
        .progress .fill { background: #22c55e; height: 100%; }
        table { width: 100%; border-collapse: collapse; background: #1e293b; border-radius: 10px; overflow: hidden; }
        th, td { padding: 10px 14px; text-align: left; border-bottom: 1px solid #334155; font-size: 0.9em; word-break: break-all; }
        th { background: #334155; text-transform: uppercase; font-size: 0.75em; letter-spacing: 1px; }
        .status-success { color: #22c55e; font-weight: 700; }
        .status-partial { color: #f59e0b; font-weight: 700; }
        .status-failed { color: #ef4444; font-weight: 700; }
        .label { opacity: 0.7; }
        .footer { text-align: center; opacity: 0.5; margin-top: 30px; font-size: 0.85em; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>torscout Scan Report</h1>
            <div class="meta">{{ started_at }} &rarr; {{ finished_at }} ({{ duration }})</div>
        </div>
        {% if cancelled %}
        <div class="banner">This scan was cancelled before every target was attempted.</div>
        {% endif %}
        <div class="summary">
            <div class="card"><div class="count">{{ total }}</div><div class="label">Total URLs</div></div>
            <div class="card ok"><div class="count">{{ successful }}</div><div class="label">Successful</div></div>
            <div class="card bad"><div class="count">{{ failed }}</div><div class="label">Failed</div></div>
            <div class="card"><div class="count">{{ success_rate }}%</div><div class="label">Success Rate</div></div>
        </div>
        <div class="progress"><div class="fill" style="width: {{ success_rate }}%"></div></div>
        <table>
            <thead>
                <tr>
                    <th>URL</th>
                    <th>Status</th>
                    <th>HTTP Code</th>
                    <th>Timestamp</th>
                    <th>Details</th>
                </tr>
            </thead>
            <tbody>
            {% for row in rows %}
                <tr>
                    <td><strong>{{ row.url }}</strong>{% if row.label %}<br><span class="label">{{ row.label }}</span>{% endif %}</td>
                    <td class="{{ row.css_class }}">{{ row.status }}</td>
                    <td>{{ row.status_code }}</td>
                    <td>{{ row.time }}</td>
                    <td>{{ row.details }}</td>
                </tr>
            {% endfor %}
            </tbody>
        </table>
        <div class="footer">
            <p>Generated: {{ generated_at }}</p>
            <p>torscout v{{ version }}</p>
        </div>
    </div>
</body>
</html>
"#;
