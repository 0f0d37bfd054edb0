//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use talentfit_core::matchmaker::FitResult;
use talentfit_core::model::{CandidateProfile, Dimension};
use talentfit_core::report::AssessmentReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from an assessment report.
pub fn generate_html(report: &AssessmentReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>talentfit report: candidate {}</title>\n",
        report.candidate_id
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>talentfit assessment</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Candidate <strong>{}</strong> | session {} | {} items answered | English {} | {}</p>\n",
        report.candidate_id,
        report.session_id,
        report.items_answered,
        report.profile.english_level,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Profile
    html.push_str("<section class=\"profile\">\n");
    html.push_str("<h2>Profile</h2>\n");
    html.push_str(&generate_profile_chart(&report.profile));
    if let Some(language) = &report.language {
        html.push_str(&format!(
            "<p class=\"meta\">Transcript: {} words, {} unique, diversity {:.2}, estimated {}</p>\n",
            language.word_count,
            language.unique_words,
            language.lexical_diversity,
            language.estimated_cefr
        ));
    }
    html.push_str("</section>\n");

    // Job fit
    html.push_str("<section class=\"fits\">\n");
    html.push_str("<h2>Job fit</h2>\n");
    if report.fits.is_empty() {
        html.push_str("<p class=\"meta\">No job profiles evaluated.</p>\n");
    }
    for fit in &report.fits {
        html.push_str(&generate_fit_table(fit));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_fit_table(fit: &FitResult) -> String {
    let mut html = format!(
        "<h3>{} <span class=\"score\">{:.1}%</span> <span class=\"rec\">{}</span></h3>\n",
        html_escape(&fit.job_title),
        fit.fit_score,
        fit.recommendation
    );
    html.push_str("<table class=\"fit\">\n");
    html.push_str("<thead><tr><th>Dimension</th><th>Candidate</th><th>Ideal</th><th>Weight</th><th>Gap</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (dimension, detail) in &fit.details {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.0}</td><td>{:.0}</td><td>{:.1}</td><td class=\"{}\">{:.0}</td></tr>\n",
            dimension, detail.candidate, detail.ideal, detail.weight, detail.status, detail.gap
        ));
    }
    html.push_str("</tbody></table>\n");
    html
}

/// Horizontal bars for each profile dimension on the 0-100 scale.
fn generate_profile_chart(profile: &CandidateProfile) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 180;

    let rows: Vec<(Dimension, f64)> = Dimension::ALL
        .iter()
        .filter_map(|d| profile.score(*d).map(|s| (*d, s)))
        .collect();

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (dimension, score)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (score.clamp(0.0, 100.0) / 100.0 * max_width as f64) as usize;

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            dimension
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#6366f1\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.0}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --green: #dcfce7; --yellow: #fef9c3; --red: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --green: #064e3b; --yellow: #713f12; --red: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-weight: normal; }
.rec { font-size: 0.8em; color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.green { background: var(--green); }
.yellow { background: var(--yellow); }
.red { background: var(--red); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
