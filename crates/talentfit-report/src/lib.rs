//! talentfit-report: Self-contained HTML rendering of assessment reports.

pub mod html;

pub use html::{generate_html, write_html_report};
