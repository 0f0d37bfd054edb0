//! The `talentfit fit` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use talentfit_core::engine::AssessmentEngine;
use talentfit_core::matchmaker::FitResult;
use talentfit_core::report::AssessmentReport;
use talentfit_store::config::load_config_from;
use talentfit_store::InMemoryStore;

use super::load_jobs;

pub async fn execute(
    report_path: PathBuf,
    jobs_path: Option<PathBuf>,
    job_filter: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let report = AssessmentReport::load_json(&report_path)?;
    let jobs = load_jobs(jobs_path.as_deref(), &config)?;

    let store = Arc::new(InMemoryStore::new());
    let engine = AssessmentEngine::new(store.repositories(), config.engine_config());
    engine.repositories().profiles.save(&report.profile).await?;
    engine.seed_job_profiles(&jobs).await?;

    let job_ids: Vec<String> = match job_filter {
        Some(id) => vec![id],
        None => jobs.iter().map(|j| j.id.clone()).collect(),
    };

    let mut fits = Vec::with_capacity(job_ids.len());
    for id in &job_ids {
        fits.push(engine.calculate_fit(report.candidate_id, id).await?);
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&fits)?),
        _ => print_fits(report.candidate_id, &fits),
    }

    Ok(())
}

fn print_fits(candidate_id: u64, fits: &[FitResult]) {
    use comfy_table::{Cell, Table};

    println!("Candidate {candidate_id}");
    for fit in fits {
        println!(
            "\n{} ({}): {:.1}% {}",
            fit.job_title, fit.job_id, fit.fit_score, fit.recommendation
        );

        let mut table = Table::new();
        table.set_header(vec!["Dimension", "Candidate", "Ideal", "Weight", "Gap", "Status"]);
        for (dimension, detail) in &fit.details {
            table.add_row(vec![
                Cell::new(dimension),
                Cell::new(format!("{:.0}", detail.candidate)),
                Cell::new(format!("{:.0}", detail.ideal)),
                Cell::new(format!("{:.1}", detail.weight)),
                Cell::new(format!("{:.0}", detail.gap)),
                Cell::new(detail.status),
            ]);
        }
        println!("{table}");
    }
}
