//! The `talentfit list-jobs` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use talentfit_core::model::Dimension;
use talentfit_store::config::load_config_from;

use super::load_jobs;

pub fn execute(jobs_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let jobs = load_jobs(jobs_path.as_deref(), &config)?;

    if jobs.is_empty() {
        println!("No job profiles found. Run `talentfit init` to create a starter catalog.");
        return Ok(());
    }

    let mut table = Table::new();
    let mut header = vec!["Id".to_string(), "Title".to_string()];
    header.extend(Dimension::ALL.iter().map(|d| d.to_string()));
    table.set_header(header);

    for job in &jobs {
        let mut row = vec![Cell::new(&job.id), Cell::new(&job.title)];
        row.extend(Dimension::ALL.iter().map(|d| match job.target_profile.get(d) {
            Some(spec) => Cell::new(format!("{:.0} (x{:.1})", spec.ideal, spec.weight)),
            None => Cell::new("-"),
        }));
        table.add_row(row);
    }

    println!("{table}");
    Ok(())
}
