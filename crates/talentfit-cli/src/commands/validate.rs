//! The `talentfit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use talentfit_core::dataset;

pub fn execute(items: Option<PathBuf>, jobs: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(
        items.is_some() || jobs.is_some(),
        "nothing to validate: pass --items and/or --jobs"
    );

    let mut total_warnings = 0;

    if let Some(path) = &items {
        let records = dataset::load_item_records(path)?;
        let validity = records.iter().filter(|r| r.is_validity).count();
        println!(
            "Item bank: {} ({} items, {validity} validity checks)",
            path.display(),
            records.len()
        );

        let warnings = dataset::validate_item_records(&records);
        for w in &warnings {
            let prefix = w
                .row
                .map(|row| format!("  [row {row}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if let Some(path) = &jobs {
        // Parsing already rejects unknown dimensions and bad ideals/weights.
        let profiles = dataset::load_job_profiles(path)?;
        println!("Job profiles: {} ({} jobs)", path.display(), profiles.len());
        for job in &profiles {
            if job.target_profile.is_empty() {
                println!("  [{}] WARNING: empty target profile; fit will be 0%", job.id);
                total_warnings += 1;
            }
        }
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
