//! The `talentfit init` command.

use std::path::Path;

use anyhow::{Context, Result};

use talentfit_core::dataset::{BUILTIN_ITEM_BANK, BUILTIN_JOB_PROFILES};

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("talentfit.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data").context("failed to create data directory")?;
    write_if_absent(Path::new("data/ipip50.json"), BUILTIN_ITEM_BANK)?;
    write_if_absent(Path::new("data/job-profiles.toml"), BUILTIN_JOB_PROFILES)?;

    println!("\nNext steps:");
    println!("  1. Edit data/job-profiles.toml with your own target profiles");
    println!("  2. Run: talentfit validate --items data/ipip50.json --jobs data/job-profiles.toml");
    println!("  3. Run: talentfit simulate --candidate 1 --format all");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# talentfit configuration

item_bank = "data/ipip50.json"
job_profiles = "data/job-profiles.toml"
output_dir = "./talentfit-results"

# CEFR level assumed when no transcript is analyzed.
default_cefr = "B1"

# Uncomment for reproducible item order and simulated answers.
# seed = 42
"#;
