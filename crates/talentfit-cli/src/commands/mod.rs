pub mod fit;
pub mod init;
pub mod list_jobs;
pub mod simulate;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use talentfit_core::dataset::{self, ItemRecord};
use talentfit_core::model::JobProfile;
use talentfit_store::TalentfitConfig;

/// Load the configured item bank, or the built-in one if the file is absent.
pub fn load_item_bank(config: &TalentfitConfig) -> Result<Vec<ItemRecord>> {
    let records = if config.item_bank.exists() {
        dataset::load_item_records(&config.item_bank)?
    } else {
        debug!(path = %config.item_bank.display(), "item bank not found, using built-in");
        dataset::builtin_item_records()?
    };

    for w in dataset::validate_item_records(&records) {
        match w.row {
            Some(row) => warn!(row, "{}", w.message),
            None => warn!("{}", w.message),
        }
    }
    Ok(records)
}

/// Load job profiles from an explicit path (which must exist), or the
/// configured catalog with a built-in fallback.
pub fn load_jobs(explicit: Option<&Path>, config: &TalentfitConfig) -> Result<Vec<JobProfile>> {
    if let Some(path) = explicit {
        return dataset::load_job_profiles(path);
    }
    if config.job_profiles.exists() {
        dataset::load_job_profiles(&config.job_profiles)
    } else {
        debug!(path = %config.job_profiles.display(), "job profiles not found, using built-in");
        dataset::builtin_job_profiles()
    }
}
