//! Item bank and job catalog parsing.
//!
//! Loads item dataset rows from JSON and job target profiles from TOML, and
//! validates them. The IPIP-50 bank and the default job profiles are embedded
//! so the engine works without any files on disk.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::{Dimension, JobProfile, Keying, TargetSpec, Trait};

/// Embedded IPIP-50 item bank with validity checks.
pub const BUILTIN_ITEM_BANK: &str = include_str!("../../../data/ipip50.json");

/// Embedded default job profiles.
pub const BUILTIN_JOB_PROFILES: &str = include_str!("../../../data/job-profiles.toml");

/// One row of an item dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub text: String,
    #[serde(rename = "trait")]
    pub scale: Trait,
    #[serde(default)]
    pub keyed: Keying,
    #[serde(default)]
    pub is_validity: bool,
}

/// Read an item dataset from a JSON file.
pub fn load_item_records(path: &Path) -> Result<Vec<ItemRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank: {}", path.display()))?;

    parse_item_records_str(&content, path)
}

/// Parse an item dataset from a JSON string.
pub fn parse_item_records_str(content: &str, source_path: &Path) -> Result<Vec<ItemRecord>> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse item bank: {}", source_path.display()))
}

/// The embedded IPIP-50 item bank.
pub fn builtin_item_records() -> Result<Vec<ItemRecord>> {
    parse_item_records_str(BUILTIN_ITEM_BANK, Path::new("<builtin ipip50.json>"))
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Zero-based row index (if applicable).
    pub row: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate item dataset rows for common issues.
pub fn validate_item_records(records: &[ItemRecord]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_text = HashSet::new();
    for (row, record) in records.iter().enumerate() {
        let text = record.text.trim();
        if text.is_empty() {
            warnings.push(ValidationWarning {
                row: Some(row),
                message: "item text is empty".into(),
            });
        } else if !seen_text.insert(text.to_lowercase()) {
            warnings.push(ValidationWarning {
                row: Some(row),
                message: format!("duplicate item text: {text}"),
            });
        }
    }

    for scale in Trait::ALL {
        let scored = records
            .iter()
            .filter(|r| r.scale == scale && !r.is_validity)
            .count();
        if scored == 0 {
            warnings.push(ValidationWarning {
                row: None,
                message: format!("no scored items for {scale}; it will default to 50"),
            });
        }
    }

    if !records.is_empty() && !records.iter().any(|r| r.is_validity) {
        warnings.push(ValidationWarning {
            row: None,
            message: "no validity-check items; none will be injected".into(),
        });
    }

    warnings
}

// ---------------------------------------------------------------------------
// Job profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlJobFile {
    #[serde(default)]
    jobs: Vec<TomlJob>,
}

#[derive(Debug, Deserialize)]
struct TomlJob {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    target_profile: BTreeMap<String, TargetSpec>,
}

/// Read job profiles from a TOML file.
pub fn load_job_profiles(path: &Path) -> Result<Vec<JobProfile>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read job profiles: {}", path.display()))?;

    parse_job_profiles_str(&content, path)
}

/// Parse and validate job profiles from a TOML string.
pub fn parse_job_profiles_str(content: &str, source_path: &Path) -> Result<Vec<JobProfile>> {
    let parsed: TomlJobFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    // Seeding is keyed by title, so titles must be as unique as ids.
    let mut seen_ids = HashSet::new();
    let mut seen_titles = HashSet::new();
    parsed
        .jobs
        .into_iter()
        .map(|job| {
            if !seen_ids.insert(job.id.clone()) {
                anyhow::bail!("duplicate job id: {}", job.id);
            }
            if !seen_titles.insert(job.title.clone()) {
                anyhow::bail!("duplicate job title {:?} (job {})", job.title, job.id);
            }

            let target_profile = job
                .target_profile
                .into_iter()
                .map(|(key, spec)| {
                    let dimension = key.parse::<Dimension>().map_err(|e| {
                        AssessmentError::Validation(format!("job {}: {e}", job.id))
                    })?;
                    Ok((dimension, spec))
                })
                .collect::<Result<BTreeMap<_, _>>>()?;

            let profile = JobProfile {
                id: job.id,
                title: job.title,
                description: job.description,
                target_profile,
            };
            validate_job_profile(&profile)?;
            Ok(profile)
        })
        .collect()
}

/// The embedded default job profiles.
pub fn builtin_job_profiles() -> Result<Vec<JobProfile>> {
    parse_job_profiles_str(BUILTIN_JOB_PROFILES, Path::new("<builtin job-profiles.toml>"))
}

/// Reject ideals outside 0..=100 and non-positive or non-finite weights.
pub fn validate_job_profile(job: &JobProfile) -> Result<(), AssessmentError> {
    if job.id.trim().is_empty() {
        return Err(AssessmentError::Validation("job id is empty".into()));
    }
    for (dimension, spec) in &job.target_profile {
        if !(0.0..=100.0).contains(&spec.ideal) {
            return Err(AssessmentError::Validation(format!(
                "job {}: {dimension} ideal {} outside 0..=100",
                job.id, spec.ideal
            )));
        }
        if !spec.weight.is_finite() || spec.weight <= 0.0 {
            return Err(AssessmentError::Validation(format!(
                "job {}: {dimension} weight {} must be positive",
                job.id, spec.weight
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const JOBS_TOML: &str = r#"
[[jobs]]
id = "analyst"
title = "Data Analyst"

[jobs.target_profile.Conscientiousness]
ideal = 85
weight = 2.0

[jobs.target_profile.Logic_Reasoning]
ideal = 90

[jobs.target_profile.Openness]
"#;

    #[test]
    fn builtin_bank_parses() {
        let records = builtin_item_records().unwrap();
        assert_eq!(records.iter().filter(|r| !r.is_validity).count(), 50);
        assert!(records.iter().any(|r| r.is_validity));
        for scale in Trait::ALL {
            let n = records
                .iter()
                .filter(|r| r.scale == scale && !r.is_validity)
                .count();
            assert_eq!(n, 10, "{scale} should have 10 items");
        }
        assert!(validate_item_records(&records).is_empty());
    }

    #[test]
    fn item_record_defaults() {
        let json = r#"[{"text": "Am always prepared.", "trait": "Conscientiousness"}]"#;
        let records = parse_item_records_str(json, &PathBuf::from("t.json")).unwrap();
        assert_eq!(records[0].keyed, Keying::Plus);
        assert!(!records[0].is_validity);
    }

    #[test]
    fn item_record_rejects_unknown_trait() {
        let json = r#"[{"text": "x", "trait": "Honesty"}]"#;
        assert!(parse_item_records_str(json, &PathBuf::from("t.json")).is_err());
    }

    #[test]
    fn validate_reports_duplicates_and_gaps() {
        let json = r#"[
            {"text": "Like order.", "trait": "Conscientiousness"},
            {"text": "like order.", "trait": "Conscientiousness", "keyed": "minus"},
            {"text": "  ", "trait": "Openness"}
        ]"#;
        let records = parse_item_records_str(json, &PathBuf::from("t.json")).unwrap();
        let warnings = validate_item_records(&records);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("empty")));
        assert!(warnings.iter().any(|w| w.message.contains("Extraversion")));
        assert!(warnings.iter().any(|w| w.message.contains("validity")));
    }

    #[test]
    fn parse_jobs_with_defaults() {
        let jobs = parse_job_profiles_str(JOBS_TOML, &PathBuf::from("jobs.toml")).unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.title, "Data Analyst");
        assert_eq!(job.target_profile[&Dimension::Conscientiousness].weight, 2.0);
        assert_eq!(job.target_profile[&Dimension::LogicReasoning].ideal, 90.0);
        assert_eq!(job.target_profile[&Dimension::LogicReasoning].weight, 1.0);
        assert_eq!(job.target_profile[&Dimension::Openness].ideal, 50.0);
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        let toml = r#"
[[jobs]]
id = "x"
title = "X"
[jobs.target_profile.Charisma]
ideal = 50
"#;
        let err = parse_job_profiles_str(toml, &PathBuf::from("jobs.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Charisma"));
    }

    #[test]
    fn invalid_weight_and_ideal_are_rejected() {
        let zero_weight = r#"
[[jobs]]
id = "x"
title = "X"
[jobs.target_profile.Openness]
weight = 0.0
"#;
        assert!(parse_job_profiles_str(zero_weight, &PathBuf::from("j.toml")).is_err());

        let big_ideal = r#"
[[jobs]]
id = "x"
title = "X"
[jobs.target_profile.Openness]
ideal = 140
"#;
        assert!(parse_job_profiles_str(big_ideal, &PathBuf::from("j.toml")).is_err());
    }

    #[test]
    fn duplicate_job_ids_are_rejected() {
        let toml = r#"
[[jobs]]
id = "x"
title = "X"

[[jobs]]
id = "x"
title = "Y"
"#;
        let err = parse_job_profiles_str(toml, &PathBuf::from("j.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicate job id"));
    }

    #[test]
    fn duplicate_job_titles_are_rejected() {
        let toml = r#"
[[jobs]]
id = "x"
title = "Engineer"

[[jobs]]
id = "y"
title = "Engineer"
"#;
        let err = parse_job_profiles_str(toml, &PathBuf::from("j.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicate job title \"Engineer\" (job y)"));
    }

    #[test]
    fn builtin_jobs_parse() {
        let jobs = builtin_job_profiles().unwrap();
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Sales Hunter", "Software Engineer"]);
        assert_eq!(jobs[0].target_profile[&Dimension::Neuroticism].ideal, 10.0);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.toml");
        std::fs::write(&path, JOBS_TOML).unwrap();
        let jobs = load_job_profiles(&path).unwrap();
        assert_eq!(jobs[0].id, "analyst");
        assert!(load_item_records(&dir.path().join("missing.json")).is_err());
    }
}
