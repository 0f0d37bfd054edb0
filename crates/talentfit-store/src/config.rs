//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use talentfit_core::engine::EngineConfig;
use talentfit_core::model::CefrLevel;

/// Top-level talentfit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentfitConfig {
    /// Item bank JSON. A missing file falls back to the built-in IPIP-50 bank.
    #[serde(default = "default_item_bank")]
    pub item_bank: PathBuf,
    /// Job profile catalog TOML. A missing file falls back to the built-in jobs.
    #[serde(default = "default_job_profiles")]
    pub job_profiles: PathBuf,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Seed for item selection and simulated answers.
    #[serde(default)]
    pub seed: Option<u64>,
    /// CEFR band assumed when no transcript is analyzed.
    #[serde(default)]
    pub default_cefr: CefrLevel,
}

fn default_item_bank() -> PathBuf {
    PathBuf::from("data/ipip50.json")
}
fn default_job_profiles() -> PathBuf {
    PathBuf::from("data/job-profiles.toml")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./talentfit-results")
}

impl Default for TalentfitConfig {
    fn default() -> Self {
        Self {
            item_bank: default_item_bank(),
            job_profiles: default_job_profiles(),
            output_dir: default_output_dir(),
            seed: None,
            default_cefr: CefrLevel::default(),
        }
    }
}

impl TalentfitConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            seed: self.seed,
            default_cefr: self.default_cefr,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `talentfit.toml` in the current directory
/// 2. `~/.config/talentfit/config.toml`
///
/// Environment variable overrides: `TALENTFIT_ITEM_BANK`,
/// `TALENTFIT_JOB_PROFILES`, `TALENTFIT_SEED`.
pub fn load_config() -> Result<TalentfitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TalentfitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("talentfit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => TalentfitConfig::default(),
    };

    if let Ok(path) = std::env::var("TALENTFIT_ITEM_BANK") {
        config.item_bank = PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("TALENTFIT_JOB_PROFILES") {
        config.job_profiles = PathBuf::from(path);
    }
    if let Ok(seed) = std::env::var("TALENTFIT_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("TALENTFIT_SEED is not an integer: {seed:?}"))?;
        config.seed = Some(seed);
    }

    config.item_bank = resolve_path(&config.item_bank);
    config.job_profiles = resolve_path(&config.job_profiles);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<TalentfitConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<TalentfitConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("talentfit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_TALENTFIT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_TALENTFIT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_TALENTFIT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_TALENTFIT_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = TalentfitConfig::default();
        assert_eq!(config.item_bank, PathBuf::from("data/ipip50.json"));
        assert_eq!(config.output_dir, PathBuf::from("./talentfit-results"));
        assert_eq!(config.default_cefr, CefrLevel::B1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: TalentfitConfig = toml::from_str(
            r#"
seed = 42
default_cefr = "C1"
job_profiles = "jobs/custom.toml"
"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.default_cefr, CefrLevel::C1);
        assert_eq!(config.job_profiles, PathBuf::from("jobs/custom.toml"));
        assert_eq!(config.item_bank, default_item_bank());

        let engine = config.engine_config();
        assert_eq!(engine.seed, Some(42));
        assert_eq!(engine.default_cefr, CefrLevel::C1);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/talentfit.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_parsed_and_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talentfit.toml");
        std::fs::write(
            &path,
            "output_dir = \"${_TALENTFIT_OUT_DIR}/reports\"\nseed = 7\n",
        )
        .unwrap();
        std::env::set_var("_TALENTFIT_OUT_DIR", "/tmp/tf");

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/tf/reports"));
        std::env::remove_var("_TALENTFIT_OUT_DIR");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talentfit.toml");
        std::fs::write(&path, "seed = \"not a number\"").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }
}
