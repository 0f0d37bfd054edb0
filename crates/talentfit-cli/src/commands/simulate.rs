//! The `talentfit simulate` command.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use talentfit_core::engine::AssessmentEngine;
use talentfit_core::language::LexicalAnalyzer;
use talentfit_core::model::{Dimension, Item, Keying, Trait};
use talentfit_core::profile::COGNITIVE_MAX;
use talentfit_core::report::AssessmentReport;
use talentfit_core::traits::LanguageAnalyzer;
use talentfit_report::html::write_html_report;
use talentfit_store::config::load_config_from;
use talentfit_store::InMemoryStore;

use super::{load_item_bank, load_jobs};

/// A synthetic candidate with a fixed leaning on each trait.
struct SimulatedCandidate {
    leaning: HashMap<Trait, u8>,
    rng: StdRng,
}

impl SimulatedCandidate {
    fn new(mut rng: StdRng) -> Self {
        let leaning = Trait::ALL
            .iter()
            .map(|t| (*t, rng.gen_range(1..=5)))
            .collect();
        Self { leaning, rng }
    }

    /// Raw Likert answer: the leaning, reversed for minus-keyed items, +/- 1.
    fn answer(&mut self, item: &Item) -> u8 {
        let leaning = self.leaning.get(&item.scale).copied().unwrap_or(3);
        let target = match item.keyed {
            Keying::Plus => leaning,
            Keying::Minus => 6 - leaning,
        };
        let jitter: i8 = self.rng.gen_range(-1..=1);
        (target as i8 + jitter).clamp(1, 5) as u8
    }

    fn latency_ms(&mut self) -> u64 {
        self.rng.gen_range(800..6000)
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    candidate_id: u64,
    seed: Option<u64>,
    cognitive_score: u8,
    transcript: Option<PathBuf>,
    jobs_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        cognitive_score <= COGNITIVE_MAX,
        "cognitive score must be between 0 and {COGNITIVE_MAX}"
    );
    let formats: Vec<&str> = match format.as_str() {
        "all" => vec!["json", "html"],
        other => other.split(',').map(str::trim).collect(),
    };
    if let Some(bad) = formats.iter().find(|f| !matches!(**f, "json" | "html")) {
        anyhow::bail!("unknown format: {bad}");
    }

    let mut config = load_config_from(config_path.as_deref())?;
    if seed.is_some() {
        config.seed = seed;
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let records = load_item_bank(&config)?;
    let jobs = load_jobs(jobs_path.as_deref(), &config)?;

    let started = Instant::now();
    let store = Arc::new(InMemoryStore::new());
    let engine = AssessmentEngine::new(store.repositories(), config.engine_config());
    engine.load_items(&records).await?;
    engine.seed_job_profiles(&jobs).await?;

    let answer_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let mut candidate = SimulatedCandidate::new(answer_rng);

    let session = engine.start_session(candidate_id).await?;
    eprintln!(
        "talentfit v{}: simulating candidate {candidate_id} over {} items",
        env!("CARGO_PKG_VERSION"),
        records.len()
    );

    while let Some(item) = engine.next_item(session.id).await? {
        let value = candidate.answer(&item);
        let latency = candidate.latency_ms();
        engine.submit(session.id, item.id, value, latency).await?;
    }

    let language = match &transcript {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read transcript: {}", path.display()))?;
            let analyzer = LexicalAnalyzer::new();
            let analysis = analyzer.analyze_text(&text).await?;
            info!(
                analyzer = analyzer.name(),
                words = analysis.word_count,
                cefr = %analysis.estimated_cefr,
                "analyzed transcript"
            );
            Some(analysis)
        }
        None => None,
    };

    let profile = engine
        .finalize(session.id, cognitive_score, language.as_ref())
        .await?;
    let items_answered = engine.session_responses(session.id).await?.len();

    let mut fits = Vec::with_capacity(jobs.len());
    for job in &jobs {
        fits.push(engine.calculate_fit(candidate_id, &job.id).await?);
    }

    let report = AssessmentReport {
        id: uuid::Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        candidate_id,
        session_id: session.id,
        items_answered,
        profile,
        language,
        fits,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{candidate_id}-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{candidate_id}-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            other => anyhow::bail!("unknown format: {other}"),
        }
    }

    Ok(())
}

fn print_summary(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut profile = Table::new();
    profile.set_header(vec!["Dimension", "Score"]);
    for dimension in Dimension::ALL {
        if let Some(score) = report.profile.score(dimension) {
            profile.add_row(vec![Cell::new(dimension), Cell::new(format!("{score:.0}"))]);
        }
    }
    profile.add_row(vec![
        Cell::new("English (CEFR)"),
        Cell::new(report.profile.english_level),
    ]);
    println!("{profile}");

    let mut fits = Table::new();
    fits.set_header(vec!["Job", "Fit", "Recommendation"]);
    for fit in &report.fits {
        fits.add_row(vec![
            Cell::new(&fit.job_title),
            Cell::new(format!("{:.1}%", fit.fit_score)),
            Cell::new(fit.recommendation),
        ]);
    }
    println!("\n{fits}");

    if let Some(best) = report.best_fit() {
        println!("\nBest fit: {} ({:.1}%)", best.job_title, best.fit_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(keyed: Keying) -> Item {
        Item {
            id: 1,
            text: "Have a vivid imagination.".into(),
            scale: Trait::Openness,
            keyed,
            is_validity_check: false,
        }
    }

    #[test]
    fn simulated_answers_follow_keying() {
        let mut candidate = SimulatedCandidate::new(StdRng::seed_from_u64(3));
        candidate.leaning.insert(Trait::Openness, 5);

        for _ in 0..50 {
            assert!(candidate.answer(&item(Keying::Plus)) >= 4);
            assert!(candidate.answer(&item(Keying::Minus)) <= 2);
            assert!((800..6000).contains(&candidate.latency_ms()));
        }
    }

    #[test]
    fn same_seed_same_candidate() {
        let a = SimulatedCandidate::new(StdRng::seed_from_u64(11));
        let b = SimulatedCandidate::new(StdRng::seed_from_u64(11));
        assert_eq!(a.leaning, b.leaning);
        assert!(a.leaning.values().all(|v| (1..=5).contains(v)));
    }
}
