//! talentfit CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "talentfit",
    version,
    about = "Psychometric assessment and job-fit matching"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full simulated assessment session and report job fit
    Simulate {
        /// Candidate identifier
        #[arg(long)]
        candidate: u64,

        /// Seed for item selection and simulated answers
        #[arg(long)]
        seed: Option<u64>,

        /// Cognitive reasoning score (0-10)
        #[arg(long, default_value = "5")]
        cognitive_score: u8,

        /// Interview transcript used to estimate the CEFR level
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Job profiles TOML (defaults to the configured catalog)
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a saved report's profile against the job catalog
    Fit {
        /// Assessment report JSON
        #[arg(long)]
        report: PathBuf,

        /// Job profiles TOML (defaults to the configured catalog)
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Only evaluate this job id
        #[arg(long)]
        job: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate item bank and job profile files
    Validate {
        /// Item bank JSON
        #[arg(long)]
        items: Option<PathBuf>,

        /// Job profiles TOML
        #[arg(long)]
        jobs: Option<PathBuf>,
    },

    /// List job profiles and their targets
    ListJobs {
        /// Job profiles TOML (defaults to the configured catalog)
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, item bank and job profiles
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "talentfit=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            candidate,
            seed,
            cognitive_score,
            transcript,
            jobs,
            output,
            format,
            config,
        } => {
            commands::simulate::execute(
                candidate,
                seed,
                cognitive_score,
                transcript,
                jobs,
                output,
                format,
                config,
            )
            .await
        }
        Commands::Fit {
            report,
            jobs,
            job,
            format,
            config,
        } => commands::fit::execute(report, jobs, job, format, config).await,
        Commands::Validate { items, jobs } => commands::validate::execute(items, jobs),
        Commands::ListJobs { jobs, config } => commands::list_jobs::execute(jobs, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
