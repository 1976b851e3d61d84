//! examlens CLI: grade attempts, validate and import exams, compare progress.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examlens",
    version,
    about = "Exam grading and performance insights"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an attempt and write an attempt report
    Grade {
        /// Path to the .toml exam definition
        #[arg(long)]
        exam: PathBuf,

        /// Path to the .json attempt snapshot
        #[arg(long)]
        attempt: PathBuf,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate exam TOML files
    Validate {
        /// Path to an exam file or directory
        #[arg(long)]
        exam: PathBuf,
    },

    /// Build an exam from a plain-text question bank
    Import {
        /// Text file with numbered questions
        #[arg(long)]
        input: PathBuf,

        /// Where to write the exam TOML
        #[arg(long)]
        output: PathBuf,

        /// Exam title (defaults to the input file name)
        #[arg(long)]
        title: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two attempt reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Percentage-point change treated as unchanged
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if the overall score or any category declined
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, sample exam and sample attempt
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examlens=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            exam,
            attempt,
            output,
            format,
            config,
        } => commands::grade::execute(exam, attempt, output, format, config),
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::Import {
            input,
            output,
            title,
            config,
        } => commands::import::execute(input, output, title, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
