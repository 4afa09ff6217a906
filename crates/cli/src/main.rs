use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use conf::Configuration;
use job::{Capability, ComponentRegistry, EvaluationReport, JobReport, PersistOutcome, RecommenderJob};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// rec-runner - Recommender experiment runner
#[derive(Parser)]
#[command(name = "rec-runner")]
#[command(about = "Runs recommender experiments described by a configuration file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job: split, train, recommend, evaluate and save results
    Run {
        /// Configuration file (.toml, or key=value properties)
        #[arg(short, long)]
        conf: PathBuf,

        /// Override a configuration entry (repeatable)
        #[arg(short = 'D', value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Recommender to run, overriding rec.recommender.class
        #[arg(long)]
        recommender: Option<String>,

        /// Print the job report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List the registered component identifiers
    Components,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            conf,
            overrides,
            recommender,
            json,
        } => handle_run(conf, overrides, recommender, json)?,
        Commands::Components => handle_components(),
    }

    Ok(())
}

/// Handle the 'run' command
fn handle_run(
    path: PathBuf,
    overrides: Vec<String>,
    recommender: Option<String>,
    json: bool,
) -> Result<()> {
    let mut conf = Configuration::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    conf.apply_overrides(&overrides)
        .context("Invalid -D override")?;
    info!(
        "Loaded {} configuration entries from {}",
        conf.len(),
        path.display()
    );

    let mut job = RecommenderJob::new(conf, ComponentRegistry::with_builtins())?;
    if let Some(recommender) = recommender {
        job.set_recommender(&recommender);
    }

    let start = Instant::now();
    let report = job.run_job().context("Job failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        println!("{} Finished in {:?}", "✓".green(), start.elapsed());
    }
    Ok(())
}

/// Handle the 'components' command
fn handle_components() {
    let registry = ComponentRegistry::with_builtins();
    for capability in [
        Capability::DataModel,
        Capability::Similarity,
        Capability::Recommender,
        Capability::Evaluator,
        Capability::Filter,
    ] {
        println!(
            "{:<12} {}",
            format!("{}:", capability).bold(),
            registry.identifiers(capability).join(", ")
        );
    }
}

fn print_report(report: &JobReport) {
    println!(
        "\n{} {} ({} split, {} fold(s))\n",
        "Job".bold().blue(),
        report.job_id,
        report.split_mode,
        report.folds.len()
    );

    for fold in &report.folds {
        let label = match fold.fold_index {
            Some(index) => format!("fold {}", index),
            None => "run".to_string(),
        };
        println!(
            "{} {} {} recommendations in {}ms",
            label.bold(),
            fold.recommender.cyan(),
            fold.recommendations,
            fold.elapsed_ms
        );

        match &fold.evaluation {
            Some(EvaluationReport::Designated { evaluator, value }) => {
                println!("   {:<16} {:.4}", evaluator, value);
            }
            Some(EvaluationReport::Measures(values)) => {
                for (measure, value) in values {
                    println!("   {:<16} {:.4}", measure.to_string(), value);
                }
            }
            None => {}
        }

        match &fold.persist {
            PersistOutcome::Written(path) => {
                println!("   {} {}", "saved".green(), path.display());
            }
            PersistOutcome::Skipped => println!("   {}", "nothing to save".dimmed()),
            PersistOutcome::Failed { path, reason } => {
                println!("   {} {}: {}", "not saved".red(), path.display(), reason);
            }
        }
    }

    let failed = report.failed_writes().count();
    if failed > 0 {
        println!(
            "\n{} {} fold(s) could not be saved",
            "⚠".yellow(),
            failed
        );
    }
}
