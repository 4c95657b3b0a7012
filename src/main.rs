use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;

use feature_codex::settings::Settings;
use feature_codex::{Codex, CodexRecord, FeatureSummary, FeatureType};

#[derive(Parser)]
#[command(name = "codex", about = "Query a feature data dictionary joined with its feature summary")]
struct Cli {
    /// Data dictionary markdown file (default from settings)
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,
    /// Feature summary table (default from settings)
    #[arg(long, global = true)]
    summary: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feature, section and type counts
    Stats,
    /// Show one feature
    Show {
        feature: String,
        /// Print the joined record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve an observed value to its description
    Meaning { feature: String, value: String },
    /// List feature names
    List {
        /// Only features of this type (ordinal, numeric, categorical, mixed, ...)
        #[arg(short = 't', long = "type")]
        feature_type: Option<String>,
    },
    /// Data-quality issues found while building
    Issues,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_codex(cli: &Cli, settings: &Settings) -> anyhow::Result<Codex> {
    let dictionary_path = cli.dictionary.as_ref().unwrap_or(&settings.dictionary_path);
    let summary_path = cli.summary.as_ref().unwrap_or(&settings.summary_path);

    let document = std::fs::read_to_string(dictionary_path)
        .with_context(|| format!("Failed to read {}", dictionary_path.display()))?;
    let summary = FeatureSummary::from_path(summary_path, settings.delimiter()?)
        .with_context(|| format!("Failed to load {}", summary_path.display()))?;

    Codex::from_document(&document, summary).with_context(|| {
        format!(
            "Failed to build codex from {} and {}",
            dictionary_path.display(),
            summary_path.display()
        )
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(settings_loaded = ?settings, msg = "Starting codex");

    let t0 = Instant::now();
    let codex = load_codex(&cli, &settings)?;
    info!("Built codex in {:.1}ms", t0.elapsed().as_secs_f64() * 1000.0);

    match cli.command {
        Commands::Stats => {
            let records = codex.records();
            let sections = records.iter().map(|r| &r.feature.section_no).unique().count();
            let with_codes = records.iter().filter(|r| r.feature.codes.is_some()).count();
            println!("Features:   {}", records.len());
            println!("Sections:   {}", sections);
            println!("With codes: {}", with_codes);
            println!("Issues:     {}", codex.issues().len());
            println!("\n--- Types ---");
            let counts = records
                .iter()
                .map(|r| r.feature_type().map(ToString::to_string).unwrap_or_else(|| "-".into()))
                .counts();
            for (kind, n) in counts.into_iter().sorted() {
                println!("  {:<12} {:>4}", kind, n);
            }
        }
        Commands::Show { feature, json } => {
            let record = codex.lookup(&feature)?;
            if json {
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                print_record(record);
            }
        }
        Commands::Meaning { feature, value } => {
            println!("{}", codex.meaning_of(&feature, value.as_str())?);
        }
        Commands::List { feature_type } => match feature_type {
            Some(tag) => {
                let wanted = FeatureType::parse(&tag);
                for name in codex.features_of_type(&wanted) {
                    println!("{}", name);
                }
            }
            None => {
                for record in codex.records() {
                    println!("{}", record.feature_name());
                }
            }
        },
        Commands::Issues => {
            if codex.issues().is_empty() {
                println!("No data-quality issues.");
            }
            for issue in codex.issues() {
                println!("{}", issue);
            }
        }
    }

    Ok(())
}

fn print_record(record: &CodexRecord) {
    let f = &record.feature;
    println!("{} (section {})", f.feature_name, f.section_no);
    if let Some(summary) = &record.summary {
        println!("  type:       {}", summary.feature_type);
        if let Some(level) = &summary.information_level {
            println!("  level:      {}", level);
        }
        if !summary.missing_or_unknown.is_empty() {
            println!("  missing:    {}", summary.missing_or_unknown.iter().join(", "));
        }
    }
    if let Some(definition) = &f.definition {
        println!("  definition: {}", definition);
    }
    if let Some(codes) = &f.codes {
        println!("  codes:");
        for (symbol, description) in codes.iter() {
            println!("    {:>3}: {}", symbol, description);
        }
    }
    if let Some(dims) = &f.dim_translation {
        println!("  dimensions:");
        for dim in dims {
            println!("    - {}", dim);
        }
    }
}
