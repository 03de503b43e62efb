use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use gendertrend::config::Config;
use gendertrend::corpus::models::RawDocument;
use gendertrend::corpus::traits::CorpusSource;
use gendertrend::frequency::counter::CountMode;
use gendertrend::lexicon::synonyms::SynonymTable;
use gendertrend::lexicon::GenderLexicons;
use gendertrend::names::NameGenderModel;
use gendertrend::output::terminal;
use gendertrend::pipeline::Pipeline;
use gendertrend::text::lemmatizer::RuleBasedAnalyzer;

/// Gendertrend: how a corpus talks about women and men, year by year.
///
/// Counts gendered vocabulary per year, trains word embeddings to find what
/// the corpus associates with that vocabulary, and sorts the people it
/// mentions by the likely gender of their given name.
#[derive(Parser)]
#[command(name = "gendertrend", version, about)]
struct Cli {
    /// Corpus file (overrides GENDERTREND_CORPUS)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Random seed for embedding training (overrides GENDERTREND_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the woman and man lexicons after synonym expansion
    Lexicon {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Count lexicon occurrences per year and print the man/woman ratio
    Count {
        /// Use Laplace-smoothed log frequencies instead of raw counts
        #[arg(long)]
        smoothed: bool,
    },

    /// Train embeddings and list the nearest neighbours of each lexicon word
    Similar {
        /// Neighbours per word (default: GENDERTREND_TOP_K or 3)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// List the people mentioned in the corpus, split by predicted gender,
    /// with each name's nearest neighbours in the trained embeddings
    Names {
        /// Only attribute names; skip embedding training
        #[arg(long)]
        skip_neighbours: bool,
    },

    /// Train the name gender classifier from a reference CSV
    TrainClassifier {
        /// CSV with Name and Gender columns (overrides GENDERTREND_NAMES_CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run the full analysis and optionally write a JSON report
    Analyze {
        /// Where to write the JSON report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip name attribution (no trained classifier needed)
        #[arg(long)]
        skip_names: bool,
    },

    /// Import a JSON/JSONL corpus into a SQLite store
    #[cfg(feature = "sqlite")]
    Import {
        /// JSON array or JSON Lines file of documents
        input: PathBuf,

        /// Destination database (default: input path with a .db extension)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gendertrend=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(corpus) = cli.corpus {
        config.corpus_path = Some(corpus);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Lexicon { json } => {
            let lexicons = build_lexicons(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lexicons)?);
            } else {
                terminal::display_lexicons(&lexicons);
            }
        }

        Commands::Count { smoothed } => {
            let lexicons = build_lexicons(&config)?;
            let analyzer = RuleBasedAnalyzer::default();
            let pipeline = Pipeline::new(&analyzer, config.pipeline_settings());

            let corpus = pipeline.ingest(load_corpus(&config)?);
            terminal::display_rejected(&corpus.rejected);

            let parsed = pipeline.tokenize(&corpus.documents);
            let report = pipeline.frequencies(&parsed, &lexicons);

            if smoothed {
                terminal::display_counters(&report.smoothed, CountMode::Smoothed);
            } else {
                terminal::display_counters(&report.raw, CountMode::Raw);
            }
        }

        Commands::Similar { top_k } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let lexicons = build_lexicons(&config)?;
            let analyzer = RuleBasedAnalyzer::default();
            let pipeline = Pipeline::new(&analyzer, config.pipeline_settings());

            let corpus = pipeline.ingest(load_corpus(&config)?);
            terminal::display_rejected(&corpus.rejected);

            println!("Training word embeddings (seed {})...", config.seed);
            let model = pipeline.embed(&corpus)?;
            println!("  Vocabulary: {} words, {} dimensions", model.len(), model.dim());

            let report = pipeline.neighbours(&model, &lexicons, None);
            terminal::display_similarity(&report);
        }

        Commands::Names { skip_neighbours } => {
            let model = NameGenderModel::load(&config.name_model_path())?;
            let analyzer = RuleBasedAnalyzer::default().with_given_names(model.given_names());
            let pipeline = Pipeline::new(&analyzer, config.pipeline_settings());

            let corpus = pipeline.ingest(load_corpus(&config)?);
            terminal::display_rejected(&corpus.rejected);

            let attribution =
                gendertrend::names::attribute_names(&analyzer, &model, &corpus.documents);
            terminal::display_names(&attribution);

            if !skip_neighbours {
                println!("\nTraining word embeddings (seed {})...", config.seed);
                let embeddings = pipeline.embed(&corpus)?;
                let lexicons = build_lexicons(&config)?;
                let report = pipeline.neighbours(&embeddings, &lexicons, Some(&attribution));
                terminal::display_name_similarity(&report);
            }
        }

        Commands::TrainClassifier { csv } => {
            if let Some(csv) = csv {
                config.names_csv = Some(csv);
            }
            let csv_path = config.require_names_csv()?;

            println!("Reading reference names from {}...", csv_path.display());
            let records = gendertrend::names::reference::load_reference_names(csv_path)?;
            println!("  {} labelled names", records.len());

            let model = NameGenderModel::train(&records)?;
            let model_path = config.name_model_path();
            model.save(&model_path)?;

            println!("\n{}", "Classifier trained.".bold());
            println!("  Saved to: {}", model_path.display());
            println!("You can now run `gendertrend names` or `gendertrend analyze`.");
        }

        Commands::Analyze { report, skip_names } => {
            let lexicons = build_lexicons(&config)?;
            let model = if skip_names {
                None
            } else {
                Some(NameGenderModel::load(&config.name_model_path())?)
            };

            let analyzer = match &model {
                Some(m) => RuleBasedAnalyzer::default().with_given_names(m.given_names()),
                None => RuleBasedAnalyzer::default(),
            };
            let pipeline = Pipeline::new(&analyzer, config.pipeline_settings());

            println!("Running full analysis (seed {})...", config.seed);
            let result = pipeline.run(load_corpus(&config)?, &lexicons, model.as_ref())?;

            terminal::display_lexicons(&result.lexicons);
            terminal::display_counters(&result.frequencies.raw, CountMode::Raw);
            terminal::display_counters(&result.frequencies.smoothed, CountMode::Smoothed);
            terminal::display_similarity(&result.similarity);
            if let Some(names) = &result.names {
                terminal::display_names(names);
            }

            if let Some(path) = report {
                gendertrend::output::report::write_report(&path, &result)?;
                println!("\n{}", format!("Report written to {}", path.display()).bold());
            }
        }

        #[cfg(feature = "sqlite")]
        Commands::Import { input, db } => {
            let db_path = db.unwrap_or_else(|| input.with_extension("db"));

            println!("Importing {}...", input.display());
            let source = gendertrend::corpus::json::JsonCorpus::new(&input);
            let raw = source.load()?;
            let corpus = gendertrend::corpus::models::ingest(raw);
            terminal::display_rejected(&corpus.rejected);

            let imported = gendertrend::corpus::sqlite::import(&db_path, &corpus.documents)?;

            println!("\n{}", "Import complete.".bold());
            println!("  Documents stored: {imported}");
            println!("  Database: {}", db_path.display());
            println!("Set GENDERTREND_CORPUS={} to analyze it.", db_path.display());
        }
    }

    Ok(())
}

/// Expand the seed lists through the configured synonym table.
fn build_lexicons(config: &Config) -> Result<GenderLexicons> {
    let table = match &config.synonyms_path {
        Some(path) => SynonymTable::load(path)?,
        None => SynonymTable::builtin()?,
    };
    Ok(GenderLexicons::build(&table))
}

/// Read every raw record from the configured corpus.
fn load_corpus(config: &Config) -> Result<Vec<RawDocument>> {
    let path = config.require_corpus()?;
    let source = gendertrend::corpus::open_source(path)?;
    info!(source = %source.describe(), "Loading corpus");
    source.load()
}
