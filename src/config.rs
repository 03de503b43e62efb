use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::embedding::skipgram::SkipGramParams;
use crate::pipeline::{PipelineSettings, DEFAULT_TOP_K};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting except the corpus path has a default; CLI flags override
/// individual values after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Corpus file: `.db`/`.sqlite` opens SQLite, anything else is JSON/JSONL
    pub corpus_path: Option<PathBuf>,
    /// Synonym table to use instead of the built-in one
    pub synonyms_path: Option<PathBuf>,
    /// Reference names CSV for `train-classifier`
    pub names_csv: Option<PathBuf>,
    /// Where the trained name classifier lives
    pub model_dir: PathBuf,
    pub top_k: usize,
    pub seed: u64,
    pub min_count: usize,
    pub vector_size: usize,
    pub window: usize,
    pub epochs: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = SkipGramParams::default();

        Ok(Self {
            corpus_path: env_path("GENDERTREND_CORPUS"),
            synonyms_path: env_path("GENDERTREND_SYNONYMS"),
            names_csv: env_path("GENDERTREND_NAMES_CSV"),
            model_dir: env_path("GENDERTREND_MODEL_DIR").unwrap_or_else(default_model_dir),
            top_k: env_parse("GENDERTREND_TOP_K", DEFAULT_TOP_K)?,
            seed: env_parse("GENDERTREND_SEED", defaults.seed)?,
            min_count: env_parse("GENDERTREND_MIN_COUNT", defaults.min_count)?,
            vector_size: env_parse("GENDERTREND_VECTOR_SIZE", defaults.vector_size)?,
            window: env_parse("GENDERTREND_WINDOW", defaults.window)?,
            epochs: env_parse("GENDERTREND_EPOCHS", defaults.epochs)?,
        })
    }

    /// Check that a corpus is configured and return its path.
    /// Call this before any command that reads documents.
    pub fn require_corpus(&self) -> Result<&Path> {
        match &self.corpus_path {
            Some(path) if path.exists() => Ok(path),
            Some(path) => anyhow::bail!(
                "Corpus not found at {}\n\
                 Check GENDERTREND_CORPUS in your .env file or pass --corpus.",
                path.display()
            ),
            None => anyhow::bail!(
                "GENDERTREND_CORPUS not set. Add it to your .env file or pass --corpus.\n\
                 See .env.example for the required variables."
            ),
        }
    }

    /// Check that the reference names CSV is configured and return its path.
    pub fn require_names_csv(&self) -> Result<&Path> {
        match &self.names_csv {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "GENDERTREND_NAMES_CSV not set. Point it at a CSV with Name and Gender columns\n\
                 (for example NationalNames.csv) or pass --csv."
            ),
        }
    }

    /// Location of the trained name classifier.
    pub fn name_model_path(&self) -> PathBuf {
        crate::names::NameGenderModel::default_path(&self.model_dir)
    }

    pub fn skipgram(&self) -> SkipGramParams {
        SkipGramParams {
            vector_size: self.vector_size,
            window: self.window,
            min_count: self.min_count,
            epochs: self.epochs,
            seed: self.seed,
            ..SkipGramParams::default()
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            top_k: self.top_k,
            skipgram: self.skipgram(),
            show_progress: true,
        }
    }
}

/// Default model directory: the platform data dir plus `gendertrend`.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gendertrend")
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw:?} is not a valid value")),
        _ => Ok(default),
    }
}
