use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InklingConfig {
    pub context: ContextConfig,
    pub memory: MemoryConfig,
    pub generation: GenerationConfig,
    pub log_level: String,
}

/// Knobs for the lexical context pipeline.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContextConfig {
    /// Size of the local window around the cursor, in characters.
    pub local_window: usize,
    /// Maximum number of related sections to include alongside the window.
    pub max_related_sections: usize,
    /// Sections scoring below this keyword-overlap threshold are discarded.
    pub min_relevance: f64,
    /// Per-chunk character cap applied during compression.
    pub chunk_char_cap: usize,
    /// Hard ceiling on the full assembled context block.
    pub total_char_budget: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub db_path: String,
    /// Capacity of the semantic memory store; eviction runs before insert.
    pub max_memories: usize,
    /// Retrain the embedder vocabulary every N insertions.
    pub train_interval: usize,
    /// Search results scoring below this cosine similarity are dropped.
    pub min_semantic_score: f64,
    /// Results with lexical Jaccard above this are treated as near-verbatim
    /// duplicates of the query and excluded when the filter is enabled.
    pub max_jaccard_score: f64,
    pub default_top_k: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// Timeout applied to every backend generate call, in milliseconds.
    pub timeout_ms: u64,
    /// TTL for cached capability-availability probes, in milliseconds.
    pub availability_ttl_ms: u64,
}

impl Default for InklingConfig {
    fn default() -> Self {
        Self {
            context: ContextConfig::default(),
            memory: MemoryConfig::default(),
            generation: GenerationConfig::default(),
            log_level: "info".into(),
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            local_window: 1500,
            max_related_sections: 3,
            min_relevance: 0.05,
            chunk_char_cap: 250,
            total_char_budget: 2250,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        let db_path = default_inkling_dir()
            .join("memories.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            max_memories: 500,
            train_interval: 10,
            min_semantic_score: 0.1,
            max_jaccard_score: 0.8,
            default_top_k: 5,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            availability_ttl_ms: 60_000,
        }
    }
}

/// Returns `~/.inkling/`
pub fn default_inkling_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".inkling")
}

/// Returns the default config file path: `~/.inkling/config.toml`
pub fn default_config_path() -> PathBuf {
    default_inkling_dir().join("config.toml")
}

impl InklingConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            InklingConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (INKLING_DB, INKLING_MAX_MEMORIES,
    /// INKLING_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("INKLING_DB") {
            self.memory.db_path = val;
        }
        if let Ok(val) = std::env::var("INKLING_MAX_MEMORIES") {
            if let Ok(n) = val.parse() {
                self.memory.max_memories = n;
            }
        }
        if let Ok(val) = std::env::var("INKLING_LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.memory.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
