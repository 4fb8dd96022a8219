use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{AnimacyError, Result};
use crate::lexicon::sense_graph::normalize_key;

pub const DEFAULT_ANIMATE_ROOTS: [&str; 3] = ["människa..1", "person..1", "djur..1"];

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub lexicon: LexiconConfig,
    pub sampling: SamplingConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LexiconConfig {
    pub animate_roots: Vec<String>,
    /// Part-of-speech tag of noun senses in the lexicon.
    pub noun_pos: String,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        LexiconConfig {
            animate_roots: DEFAULT_ANIMATE_ROOTS.iter().map(|s| s.to_string()).collect(),
            noun_pos: "nn".to_string(),
        }
    }
}

impl LexiconConfig {
    /// Root sense ids in normalised form, ready for graph lookups.
    pub fn animate_root_set(&self) -> HashSet<String> {
        self.animate_roots
            .iter()
            .map(|r| normalize_key(r))
            .filter(|r| !r.is_empty())
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SamplingConfig {
    pub bins: usize,
    pub seed: u64,
    pub out_prefix: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            bins: 10,
            seed: 42,
            out_prefix: "sampled".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.sampling.bins == 0 {
            return Err(AnimacyError::InvalidConfig(
                "sampling.bins must be at least 1".to_string(),
            ));
        }
        if self.lexicon.noun_pos.trim().is_empty() {
            return Err(AnimacyError::InvalidConfig(
                "lexicon.noun_pos must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(file_path).map_err(|e| AnimacyError::io(file_path, e))?;
    let loaded_config = toml::from_str::<Config>(&contents).map_err(|e| AnimacyError::Config {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    loaded_config.validate()?;
    Ok(loaded_config)
}
