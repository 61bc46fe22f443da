//! Configuration types for synthesis, evolution and bulk generation.

use crate::types::Rectifier;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape of synthesized programs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Number of input variables a program may reference
    pub arity: usize,
    /// Target instruction count
    pub length: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            arity: 2,
            length: 40,
        }
    }
}

/// Constant perturbation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that any one constant is nudged
    pub rate: f64,
    /// Standard deviation of the normal nudge
    pub std_dev: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate: 0.01,
            std_dev: 0.2,
        }
    }
}

/// Batch executor parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of units in flight at once
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 32 }
    }
}

/// What each generation unit produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Top-level random seed; each unit derives its own generator from it
    pub seed: u64,
    /// Number of independent units to generate
    pub count: u64,
    /// Programs per unit (one per output channel)
    pub channels: usize,
    pub synthesis: SynthesisConfig,
    pub mutation: MutationConfig,
    /// Mutation passes applied to each freshly synthesized program
    pub mutation_passes: u32,
    pub rectifier: Rectifier,
    /// Grid steps per axis used when probing a program
    pub probe_resolution: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            count: 1,
            channels: 3,
            synthesis: SynthesisConfig::default(),
            mutation: MutationConfig::default(),
            mutation_passes: 0,
            rectifier: Rectifier::default(),
            probe_resolution: 16,
        }
    }
}

/// Driver output and logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Directory receiving one file per unit
    pub output_dir: String,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            output_dir: "autoart-output".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

/// Everything a bulk run needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub generation: GenerationConfig,
    pub batch: BatchConfig,
    pub worker: WorkerConfig,
}

impl RunConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if generation.synthesis.arity == 0 {
            return Err(Error::Config("synthesis.arity must be at least 1".to_string()));
        }
        if generation.synthesis.length == 0 {
            return Err(Error::Config("synthesis.length must be at least 1".to_string()));
        }
        if generation.channels == 0 {
            return Err(Error::Config("channels must be at least 1".to_string()));
        }
        if generation.probe_resolution == 0 {
            return Err(Error::Config("probe_resolution must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&generation.mutation.rate) {
            return Err(Error::Config(format!(
                "mutation.rate must lie in [0, 1], got {}",
                generation.mutation.rate
            )));
        }
        if !generation.mutation.std_dev.is_finite() || generation.mutation.std_dev < 0.0 {
            return Err(Error::Config(format!(
                "mutation.std_dev must be finite and non-negative, got {}",
                generation.mutation.std_dev
            )));
        }
        if self.batch.batch_size == 0 {
            return Err(Error::Config("batch.batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
