//! Generation units and the bulk run that drives them.

use anyhow::{Context, Result};
use autoart_core::{Error, GenerationConfig, ProbeStats, RunConfig, UnitSeed};
use autoart_ir::{Mutator, Program, Synthesizer};
use autoart_runtime::{evaluate, probe, BatchExecutor};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// One program of a unit, with its probed output range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Reverse-Polish text of the program
    pub program: String,
    pub length: usize,
    pub max_depth: usize,
    pub stats: ProbeStats,
}

/// Everything written for one generation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub index: u64,
    pub seed: u64,
    pub arity: usize,
    pub channels: Vec<ChannelRecord>,
}

impl UnitRecord {
    /// Rebuild the unit's programs from their text form.
    pub fn programs(&self) -> autoart_core::Result<Vec<Program>> {
        self.channels
            .iter()
            .map(|channel| Program::parse(self.arity, &channel.program))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub units: u64,
    pub output_dir: PathBuf,
    pub elapsed: Duration,
}

/// Synthesize, mutate and probe the programs of unit `index`.
///
/// All randomness comes from the unit's own generator, so the record depends
/// only on `config` and `index`.
pub fn generate_unit(
    config: &GenerationConfig,
    mutator: &Mutator,
    index: u64,
) -> autoart_core::Result<UnitRecord> {
    let unit = UnitSeed::new(config.seed, index);
    let mut rng = unit.rng();
    let synthesizer = Synthesizer::new(config.synthesis);

    let mut channels = Vec::with_capacity(config.channels);
    for _ in 0..config.channels {
        let mut program = synthesizer.synthesize(&mut rng)?;
        for _ in 0..config.mutation_passes {
            mutator.mutate(&mut program, &mut rng);
        }
        let stats = probe(&program, config.rectifier, config.probe_resolution)?;
        channels.push(ChannelRecord {
            program: program.to_string(),
            length: program.len(),
            max_depth: program.max_depth(),
            stats,
        });
    }

    debug!("Generated unit {} with {} channels", unit, channels.len());

    Ok(UnitRecord {
        index,
        seed: config.seed,
        arity: config.synthesis.arity,
        channels,
    })
}

/// Output path for unit `index`; distinct indices never share a file.
pub fn unit_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("{:09}.json", index))
}

fn write_unit(dir: &Path, record: &UnitRecord) -> autoart_core::Result<()> {
    let file = File::create(unit_path(dir, record.index))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Generate `config.generation.count` units into `config.worker.output_dir`.
///
/// Stops after the first batch containing a failed unit. Files written by
/// earlier batches are kept.
#[instrument(skip(config), fields(seed = config.generation.seed, count = config.generation.count))]
pub async fn run(config: RunConfig) -> Result<RunSummary> {
    config.validate()?;

    let output_dir = PathBuf::from(&config.worker.output_dir);
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mutator = Arc::new(Mutator::new(config.generation.mutation)?);
    let generation = Arc::new(config.generation.clone());
    let executor = BatchExecutor::new(config.batch);
    let count = generation.count;
    let started = Instant::now();

    info!(
        "Generating {} units with seed {} into {}",
        count,
        generation.seed,
        output_dir.display()
    );

    let dir = output_dir.clone();
    executor
        .run(
            count,
            |batch, total| info!("Generating units... {}/{}", batch, total),
            move |n| {
                generate_unit(&generation, &mutator, n)
                    .and_then(|record| write_unit(&dir, &record))
                    .map_err(|e| Error::Task {
                        index: n,
                        message: e.to_string(),
                    })
            },
        )
        .await?;

    let elapsed = started.elapsed();
    info!("Done! {} units written in {:?}", count, elapsed);

    Ok(RunSummary {
        units: count,
        output_dir,
        elapsed,
    })
}

/// Parse reverse-Polish text whose arity is the number of bound values and
/// evaluate it once.
pub fn evaluate_text(text: &str, vars: &[f64]) -> autoart_core::Result<f64> {
    let program = Program::parse(vars.len(), text)?;
    evaluate(&program, vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoart_core::MutationConfig;

    fn mutator() -> Mutator {
        Mutator::new(MutationConfig::default()).unwrap()
    }

    #[test]
    fn test_generate_unit_shape() {
        let config = GenerationConfig {
            seed: 5,
            channels: 4,
            ..Default::default()
        };
        let record = generate_unit(&config, &mutator(), 2).unwrap();

        assert_eq!(record.index, 2);
        assert_eq!(record.seed, 5);
        assert_eq!(record.channels.len(), 4);
        for channel in &record.channels {
            assert_eq!(channel.length, config.synthesis.length);
            assert_eq!(channel.stats.samples, 16 * 16);
            assert!(channel.stats.is_finite());
        }
        assert_eq!(record.programs().unwrap().len(), 4);
    }

    #[test]
    fn test_generate_unit_is_deterministic() {
        let config = GenerationConfig {
            seed: 77,
            mutation_passes: 3,
            ..Default::default()
        };
        let a = generate_unit(&config, &mutator(), 10).unwrap();
        let b = generate_unit(&config, &mutator(), 10).unwrap();
        let c = generate_unit(&config, &mutator(), 11).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.channels, c.channels);
    }

    #[test]
    fn test_unit_path_is_zero_padded() {
        let path = unit_path(Path::new("out"), 42);
        assert_eq!(path, Path::new("out").join("000000042.json"));
    }

    #[test]
    fn test_evaluate_text() {
        assert_eq!(evaluate_text("v0 v1 *", &[3.0, 4.0]).unwrap(), 12.0);
        assert_eq!(evaluate_text("2.0 sqrt v0 max", &[-1.0]).unwrap(), 2.0f64.sqrt());
        assert!(evaluate_text("v1", &[1.0]).is_err());
    }
}
