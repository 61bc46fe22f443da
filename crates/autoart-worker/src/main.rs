//! Command-line driver for bulk program generation.

use anyhow::Result;
use autoart_core::{Rectifier, RunConfig};
use autoart_worker::telemetry;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "autoart", version, about = "Generate random expression programs in bulk")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate units into an output directory
    Generate(GenerateArgs),
    /// Evaluate a reverse-Polish program once
    Eval {
        /// Program text, e.g. "v0 v1 + sin"
        program: String,
        /// Values bound to v0, v1, ...
        #[arg(allow_negative_numbers = true)]
        vars: Vec<f64>,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Top-level seed (default: from config, else the current time)
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    count: Option<u64>,
    /// Instructions per program
    #[arg(long)]
    length: Option<usize>,
    /// Variables per program
    #[arg(long)]
    arity: Option<usize>,
    /// Programs per unit
    #[arg(long)]
    channels: Option<usize>,
    #[arg(long)]
    mutation_passes: Option<u32>,
    #[arg(long, value_enum)]
    rectifier: Option<RectifierArg>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RectifierArg {
    Mod,
    Clamp,
    Sigmoid,
}

impl From<RectifierArg> for Rectifier {
    fn from(arg: RectifierArg) -> Self {
        match arg {
            RectifierArg::Mod => Rectifier::Mod,
            RectifierArg::Clamp => Rectifier::Clamp,
            RectifierArg::Sigmoid => Rectifier::Sigmoid,
        }
    }
}

impl GenerateArgs {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => {
                let mut config = RunConfig::default();
                config.generation.seed = time_seed();
                config
            }
        };

        let generation = &mut config.generation;
        if let Some(seed) = self.seed {
            generation.seed = seed;
        }
        if let Some(count) = self.count {
            generation.count = count;
        }
        if let Some(length) = self.length {
            generation.synthesis.length = length;
        }
        if let Some(arity) = self.arity {
            generation.synthesis.arity = arity;
        }
        if let Some(channels) = self.channels {
            generation.channels = channels;
        }
        if let Some(passes) = self.mutation_passes {
            generation.mutation_passes = passes;
        }
        if let Some(rectifier) = self.rectifier {
            generation.rectifier = rectifier.into();
        }
        if let Some(output) = self.output {
            config.worker.output_dir = output.to_string_lossy().into_owned();
        }

        config.validate()?;
        Ok(config)
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let config = args.into_config()?;
            telemetry::init_telemetry(&config.worker.log_filter)?;
            info!("Starting AutoArt generation (seed {})", config.generation.seed);

            match autoart_worker::run(config).await {
                Ok(summary) => {
                    info!(
                        "Your units are in this directory: {}",
                        summary.output_dir.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    error!("Generation failed: {:#}", e);
                    Err(e)
                }
            }
        }
        Command::Eval { program, vars } => {
            let value = autoart_worker::evaluate_text(&program, &vars)?;
            println!("{}", value);
            Ok(())
        }
    }
}
