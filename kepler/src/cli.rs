use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use world::{LearningMode, WorldConfig};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Learned thrust control.
    #[default]
    Dqn,
    /// Uniformly random thrust, as a baseline.
    Random,
}

/// Command-line arguments for the Kepler binary.
///
/// Flags override whatever `--config` loads.
#[derive(Parser, Debug)]
#[command(name = "kepler", version, about)]
pub struct Cli {
    /// Number of world steps to run.
    #[arg(long, default_value_t = 2000)]
    pub steps: u64,

    /// Seconds of simulated time per step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f64,

    /// Agent-controlled bodies.
    #[arg(long)]
    pub bodies: Option<usize>,

    /// Seed for world init and the agent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON world config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Learn on a worker thread overlapping the next step.
    #[arg(long)]
    pub background: bool,

    /// Steps between progress lines. 0 disables them.
    #[arg(long, default_value_t = 200)]
    pub log_every: u64,

    /// Write the final drawables and stats as JSON.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PolicyKind::Dqn)]
    pub policy: PolicyKind,
}

impl Cli {
    /// Config file (or defaults) with the command-line overrides applied.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be loaded or the result is invalid.
    pub fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => WorldConfig::default(),
        };
        if let Some(bodies) = self.bodies {
            config.body_count = bodies;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.background {
            config.learning_mode = LearningMode::Background;
        }
        config.validate().context("invalid world config")?;
        Ok(config)
    }
}
