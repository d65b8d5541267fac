//! # Kepler Application Logic
//!
//! Builds a world from the command line, drives it for a fixed number of
//! steps and reports progress through `tracing`.

use crate::cli::{Cli, PolicyKind};
use anyhow::{Context, Result};
use rl::{DqnAgent, Policy, RandomPolicy};
use std::fs::File;
use std::io::BufWriter;
use world::{OrbitWorld, StepStats};

/// Outcome of [`run`].
#[derive(Copy, Clone, Debug)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: u64,
    pub last: StepStats,
}

/// Run the simulation described by `cli`.
///
/// # Errors
///
/// Returns configuration errors, agent construction errors and failures to
/// write the snapshot.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let mut config = cli.world_config()?;
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    config.seed = Some(seed);
    tracing::info!(
        seed,
        bodies = config.body_count,
        manual = config.manual_body,
        mode = ?config.learning_mode,
        policy = ?cli.policy,
        "starting kepler"
    );

    match cli.policy {
        PolicyKind::Dqn => {
            let agent = DqnAgent::new(&config.agent, seed.wrapping_add(1)).context("building agent")?;
            simulate(OrbitWorld::new(&config, agent)?, cli)
        }
        PolicyKind::Random => simulate(OrbitWorld::new(&config, RandomPolicy::new(seed.wrapping_add(1)))?, cli),
    }
}

fn simulate<P: Policy + Send + 'static>(mut world: OrbitWorld<P>, cli: &Cli) -> Result<RunSummary> {
    tracing::info!("Starting simulation loop for {} steps with dt = {}...", cli.steps, cli.dt);
    for _ in 0..cli.steps {
        world.step(cli.dt);
        let stats = world.last_step();
        if cli.log_every > 0 && stats.step % cli.log_every == 0 {
            tracing::info!(
                step = stats.step,
                mean_reward = stats.mean_reward,
                mean_eccentricity = stats.mean_eccentricity,
                epsilon = stats.epsilon,
                loss = ?stats.loss,
                "progress"
            );
        }
    }
    if let Some(report) = world.finish_learning() {
        tracing::debug!(?report, "final background update joined");
    }

    let summary = RunSummary {
        seed: world.seed(),
        steps: world.steps(),
        last: *world.last_step(),
    };
    if let Some(path) = &cli.snapshot {
        write_snapshot(&world, &summary, path).with_context(|| format!("writing snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }
    tracing::info!(
        steps = summary.steps,
        mean_reward = summary.last.mean_reward,
        mean_eccentricity = summary.last.mean_eccentricity,
        "run complete"
    );
    Ok(summary)
}

fn write_snapshot<P: Policy + Send + 'static>(
    world: &OrbitWorld<P>,
    summary: &RunSummary,
    path: &std::path::Path,
) -> Result<()> {
    let drawables: Vec<serde_json::Value> = world
        .as_drawable_entities()
        .iter()
        .map(|d| {
            serde_json::json!({
                "x": d.position.x,
                "y": d.position.y,
                "radius": d.radius,
                "kind": format!("{:?}", d.kind),
            })
        })
        .collect();
    let snapshot = serde_json::json!({
        "seed": summary.seed,
        "steps": summary.steps,
        "stats": serde_json::to_value(summary.last)?,
        "drawables": drawables,
    });
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &snapshot)?;
    Ok(())
}
