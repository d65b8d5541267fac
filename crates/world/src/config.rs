use crate::error::ConfigError;
use physics::OrbitParams;
use rl::AgentConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where [`rl::Policy::learn`] runs relative to the stepping thread.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    /// `learn` finishes before `step` returns.
    #[default]
    Inline,
    /// `learn` runs on a worker thread and is joined at the start of the next
    /// step, before any action is selected.
    Background,
}

/// Construction-time settings of an [`crate::OrbitWorld`].
///
/// Ranges are inclusive `[low, high]` pairs sampled uniformly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Mass of the body at the origin. Default `[0.1, 0.2]`.
    pub central_mass_range: [f64; 2],
    /// Default `0.7`.
    pub gravitational_constant: f64,
    /// Thrust acceleration magnitude. Default `0.1`.
    pub thrust: f64,
    /// Forward thrust is refused this close to escape speed. Default `0.02`.
    pub escape_margin: f64,
    /// Gravity distance clamp. Default `1e-3`.
    pub min_radius: f64,
    /// Agent-controlled bodies. Default `32`.
    pub body_count: usize,
    /// Adds one body driven by [`crate::InputHandle`] instead of the agent.
    /// Default `true`.
    pub manual_body: bool,
    /// Feeds the manual body's transitions to the agent. Default `false`.
    pub train_on_manual_body: bool,
    /// Per-axis initial position. Default `[-0.9, 0.9]`.
    pub position_range: [f64; 2],
    /// Per-axis initial velocity. Default `[-0.25, 0.25]`.
    pub velocity_range: [f64; 2],
    /// Default `[0.0, 0.07]`.
    pub body_mass_range: [f64; 2],
    /// Eccentricity is clamped here before it becomes a reward. Default `10`.
    pub max_eccentricity: f64,
    /// Seed for world init and the agent. Drawn at random when absent.
    pub seed: Option<u64>,
    pub learning_mode: LearningMode,
    pub agent: AgentConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let params = OrbitParams::default();
        Self {
            central_mass_range: [0.1, 0.2],
            gravitational_constant: params.gravitational_constant,
            thrust: params.thrust,
            escape_margin: params.escape_margin,
            min_radius: params.min_radius,
            body_count: 32,
            manual_body: true,
            train_on_manual_body: false,
            position_range: [-0.9, 0.9],
            velocity_range: [-0.25, 0.25],
            body_mass_range: [0.0, 0.07],
            max_eccentricity: 10.0,
            seed: None,
            learning_mode: LearningMode::Inline,
            agent: AgentConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn check_range(field: &'static str, [low, high]: [f64; 2]) -> Result<(), ConfigError> {
    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(invalid(field, format!("[{low}, {high}] is not a finite ascending range")));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(field, format!("{value} must be finite and non-negative")));
    }
    Ok(())
}

impl WorldConfig {
    /// Reads and validates a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Json`]
    /// for malformed or unknown fields and the [`WorldConfig::validate`]
    /// errors otherwise.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded world config");
        Ok(config)
    }

    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field, or
    /// [`ConfigError::Agent`] for a bad nested agent config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("central_mass_range", self.central_mass_range)?;
        check_non_negative("central_mass_range", self.central_mass_range[0])?;
        check_non_negative("gravitational_constant", self.gravitational_constant)?;
        check_non_negative("thrust", self.thrust)?;
        check_non_negative("escape_margin", self.escape_margin)?;
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return Err(invalid("min_radius", format!("{} must be finite and positive", self.min_radius)));
        }
        check_range("position_range", self.position_range)?;
        check_range("velocity_range", self.velocity_range)?;
        check_range("body_mass_range", self.body_mass_range)?;
        check_non_negative("body_mass_range", self.body_mass_range[0])?;
        if !(self.max_eccentricity.is_finite() && self.max_eccentricity > 0.0) {
            return Err(invalid(
                "max_eccentricity",
                format!("{} must be finite and positive", self.max_eccentricity),
            ));
        }
        self.agent.validate()?;
        Ok(())
    }

    pub fn orbit_params(&self) -> OrbitParams {
        OrbitParams {
            gravitational_constant: self.gravitational_constant,
            thrust: self.thrust,
            escape_margin: self.escape_margin,
            min_radius: self.min_radius,
        }
    }

    /// Bodies in the world, the manual one included.
    pub fn total_bodies(&self) -> usize {
        self.body_count + usize::from(self.manual_body)
    }
}
