//! # Orbit Engine
//!
//! Point-mass gravity around a fixed central body plus discrete thrust.
//! Integration is semi-implicit Euler: the velocity is updated first and the
//! position is advanced with the *new* velocity, which keeps long-running
//! orbits from gaining energy the way explicit Euler does.

use crate::error::PhysicsError;
use crate::vector::Vec2;

/// Discrete thrust command for a single body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Thrust {
    #[default]
    None,
    /// Accelerate along the current velocity.
    Forward,
    /// Accelerate against the current velocity.
    Reverse,
}

impl Thrust {
    pub const COUNT: usize = 3;
    pub const ALL: [Thrust; Self::COUNT] = [Thrust::None, Thrust::Forward, Thrust::Reverse];

    /// Stable index used by value estimators.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Thrust::None => 0,
            Thrust::Forward => 1,
            Thrust::Reverse => 2,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OrbitingBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
}

impl OrbitingBody {
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, mass: f64) -> Self {
        Self { position, velocity, mass }
    }
}

/// The single fixed mass at the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CentralMass {
    pub mass: f64,
}

impl CentralMass {
    #[must_use]
    pub const fn new(mass: f64) -> Self {
        Self { mass }
    }
}

/// Tunables of the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitParams {
    /// Multiplied with the central mass to give `mu`.
    pub gravitational_constant: f64,
    /// Magnitude of the thrust acceleration.
    pub thrust: f64,
    /// Forward thrust is refused once speed exceeds `v_escape - escape_margin`.
    pub escape_margin: f64,
    /// Distances below this are clamped when computing gravity.
    pub min_radius: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            gravitational_constant: 0.7,
            thrust: 0.1,
            escape_margin: 0.02,
            min_radius: 1e-3,
        }
    }
}

pub struct OrbitEngine {
    central: CentralMass,
    params: OrbitParams,
    mu: f64,
}

impl OrbitEngine {
    #[must_use]
    pub fn new(central: CentralMass, params: OrbitParams) -> Self {
        let mu = params.gravitational_constant * central.mass;
        Self { central, params, mu }
    }

    #[must_use]
    pub fn central(&self) -> CentralMass {
        self.central
    }

    #[must_use]
    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    /// Gravitational parameter `G * M`.
    #[must_use]
    pub fn gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Gravitational acceleration at `position`.
    ///
    /// The distance is clamped to `min_radius`; a body sitting exactly on the
    /// origin has no defined direction and feels nothing.
    #[must_use]
    pub fn gravity(&self, position: Vec2) -> Vec2 {
        let Some(direction) = position.unit() else {
            return Vec2::ZERO;
        };
        let r = position.magnitude().max(self.params.min_radius);
        direction * (-self.mu / (r * r))
    }

    /// Speed needed to escape from `position`.
    #[must_use]
    pub fn escape_velocity(&self, position: Vec2) -> f64 {
        let r = position.magnitude().max(self.params.min_radius);
        (2.0 * self.mu.max(0.0) / r).sqrt()
    }

    /// Thrust acceleration produced by `thrust` for `body`.
    #[must_use]
    pub fn thrust_acceleration(&self, body: &OrbitingBody, thrust: Thrust) -> Vec2 {
        let Some(heading) = body.velocity.unit() else {
            return Vec2::ZERO;
        };
        match thrust {
            Thrust::None => Vec2::ZERO,
            Thrust::Forward => {
                let limit = self.escape_velocity(body.position) - self.params.escape_margin;
                if body.velocity.magnitude() > limit {
                    Vec2::ZERO
                } else {
                    heading * self.params.thrust
                }
            }
            Thrust::Reverse => heading * -self.params.thrust,
        }
    }

    /// Advance a single body by `dt`.
    pub fn step_body(&self, body: &mut OrbitingBody, thrust: Thrust, dt: f64) {
        let acceleration = self.gravity(body.position) + self.thrust_acceleration(body, thrust);
        body.velocity += acceleration * dt;
        body.position += body.velocity * dt;
    }

    /// Advance every body by `dt`, `actions[i]` driving `bodies[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ActionCountMismatch`] when the slices differ in
    /// length and [`PhysicsError::InvalidTimestep`] for a negative or
    /// non-finite `dt`. Bodies are untouched in both cases.
    pub fn step(&self, bodies: &mut [OrbitingBody], actions: &[Thrust], dt: f64) -> Result<(), PhysicsError> {
        if bodies.len() != actions.len() {
            return Err(PhysicsError::ActionCountMismatch {
                bodies: bodies.len(),
                actions: actions.len(),
            });
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        for (body, &thrust) in bodies.iter_mut().zip(actions) {
            self.step_body(body, thrust, dt);
        }
        tracing::trace!(bodies = bodies.len(), dt, "orbit step");
        Ok(())
    }

    #[must_use]
    pub fn eccentricity(&self, body: &OrbitingBody) -> f64 {
        self.eccentricity_of(body.position, body.velocity)
    }

    /// Magnitude of the eccentricity vector
    /// `(|v|²/mu - 1/|r|) r - (r·v / mu) v`.
    ///
    /// 0 is a circle, 1 a radial or parabolic path. Without a central mass or
    /// at the origin no orbit exists and the result is `f64::INFINITY`.
    #[must_use]
    pub fn eccentricity_of(&self, position: Vec2, velocity: Vec2) -> f64 {
        let r = position.magnitude();
        if self.mu <= f64::EPSILON || r < self.params.min_radius {
            return f64::INFINITY;
        }
        let position_scale = velocity.dot(velocity) / self.mu - 1.0 / r;
        let velocity_scale = position.dot(velocity) / self.mu;
        (position * position_scale - velocity * velocity_scale).magnitude()
    }
}
