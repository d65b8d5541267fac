use physics::{OrbitingBody, Thrust};

/// Number of features in an [`Observation`].
pub const OBS_DIM: usize = 5;

/// Features the policy sees for one body: `[vx, vy, px, py, mass]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation(pub [f32; OBS_DIM]);

impl Observation {
    pub fn from_body(body: &OrbitingBody) -> Self {
        Self([
            body.velocity.x as f32,
            body.velocity.y as f32,
            body.position.x as f32,
            body.position.y as f32,
            body.mass as f32,
        ])
    }

    pub fn features(&self) -> &[f32; OBS_DIM] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// One body's step: what it saw, what it did, what it got, where it ended up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub action: Thrust,
    pub reward: f32,
    pub next_observation: Observation,
}
