//! Per-frame snapshot handed to an external renderer.
//!
//! [`Drawable`] is the plain view; [`DrawableGpu`] is the same data packed for
//! a storage buffer upload. All GPU types must be `Pod` and 16-byte sized.

use bytemuck::{Pod, Zeroable};
use physics::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    CentralMass,
    AgentBody,
    ManualBody,
}

impl DrawableKind {
    /// Tag written into [`DrawableGpu::kind`].
    pub const fn tag(self) -> u32 {
        match self {
            DrawableKind::CentralMass => 0,
            DrawableKind::AgentBody => 1,
            DrawableKind::ManualBody => 2,
        }
    }
}

/// One blob in the snapshot; `radius` is the body's mass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Drawable {
    pub position: Vec2,
    pub radius: f64,
    pub kind: DrawableKind,
}

/// GPU representation of a [`Drawable`]
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawableGpu {
    pub position: [f32; 2],
    pub radius: f32,
    /// [`DrawableKind::tag`]
    pub kind: u32,
}

impl From<&Drawable> for DrawableGpu {
    #[allow(clippy::cast_possible_truncation)]
    fn from(drawable: &Drawable) -> Self {
        Self {
            position: [drawable.position.x as f32, drawable.position.y as f32],
            radius: drawable.radius as f32,
            kind: drawable.kind.tag(),
        }
    }
}

/// Packs drawables into a contiguous byte buffer.
pub fn to_bytes(drawables: &[Drawable]) -> Vec<u8> {
    let packed: Vec<DrawableGpu> = drawables.iter().map(DrawableGpu::from).collect();
    bytemuck::cast_slice(&packed).to_vec()
}
