//! # 2D Vector Math
//!
//! Pure value operations on pairs of `f64`. Every operation returns a new
//! vector; nothing here mutates in place except the `AddAssign` impl.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// L2 norm.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Unit vector in the direction of `self`.
    ///
    /// Returns `None` for the zero vector and for non-finite input, so
    /// callers never see a NaN vector. Any other vector, however short, keeps
    /// its direction: each component is at most `len`, so dividing by it
    /// cannot overflow.
    #[must_use]
    pub fn unit(self) -> Option<Self> {
        let len = self.magnitude();
        if len == 0.0 || !len.is_finite() {
            None
        } else {
            Some(Self::new(self.x / len, self.y / len))
        }
    }

    /// Like [`Vec2::unit`] but collapses the degenerate case to [`Vec2::ZERO`].
    #[must_use]
    pub fn unit_or_zero(self) -> Self {
        self.unit().unwrap_or(Self::ZERO)
    }

    /// N-ary addition.
    pub fn add_all<I: IntoIterator<Item = Self>>(summands: I) -> Self {
        summands.into_iter().fold(Self::ZERO, Add::add)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Sum for Vec2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}
