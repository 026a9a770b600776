//! Four-channel float vector: the common currency every colourspace and
//! every search/dither routine passes around. Channels 0..3 carry colour,
//! channel 3 carries alpha, but the type itself has no opinion on that.

use std::ops::{Add, Mul, Sub};

/// A 4-component float vector used for working-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec4 { x, y, z, w }
    }

    pub fn splat(v: f32) -> Self {
        Vec4 { x: v, y: v, z: v, w: v }
    }

    /// Componentwise absolute value.
    pub fn abs(self) -> Self {
        Vec4::new(self.x.abs(), self.y.abs(), self.z.abs(), self.w.abs())
    }

    /// Sum of componentwise squared differences. No square root: every
    /// caller only ever compares distances, never reports them.
    pub fn dist_sq(self, other: Vec4) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y + d.z * d.z + d.w * d.w
    }

    /// Returns a copy with the first three channels scaled by `alpha`,
    /// leaving alpha itself untouched.
    pub fn premultiply_rgb(self, alpha: f32) -> Self {
        Vec4::new(self.x * alpha, self.y * alpha, self.z * alpha, self.w)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, scalar: f32) -> Vec4 {
        Vec4::new(self.x * scalar, self.y * scalar, self.z * scalar, self.w * scalar)
    }
}

impl Mul<Vec4> for Vec4 {
    type Output = Vec4;
    /// Componentwise multiply, used by the biased two-nearest search to
    /// scale a threshold offset by a per-channel spread.
    fn mul(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z, self.w * rhs.w)
    }
}
