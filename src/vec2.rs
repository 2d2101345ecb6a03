//! Fixed-point 2D vector built on [`Fixed64`].

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::fixed::Fixed64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct FixedVec2 {
    pub x: Fixed64,
    pub y: Fixed64,
}

impl FixedVec2 {
    pub const ZERO: FixedVec2 = FixedVec2 {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
    };

    pub const fn new(x: Fixed64, y: Fixed64) -> Self {
        Self { x, y }
    }

    /// Convenience constructor for literal scenario setup (tests, examples).
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: Fixed64::from_f64(x),
            y: Fixed64::from_f64(y),
        }
    }

    pub fn dot(self, rhs: Self) -> Fixed64 {
        self.x.mul(rhs.x) + self.y.mul(rhs.y)
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(self, rhs: Self) -> Fixed64 {
        self.x.mul(rhs.y) - self.y.mul(rhs.x)
    }

    pub fn sqr_length(self) -> Fixed64 {
        self.dot(self)
    }

    pub fn length(self) -> Fixed64 {
        self.sqr_length().sqrt()
    }

    pub fn sqr_distance(self, rhs: Self) -> Fixed64 {
        (self - rhs).sqr_length()
    }

    pub fn distance(self, rhs: Self) -> Fixed64 {
        (self - rhs).length()
    }

    pub fn scale(self, s: Fixed64) -> Self {
        Self {
            x: self.x.mul(s),
            y: self.y.mul(s),
        }
    }

    /// Returns `self` normalized to unit length, or `FixedVec2::ZERO` if the
    /// vector is (near) zero-length — there is no direction to normalize to.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_zero() {
            FixedVec2::ZERO
        } else {
            self.scale(Fixed64::ONE.div(len))
        }
    }

    pub fn lerp(self, rhs: Self, t: Fixed64) -> Self {
        self + (rhs - self).scale(t)
    }

    pub fn midpoint(self, rhs: Self) -> Self {
        (self + rhs).scale(Fixed64::ONE.div(Fixed64::from_int(2)))
    }
}

impl Add for FixedVec2 {
    type Output = FixedVec2;
    fn add(self, rhs: Self) -> Self {
        FixedVec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for FixedVec2 {
    type Output = FixedVec2;
    fn sub(self, rhs: Self) -> Self {
        FixedVec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for FixedVec2 {
    type Output = FixedVec2;
    fn neg(self) -> Self {
        FixedVec2::new(-self.x, -self.y)
    }
}

impl Mul<Fixed64> for FixedVec2 {
    type Output = FixedVec2;
    fn mul(self, rhs: Fixed64) -> Self {
        self.scale(rhs)
    }
}

impl Div<Fixed64> for FixedVec2 {
    type Output = FixedVec2;
    fn div(self, rhs: Fixed64) -> Self {
        self.scale(Fixed64::ONE.div(rhs))
    }
}
