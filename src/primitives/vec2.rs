//! 2D vector type for directions, offsets and turn angles.

use num_traits::Float;
use std::ops::{Add, Div, Mul, Sub};

/// Direction or offset in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a vector from its components.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
        }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product; positive when `other` lies
    /// counter-clockwise of `self`.
    #[inline]
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector with the same direction, or `None` for (near) zero vectors.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let length = self.magnitude();
        (length > F::epsilon()).then(|| self / length)
    }

    /// Signed turn angle from `self` to `other` in `(-pi, pi]`; negative
    /// values turn clockwise.
    #[inline]
    pub fn signed_angle_to(self, other: Self) -> F {
        self.cross(other).atan2(self.dot(other))
    }

    /// Clockwise angle swept from `self` to `other`, in `[0, 2*pi)`.
    #[inline]
    pub fn clockwise_angle_to(self, other: Self) -> F {
        let two_pi = F::from(std::f64::consts::TAU).unwrap_or_else(F::zero);
        let angle = -self.signed_angle_to(other);
        if angle < F::zero() {
            angle + two_pi
        } else {
            angle
        }
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: F) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl<F: Float> Default for Vec2<F> {
    fn default() -> Self {
        Self::zero()
    }
}
