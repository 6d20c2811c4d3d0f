/*
Copyright (c) 2026 The Mirror Master developers

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the “Software”), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do
so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS
OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY,
WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

use std::{
    fmt::Display,
    ops::{Add, Div, Mul, Sub},
};

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {
    use super::{distance_pt_ln, distance_pt_pt, get_line, Complex};

    #[test]
    fn mul_i_is_a_quarter_turn() {
        let v = Complex::new(3.0, 2.0).mul_i();

        assert!((v.real + 2.0).abs() < 1e-12);
        assert!((v.imaginary - 3.0).abs() < 1e-12);
        assert!(Complex::new(3.0, 2.0).dot(v).abs() < 1e-12);
    }

    #[test]
    fn degenerate_vectors_normalize_to_zero() {
        let v = Complex::new(1e-8, -1e-8).normalize_or_zero();
        assert!(v.magnitude() < f64::EPSILON);

        let w = Complex::new(0.0, 4.0).normalize_or_zero();
        assert!((w.imaginary - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cross_sign_follows_orientation() {
        let x = Complex::new(1.0, 0.0);
        let y = Complex::new(0.0, 1.0);

        assert!((x.cross(y) - 1.0).abs() < 1e-12);
        assert!((y.cross(x) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn distances() {
        let line = get_line(Complex::new(0.0, 1.0), Complex::new(5.0, 1.0));

        assert!((distance_pt_ln(Complex::new(2.0, 4.0), line) - 3.0).abs() < 1e-12);
        assert!((distance_pt_pt(Complex::new(0.0, 0.0), Complex::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn arg_in_degrees() {
        assert!((Complex::new(0.0, 2.0).arg_degrees() - 90.0).abs() < 1e-12);
        assert!((Complex::new(-1.0, 0.0).arg_degrees() - 180.0).abs() < 1e-12);
        assert!((Complex::new(1.0, -1.0).arg_degrees() + 45.0).abs() < 1e-12);
    }
}

/// Vectors shorter than this are considered to have no direction.
pub const DEGENERATE_NORM: f64 = 1e-6;

/// Represents a point (or a vector) on the mechanism's plane as a complex number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    /// X coordinate.
    pub real: f64,
    /// Y coordinate.
    pub imaginary: f64,
}

impl Complex {
    #[must_use]
    #[inline]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    #[must_use]
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Optimized multiplication by the complex unit (i).
    #[must_use]
    pub fn mul_i(self) -> Complex {
        Complex::new(-self.imaginary, self.real)
    }

    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    #[must_use]
    pub fn dot(self, other: Complex) -> f64 {
        self.real * other.real + self.imaginary * other.imaginary
    }

    /// The z component of the cross product of both vectors lifted to 3D.
    #[must_use]
    pub fn cross(self, other: Complex) -> f64 {
        self.real * other.imaginary - self.imaginary * other.real
    }

    #[must_use]
    pub fn arg(self) -> f64 {
        f64::atan2(self.imaginary, self.real)
    }

    #[must_use]
    pub fn arg_degrees(self) -> f64 {
        self.arg().to_degrees()
    }

    /// The unit vector of the same direction, or zero if there's no meaningful direction.
    #[must_use]
    pub fn normalize_or_zero(self) -> Complex {
        let magnitude = self.magnitude();

        if magnitude > DEGENERATE_NORM {
            self / magnitude
        } else {
            Complex::zero()
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;

    fn mul(self, rhs: f64) -> Self::Output {
        Complex::new(self.real * rhs, self.imaginary * rhs)
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Self) -> Self::Output {
        Complex::new(self.real + rhs.real, self.imaginary + rhs.imaginary)
    }
}

impl Div<f64> for Complex {
    type Output = Complex;

    fn div(self, rhs: f64) -> Self::Output {
        Complex::new(self.real / rhs, self.imaginary / rhs)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Self) -> Self::Output {
        Complex::new(self.real - rhs.real, self.imaginary - rhs.imaginary)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(precision) = f.precision() {
            write!(
                f,
                "({:.*}, {:.*})",
                precision, self.real, precision, self.imaginary
            )
        } else {
            write!(f, "({}, {})", self.real, self.imaginary)
        }
    }
}

/// Represents a line in a 2D euclidean space.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Line {
    /// Line's origin as a complex number.
    pub origin: Complex,
    /// A normalized direction vector.
    pub direction: Complex,
}

#[must_use]
pub fn get_line(p1: Complex, p2: Complex) -> Line {
    Line {
        origin: p1,
        direction: (p2 - p1).normalize_or_zero(),
    }
}

/// Computes Point-Line distance.
#[must_use]
pub fn distance_pt_ln(point: Complex, line: Line) -> f64 {
    line.direction.cross(point - line.origin).abs()
}

/// Computes Point-Point distance.
#[must_use]
pub fn distance_pt_pt(p1: Complex, p2: Complex) -> f64 {
    (p1 - p2).magnitude()
}
