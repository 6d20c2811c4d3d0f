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

//! The telescope mechanism: a fixed base with two piston anchors, two pistons and a
//! secondary mirror whose orientation always faces the tracked target.
//!
//! ```text
//!                 * target
//!                /
//!           o---M---o            <- secondary mirror, perpendicular to M -> target
//!            \     /
//!              \ /               <- pistons, crossed
//!              / \
//!   PA1  o----/-F-\----o  PA2    <- base, F is the primary focus
//! ```
//!
//! The first piston holds the mirror end at `M - C/2·L̂`, the second one the end at
//! `M + C/2·L̂`, where `L̂` is the pointing vector turned a quarter turn counterclockwise.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{distance_pt_pt, Complex};

#[cfg(test)]
mod tests {
    use crate::geometry::Complex;

    use super::{Dimensions, Pose};

    #[test]
    fn default_dimensions() {
        let dims = Dimensions::default();

        assert!((dims.base_width - 4.0).abs() < 1e-12);
        assert!((dims.min_piston() - 2.5).abs() < 1e-12);
        assert!((dims.primary_focus().real - 1.0).abs() < 1e-12);
        assert!(dims.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut dims = Dimensions::default();
        dims.mirror_width = -1.0;
        assert!(dims.validate().is_err());

        let mut dims = Dimensions::default();
        dims.base_width = f64::NAN;
        assert!(dims.validate().is_err());

        let mut dims = Dimensions::default();
        dims.piston_min = Some(6.0);
        assert!(dims.validate().is_err());
    }

    #[test]
    fn symmetric_pose() {
        let dims = Dimensions::default();
        let pose = Pose::compute(&dims, Complex::new(0.0, 6.0), Complex::new(0.0, 3.0));

        // PA1 at (-2, 0) holds the end at (1, 3), PA2 at (2, 0) the end at (-1, 3).
        assert!((pose.mirror_ends.0.real - 1.0).abs() < 1e-12);
        assert!((pose.mirror_ends.1.real + 1.0).abs() < 1e-12);
        assert!((pose.pistons.0 - 18f64.sqrt()).abs() < 1e-12);
        assert!((pose.pistons.1 - 18f64.sqrt()).abs() < 1e-12);
        assert!((pose.mirror_angle - 90.0).abs() < 1e-12);
        assert!(pose.pistons_within(&dims, 1e-9));
        assert!(pose.angle_within());
    }

    #[test]
    fn first_piston_holds_the_clockwise_end() {
        let dims = Dimensions::default();
        let pose = Pose::compute(&dims, Complex::new(6.0, 11.0), Complex::new(2.385, 3.047));

        assert!((pose.mirror_ends.0.real - 3.295_366).abs() < 1e-5);
        assert!((pose.mirror_ends.0.imaginary - 2.633_197).abs() < 1e-5);
        assert!((pose.pistons.0 - 5.913_935).abs() < 1e-5);
        assert!((pose.pistons.1 - 3.500_452).abs() < 1e-5);
        // Piston 1 is past its full stroke.
        assert!(!pose.pistons_within(&dims, 1e-4));
    }

    #[test]
    fn mirror_is_perpendicular_to_pointing() {
        let dims = Dimensions::default();
        let pose = Pose::compute(&dims, Complex::new(-3.0, 7.5), Complex::new(0.4, 2.0));
        let span = pose.mirror_ends.0 - pose.mirror_ends.1;

        assert!(span.dot(pose.pointing).abs() < 1e-9);
        assert!((span.magnitude() - dims.mirror_width).abs() < 1e-9);
    }

    #[test]
    fn target_on_mirror_center_collapses_the_mirror() {
        let dims = Dimensions::default();
        let pose = Pose::compute(&dims, Complex::new(0.0, 3.0), Complex::new(0.0, 3.0));

        assert!((pose.mirror_ends.0 - pose.mirror_ends.1).magnitude() < 1e-12);
        assert!(pose.pistons.0.is_finite());
    }

    #[test]
    fn short_pistons_are_reported() {
        let dims = Dimensions::default();
        let pose = Pose::compute(&dims, Complex::new(-1.8, 6.0), Complex::new(-1.8, 0.2));

        // The end held by PA1 sits just above it.
        assert!(pose.pistons.0 < dims.min_piston());
        assert!(!pose.pistons_within(&dims, 1e-9));
    }
}

/// Physical dimensions of the mechanism.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Distance between the two piston anchors (A).
    pub base_width: f64,
    /// Maximal piston length (B).
    pub piston_max: f64,
    /// Minimal piston length. Half of the maximum when not given.
    pub piston_min: Option<f64>,
    /// Width of the secondary mirror (C).
    pub mirror_width: f64,
    /// Offset of the primary focus from the left anchor, along the base (F).
    pub focus_offset: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            base_width: 4.0,
            piston_max: 5.0,
            piston_min: None,
            mirror_width: 2.0,
            focus_offset: 3.0,
        }
    }
}

impl Dimensions {
    /// The effective minimal piston length.
    #[must_use]
    pub fn min_piston(&self) -> f64 {
        self.piston_min.unwrap_or(self.piston_max / 2.0)
    }

    /// Piston anchors on the base: (PA1, PA2).
    #[must_use]
    pub fn anchors(&self) -> (Complex, Complex) {
        (
            Complex::new(-self.base_width / 2.0, 0.0),
            Complex::new(self.base_width / 2.0, 0.0),
        )
    }

    /// The fixed primary mirror focus.
    #[must_use]
    pub fn primary_focus(&self) -> Complex {
        Complex::new(-self.base_width / 2.0 + self.focus_offset, 0.0)
    }

    /// Checks that the mechanism can physically exist.
    ///
    /// # Errors
    /// If any dimension is not positive or the piston range is empty.
    pub fn validate(&self) -> Result<(), Error> {
        let checked = [
            ("base width (A)", self.base_width),
            ("maximal piston length (B)", self.piston_max),
            ("minimal piston length", self.min_piston()),
            ("mirror width (C)", self.mirror_width),
            ("focus offset (F)", self.focus_offset),
        ];

        for (name, value) in checked {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidDimension { name, value });
            }
        }

        if self.min_piston() >= self.piston_max {
            return Err(Error::InvalidPistonRange {
                min: self.min_piston(),
                max: self.piston_max,
            });
        }

        Ok(())
    }
}

/// The complete state of the mechanism for a mirror center and a target.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pose {
    pub target: Complex,
    pub mirror_center: Complex,
    /// P: from the mirror center towards the target.
    pub pointing: Complex,
    /// L: P rotated by a quarter turn, the direction of the mirror surface.
    pub tangent: Complex,
    /// Mirror ends attached to the first and the second piston, respectively.
    pub mirror_ends: (Complex, Complex),
    /// Lengths of both pistons.
    pub pistons: (f64, f64),
    /// Direction of P, in degrees.
    pub mirror_angle: f64,
}

impl Pose {
    #[must_use]
    pub fn compute(dimensions: &Dimensions, target: Complex, center: Complex) -> Self {
        let pointing = target - center;
        let tangent = pointing.mul_i();
        let half_span = tangent.normalize_or_zero() * (dimensions.mirror_width / 2.0);

        let first = center - half_span;
        let second = center + half_span;
        let (pa1, pa2) = dimensions.anchors();

        Self {
            target,
            mirror_center: center,
            pointing,
            tangent,
            mirror_ends: (first, second),
            pistons: (distance_pt_pt(first, pa1), distance_pt_pt(second, pa2)),
            mirror_angle: pointing.arg_degrees(),
        }
    }

    /// Whether both pistons are within their stroke (with some tolerance).
    #[must_use]
    pub fn pistons_within(&self, dimensions: &Dimensions, tolerance: f64) -> bool {
        let (min, max) = (dimensions.min_piston(), dimensions.piston_max);
        let within = |len: f64| len >= min - tolerance && len <= max + tolerance;

        within(self.pistons.0) && within(self.pistons.1)
    }

    /// Whether the mirror faces upwards (the target is not below it).
    #[must_use]
    pub fn angle_within(&self) -> bool {
        (0.0..=180.0).contains(&self.mirror_angle)
    }
}
