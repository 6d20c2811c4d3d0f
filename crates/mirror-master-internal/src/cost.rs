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

//! Penalty functions rating a mirror center for a given target. Zero means the pose is
//! acceptable, everything above is a violation of some requirement.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance_pt_ln, distance_pt_pt, get_line, Complex};
use crate::mechanism::{Dimensions, Pose};

#[cfg(test)]
mod tests {
    use crate::geometry::Complex;
    use crate::mechanism::Dimensions;

    use super::{evaluate, piston_penalty, Penalty};

    #[test]
    fn piston_penalty_is_a_band() {
        assert!(piston_penalty(3.0, 2.5, 5.0).abs() < 1e-12);
        assert!((piston_penalty(6.0, 2.5, 5.0) - 1.0).abs() < 1e-12);
        assert!((piston_penalty(2.0, 2.5, 5.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn classic_accepts_any_reachable_center() {
        let dims = Dimensions::default();
        let cost = evaluate(
            Penalty::Classic,
            &dims,
            Complex::new(0.0, 6.0),
            Complex::new(0.0, 3.0),
        );

        assert!(cost.total < 1e-9);
        assert!(cost.alignment < 1e-9);
    }

    #[test]
    fn focus_alignment_is_a_line_distance() {
        let dims = Dimensions::default();
        // Pointing straight up from (0, 3), focus at (1, 0): one unit off the line.
        let cost = evaluate(
            Penalty::FocusAligned,
            &dims,
            Complex::new(0.0, 6.0),
            Complex::new(0.0, 3.0),
        );

        assert!((cost.alignment - 1.0).abs() < 1e-9);
        assert!(cost.piston_length.abs() < 1e-12);
        assert!(cost.angle.abs() < 1e-12);
        assert!((cost.total - 1.0).abs() < 1e-9);

        // Center on the segment from the focus to the target.
        let aligned = evaluate(
            Penalty::FocusAligned,
            &dims,
            Complex::new(0.0, 6.0),
            Complex::new(0.5, 3.0),
        );
        assert!(aligned.total < 1e-9);
    }

    #[test]
    fn target_below_mirror_is_penalized() {
        let dims = Dimensions::default();
        let cost = evaluate(
            Penalty::FocusAligned,
            &dims,
            Complex::new(1.0, 1.0),
            Complex::new(1.0, 4.0),
        );

        // Angle is -90 degrees, 180 away from straight up.
        assert!((cost.angle - 180.0).abs() < 1e-9);
    }
}

/// Which requirements a mirror center is rated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    /// Perpendicularity of the mirror and piston stroke only.
    Classic,
    /// Additionally require the pointing line to pass through the primary focus.
    #[default]
    FocusAligned,
}

impl Penalty {
    /// The other model.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Classic => Self::FocusAligned,
            Self::FocusAligned => Self::Classic,
        }
    }
}

/// Individual terms of a penalty evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CostBreakdown {
    /// Perpendicularity (classic) or focus alignment (focus aligned).
    pub alignment: f64,
    pub piston_length: f64,
    pub angle: f64,
    pub total: f64,
}

/// Distance of a piston length from the allowed stroke.
#[must_use]
pub fn piston_penalty(length: f64, min: f64, max: f64) -> f64 {
    if length > max {
        length - max
    } else if length < min {
        min - length
    } else {
        0.0
    }
}

/// Rate a mirror center.
#[must_use]
pub fn evaluate(
    model: Penalty,
    dimensions: &Dimensions,
    target: Complex,
    center: Complex,
) -> CostBreakdown {
    let pose = Pose::compute(dimensions, target, center);
    evaluate_pose(model, dimensions, &pose)
}

/// Rate an already computed pose.
#[must_use]
pub fn evaluate_pose(model: Penalty, dimensions: &Dimensions, pose: &Pose) -> CostBreakdown {
    let (min, max) = (dimensions.min_piston(), dimensions.piston_max);
    let piston_length =
        piston_penalty(pose.pistons.0, min, max) + piston_penalty(pose.pistons.1, min, max);

    let (alignment, angle) = match model {
        Penalty::Classic => (
            pose.pointing.dot(pose.tangent).abs(),
            (pose.mirror_angle.abs() - 180.0).max(0.0),
        ),
        Penalty::FocusAligned => {
            let focus = dimensions.primary_focus();
            let sight = get_line(pose.mirror_center, pose.target);

            // Target on top of the mirror: no pointing direction to speak of.
            let alignment = if sight.direction == Complex::zero() {
                distance_pt_pt(focus, pose.mirror_center)
            } else {
                distance_pt_ln(focus, sight)
            };

            let angle = if pose.angle_within() {
                0.0
            } else {
                (pose.mirror_angle - 90.0).abs()
            };

            (alignment, angle)
        }
    };

    CostBreakdown {
        alignment,
        piston_length,
        angle,
        total: alignment + piston_length + angle,
    }
}
