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

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cost::{self, CostBreakdown, Penalty};
use crate::error::Error;
use crate::geometry::Complex;
use crate::mechanism::Dimensions;

/// Gradient-Led Iterative Descent Engine
pub mod glide;

/// Random Adjustment Generation Engine - the mirror center is randomly adjusted before rating its cost.
pub mod rage;

/// Nelder-Mead downhill simplex.
pub mod simplex;

pub use glide::Glide;
pub use rage::Rage;
pub use simplex::Simplex;

#[cfg(test)]
mod tests {
    use crate::cost::Penalty;
    use crate::geometry::Complex;
    use crate::mechanism::Dimensions;

    use super::{Bounds, Problem, QualityRecord};

    #[test]
    fn bounds_clamp() {
        let bounds = Bounds::default();
        let p = bounds.clamp(Complex::new(12.0, -1.0));

        assert!((p.real - 10.0).abs() < 1e-12);
        assert!(p.imaginary.abs() < 1e-12);
        assert!(bounds.contains(p));
        assert!(!bounds.contains(Complex::new(0.0, 15.5)));
    }

    #[test]
    fn gradient_points_uphill() {
        let dims = Dimensions::default();
        let problem = Problem::new(&dims, Penalty::FocusAligned, Complex::new(0.0, 6.0), Bounds::default());

        // Moving right from (0, 3) brings the pointing line towards the focus at (1, 0).
        let gradient = problem.gradient(Complex::new(0.0, 3.0));
        assert!(gradient.real < 0.0);
    }

    #[test]
    fn quality_record_detects_stagnation() {
        let mut record = QualityRecord::new(4, 0.01);

        assert!(!record.record(0.5));
        assert!(!record.record(0.9));
        assert!(!record.record(0.9));
        assert!(!record.record(0.9));
        // Deltas in the window: 0.4, 0.0, 0.0, 0.0
        assert!(!record.record(0.9));
        // Deltas in the window: 0.0, 0.0, 0.0, 0.0
        assert!(record.record(0.9));
    }
}

/// Box constraints on the mirror center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x: (-10.0, 10.0),
            y: (0.0, 15.0),
        }
    }
}

impl Bounds {
    /// # Errors
    /// If the bounds are empty or not finite.
    pub fn validate(&self) -> Result<(), Error> {
        let ok = |(lo, hi): (f64, f64)| lo.is_finite() && hi.is_finite() && lo < hi;

        if ok(self.x) && ok(self.y) {
            Ok(())
        } else {
            Err(Error::InvalidBounds)
        }
    }

    #[must_use]
    pub fn clamp(&self, point: Complex) -> Complex {
        Complex::new(
            point.real.clamp(self.x.0, self.x.1),
            point.imaginary.clamp(self.y.0, self.y.1),
        )
    }

    #[must_use]
    pub fn contains(&self, point: Complex) -> bool {
        (self.x.0..=self.x.1).contains(&point.real)
            && (self.y.0..=self.y.1).contains(&point.imaginary)
    }
}

/// A single minimization task: where should the mirror center be for this target?
#[derive(Debug, Clone, Copy)]
pub struct Problem<'r> {
    pub dimensions: &'r Dimensions,
    pub penalty: Penalty,
    pub target: Complex,
    pub bounds: Bounds,
}

/// Finite difference step used for gradient estimation.
const GRADIENT_STEP: f64 = 1e-6;

impl<'r> Problem<'r> {
    #[must_use]
    pub fn new(dimensions: &'r Dimensions, penalty: Penalty, target: Complex, bounds: Bounds) -> Self {
        Self {
            dimensions,
            penalty,
            target,
            bounds,
        }
    }

    #[must_use]
    pub fn breakdown(&self, center: Complex) -> CostBreakdown {
        cost::evaluate(self.penalty, self.dimensions, self.target, center)
    }

    #[must_use]
    pub fn cost(&self, center: Complex) -> f64 {
        self.breakdown(center).total
    }

    /// Cost that refuses to be NaN or infinite.
    ///
    /// # Errors
    /// If the penalty is not finite at `center`.
    pub fn checked_cost(&self, center: Complex) -> Result<f64, Error> {
        let cost = self.cost(center);

        if cost.is_finite() {
            Ok(cost)
        } else {
            Err(Error::NonFiniteCost { at: center })
        }
    }

    /// Central difference estimate of the cost gradient.
    #[must_use]
    pub fn gradient(&self, center: Complex) -> Complex {
        let dx = Complex::new(GRADIENT_STEP, 0.0);
        let dy = Complex::new(0.0, GRADIENT_STEP);

        Complex::new(
            (self.cost(center + dx) - self.cost(center - dx)) / (2.0 * GRADIENT_STEP),
            (self.cost(center + dy) - self.cost(center - dy)) / (2.0 * GRADIENT_STEP),
        )
    }
}

/// Outcome of a minimization.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Minimum {
    pub position: Complex,
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Anything that can minimize a [`Problem`].
pub trait Minimizer {
    /// Find the best mirror center, starting the search at `start`.
    ///
    /// The returned position always lies within the problem's bounds.
    ///
    /// # Errors
    /// If the penalty can't be evaluated.
    fn minimize(&mut self, problem: &Problem, start: Complex) -> Result<Minimum, Error>;
}

/// Engine selection, as found in configuration files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineConfig {
    Simplex(simplex::Params),
    Glide(glide::Params),
    Rage(rage::Params),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::Simplex(simplex::Params::default())
    }
}

impl EngineConfig {
    /// Instantiate the configured engine.
    ///
    /// # Errors
    /// If the engine parameters are invalid.
    pub fn build(&self) -> Result<Box<dyn Minimizer + Send>, Error> {
        Ok(match self {
            Self::Simplex(params) => Box::new(Simplex::new(*params)?),
            Self::Glide(params) => Box::new(Glide::new(*params)?),
            Self::Rage(params) => Box::new(Rage::new(*params)?),
        })
    }
}

/// Helper struct for managing mean quality of last `n` qualities.
///
/// Detects if the sum of last `entry_count` quality deltas drops below `limit`.
pub(crate) struct QualityRecord {
    queue: VecDeque<f64>,
    entry_count: usize,
    sum: f64,
    limit: f64,
    quality: f64,
}

impl QualityRecord {
    #[must_use]
    pub fn new(entry_count: usize, limit: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        Self {
            queue: VecDeque::with_capacity(entry_count),
            entry_count,
            sum: 0.0,
            limit: limit * entry_count as f64,
            quality: 0.0,
        }
    }

    /// Returns whether after pushing the quality the search should be stopped.
    pub fn record(&mut self, quality: f64) -> bool {
        if self.queue.len() >= self.entry_count {
            let q = self.queue.pop_front().unwrap_or_default();
            self.sum -= q;
        }

        let delta = quality - self.quality;
        self.sum += delta;
        self.queue.push_back(delta);
        self.quality = quality;

        self.queue.len() >= self.entry_count && self.sum <= self.limit
    }
}
