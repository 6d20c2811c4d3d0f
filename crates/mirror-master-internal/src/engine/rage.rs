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

use std::f64::consts::TAU;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::Complex;

use super::{Minimizer, Minimum, Problem, QualityRecord};

#[cfg(test)]
mod tests {
    use crate::cost::Penalty;
    use crate::engine::{Bounds, Minimizer, Problem};
    use crate::geometry::Complex;
    use crate::mechanism::Dimensions;

    use super::{Params, Rage};

    fn seeded() -> Params {
        Params {
            seed: Some(7),
            ..Params::default()
        }
    }

    #[test]
    fn magnitudes_are_evenly_spread() {
        let rage = Rage::new(Params {
            samples: 4,
            max_adjustment: 2.0,
            ..seeded()
        })
        .unwrap();

        let magnitudes = rage.bake_magnitudes();
        assert_eq!(magnitudes.len(), 4);
        assert!((magnitudes[0] - 0.5).abs() < 1e-12);
        assert!((magnitudes[3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn finds_an_aligned_center() {
        let dims = Dimensions::default();
        let problem = Problem::new(&dims, Penalty::FocusAligned, Complex::new(0.0, 6.0), Bounds::default());
        let mut rage = Rage::new(seeded()).unwrap();

        let minimum = rage.minimize(&problem, Complex::new(0.0, 3.0)).unwrap();

        assert!(minimum.cost < 1e-2, "cost {}", minimum.cost);
        assert!(Bounds::default().contains(minimum.position));
    }

    #[test]
    fn never_gets_worse() {
        let dims = Dimensions::default();
        let problem = Problem::new(&dims, Penalty::FocusAligned, Complex::new(-4.0, 9.0), Bounds::default());
        let start = Complex::new(0.0, 3.0);
        let initial = problem.cost(start);
        let mut rage = Rage::new(Params {
            max_cycles: 5,
            ..seeded()
        })
        .unwrap();

        let minimum = rage.minimize(&problem, start).unwrap();

        assert!(minimum.cost <= initial);
    }

    #[test]
    fn rejects_empty_sampling() {
        assert!(Rage::new(Params {
            samples: 0,
            ..Params::default()
        })
        .is_err());
    }
}

/// Parameters of the random adjustment search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Candidates tried per cycle.
    pub samples: usize,
    /// Maximal adjustment of the mirror center in a single cycle.
    pub max_adjustment: f64,
    /// The count of last quality deltas to include in mean calculation.
    pub mean_count: usize,
    /// The search stops once the mean quality delta drops to this.
    pub max_mean_delta: f64,
    /// Hard limit of cycles.
    pub max_cycles: usize,
    /// Costs below this are considered optimal.
    pub cost_tolerance: f64,
    /// Seed of the random generator. Entropy-seeded when missing.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            samples: 16,
            max_adjustment: 1.0,
            mean_count: 64,
            max_mean_delta: 1e-6,
            max_cycles: 5000,
            cost_tolerance: 1e-9,
            seed: None,
        }
    }
}

/// Random search: every cycle adjusts the mirror center in random directions by
/// magnitudes proportional to how bad the current center is, and keeps the best.
#[derive(Debug, Clone)]
pub struct Rage {
    params: Params,
    rng: StdRng,
}

impl Rage {
    /// # Errors
    /// If the parameters can't drive a search.
    pub fn new(params: Params) -> Result<Self, Error> {
        #[allow(clippy::cast_precision_loss)]
        let checks = [
            ("samples", params.samples as f64, params.samples > 0),
            ("max_adjustment", params.max_adjustment, params.max_adjustment > 0.0),
            ("mean_count", params.mean_count as f64, params.mean_count > 0),
            ("max_mean_delta", params.max_mean_delta, params.max_mean_delta >= 0.0),
            ("cost_tolerance", params.cost_tolerance, params.cost_tolerance >= 0.0),
        ];

        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(Error::InvalidEngineParameter { name, value });
            }
        }

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { params, rng })
    }

    /// Magnitudes tried in every cycle, evenly spread up to `max_adjustment`.
    #[must_use]
    pub fn bake_magnitudes(&self) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        let step = self.params.max_adjustment / self.params.samples as f64;

        (1..=self.params.samples)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let i = i as f64;
                step * i
            })
            .collect()
    }

    /// Performs an adjustment in a random direction.
    fn adjust(&mut self, position: Complex, magnitude: f64, error: f64) -> Complex {
        let direction = self.rng.gen::<f64>() * TAU;
        let unit = Complex::new(direction.cos(), direction.sin());

        position + unit * (magnitude * error)
    }
}

impl Minimizer for Rage {
    fn minimize(&mut self, problem: &Problem, start: Complex) -> Result<Minimum, Error> {
        let magnitudes = self.bake_magnitudes();
        let mut record = QualityRecord::new(self.params.mean_count, self.params.max_mean_delta);

        let mut position = problem.bounds.clamp(start);
        let mut cost = problem.checked_cost(position)?;

        for cycle in 0..self.params.max_cycles {
            if cost <= self.params.cost_tolerance {
                return Ok(Minimum {
                    position,
                    cost,
                    iterations: cycle,
                    converged: true,
                });
            }

            // Quality is in (0, 1], the error is what's left of it.
            let error = 1.0 - (-cost).exp();
            let mut best = (position, cost);

            for &magnitude in &magnitudes {
                let candidate = problem.bounds.clamp(self.adjust(position, magnitude, error));
                let candidate_cost = problem.checked_cost(candidate)?;

                if candidate_cost < best.1 {
                    best = (candidate, candidate_cost);
                }
            }

            (position, cost) = best;

            if record.record((-cost).exp()) {
                trace!("rage: stagnated at {position:.6} after {cycle} cycles, cost {cost:.3e}");
                return Ok(Minimum {
                    position,
                    cost,
                    iterations: cycle + 1,
                    converged: true,
                });
            }
        }

        Ok(Minimum {
            position,
            cost,
            iterations: self.params.max_cycles,
            converged: cost <= self.params.cost_tolerance,
        })
    }
}
