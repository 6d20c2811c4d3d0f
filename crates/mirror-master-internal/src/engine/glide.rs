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

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::Complex;

use super::{Minimizer, Minimum, Problem};

#[cfg(test)]
mod tests {
    use crate::cost::Penalty;
    use crate::engine::{Bounds, Minimizer, Problem};
    use crate::geometry::Complex;
    use crate::mechanism::{Dimensions, Pose};

    use super::{Glide, Params};

    #[test]
    fn aligns_with_the_focus() {
        let dims = Dimensions::default();
        let target = Complex::new(0.0, 6.0);
        let problem = Problem::new(&dims, Penalty::FocusAligned, target, Bounds::default());
        let mut glide = Glide::new(Params::default()).unwrap();

        let minimum = glide.minimize(&problem, Complex::new(0.0, 3.0)).unwrap();
        let pose = Pose::compute(&dims, target, minimum.position);

        assert!(minimum.converged);
        assert!(minimum.cost < 1e-4, "cost {}", minimum.cost);
        assert!(pose.pistons_within(&dims, 1e-4));
    }

    #[test]
    fn already_optimal_start_is_kept() {
        let dims = Dimensions::default();
        let problem = Problem::new(&dims, Penalty::Classic, Complex::new(0.0, 6.0), Bounds::default());
        let mut glide = Glide::new(Params::default()).unwrap();

        let minimum = glide.minimize(&problem, Complex::new(0.0, 3.0)).unwrap();

        assert!(minimum.converged);
        assert_eq!(minimum.iterations, 0);
        assert!((minimum.position.imaginary - 3.0).abs() < 1e-12);
    }

    #[test]
    fn pulls_pistons_back_into_range() {
        let dims = Dimensions::default();
        let target = Complex::new(0.0, 12.0);
        let problem = Problem::new(&dims, Penalty::Classic, target, Bounds::default());
        let mut glide = Glide::new(Params::default()).unwrap();

        // Pistons are ~7.6 long when the mirror sits this high.
        let minimum = glide.minimize(&problem, Complex::new(0.0, 7.0)).unwrap();
        let pose = Pose::compute(&dims, target, minimum.position);

        assert!(minimum.cost < 1e-4, "cost {}", minimum.cost);
        assert!(pose.pistons_within(&dims, 1e-4));
    }

    #[test]
    fn stays_within_bounds() {
        let dims = Dimensions::default();
        let bounds = Bounds {
            x: (-1.0, 1.0),
            y: (9.0, 10.0),
        };
        let target = Complex::new(0.0, 14.0);
        let problem = Problem::new(&dims, Penalty::Classic, target, bounds);
        let mut glide = Glide::new(Params::default()).unwrap();

        let minimum = glide.minimize(&problem, Complex::new(5.0, 5.0)).unwrap();

        assert!(bounds.contains(minimum.position));
        // Pistons can't shrink to 5 from this high, the best is the floor of the box.
        assert!(minimum.cost > 0.1);
        assert!((minimum.position.imaginary - 9.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_nonsense_parameters() {
        let params = Params {
            shrink: 1.5,
            ..Params::default()
        };

        assert!(Glide::new(params).is_err());
    }
}

/// Parameters of the gradient descent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Maximal count of descent steps.
    pub max_iterations: usize,
    /// Length of the first trial step.
    pub initial_step: f64,
    /// Trial steps never grow past this.
    pub max_step: f64,
    /// Line search gives up below this step length.
    pub min_step: f64,
    /// Factor applied to the trial step after a rejected step.
    pub shrink: f64,
    /// Factor applied to the trial step after an accepted step.
    pub grow: f64,
    /// Sufficient decrease constant of the Armijo condition.
    pub armijo: f64,
    /// Costs below this are considered optimal.
    pub cost_tolerance: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            initial_step: 0.5,
            max_step: 4.0,
            min_step: 1e-12,
            shrink: 0.5,
            grow: 2.0,
            armijo: 1e-4,
            cost_tolerance: 1e-9,
        }
    }
}

/// Projected gradient descent with a backtracking line search.
#[derive(Debug, Clone)]
pub struct Glide {
    params: Params,
}

impl Glide {
    /// # Errors
    /// If the parameters can't drive a descent.
    pub fn new(params: Params) -> Result<Self, Error> {
        let checks = [
            ("initial_step", params.initial_step, params.initial_step > 0.0),
            ("max_step", params.max_step, params.max_step >= params.initial_step),
            ("min_step", params.min_step, params.min_step > 0.0),
            ("shrink", params.shrink, params.shrink > 0.0 && params.shrink < 1.0),
            ("grow", params.grow, params.grow >= 1.0),
            ("armijo", params.armijo, params.armijo > 0.0 && params.armijo < 1.0),
            ("cost_tolerance", params.cost_tolerance, params.cost_tolerance >= 0.0),
        ];

        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(Error::InvalidEngineParameter { name, value });
            }
        }

        Ok(Self { params })
    }

    /// One backtracking line search along the negative gradient.
    ///
    /// Returns the accepted point, its cost and the accepted step, or `None` when no step
    /// longer than `min_step` decreases the cost enough.
    fn line_search(
        &self,
        problem: &Problem,
        position: Complex,
        cost: f64,
        gradient: Complex,
        mut step: f64,
    ) -> Result<Option<(Complex, f64, f64)>, Error> {
        while step >= self.params.min_step {
            let candidate = problem.bounds.clamp(position - gradient * step);
            let moved = (candidate - position).magnitude();

            if moved > 0.0 {
                let candidate_cost = problem.checked_cost(candidate)?;

                if candidate_cost <= cost - self.params.armijo * moved * moved / step {
                    return Ok(Some((candidate, candidate_cost, step)));
                }
            }

            step *= self.params.shrink;
        }

        Ok(None)
    }
}

impl Minimizer for Glide {
    fn minimize(&mut self, problem: &Problem, start: Complex) -> Result<Minimum, Error> {
        let mut position = problem.bounds.clamp(start);
        let mut cost = problem.checked_cost(position)?;
        let mut step = self.params.initial_step;

        for iteration in 0..self.params.max_iterations {
            if cost <= self.params.cost_tolerance {
                return Ok(Minimum {
                    position,
                    cost,
                    iterations: iteration,
                    converged: true,
                });
            }

            let gradient = problem.gradient(position);
            if !gradient.is_finite() {
                return Err(Error::NonFiniteCost { at: position });
            }

            let Some((next, next_cost, accepted)) =
                self.line_search(problem, position, cost, gradient, step)?
            else {
                // No descent direction left: a (possibly constrained) stationary point.
                trace!("glide: stationary at {position:.6} after {iteration} iterations, cost {cost:.3e}");
                return Ok(Minimum {
                    position,
                    cost,
                    iterations: iteration,
                    converged: true,
                });
            };

            trace!("glide: #{iteration} {position:.6} -> {next:.6}, cost {next_cost:.3e}");

            position = next;
            cost = next_cost;
            step = (accepted * self.params.grow).min(self.params.max_step);
        }

        Ok(Minimum {
            position,
            cost,
            iterations: self.params.max_iterations,
            converged: cost <= self.params.cost_tolerance,
        })
    }
}
