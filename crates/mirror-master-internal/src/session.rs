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

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use crate::config::Config;
use crate::cost::{CostBreakdown, Penalty};
use crate::engine::{Minimizer, Problem};
use crate::error::Error;
use crate::geometry::Complex;
use crate::mechanism::{Dimensions, Pose};

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::cost::Penalty;
    use crate::engine::{simplex, EngineConfig};
    use crate::geometry::Complex;

    use super::{Outcome, Session};

    #[test]
    fn tracks_a_target() {
        let mut session = Session::new(Config::default()).unwrap();
        let frame = session.step(Complex::new(-2.0, 6.5)).unwrap();

        assert_eq!(frame.index, 0);
        let solution = frame.solution.expect("reachable target");
        assert!(solution.converged);
        assert!(solution.feasible);
        assert!(solution.cost.total < 1e-4);
    }

    #[test]
    fn frames_are_numbered() {
        let mut session = Session::new(Config::default()).unwrap();

        for i in 0..3u32 {
            let frame = session.step(Complex::new(0.0, 6.0 + f64::from(i))).unwrap();
            assert_eq!(frame.index, u64::from(i));
        }
    }

    #[test]
    fn rejects_non_finite_targets() {
        let mut session = Session::new(Config::default()).unwrap();

        assert!(session.step(Complex::new(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn unconverged_solutions_are_dropped() {
        let config = Config {
            engine: EngineConfig::Simplex(simplex::Params {
                max_iterations: 1,
                ..simplex::Params::default()
            }),
            ..Config::default()
        };
        let mut session = Session::new(config).unwrap();

        // Far from the initial guess, one step is not enough.
        let frame = session.step(Complex::new(-8.0, 14.0)).unwrap();
        assert!(frame.solution.is_none());
        assert_eq!(frame.outcome, Outcome::NotConverged);

        session.set_require_convergence(false);
        let frame = session.step(Complex::new(-8.0, 14.0)).unwrap();
        let solution = frame.solution.expect("kept when convergence is optional");
        assert!(!solution.converged);
    }

    #[test]
    fn overflowing_penalty_is_reported() {
        let mut session = Session::new(Config {
            penalty: Penalty::Classic,
            ..Config::default()
        })
        .unwrap();

        // P·L overflows to inf - inf.
        let frame = session.step(Complex::new(1e300, 1e300)).unwrap();
        assert!(frame.solution.is_none());
        assert_eq!(frame.outcome, Outcome::NonFiniteCost);

        let frame = session.step(Complex::new(0.0, 6.0)).unwrap();
        assert_eq!(frame.outcome, Outcome::Solved);
    }

    #[test]
    fn warm_start_begins_at_the_last_solution() {
        let mut session = Session::new(Config {
            warm_start: true,
            ..Config::default()
        })
        .unwrap();

        assert!((session.next_start().imaginary - 3.0).abs() < 1e-12);

        let frame = session.step(Complex::new(3.0, 8.0)).unwrap();
        let center = frame.solution.unwrap().pose.mirror_center;
        assert!((session.next_start() - center).magnitude() < 1e-12);

        session.set_warm_start(false);
        assert!((session.next_start().imaginary - 3.0).abs() < 1e-12);
    }
}

/// A solved frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Solution {
    pub pose: Pose,
    pub cost: CostBreakdown,
    pub iterations: usize,
    pub converged: bool,
    /// Pistons within their stroke and the mirror facing up.
    pub feasible: bool,
}

/// How the search for a frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A mirror position was accepted.
    Solved,
    /// The engine ran out of iterations and convergence is required.
    NotConverged,
    /// The penalty evaluated to NaN or infinity, usually for absurdly distant targets.
    NonFiniteCost,
}

/// The outcome of tracking a single target.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Frame {
    pub index: u64,
    pub target: Complex,
    pub outcome: Outcome,
    /// `None` when no acceptable mirror position was found, see `outcome` for why.
    pub solution: Option<Solution>,
    pub elapsed: Duration,
}

/// Tolerance used when deciding feasibility of a solution.
const FEASIBILITY_TOLERANCE: f64 = 1e-4;

/// Tracks a moving target, solving the mechanism once per frame.
pub struct Session {
    config: Config,
    engine: Box<dyn Minimizer + Send>,
    last: Option<Complex>,
    frames: u64,
}

impl Session {
    /// # Errors
    /// If the configuration is invalid.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let engine = config.engine.build()?;

        Ok(Self {
            config,
            engine,
            last: None,
            frames: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    pub fn set_penalty(&mut self, penalty: Penalty) {
        self.config.penalty = penalty;
    }

    pub fn set_warm_start(&mut self, warm_start: bool) {
        self.config.warm_start = warm_start;
    }

    pub fn set_require_convergence(&mut self, require: bool) {
        self.config.require_convergence = require;
    }

    /// Where the next search is going to start.
    #[must_use]
    pub fn next_start(&self) -> Complex {
        match self.last {
            Some(last) if self.config.warm_start => last,
            _ => self.config.initial_guess,
        }
    }

    /// Solve the mechanism for one target.
    ///
    /// # Errors
    /// If the target is not finite. Failing to find a good pose is not an error, the
    /// frame just has no solution and its [`Outcome`] tells why.
    pub fn step(&mut self, target: Complex) -> Result<Frame, Error> {
        if !target.is_finite() {
            return Err(Error::NonFiniteTarget(target));
        }

        let start = Instant::now();
        let index = self.frames;
        self.frames += 1;

        let dimensions = self.config.dimensions;
        let problem = Problem::new(&dimensions, self.config.penalty, target, self.config.bounds);
        let search_start = self.next_start();

        let (outcome, solution) = match self.engine.minimize(&problem, search_start) {
            Ok(minimum) if minimum.converged || !self.config.require_convergence => {
                let pose = Pose::compute(&dimensions, target, minimum.position);
                let cost = problem.breakdown(minimum.position);

                self.last = Some(minimum.position);

                let solution = Solution {
                    pose,
                    cost,
                    iterations: minimum.iterations,
                    converged: minimum.converged,
                    feasible: pose.pistons_within(&dimensions, FEASIBILITY_TOLERANCE)
                        && pose.angle_within(),
                };

                (Outcome::Solved, Some(solution))
            }
            Ok(minimum) => {
                debug!(
                    "frame {index}: no convergence for target {target:.3} after {} iterations",
                    minimum.iterations
                );
                (Outcome::NotConverged, None)
            }
            Err(err) => {
                warn!("frame {index}: {err}");
                (Outcome::NonFiniteCost, None)
            }
        };

        let elapsed = start.elapsed();

        if let Some(solution) = &solution {
            debug!(
                "frame {index}: target {target:.3} -> mirror {:.3}, pistons ({:.3}, {:.3}), angle {:.1}, cost {:.2e} in {elapsed:?}",
                solution.pose.mirror_center,
                solution.pose.pistons.0,
                solution.pose.pistons.1,
                solution.pose.mirror_angle,
                solution.cost.total,
            );
        }

        Ok(Frame {
            index,
            target,
            outcome,
            solution,
            elapsed,
        })
    }
}
