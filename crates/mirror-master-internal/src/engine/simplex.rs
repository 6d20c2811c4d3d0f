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


/// Parameters of the simplex search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub max_iterations: usize,
    /// Edge length of the initial simplex.
    pub initial_size: f64,
    /// The search stops once the simplex is smaller than this.
    pub size_tolerance: f64,
    /// Costs below this are considered optimal.
    pub cost_tolerance: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            initial_size: 0.5,
            size_tolerance: 1e-10,
            cost_tolerance: 1e-9,
        }
    }
}

/// A vertex of the simplex with its cost.
type Vertex = (Complex, f64);

/// Nelder-Mead downhill simplex. Needs no gradient, which makes it comfortable with the
/// kinks of the penalty functions. Trial points are clamped into the bounds.
#[derive(Debug, Clone)]
pub struct Simplex {
    params: Params,
}

impl Simplex {
    /// # Errors
    /// If the parameters can't drive a search.
    pub fn new(params: Params) -> Result<Self, Error> {
        let checks = [
            ("initial_size", params.initial_size, params.initial_size > 0.0),
            ("size_tolerance", params.size_tolerance, params.size_tolerance >= 0.0),
            ("cost_tolerance", params.cost_tolerance, params.cost_tolerance >= 0.0),
        ];

        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(Error::InvalidEngineParameter { name, value });
            }
        }

        Ok(Self { params })
    }

    /// The start point and one step along each axis. Steps that would leave the bounds go
    /// the other way instead.
    fn initial(&self, problem: &Problem, start: Complex) -> [Vertex; 3] {
        let origin = problem.bounds.clamp(start);
        let size = self.params.initial_size;

        let step = |delta: Complex| {
            let forward = problem.bounds.clamp(origin + delta);

            if forward == origin {
                problem.bounds.clamp(origin - delta)
            } else {
                forward
            }
        };

        let vertex = |p: Complex| (p, problem.cost(p));

        [
            vertex(origin),
            vertex(step(Complex::new(size, 0.0))),
            vertex(step(Complex::new(0.0, size))),
        ]
    }
}

impl Minimizer for Simplex {
    fn minimize(&mut self, problem: &Problem, start: Complex) -> Result<Minimum, Error> {
        let mut vertices = self.initial(problem, start);
        let trial = |p: Complex| -> Result<Vertex, Error> {
            let p = problem.bounds.clamp(p);
            Ok((p, problem.checked_cost(p)?))
        };

        for (p, _) in &vertices {
            problem.checked_cost(*p)?;
        }

        for iteration in 0..self.params.max_iterations {
            vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
            let [best, good, worst] = vertices;

            let size = f64::max((good.0 - best.0).magnitude(), (worst.0 - best.0).magnitude());
            if best.1 <= self.params.cost_tolerance || size < self.params.size_tolerance {
                return Ok(Minimum {
                    position: best.0,
                    cost: best.1,
                    iterations: iteration,
                    converged: true,
                });
            }

            let centroid = (best.0 + good.0) / 2.0;
            let reflected = trial(centroid + (centroid - worst.0))?;

            if reflected.1 < best.1 {
                let expanded = trial(centroid + (centroid - worst.0) * 2.0)?;
                vertices[2] = if expanded.1 < reflected.1 {
                    expanded
                } else {
                    reflected
                };
            } else if reflected.1 < good.1 {
                vertices[2] = reflected;
            } else {
                let contracted = if reflected.1 < worst.1 {
                    trial(centroid + (reflected.0 - centroid) * 0.5)?
                } else {
                    trial(centroid + (worst.0 - centroid) * 0.5)?
                };

                if contracted.1 < f64::min(reflected.1, worst.1) {
                    vertices[2] = contracted;
                } else {
                    // Shrink towards the best vertex. Midpoints of in-bounds points stay in bounds.
                    for vertex in &mut vertices[1..] {
                        let p = (best.0 + vertex.0) / 2.0;
                        *vertex = (p, problem.checked_cost(p)?);
                    }
                }
            }

            trace!("simplex: #{iteration} best {:.6}, cost {:.3e}", best.0, best.1);
        }

        vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (position, cost) = vertices[0];

        Ok(Minimum {
            position,
            cost,
            iterations: self.params.max_iterations,
            converged: cost <= self.params.cost_tolerance,
        })
    }
}
