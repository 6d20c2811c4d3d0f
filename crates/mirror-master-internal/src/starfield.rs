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

use std::f64::consts::PI;

use mirror_master_figure::Position;
use rand::Rng;


/// Tips of a drawn star.
const STAR_POINTS: usize = 5;

/// The outline of a five-pointed star, alternating between outer radius `size` and inner
/// radius `size / 2`.
#[must_use]
pub fn star_polygon(center: Position, size: f64) -> Vec<Position> {
    #[allow(clippy::cast_precision_loss)]
    let angle = 2.0 * PI / (STAR_POINTS * 2) as f64;

    (0..STAR_POINTS * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { size } else { size / 2.0 };
            #[allow(clippy::cast_precision_loss)]
            let theta = i as f64 * angle;

            Position::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

/// Background stars slowly falling down the canvas.
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Position>,
    height: f64,
}

impl StarField {
    pub fn new<R: Rng>(count: usize, width: usize, height: usize, rng: &mut R) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (width as f64, height as f64);

        Self {
            stars: (0..count)
                .map(|_| Position::new(rng.gen_range(0.0..=w), rng.gen_range(0.0..=h)))
                .collect(),
            height: h,
        }
    }

    /// Move every star down by `drift` pixels. Stars leaving the canvas reappear at the top.
    pub fn advance(&mut self, drift: f64) {
        for star in &mut self.stars {
            star.y += drift;

            if star.y > self.height {
                star.y = 0.0;
            }
        }
    }

    #[must_use]
    pub fn stars(&self) -> &[Position] {
        &self.stars
    }
}
