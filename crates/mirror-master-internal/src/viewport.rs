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

use mirror_master_figure::Position;
use serde::{Deserialize, Serialize};

use crate::geometry::Complex;

#[cfg(test)]
mod tests {
    use mirror_master_figure::Position;

    use crate::geometry::Complex;

    use super::Viewport;

    #[test]
    fn pointer_mapping_puts_the_base_at_the_bottom() {
        let viewport = Viewport::pointer_default();
        let world = viewport.to_world(Position::new(400.0, 360.0));

        assert!(world.real.abs() < 1e-12);
        assert!((world.imaginary - 6.0).abs() < 1e-12);
    }

    #[test]
    fn screen_and_world_agree() {
        let viewport = Viewport::fit(800, 600, Complex::new(-10.0, -2.0), Complex::new(10.0, 15.0), 0.0);
        let p = Complex::new(-2.0, 6.5);
        let back = viewport.to_world(viewport.to_screen(p));

        assert!((back - p).magnitude() < 1e-9);
    }

    #[test]
    fn fitted_view_keeps_axes_equal_and_centered() {
        let viewport = Viewport::fit(800, 600, Complex::new(-10.0, -2.0), Complex::new(10.0, 15.0), 0.0);

        assert!((viewport.scale.0 - viewport.scale.1).abs() < 1e-12);
        // Height is the limiting dimension: 600 / 17 pixels per unit.
        assert!((viewport.scale.0 - 600.0 / 17.0).abs() < 1e-9);
        let center = viewport.to_screen(Complex::new(0.0, 6.5));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }
}

/// Maps the mechanism's plane (y up) onto a canvas (pixels, y down) and back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// Where the world origin lands on the canvas.
    pub origin: (f64, f64),
    /// Pixels per world unit, horizontally and vertically.
    pub scale: (f64, f64),
}

impl Viewport {
    #[must_use]
    pub fn new(width: usize, height: usize, origin: (f64, f64), scale: (f64, f64)) -> Self {
        Self {
            width,
            height,
            origin,
            scale,
        }
    }

    /// The 800x600 interactive window: the base sits at the bottom
    /// edge, 100 pixels per unit horizontally and 40 vertically.
    #[must_use]
    pub fn pointer_default() -> Self {
        Self::new(800, 600, (400.0, 600.0), (100.0, 40.0))
    }

    /// Fit a world rectangle into the canvas with equal axis scales, leaving a relative
    /// `margin` on every side.
    #[must_use]
    pub fn fit(width: usize, height: usize, min: Complex, max: Complex, margin: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (width as f64, height as f64);
        let usable = 1.0 - 2.0 * margin;
        let span = max - min;

        let scale = f64::min(w * usable / span.real, h * usable / span.imaginary);
        let middle = (min + max) / 2.0;

        Self::new(
            width,
            height,
            (w / 2.0 - middle.real * scale, h / 2.0 + middle.imaginary * scale),
            (scale, scale),
        )
    }

    #[must_use]
    pub fn to_screen(&self, point: Complex) -> Position {
        Position::new(
            self.origin.0 + point.real * self.scale.0,
            self.origin.1 - point.imaginary * self.scale.1,
        )
    }

    #[must_use]
    pub fn to_world(&self, position: Position) -> Complex {
        Complex::new(
            (position.x - self.origin.0) / self.scale.0,
            (self.origin.1 - position.y) / self.scale.1,
        )
    }
}
