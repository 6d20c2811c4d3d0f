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

//! Turns a solved frame into a [`Figure`] any renderer can draw.

use mirror_master_figure::{
    CircleItem, Color, Figure, Item, Label, PointItem, PolygonItem, Position, Style, TextItem,
    TwoPointItem,
};

use crate::geometry::Complex;
use crate::mechanism::Dimensions;
use crate::session::{Frame, Outcome};
use crate::starfield::{star_polygon, StarField};
use crate::viewport::Viewport;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mirror_master_figure::Item;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::Config;
    use crate::geometry::Complex;
    use crate::mechanism::Dimensions;
    use crate::session::{Frame, Outcome, Session};
    use crate::starfield::StarField;
    use crate::viewport::Viewport;

    use super::{hud_lines, project};

    fn count(items: &[Item], pred: fn(&Item) -> bool) -> usize {
        items.iter().filter(|i| pred(i)).count()
    }

    #[test]
    fn solved_frame_shows_the_mechanism() {
        let mut session = Session::new(Config::default()).unwrap();
        let frame = session.step(Complex::new(0.0, 6.0)).unwrap();
        let figure = project(&frame, session.dimensions(), &Viewport::pointer_default(), None);

        // Base, two pistons and the mirror.
        assert_eq!(count(&figure.items, |i| matches!(i, Item::Segment(_))), 4);
        // P and L.
        assert_eq!(count(&figure.items, |i| matches!(i, Item::Arrow(_))), 2);
        // Only the target star.
        assert_eq!(count(&figure.items, |i| matches!(i, Item::Polygon(_))), 1);
    }

    #[test]
    fn unsolved_frame_shows_only_the_base() {
        let frame = Frame {
            index: 3,
            target: Complex::new(1.0, 2.0),
            outcome: Outcome::NotConverged,
            solution: None,
            elapsed: Duration::ZERO,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let stars = StarField::new(10, 800, 600, &mut rng);
        let figure = project(&frame, &Dimensions::default(), &Viewport::pointer_default(), Some(&stars));

        assert_eq!(count(&figure.items, |i| matches!(i, Item::Segment(_))), 1);
        assert_eq!(count(&figure.items, |i| matches!(i, Item::Arrow(_))), 0);
        assert_eq!(count(&figure.items, |i| matches!(i, Item::Polygon(_))), 11);
        assert!(hud_lines(&frame, &Dimensions::default())
            .iter()
            .any(|l| l == "no solution (no convergence)"));
    }

    #[test]
    fn hud_reports_pistons_and_angle() {
        let mut session = Session::new(Config::default()).unwrap();
        let frame = session.step(Complex::new(0.0, 6.0)).unwrap();
        let lines = hud_lines(&frame, session.dimensions());

        assert!(lines[0].starts_with("A: 4.00, B: 5.00, C: 2.00"));
        assert!(lines.iter().any(|l| l.contains("piston 1:")));
        assert!(lines.iter().any(|l| l.contains("angle:")));
    }
}

/// Outer radius of background stars, in pixels.
pub const STAR_SIZE: f64 = 4.0;
/// Font size of the heads-up text.
const HUD_FONT: f64 = 16.0;
/// Distance of a label from its point.
const LABEL_OFFSET: f64 = 12.0;

fn label(position: Position, content: &str) -> Option<Label> {
    Some(Label {
        position: Position::new(position.x, position.y - LABEL_OFFSET),
        content: content.to_string(),
    })
}

fn point(position: Position, color: Color, name: &str) -> Item {
    Item::Point(PointItem {
        position,
        color,
        label: label(position, name),
    })
}

fn segment(points: (Position, Position), style: Style, color: Color) -> Item {
    Item::Segment(TwoPointItem::new(points, style, color))
}

/// Heads-up lines: mechanism dimensions, then the pose (or why there is none).
#[must_use]
pub fn hud_lines(frame: &Frame, dimensions: &Dimensions) -> Vec<String> {
    let mut lines = vec![format!(
        "A: {:.2}, B: {:.2}, C: {:.2}, F: {:.2}",
        dimensions.base_width, dimensions.piston_max, dimensions.mirror_width, dimensions.focus_offset
    )];

    lines.push(format!("target: {:.2}", frame.target));

    match &frame.solution {
        Some(solution) => {
            let pose = &solution.pose;
            lines.push(format!(
                "x: {:.2}, y: {:.2}",
                pose.mirror_center.real, pose.mirror_center.imaginary
            ));
            lines.push(format!(
                "piston 1: {:.2}, piston 2: {:.2} (range {:.2} - {:.2})",
                pose.pistons.0,
                pose.pistons.1,
                dimensions.min_piston(),
                dimensions.piston_max
            ));
            lines.push(format!(
                "angle: {:.1} deg, cost: {:.2e}{}",
                pose.mirror_angle,
                solution.cost.total,
                if solution.feasible { "" } else { " (infeasible)" }
            ));
        }
        None => lines.push(match frame.outcome {
            Outcome::NonFiniteCost => String::from("no solution (penalty not finite)"),
            Outcome::NotConverged | Outcome::Solved => String::from("no solution (no convergence)"),
        }),
    }

    lines
}

/// Build the figure of a frame.
#[must_use]
pub fn project(
    frame: &Frame,
    dimensions: &Dimensions,
    viewport: &Viewport,
    stars: Option<&StarField>,
) -> Figure {
    let mut figure = Figure::new(viewport.width, viewport.height);
    figure.background = Some(Color::BLACK);

    if let Some(stars) = stars {
        for star in stars.stars() {
            figure.push(Item::Polygon(PolygonItem {
                points: star_polygon(*star, STAR_SIZE),
                color: Color::WHITE,
                filled: true,
            }));
        }
    }

    let screen = |p: Complex| viewport.to_screen(p);
    let (pa1, pa2) = dimensions.anchors();

    figure.push(segment((screen(pa1), screen(pa2)), Style::Bold, Color::BLUE));
    figure.push(Item::Circle(CircleItem {
        center: screen(dimensions.primary_focus()),
        radius: 4.0,
        style: Style::Solid,
        color: Color::GRAY,
        filled: true,
    }));
    figure.push(point(screen(dimensions.primary_focus()), Color::GRAY, "F"));
    figure.push(point(screen(pa1), Color::GREEN, "PA1"));
    figure.push(point(screen(pa2), Color::BLUE, "PA2"));

    if let Some(solution) = &frame.solution {
        let pose = &solution.pose;
        let (first, second) = pose.mirror_ends;
        let piston_color = if solution.feasible {
            Color::RED
        } else {
            Color::YELLOW
        };

        figure.push(segment((screen(pa1), screen(first)), Style::Dashed, piston_color));
        figure.push(segment((screen(pa2), screen(second)), Style::Dashed, piston_color));
        figure.push(segment((screen(first), screen(second)), Style::Bold, Color::CYAN));
        figure.push(point(screen(first), Color::MAGENTA, "PA3"));
        figure.push(point(screen(second), Color::CYAN, "PA4"));
        figure.push(point(screen(pose.mirror_center), Color::RED, "M"));

        let center = pose.mirror_center;
        figure.push(Item::Arrow(TwoPointItem::new(
            (screen(center), screen(center + pose.pointing)),
            Style::Solid,
            Color::ORANGE,
        )));
        figure.push(Item::Arrow(TwoPointItem::new(
            (screen(center), screen(center + pose.tangent)),
            Style::Solid,
            Color::PURPLE,
        )));
    }

    figure.push(Item::Polygon(PolygonItem {
        points: star_polygon(screen(frame.target), STAR_SIZE * 2.0),
        color: Color::RED,
        filled: true,
    }));

    for (i, line) in hud_lines(frame, dimensions).into_iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 10.0 + i as f64 * (HUD_FONT + 4.0);

        figure.push(Item::Text(TextItem {
            position: Position::new(10.0, y),
            content: line,
            size: HUD_FONT,
            color: Color::WHITE,
        }));
    }

    figure
}
