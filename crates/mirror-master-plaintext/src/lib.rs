//! Mirror Master is capable of outputting its figures in plaintext, human-readable format.
//! Handy for diffing two frames or checking a pose without an image viewer.

use std::io::{self, Write};

use mirror_master_figure::{
    CircleItem, Figure, Item, PointItem, PolygonItem, Style, TextItem, TwoPointItem,
};

#[cfg(test)]
mod tests {
    use mirror_master_figure::{
        CircleItem, Color, Figure, Item, Label, PointItem, Position, Style, TwoPointItem,
    };

    use super::Plaintext;

    #[test]
    fn describes_every_item() {
        let mut figure = Figure::new(800, 600);
        figure.push(Item::Point(PointItem {
            position: Position::new(1.0, 2.0),
            color: Color::RED,
            label: Some(Label {
                position: Position::new(1.0, -10.0),
                content: String::from("M"),
            }),
        }));
        figure.push(Item::Segment(TwoPointItem::new(
            (Position::new(0.0, 0.0), Position::new(3.0, 4.0)),
            Style::Dashed,
            Color::RED,
        )));
        figure.push(Item::Circle(CircleItem {
            center: Position::new(5.0, 5.0),
            radius: 4.0,
            style: Style::Solid,
            color: Color::GRAY,
            filled: true,
        }));

        let mut out = Vec::new();
        Plaintext::draw(&figure, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "canvas size: 800 by 600");
        assert_eq!(lines[1], "point \"M\" at (1.000, 2.000)");
        assert_eq!(
            lines[2],
            "dashed segment \"\" from (0.000, 0.000) to (3.000, 4.000)"
        );
        assert_eq!(
            lines[3],
            "solid filled circle at (5.000, 5.000) with radius 4.000"
        );
    }
}

/// The raw format writer
#[derive(Debug)]
pub struct Plaintext<W: Write> {
    /// The write stream
    writer: W,
}

impl<W: Write> Plaintext<W> {
    /// Get the figure in plaintext format.
    ///
    /// # Errors
    /// Any error of the underlying writer.
    pub fn draw(figure: &Figure, writer: W) -> io::Result<()> {
        let mut plain = Self { writer };

        writeln!(
            &mut plain.writer,
            "canvas size: {} by {}",
            figure.width, figure.height
        )?;

        for item in &figure.items {
            match item {
                Item::Point(point) => plain.draw_point(point)?,
                Item::Segment(segment) => plain.draw_two_point("segment", segment)?,
                Item::Arrow(arrow) => plain.draw_two_point("arrow", arrow)?,
                Item::Circle(circle) => plain.draw_circle(circle)?,
                Item::Polygon(polygon) => plain.draw_polygon(polygon)?,
                Item::Text(text) => plain.draw_text(text)?,
            }
        }

        plain.writer.flush()
    }

    /// Get the human readable name of the requested [`Style`]
    fn get_style_name(style: Style) -> &'static str {
        match style {
            Style::Dotted => "dotted",
            Style::Dashed => "dashed",
            Style::Bold => "bold",
            Style::Solid => "solid",
        }
    }

    fn draw_point(&mut self, point: &PointItem) -> io::Result<()> {
        let label = point
            .label
            .as_ref()
            .map(|x| format!("\"{}\"", x.content))
            .unwrap_or_default();

        writeln!(
            &mut self.writer,
            "point {label} at ({:.3}, {:.3})",
            point.position.x, point.position.y
        )
    }

    fn draw_two_point(&mut self, kind: &str, item: &TwoPointItem) -> io::Result<()> {
        let label = item
            .label
            .as_ref()
            .map(|l| l.content.clone())
            .unwrap_or_default();
        let (p1, p2) = item.points;

        writeln!(
            &mut self.writer,
            "{} {kind} \"{label}\" from ({:.3}, {:.3}) to ({:.3}, {:.3})",
            Self::get_style_name(item.style),
            p1.x,
            p1.y,
            p2.x,
            p2.y
        )
    }

    fn draw_circle(&mut self, circle: &CircleItem) -> io::Result<()> {
        writeln!(
            &mut self.writer,
            "{}{} circle at ({:.3}, {:.3}) with radius {:.3}",
            Self::get_style_name(circle.style),
            if circle.filled { " filled" } else { "" },
            circle.center.x,
            circle.center.y,
            circle.radius,
        )
    }

    fn draw_polygon(&mut self, polygon: &PolygonItem) -> io::Result<()> {
        let points = polygon
            .points
            .iter()
            .map(|p| format!("({:.3}, {:.3})", p.x, p.y))
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(
            &mut self.writer,
            "polygon of {} points: {points}",
            polygon.points.len()
        )
    }

    fn draw_text(&mut self, text: &TextItem) -> io::Result<()> {
        writeln!(
            &mut self.writer,
            "text \"{}\" at ({:.3}, {:.3})",
            text.content, text.position.x, text.position.y
        )
    }
}
