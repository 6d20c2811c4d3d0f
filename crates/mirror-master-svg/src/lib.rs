//! Mirror Master is capable of outputting figures as a simple svg file. Frames of a sweep
//! can be written one file each and stitched together by any external tool.

use std::io::{self, Write};

use mirror_master_figure::{
    CircleItem, Figure, Item, Label, PointItem, PolygonItem, Position, Style, TextItem,
    TwoPointItem,
};

#[cfg(test)]
mod tests {
    use mirror_master_figure::{Color, Figure, Item, Position, Style, TextItem, TwoPointItem};

    use super::Svg;

    #[test]
    fn writes_a_complete_document() {
        let mut figure = Figure::new(200, 100);
        figure.background = Some(Color::BLACK);
        figure.push(Item::Segment(TwoPointItem::new(
            (Position::new(0.0, 0.0), Position::new(20.0, 40.0)),
            Style::Dashed,
            Color::RED,
        )));
        figure.push(Item::Text(TextItem {
            position: Position::new(5.0, 5.0),
            content: String::from("A < B & C"),
            size: 12.0,
            color: Color::WHITE,
        }));

        let mut out = Vec::new();
        Svg::draw(&figure, &mut out).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert!(svg.contains(r#"height="100" width="200""#));
        assert!(svg.contains(r##"fill="#000000""##));
        assert!(svg.contains(r#"stroke-dasharray="6,4""#));
        assert!(svg.contains("A &lt; B &amp; C"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn arrow_has_a_head() {
        let mut figure = Figure::new(50, 50);
        figure.push(Item::Arrow(TwoPointItem::new(
            (Position::new(10.0, 10.0), Position::new(40.0, 10.0)),
            Style::Solid,
            Color::ORANGE,
        )));

        let mut out = Vec::new();
        Svg::draw(&figure, &mut out).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert!(svg.contains("<line"));
        assert!(svg.contains("<polygon"));
    }
}

/// Length of an arrow head, in pixels.
const ARROW_HEAD: f64 = 8.0;

/// The SVG format writer.
#[derive(Debug)]
pub struct Svg<W: Write> {
    /// Writer stream
    writer: W,
}

impl<W: Write> Svg<W> {
    /// Write the figure in SVG format.
    ///
    /// # Errors
    /// Any error of the underlying writer.
    pub fn draw(figure: &Figure, writer: W) -> io::Result<()> {
        let mut svg = Self { writer };

        svg.begin(figure)?;

        for item in &figure.items {
            match item {
                Item::Point(point) => svg.draw_point(point)?,
                Item::Segment(segment) => svg.draw_segment(segment)?,
                Item::Arrow(arrow) => svg.draw_arrow(arrow)?,
                Item::Circle(circle) => svg.draw_circle(circle)?,
                Item::Polygon(polygon) => svg.draw_polygon(polygon)?,
                Item::Text(text) => svg.draw_text(text)?,
            }
        }

        svg.end()
    }

    /// The width of a line made with the given [`Style`]
    fn get_style_width(style: Style) -> &'static str {
        match style {
            Style::Dashed | Style::Dotted | Style::Solid => "2",
            Style::Bold => "4",
        }
    }

    /// Get parameters for line based on its [`Style`]
    fn get_style_dashing(style: Style) -> &'static str {
        match style {
            Style::Dotted => "2,3",
            Style::Dashed => "6,4",
            Style::Bold | Style::Solid => "1,0",
        }
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn begin(&mut self, figure: &Figure) -> io::Result<()> {
        writeln!(
            &mut self.writer,
            r#"<svg height="{}" width="{}" xmlns="http://www.w3.org/2000/svg">"#,
            figure.height, figure.width,
        )?;

        if let Some(background) = figure.background {
            writeln!(
                &mut self.writer,
                r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                figure.width,
                figure.height,
                background.to_hex()
            )?;
        }

        Ok(())
    }

    fn draw_label(&mut self, label: Option<&Label>, color: &str) -> io::Result<()> {
        if let Some(label) = label {
            writeln!(
                &mut self.writer,
                r#"<text x="{:.2}" y="{:.2}" fill="{color}" font-family="monospace" font-size="12px" text-anchor="middle">{}</text>"#,
                label.position.x,
                label.position.y,
                Self::escape(&label.content)
            )?;
        }

        Ok(())
    }

    /// Draw a styled segment delimited by two points.
    fn draw_simple_segment(
        &mut self,
        (p1, p2): (Position, Position),
        style: Style,
        color: &str,
    ) -> io::Result<()> {
        writeln!(
            &mut self.writer,
            r#"<line stroke-width="{}" stroke-dasharray="{}" stroke="{color}" x1="{:.2}" x2="{:.2}" y1="{:.2}" y2="{:.2}"/>"#,
            Self::get_style_width(style),
            Self::get_style_dashing(style),
            p1.x,
            p2.x,
            p1.y,
            p2.y
        )
    }

    fn draw_point(&mut self, point: &PointItem) -> io::Result<()> {
        let color = point.color.to_hex();
        writeln!(
            &mut self.writer,
            r#"<circle cx="{:.2}" cy="{:.2}" fill="{color}" r="3"/>"#,
            point.position.x, point.position.y
        )?;

        self.draw_label(point.label.as_ref(), &color)
    }

    fn draw_segment(&mut self, segment: &TwoPointItem) -> io::Result<()> {
        let color = segment.color.to_hex();
        self.draw_simple_segment(segment.points, segment.style, &color)?;
        self.draw_label(segment.label.as_ref(), &color)
    }

    fn draw_arrow(&mut self, arrow: &TwoPointItem) -> io::Result<()> {
        let color = arrow.color.to_hex();
        let (tail, head) = arrow.points;
        self.draw_simple_segment(arrow.points, arrow.style, &color)?;

        let (dx, dy) = (head.x - tail.x, head.y - tail.y);
        let length = dx.hypot(dy);

        if length > f64::EPSILON {
            let (ux, uy) = (dx / length, dy / length);
            let base = Position::new(head.x - ux * ARROW_HEAD, head.y - uy * ARROW_HEAD);
            let half = ARROW_HEAD / 2.0;

            writeln!(
                &mut self.writer,
                r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{color}"/>"#,
                head.x,
                head.y,
                base.x - uy * half,
                base.y + ux * half,
                base.x + uy * half,
                base.y - ux * half,
            )?;
        }

        self.draw_label(arrow.label.as_ref(), &color)
    }

    fn draw_circle(&mut self, circle: &CircleItem) -> io::Result<()> {
        let color = circle.color.to_hex();
        let fill = if circle.filled { color.as_str() } else { "transparent" };

        writeln!(
            &mut self.writer,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" stroke="{color}" stroke-width="{}" stroke-dasharray="{}" fill="{fill}"/>"#,
            circle.center.x,
            circle.center.y,
            circle.radius,
            Self::get_style_width(circle.style),
            Self::get_style_dashing(circle.style),
        )
    }

    fn draw_polygon(&mut self, polygon: &PolygonItem) -> io::Result<()> {
        let color = polygon.color.to_hex();
        let points = polygon
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");

        if polygon.filled {
            writeln!(
                &mut self.writer,
                r#"<polygon points="{points}" fill="{color}"/>"#
            )
        } else {
            writeln!(
                &mut self.writer,
                r#"<polygon points="{points}" fill="transparent" stroke="{color}"/>"#
            )
        }
    }

    fn draw_text(&mut self, text: &TextItem) -> io::Result<()> {
        writeln!(
            &mut self.writer,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-family="monospace" font-size="{}px" dominant-baseline="hanging">{}</text>"#,
            text.position.x,
            text.position.y,
            text.color.to_hex(),
            text.size,
            Self::escape(&text.content)
        )
    }

    fn end(&mut self) -> io::Result<()> {
        writeln!(&mut self.writer, "</svg>")?;
        self.writer.flush()
    }
}
