//! A figure is what every renderer of Mirror Master consumes. It holds screen-space
//! items only (pixels, y axis pointing down), so writers never need to know anything
//! about the mechanism itself.

use serde::Serialize;

#[cfg(test)]
mod tests {
    use super::{Color, Figure, Item, Position, Style, TwoPointItem};

    #[test]
    fn items_keep_insertion_order() {
        let mut figure = Figure::new(100, 50);
        figure.push(Item::Segment(TwoPointItem::new(
            (Position::new(0.0, 0.0), Position::new(10.0, 10.0)),
            Style::Solid,
            Color::RED,
        )));
        figure.push(Item::Arrow(TwoPointItem::new(
            (Position::new(5.0, 5.0), Position::new(1.0, 1.0)),
            Style::Bold,
            Color::BLUE,
        )));

        assert_eq!(figure.items.len(), 2);
        assert!(matches!(figure.items[0], Item::Segment(_)));
        assert!(matches!(figure.items[1], Item::Arrow(_)));
    }

    #[test]
    fn color_hex() {
        assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Color::BLACK.to_hex(), "#000000");
    }
}

/// A position on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 160, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` notation, as used by SVG and most web formats.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Stroke style of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Style {
    Dotted,
    Dashed,
    Bold,
    Solid,
}

/// A text label attached to an item.
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub position: Position,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointItem {
    pub position: Position,
    pub color: Color,
    pub label: Option<Label>,
}

/// Any item defined by two points: segments and arrows (tail, head).
#[derive(Debug, Clone, Serialize)]
pub struct TwoPointItem {
    pub points: (Position, Position),
    pub style: Style,
    pub color: Color,
    pub label: Option<Label>,
}

impl TwoPointItem {
    #[must_use]
    pub fn new(points: (Position, Position), style: Style, color: Color) -> Self {
        Self {
            points,
            style,
            color,
            label: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleItem {
    pub center: Position,
    pub radius: f64,
    pub style: Style,
    pub color: Color,
    pub filled: bool,
}

/// A closed polygon. Stars are drawn this way.
#[derive(Debug, Clone, Serialize)]
pub struct PolygonItem {
    pub points: Vec<Position>,
    pub color: Color,
    pub filled: bool,
}

/// Free-standing text, anchored at its top-left corner.
#[derive(Debug, Clone, Serialize)]
pub struct TextItem {
    pub position: Position,
    pub content: String,
    pub size: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub enum Item {
    Point(PointItem),
    Segment(TwoPointItem),
    Arrow(TwoPointItem),
    Circle(CircleItem),
    Polygon(PolygonItem),
    Text(TextItem),
}

/// A complete figure, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub width: usize,
    pub height: usize,
    /// Canvas fill, if any.
    pub background: Option<Color>,
    /// Items in painting order.
    pub items: Vec<Item>,
}

impl Figure {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            background: None,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }
}
