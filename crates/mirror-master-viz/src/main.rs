use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use macroquad::prelude::{
    clear_background, draw_circle, draw_circle_lines, draw_line, draw_text, draw_triangle,
    is_key_pressed, mouse_position, next_frame, show_mouse, vec2, Color, Conf, KeyCode, BLACK,
    LIGHTGRAY,
};
use mirror_master_internal::config::Config;
use mirror_master_internal::figure::{self, Figure, Item, Label, Position, Style};
use mirror_master_internal::projector;
use mirror_master_internal::session::{Frame, Session};
use mirror_master_internal::starfield::StarField;
use mirror_master_internal::viewport::Viewport;

/// Drift of the background stars per frame, in pixels.
const STAR_DRIFT: f64 = 0.3;

#[derive(Debug, Parser)]
#[command(name = "Mirror Master Viz")]
#[command(about = "Track the mouse pointer with the secondary mirror.", long_about = None)]
struct Args {
    /// JSON configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Background stars to draw.
    #[arg(long, default_value_t = 100)]
    stars: usize,
    /// Log more (-v, -vv, -vvv).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn window_conf() -> Conf {
    let viewport = Viewport::pointer_default();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let (width, height) = (viewport.width as i32, viewport.height as i32);

    Conf {
        window_title: String::from("Mirror Master"),
        window_width: width,
        window_height: height,
        window_resizable: false,
        ..Conf::default()
    }
}

fn color(color: figure::Color) -> Color {
    Color::from_rgba(color.r, color.g, color.b, 255)
}

#[allow(clippy::cast_possible_truncation)]
fn draw_styled_line((p1, p2): (Position, Position), style: Style, color: Color) {
    let width = if style == Style::Bold { 4.0 } else { 2.0 };
    let dashing = match style {
        Style::Solid | Style::Bold => None,
        Style::Dashed => Some((6.0, 4.0)),
        Style::Dotted => Some((2.0, 3.0)),
    };

    let length = (p2.x - p1.x).hypot(p2.y - p1.y);
    let Some((dash, gap)) = dashing.filter(|_| length > f64::EPSILON) else {
        draw_line(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32, width, color);
        return;
    };

    let (ux, uy) = ((p2.x - p1.x) / length, (p2.y - p1.y) / length);
    let mut start = 0.0;

    while start < length {
        let end = f64::min(start + dash, length);
        draw_line(
            (p1.x + ux * start) as f32,
            (p1.y + uy * start) as f32,
            (p1.x + ux * end) as f32,
            (p1.y + uy * end) as f32,
            width,
            color,
        );
        start = end + gap;
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_arrow_head((tail, head): (Position, Position), color: Color) {
    let length = (head.x - tail.x).hypot(head.y - tail.y);
    if length < f64::EPSILON {
        return;
    }

    let (ux, uy) = ((head.x - tail.x) / length, (head.y - tail.y) / length);
    let base = (head.x - ux * 8.0, head.y - uy * 8.0);

    draw_triangle(
        vec2(head.x as f32, head.y as f32),
        vec2((base.0 - uy * 4.0) as f32, (base.1 + ux * 4.0) as f32),
        vec2((base.0 + uy * 4.0) as f32, (base.1 - ux * 4.0) as f32),
        color,
    );
}

#[allow(clippy::cast_possible_truncation)]
fn draw_label(label: Option<&Label>, color: Color) {
    if let Some(label) = label {
        draw_text(
            &label.content,
            label.position.x as f32,
            label.position.y as f32,
            18.0,
            color,
        );
    }
}

/// Fill a star-shaped polygon with a triangle fan around its centroid.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn draw_polygon(points: &[Position], color: Color) {
    if points.len() < 3 {
        return;
    }

    let count = points.len() as f64;
    let center = vec2(
        (points.iter().map(|p| p.x).sum::<f64>() / count) as f32,
        (points.iter().map(|p| p.y).sum::<f64>() / count) as f32,
    );

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        draw_triangle(
            center,
            vec2(p.x as f32, p.y as f32),
            vec2(q.x as f32, q.y as f32),
            color,
        );
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_figure(figure: &Figure) {
    for item in &figure.items {
        match item {
            Item::Point(pt) => {
                let c = color(pt.color);
                draw_circle(pt.position.x as f32, pt.position.y as f32, 4.0, c);
                draw_label(pt.label.as_ref(), c);
            }
            Item::Segment(segment) => {
                let c = color(segment.color);
                draw_styled_line(segment.points, segment.style, c);
                draw_label(segment.label.as_ref(), c);
            }
            Item::Arrow(arrow) => {
                let c = color(arrow.color);
                draw_styled_line(arrow.points, arrow.style, c);
                draw_arrow_head(arrow.points, c);
            }
            Item::Circle(circle) => {
                let c = color(circle.color);
                let (x, y, r) = (
                    circle.center.x as f32,
                    circle.center.y as f32,
                    circle.radius as f32,
                );

                if circle.filled {
                    draw_circle(x, y, r, c);
                } else {
                    draw_circle_lines(x, y, r, 1.0, c);
                }
            }
            Item::Polygon(polygon) => draw_polygon(&polygon.points, color(polygon.color)),
            Item::Text(text) => {
                // Text is positioned by its top edge, macroquad draws from the baseline.
                draw_text(
                    &text.content,
                    text.position.x as f32,
                    (text.position.y + text.size) as f32,
                    text.size as f32,
                    color(text.color),
                );
            }
        }
    }
}

fn load_config(args: &Args) -> Config {
    let loaded = args.config.as_deref().map(Config::load);

    match loaded {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            warn!("{err}, using the default mechanism");
            Config::default()
        }
        None => Config::default(),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    let viewport = Viewport::pointer_default();
    let mut session = match Session::new(load_config(&args)) {
        Ok(session) => session,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let mut stars = StarField::new(
        args.stars,
        viewport.width,
        viewport.height,
        &mut rand::thread_rng(),
    );
    let mut last: Option<Frame> = None;
    #[allow(clippy::cast_precision_loss)]
    let bottom = viewport.height as f32 - 10.0;

    show_mouse(false);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_pressed(KeyCode::Tab) {
            let penalty = session.config().penalty.toggled();
            session.set_penalty(penalty);
            info!("penalty: {penalty:?}");
        }

        if is_key_pressed(KeyCode::W) {
            let warm_start = !session.config().warm_start;
            session.set_warm_start(warm_start);
            info!("warm start: {warm_start}");
        }

        let (x, y) = mouse_position();
        let target = viewport.to_world(Position::new(f64::from(x), f64::from(y)));

        match session.step(target) {
            Ok(frame) => last = Some(frame),
            Err(err) => warn!("{err}"),
        }

        stars.advance(STAR_DRIFT);

        clear_background(BLACK);

        if let Some(frame) = &last {
            let figure = projector::project(frame, session.dimensions(), &viewport, Some(&stars));
            draw_figure(&figure);
        }

        draw_text(
            &format!(
                "Tab: penalty ({:?}), W: warm start ({}), Esc: quit",
                session.config().penalty,
                if session.config().warm_start { "on" } else { "off" }
            ),
            10.0,
            bottom,
            16.0,
            LIGHTGRAY,
        );

        next_frame().await;
    }
}
