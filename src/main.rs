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

#![warn(clippy::pedantic)]

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use log::{info, LevelFilter};
use mirror_master::{
    cli::Diagnostic,
    drawer::{self, Renderer},
};
use mirror_master_internal::{
    config::Config,
    cost::Penalty,
    engine::{glide, rage, simplex, EngineConfig},
    geometry::Complex,
    projector,
    session::{Frame, Session},
    starfield::StarField,
    viewport::Viewport,
    Error,
};
use rand::{rngs::StdRng, SeedableRng};


#[derive(Debug, Parser)]
#[command(name = "Mirror Master")]
#[command(version)]
#[command(author)]
#[command(about = "Tool for aiming the secondary mirror of a segmented telescope.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    mechanism: MechanismArgs,
    /// Log more (-v for progress, -vv for every frame, -vvv for every iteration).
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Where to put the log output
    #[arg(long, short, global = true)]
    log: Option<PathBuf>,
    #[arg(long, hide = true, global = true)]
    markdown_help: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find the mirror position for a single target.
    Solve {
        /// The target, as `X,Y`.
        #[arg(long, short, value_parser = parse_point, allow_hyphen_values = true)]
        target: Complex,
        /// Print the frame as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Solve for a single target and draw the mechanism.
    Render {
        /// The target, as `X,Y`.
        #[arg(long, short, value_parser = parse_point, allow_hyphen_values = true)]
        target: Complex,
        /// The output target.
        output: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
    /// Move the target along a straight line, solving every frame.
    Sweep {
        /// Where the target starts, as `X,Y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Complex,
        /// Where the target ends, as `X,Y`.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Complex,
        /// Number of steps between the two ends.
        #[arg(long, default_value_t = 50)]
        steps: u32,
        /// Where to write the frames as JSON lines. Standard output if not given.
        output: Option<PathBuf>,
        /// Render every frame into this directory.
        #[arg(long)]
        frames: Option<PathBuf>,
        #[command(flatten)]
        canvas: CanvasArgs,
    },
}

#[derive(Debug, ClapArgs)]
struct CanvasArgs {
    /// Renderer to use.
    #[arg(long, short, default_value_t = Renderer::Svg, value_enum)]
    renderer: Renderer,
    /// Canvas width
    #[arg(long, default_value_t = 800)]
    width: usize,
    /// Canvas height
    #[arg(long, default_value_t = 600)]
    height: usize,
    /// Background stars to draw.
    #[arg(long, default_value_t = 100)]
    stars: usize,
    /// Seed of the background stars.
    #[arg(long, default_value_t = 0)]
    star_seed: u64,
}

#[derive(Debug, ClapArgs)]
struct MechanismArgs {
    /// JSON configuration file. Other options override its values.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Distance between the piston anchors (A).
    #[arg(long, global = true)]
    base_width: Option<f64>,
    /// Longest piston length (B).
    #[arg(long, global = true)]
    piston_max: Option<f64>,
    /// Shortest piston length. Half of the longest by default.
    #[arg(long, global = true)]
    piston_min: Option<f64>,
    /// Width of the secondary mirror (C).
    #[arg(long, global = true)]
    mirror_width: Option<f64>,
    /// Distance of the primary focus from the left anchor (F).
    #[arg(long, global = true)]
    focus_offset: Option<f64>,
    /// Penalty model.
    #[arg(long, short, value_enum, global = true)]
    penalty: Option<PenaltyArg>,
    /// Optimization engine, with its default parameters.
    #[arg(long, short, value_enum, global = true)]
    engine: Option<EngineArg>,
    /// Seed of the random engine.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Start every search at the previous solution.
    #[arg(long, global = true)]
    warm_start: bool,
    /// Keep solutions the engine did not converge to.
    #[arg(long, global = true)]
    allow_unconverged: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum PenaltyArg {
    /// Perpendicularity and piston stroke only.
    Classic,
    /// Also point the mirror through the primary focus.
    FocusAligned,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum EngineArg {
    /// Nelder-Mead downhill simplex.
    Simplex,
    /// Gradient descent with backtracking.
    Glide,
    /// Random adjustments.
    Rage,
}

/// What happened during a run, for the log file.
struct Summary {
    solved: usize,
    frames: usize,
    duration: Duration,
}

fn parse_point(value: &str) -> Result<Complex, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `X,Y`, got `{value}`"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate `{s}`: {err}"))
    };

    Ok(Complex::new(parse(x)?, parse(y)?))
}

impl MechanismArgs {
    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let dims = &mut config.dimensions;
        let overrides = [
            (&mut dims.base_width, self.base_width),
            (&mut dims.piston_max, self.piston_max),
            (&mut dims.mirror_width, self.mirror_width),
            (&mut dims.focus_offset, self.focus_offset),
        ];

        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        if self.piston_min.is_some() {
            dims.piston_min = self.piston_min;
        }

        if let Some(penalty) = self.penalty {
            config.penalty = match penalty {
                PenaltyArg::Classic => Penalty::Classic,
                PenaltyArg::FocusAligned => Penalty::FocusAligned,
            };
        }

        if let Some(engine) = self.engine {
            config.engine = match engine {
                EngineArg::Simplex => EngineConfig::Simplex(simplex::Params::default()),
                EngineArg::Glide => EngineConfig::Glide(glide::Params::default()),
                EngineArg::Rage => EngineConfig::Rage(rage::Params::default()),
            };
        }

        if let (Some(seed), EngineConfig::Rage(params)) = (self.seed, &mut config.engine) {
            params.seed = Some(seed);
        }

        config.warm_start |= self.warm_start;
        config.require_convergence &= !self.allow_unconverged;

        config.validate()?;
        Ok(config)
    }
}

impl CanvasArgs {
    fn viewport(&self) -> Viewport {
        Viewport::fit(
            self.width,
            self.height,
            Complex::new(-10.0, -2.0),
            Complex::new(10.0, 15.0),
            0.05,
        )
    }

    fn stars(&self) -> StarField {
        let mut rng = StdRng::seed_from_u64(self.star_seed);
        StarField::new(self.stars, self.width, self.height, &mut rng)
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn solve(session: &mut Session, target: Complex, json: bool) -> Result<Summary, Error> {
    let frame = session.step(target)?;
    let mut stdout = io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut stdout, &frame).map_err(io::Error::from)?;
        writeln!(stdout)?;
    } else {
        for line in projector::hud_lines(&frame, session.dimensions()) {
            writeln!(stdout, "{line}")?;
        }
    }

    Ok(Summary {
        solved: usize::from(frame.solution.is_some()),
        frames: 1,
        duration: frame.elapsed,
    })
}

fn render(
    session: &mut Session,
    target: Complex,
    output: &Path,
    canvas: &CanvasArgs,
) -> Result<Summary, Error> {
    let frame = session.step(target)?;
    let stars = canvas.stars();
    let figure = projector::project(&frame, session.dimensions(), &canvas.viewport(), Some(&stars));

    drawer::draw(canvas.renderer, &figure, output)?;
    info!("frame written to {}", output.display());

    Ok(Summary {
        solved: usize::from(frame.solution.is_some()),
        frames: 1,
        duration: frame.elapsed,
    })
}

fn write_frame(
    frame: &Frame,
    session: &Session,
    canvas: &CanvasArgs,
    stars: &StarField,
    directory: &Path,
) -> io::Result<()> {
    let figure = projector::project(frame, session.dimensions(), &canvas.viewport(), Some(stars));
    let path = directory.join(format!(
        "frame{:04}.{}",
        frame.index,
        canvas.renderer.extension()
    ));

    drawer::draw(canvas.renderer, &figure, &path)
}

fn sweep<P: Write>(
    session: &mut Session,
    (from, to): (Complex, Complex),
    steps: u32,
    output: Option<&Path>,
    frames: Option<&Path>,
    canvas: &CanvasArgs,
    progress: &mut P,
) -> Result<Summary, Error> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    if let Some(directory) = frames {
        fs::create_dir_all(directory)?;
    }

    let steps = steps.max(1);
    let start = Instant::now();
    let mut solved = 0;
    let mut count = 0;

    progress.execute(cursor::Hide)?;

    let swept = (|| -> Result<(), Error> {
        let mut stars = canvas.stars();

        for i in 0..=steps {
            let target = from + (to - from) * (f64::from(i) / f64::from(steps));
            let frame = session.step(target)?;
            count += 1;

            if frame.solution.is_some() {
                solved += 1;
            }

            serde_json::to_writer(&mut writer, &frame).map_err(io::Error::from)?;
            writeln!(writer)?;

            if let Some(directory) = frames {
                write_frame(&frame, session, canvas, &stars, directory)?;
                stars.advance(0.3);
            }

            progress.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
            progress.queue(cursor::SavePosition)?;
            write!(progress, "Frame {i}/{steps}, {solved} solved ")?;
            progress.queue(cursor::RestorePosition)?;
            progress.flush()?;
        }

        Ok(())
    })();

    // The cursor comes back even when a frame fails.
    progress.execute(cursor::Show)?;
    swept?;
    writer.flush()?;

    Ok(Summary {
        solved,
        frames: count,
        duration: start.elapsed(),
    })
}

fn run(args: &Args) -> Result<Summary, Error> {
    let config = args.mechanism.config()?;
    info!(
        "mechanism: {:?}, penalty: {:?}, engine: {:?}",
        config.dimensions, config.penalty, config.engine
    );

    let mut session = Session::new(config)?;

    match &args.command {
        Command::Solve { target, json } => solve(&mut session, *target, *json),
        Command::Render {
            target,
            output,
            canvas,
        } => render(&mut session, *target, output, canvas),
        Command::Sweep {
            from,
            to,
            steps,
            output,
            frames,
            canvas,
        } => sweep(
            &mut session,
            (*from, *to),
            *steps,
            output.as_deref(),
            frames.as_deref(),
            canvas,
            // Progress goes to stderr so it never mixes with the frames.
            &mut io::stderr(),
        ),
    }
}

fn write_log(path: &Path, content: &str) {
    let written = File::create(path).and_then(|mut log| log.write_all(content.as_bytes()));

    if let Err(err) = written {
        eprintln!("Failed to write log file at {}: {err}", path.display());
    }
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.markdown_help {
        if let Err(err) = fs::write(path, clap_markdown::help_markdown::<Args>()) {
            eprintln!("Failed to write help at {}: {err}", path.display());
        }
    }

    init_logging(args.verbose);

    match run(&args) {
        Ok(summary) => {
            if let Some(warning) = Diagnostic::unsolved(summary.solved, summary.frames) {
                eprint!("{warning}");
            }

            eprintln!(
                "Finished {} of {} frames in {:.3} seconds.",
                summary.solved,
                summary.frames,
                summary.duration.as_secs_f64()
            );

            if let Some(path) = &args.log {
                write_log(
                    path,
                    &format!(
                        "0\n{}\n{}\n{}",
                        summary.solved,
                        summary.frames,
                        summary.duration.as_secs_f64()
                    ),
                );
            }
        }
        Err(err) => {
            let diagnostic = Diagnostic::from_error(&err, args.mechanism.config.as_deref());
            eprintln!("{diagnostic}");

            if let Some(path) = &args.log {
                write_log(path, "-1");
            }

            process::exit(1);
        }
    }
}
