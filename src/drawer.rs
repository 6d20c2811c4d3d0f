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

use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use clap::ValueEnum;
use mirror_master_internal::figure::Figure;
use mirror_master_json::Json;
use mirror_master_plaintext::Plaintext;
use mirror_master_svg::Svg;

#[cfg(test)]
mod tests {
    use mirror_master_internal::figure::Figure;

    use super::{draw_to, Renderer};

    #[test]
    fn every_renderer_writes_something() {
        let figure = Figure::new(40, 30);

        for renderer in [Renderer::Svg, Renderer::Json, Renderer::Raw] {
            let mut out = Vec::new();
            draw_to(renderer, &figure, &mut out).unwrap();

            assert!(!out.is_empty(), "{renderer:?} wrote nothing");
        }
    }

    #[test]
    fn extensions_match_formats() {
        assert_eq!(Renderer::Svg.extension(), "svg");
        assert_eq!(Renderer::Json.extension(), "json");
        assert_eq!(Renderer::Raw.extension(), "txt");
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Renderer {
    /// The SVG format renderer.
    Svg,
    /// The JSON (machine-readable) format renderer.
    Json,
    /// The raw (human-readable) format renderer.
    Raw,
}

impl Renderer {
    /// File extension of the rendered format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
            Self::Raw => "txt",
        }
    }
}

/// Render the figure into a stream.
///
/// # Errors
/// Any error of the underlying writer.
pub fn draw_to<W: io::Write>(renderer: Renderer, figure: &Figure, writer: W) -> io::Result<()> {
    match renderer {
        Renderer::Svg => Svg::draw(figure, writer),
        Renderer::Json => Json::write(figure, writer),
        Renderer::Raw => Plaintext::draw(figure, writer),
    }
}

/// Render the figure into a file.
///
/// # Errors
/// If the file can't be created or written.
pub fn draw(renderer: Renderer, figure: &Figure, target: &Path) -> io::Result<()> {
    let file = File::create(target)?;
    draw_to(renderer, figure, BufWriter::new(file))
}
