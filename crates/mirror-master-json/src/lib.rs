//! Mirror Master is capable of outputting figures in JSON. This is the format writer
//! responsible for this.

use std::io::{self, Write};

use mirror_master_figure::Figure;


/// The JSON format writer.
#[derive(Default)]
pub struct Json;

impl Json {
    /// Write the figure as JSON into a stream.
    ///
    /// # Errors
    /// Any error of the underlying writer.
    pub fn write<W: Write>(figure: &Figure, mut writer: W) -> io::Result<()> {
        serde_json::to_writer(&mut writer, figure)?;
        writer.flush()
    }
}
