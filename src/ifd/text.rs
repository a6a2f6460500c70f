//! ifd::text
//!
//! A scene stream that writes IFD text.
//!
//! ```text
//! ray_start plane
//!     ray_property plane variable "N"
//!     ray_property plane vextype "vector"
//! ray_end
//! ```

use std::io::Write;

use super::traits::SceneStream;
use super::IfdError;

/// Writes stream calls as IFD commands to any `Write`.
#[derive(Debug)]
pub struct IfdTextWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> IfdTextWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Number of blocks started and not yet ended.
    pub fn open_blocks(&self) -> usize {
        self.depth
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&self) -> String {
        "    ".repeat(self.depth)
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

impl<W: Write> SceneStream for IfdTextWriter<W> {
    fn start(&mut self, block: &str) -> Result<(), IfdError> {
        let indent = self.indent();
        writeln!(self.out, "{}ray_start {}", indent, block)?;
        self.depth += 1;
        Ok(())
    }

    fn property(&mut self, block: &str, name: &str, values: &[&str]) -> Result<(), IfdError> {
        let values: Vec<String> = values.iter().map(|v| quote(v)).collect();
        let indent = self.indent();
        writeln!(
            self.out,
            "{}ray_property {} {} {}",
            indent,
            block,
            name,
            values.join(" ")
        )?;
        Ok(())
    }

    fn end(&mut self) -> Result<(), IfdError> {
        self.depth = self.depth.saturating_sub(1);
        let indent = self.indent();
        writeln!(self.out, "{}ray_end", indent)?;
        Ok(())
    }
}
