/// Indentation-aware line writer for emitting VHDL source code.
/// Writes straight through to an `io::Write` sink so the first failed
/// write aborts the render.
use std::io::{self, Write};

pub struct CodeWriter<W: Write> {
    out: W,
    unit: String,
    depth: usize,
}

impl<W: Write> CodeWriter<W> {
    /// `unit` is the string written once per indentation level.
    pub fn new(out: W, unit: &str) -> Self {
        Self {
            out,
            unit: unit.to_string(),
            depth: 0,
        }
    }

    /// Write a line at the current indentation level.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.write_indent()?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")
    }

    /// Write an empty line, without indentation.
    pub fn blank(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    /// Open a block: write `text` and increase indent.
    /// Text is typically `entity X is`, `port (`, `begin`, `if ... then`.
    pub fn open(&mut self, text: &str) -> io::Result<()> {
        self.line(text)?;
        self.depth += 1;
        Ok(())
    }

    /// Close a block: decrease indent and write `text` (`end if;`, `);`, ...).
    pub fn close(&mut self, text: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// Close with a continuation: `elsif ... then`, `else`, `begin`.
    /// Decreases indent, writes text, increases indent.
    pub fn close_open(&mut self, text: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)?;
        self.depth += 1;
        Ok(())
    }

    /// Flush the sink and hand it back.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(self.unit.as_bytes())?;
        }
        Ok(())
    }
}
