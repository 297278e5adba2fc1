//! Indentation-aware line writer.

/// Default indent unit.
pub const DEFAULT_INDENT: &str = "    ";

/// Line sink with an indent depth.
///
/// Depth only changes inside [`CodeWriter::indented`], which restores it
/// when its closure returns, so an early `?` return inside a nested block
/// cannot leave the writer mis-indented.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    out: String,
    indent: String,
    depth: usize,
    lines: usize,
}

impl CodeWriter {
    /// Creates a writer with the given indent unit.
    #[must_use]
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            out: String::new(),
            indent: indent.into(),
            depth: 0,
            lines: 0,
        }
    }

    /// Writes a line.
    ///
    /// Non-empty lines are prefixed with one indent unit per depth level; an
    /// empty line is written as a bare newline.
    pub fn emit(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(&self.indent);
            }
            self.out.push_str(line);
        }
        self.out.push('\n');
        self.lines += 1;
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.emit("");
    }

    /// Runs `f` one level deeper.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Returns the current depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of lines written.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.lines
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the writer, returning its text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}
