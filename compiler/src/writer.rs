/// Line-oriented text sink with indentation tracking.
#[derive(Debug)]
pub struct CodeWriter {
    lines:  Vec<String>,
    depth:  usize,
    indent: &'static str,
}

impl Default for CodeWriter {
    fn default() -> Self {
        CodeWriter::new("    ")
    }
}

impl CodeWriter {
    pub fn new(indent: &'static str) -> Self {
        CodeWriter {
            lines: Vec::new(),
            depth: 0,
            indent,
        }
    }

    /// Append one line at the current depth. Empty text yields an empty line
    /// without trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indent.repeat(self.depth), text));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write `open`, the body one level deeper, then `close`.
    pub fn block(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close);
    }

    /// Append every line of an already rendered fragment at the current depth.
    pub fn fragment(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
