//! Indented line buffer shared by the emitters

/// One indentation level of generated code
pub const INDENT: &str = "  ";

/// Generated source text, written a line at a time
#[derive(Debug, Default, Clone)]
pub struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` at `indent` levels, followed by a newline
    pub fn line(&mut self, indent: usize, line: &str) {
        for _ in 0..indent {
            self.text.push_str(INDENT);
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Append an empty line
    pub fn blank(&mut self) {
        self.text.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn SourceBuffer___line___indents_two_spaces_per_level() {
        let mut out = SourceBuffer::new();

        out.line(0, "namespace a {");
        out.line(1, "class B;");
        out.blank();
        out.line(2, "x");

        assert_eq!(out.as_str(), "namespace a {\n  class B;\n\n    x\n");
    }
}
