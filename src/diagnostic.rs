use std::fmt;

/// A source span representing a range of bytes in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A complete diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes 1-based line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Returns the text of the given 1-based line, without its newline
fn line_content(source: &str, line_num: usize) -> Option<&str> {
    source.lines().nth(line_num.saturating_sub(1))
}

/// Diagnostic renderer for Rust-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Render a diagnostic to a string
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        // Header line: error[E0101]: message
        let severity_str = match diagnostic.severity {
            Severity::Error => self.style_red_bold("error"),
            Severity::Warning => self.style_yellow_bold("warning"),
        };
        match &diagnostic.code {
            Some(code) => output.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code,
                self.style_bold(&diagnostic.message)
            )),
            None => output.push_str(&format!(
                "{}: {}\n",
                severity_str,
                self.style_bold(&diagnostic.message)
            )),
        }

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.file_name,
                line,
                col
            ));
            let width = line.to_string().len();
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
            self.render_label(&mut output, label, line, col, width);
            output.push_str(&format!("{} {}\n", " ".repeat(width + 1), self.style_blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn render_label(&self, output: &mut String, label: &Label, line: usize, col: usize, width: usize) {
        let content = match line_content(self.source, line) {
            Some(text) => text,
            None => return,
        };

        // Source line: "  3 |     var x = 5;"
        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.style_blue(&line.to_string()),
            self.style_blue("|"),
            content,
            width = width + 1
        ));

        // Underline clipped to the labelled line
        let span_len = label.span.end.saturating_sub(label.span.start).max(1);
        let underline_len = span_len.min(content.len().saturating_sub(col - 1).max(1));
        let mut underline = " ".repeat(col - 1);
        underline.push_str(&"^".repeat(underline_len));
        if !label.message.is_empty() {
            underline.push(' ');
            underline.push_str(&label.message);
        }
        output.push_str(&format!(
            "{} {} {}\n",
            " ".repeat(width + 1),
            self.style_blue("|"),
            self.style_red(&underline)
        ));
    }

    // Color helpers
    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;33m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if error_count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "var x = 5;\nvar y = 10;";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 4), (1, 5));
        assert_eq!(line_col(source, 11), (2, 1));
        assert_eq!(line_col(source, 15), (2, 5));
    }

    #[test]
    fn test_span_merge() {
        let first = Span::new(5, 10);
        let second = Span::new(8, 15);
        let merged = first.merge(second);
        assert_eq!(merged.start, 5);
        assert_eq!(merged.end, 15);
    }

    #[test]
    fn test_diagnostic_rendering() {
        let source = "var x = ;\n";
        let diagnostic = Diagnostic::error("Expect expression.")
            .with_code("E0101")
            .with_label(Label::new(Span::new(8, 9), "expected expression here"))
            .with_help("provide a value after `=`");

        let renderer = DiagnosticRenderer::new(source, "script", false);
        let output = renderer.render(&diagnostic);

        assert!(output.contains("error[E0101]"));
        assert!(output.contains("Expect expression."));
        assert!(output.contains("script:1:9"));
        assert!(output.contains("^"));
    }

    #[test]
    fn test_render_summary_counts_errors() {
        let source = "print 1;";
        let diagnostics = vec![
            Diagnostic::error("first").with_label(Label::new(Span::new(0, 5), "")),
            Diagnostic::error("second").with_label(Label::new(Span::new(6, 7), "")),
        ];
        let output = render_diagnostics(source, "script", &diagnostics, false);
        assert!(output.contains("aborting due to 2 errors"));
    }
}
