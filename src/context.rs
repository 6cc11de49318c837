//! Parse-session diagnostics
//!
//! A `ParserContext` is created per parse invocation and threaded by mutable
//! reference through the line parser and every entity constructor. It carries
//! the current line cursor so entities can stamp their own declaration line,
//! and accumulates errors and warnings without ever aborting the parse.

/// A diagnostic message tagged with the 0-based line it was recorded on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineText {
    pub line_number: usize,
    pub text: String,
}

impl LineText {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// Per-parse state: the line cursor plus accumulated errors and warnings.
///
/// Malformed input never unwinds out of the core; every failure mode is
/// recorded here and the parse continues with best-effort partial results.
#[derive(Debug, Default)]
pub struct ParserContext {
    /// 0-based cursor into the input lines, advanced by the line parser.
    pub line_number: usize,
    pub errors: Vec<LineText>,
    pub warnings: Vec<LineText>,
}

impl ParserContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at the current line cursor.
    pub fn error(&mut self, text: impl Into<String>) {
        self.errors.push(LineText::new(self.line_number, text));
    }

    /// Record an error at an explicit line, for validation passes that run
    /// after the cursor has moved past the offending declaration.
    pub fn error_at(&mut self, line_number: usize, text: impl Into<String>) {
        self.errors.push(LineText::new(line_number, text));
    }

    /// Record a warning at the current line cursor.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.push(LineText::new(self.line_number, text));
    }

    /// Record a warning at an explicit line.
    pub fn warn_at(&mut self, line_number: usize, text: impl Into<String>) {
        self.warnings.push(LineText::new(line_number, text));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Format the error list for display.
    pub fn error_report(&self) -> Vec<String> {
        format_list(&self.errors, "error", "errors")
    }

    /// Format the warning list for display.
    pub fn warning_report(&self) -> Vec<String> {
        format_list(&self.warnings, "warning", "warnings")
    }
}

/// Render a diagnostic list as display lines: a count summary first, then the
/// entries sorted by descending line number with 1-based line tags.
fn format_list(list: &[LineText], singular: &str, plural: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(list.len() + 1);

    if list.is_empty() {
        out.push(format!("0 {}!", plural));
        return out;
    }

    if list.len() > 1 {
        out.push(format!("{} {} :(", list.len(), plural));
    } else {
        out.push(format!("1 {} :(", singular));
    }

    let mut sorted: Vec<&LineText> = list.iter().collect();
    sorted.sort_by(|a, b| b.line_number.cmp(&a.line_number));
    for entry in sorted {
        out.push(format!("[{}] {}", entry.line_number + 1, entry.text));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stamps_cursor_line() {
        let mut pc = ParserContext::new();
        pc.line_number = 7;
        pc.error("bad line");
        assert_eq!(pc.errors.len(), 1);
        assert_eq!(pc.errors[0].line_number, 7);
        assert_eq!(pc.errors[0].text, "bad line");
    }

    #[test]
    fn test_error_at_uses_explicit_line() {
        let mut pc = ParserContext::new();
        pc.line_number = 10;
        pc.error_at(2, "earlier declaration");
        assert_eq!(pc.errors[0].line_number, 2);
    }

    #[test]
    fn test_empty_report() {
        let pc = ParserContext::new();
        assert_eq!(pc.error_report(), vec!["0 errors!".to_string()]);
        assert_eq!(pc.warning_report(), vec!["0 warnings!".to_string()]);
    }

    #[test]
    fn test_report_sorted_descending_with_count() {
        let mut pc = ParserContext::new();
        pc.error_at(1, "first");
        pc.error_at(5, "second");
        pc.error_at(3, "third");

        let report = pc.error_report();
        assert_eq!(report[0], "3 errors :(");
        assert_eq!(report[1], "[6] second");
        assert_eq!(report[2], "[4] third");
        assert_eq!(report[3], "[2] first");
    }

    #[test]
    fn test_singular_count_line() {
        let mut pc = ParserContext::new();
        pc.warn("only one");
        let report = pc.warning_report();
        assert_eq!(report[0], "1 warning :(");
        assert_eq!(report[1], "[1] only one");
    }
}
