// Tree to text: the printer port does the layout, this module owns the
// blank-line normalization applied on top of it.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::syntax::SyntaxTree;
use crate::error::RenderError;
use crate::ports::TreePrinter;

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-line pattern is valid"));

/// Collapse every run of two or more blank lines into a single blank line.
pub fn normalize_blank_lines(text: &str) -> String {
    BLANK_LINE_RUNS.replace_all(text, "\n\n").into_owned()
}

/// Print `tree` and normalize the result.
pub fn render(tree: &SyntaxTree, printer: &dyn TreePrinter) -> Result<String, RenderError> {
    let printed = printer.print(tree)?;
    Ok(normalize_blank_lines(&printed))
}
