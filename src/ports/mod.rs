use crate::domain::syntax::SyntaxTree;
use crate::error::{ParseError, RenderError};

/// Turns source text into a [`SyntaxTree`] with comments kept as a separate list.
/// Implementations must be thread-safe (Send + Sync) so files can be processed
/// in parallel.
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;
}

/// Turns a [`SyntaxTree`] back into source text. Must be deterministic.
pub trait TreePrinter: Send + Sync {
    fn print(&self, tree: &SyntaxTree) -> Result<String, RenderError>;
}
