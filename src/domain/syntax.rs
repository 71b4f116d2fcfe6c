// Syntax tree model for rmlog.
// A small view of a Go file: declarations, statement containers,
// call expressions and a file-wide comment list. Everything the transformation
// does not inspect is kept as an opaque span into the original source.

use std::sync::Arc;

/// Half-open byte range `[start, end)` into the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The original text of a parsed file plus the layout facts the printer needs.
/// Shared, never mutated after parsing.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
    comment_spans: Vec<Span>,
}

impl SourceText {
    pub fn new(text: impl Into<String>, mut comment_spans: Vec<Span>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        comment_spans.sort();
        Self {
            text,
            line_starts,
            comment_spans,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based line number of a byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    /// Every comment present in the source as parsed, in source order.
    pub fn comment_spans(&self) -> &[Span] {
        &self.comment_spans
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub source: Arc<SourceText>,
    /// Top-level declarations in source order (package clause included).
    pub decls: Vec<Node>,
    /// Comments are not children of any node; they live here, grouped.
    pub comments: Vec<CommentGroup>,
}

/// A single comment, `// ...` or `/* ... */`, including its markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub text: String,
}

/// Consecutive comments with no code and no blank line between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }
}

/// A declaration or statement. Its text is the source under `span`, except
/// for the nested `blocks`, which are printed from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
    /// Statement containers directly nested in this node, in source order,
    /// non-overlapping.
    pub blocks: Vec<BlockContainer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Decl(DeclKind),
    /// A statement consisting of a single expression, e.g. a call.
    ExprStmt(Expression),
    /// A `case`/`default` clause of a switch or select.
    Clause,
    Stmt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Package,
    Import,
    Func,
    Method,
    Type,
    Const,
    Var,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Call(CallExpression),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Callee,
    pub args: usize,
}

/// Shape of the expression being called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `println(...)`
    Ident(String),
    /// `fmt.Println(...)`, where the qualifier is a plain identifier.
    Selector { qualifier: String, member: String },
    /// Anything else: `a.b.C()`, `(f)()`, `fns[0]()`, ...
    Other,
}

/// Any node owning an ordered statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockContainer {
    pub span: Span,
    pub kind: BlockKind,
    pub statements: Vec<Node>,
    /// Statements were removed from this container. Only pruned containers
    /// are laid out again when printing; the rest keep their source text.
    pub pruned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `{ ... }`: function bodies, if/for bodies, function literals.
    Braced,
    /// The `{ case ...: ... }` body of a switch or select; its statements are
    /// `Clause` nodes.
    Clauses,
    /// The statements after the `:` of one clause. `span` starts at the colon's end.
    Case,
}

/// Tree transformation with one hook per node variant. Each default method
/// rebuilds its node from folded children; override a hook to change it.
pub trait Fold {
    fn fold_tree(&mut self, tree: SyntaxTree) -> SyntaxTree {
        fold_tree(self, tree)
    }

    fn fold_block(&mut self, block: BlockContainer) -> BlockContainer {
        fold_block(self, block)
    }

    fn fold_node(&mut self, node: Node) -> Node {
        fold_node(self, node)
    }
}

pub fn fold_tree<F: Fold + ?Sized>(f: &mut F, tree: SyntaxTree) -> SyntaxTree {
    let SyntaxTree {
        source,
        decls,
        comments,
    } = tree;
    SyntaxTree {
        source,
        decls: decls.into_iter().map(|node| f.fold_node(node)).collect(),
        comments,
    }
}

pub fn fold_block<F: Fold + ?Sized>(f: &mut F, block: BlockContainer) -> BlockContainer {
    BlockContainer {
        statements: block
            .statements
            .into_iter()
            .map(|node| f.fold_node(node))
            .collect(),
        ..block
    }
}

pub fn fold_node<F: Fold + ?Sized>(f: &mut F, node: Node) -> Node {
    Node {
        blocks: node
            .blocks
            .into_iter()
            .map(|block| f.fold_block(block))
            .collect(),
        ..node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of() {
        let source = SourceText::new("a\nbc\n\nd", vec![]);
        assert_eq!(source.line_of(0), 0);
        assert_eq!(source.line_of(1), 0);
        assert_eq!(source.line_of(2), 1);
        assert_eq!(source.line_of(5), 2);
        assert_eq!(source.line_of(6), 3);
        assert_eq!(source.line_of(7), 3);
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(2, 10)));
        assert!(outer.contains(Span::new(4, 6)));
        assert!(!outer.contains(Span::new(1, 6)));
        assert!(!outer.contains(Span::new(8, 11)));
    }

    struct CountBlocks(usize);

    impl Fold for CountBlocks {
        fn fold_block(&mut self, block: BlockContainer) -> BlockContainer {
            self.0 += 1;
            fold_block(self, block)
        }
    }

    #[test]
    fn test_default_fold_reaches_nested_blocks() {
        let inner = BlockContainer {
            span: Span::new(5, 7),
            kind: BlockKind::Braced,
            statements: vec![],
            pruned: false,
        };
        let outer = BlockContainer {
            span: Span::new(3, 9),
            kind: BlockKind::Braced,
            statements: vec![Node {
                span: Span::new(4, 8),
                kind: NodeKind::Stmt,
                blocks: vec![inner],
            }],
            pruned: false,
        };
        let tree = SyntaxTree {
            source: Arc::new(SourceText::new("0123456789", vec![])),
            decls: vec![Node {
                span: Span::new(0, 10),
                kind: NodeKind::Decl(DeclKind::Func),
                blocks: vec![outer],
            }],
            comments: vec![],
        };

        let mut counter = CountBlocks(0);
        let folded = counter.fold_tree(tree.clone());
        assert_eq!(counter.0, 2);
        assert_eq!(folded, tree);
    }
}
