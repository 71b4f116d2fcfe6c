//! Go parsing via tree-sitter.
//!
//! The concrete tree-sitter tree is reduced to the [`SyntaxTree`] model:
//! top-level declarations, statement containers (braced blocks, switch and
//! select clause lists, individual clauses) and call expressions used as
//! statements. Comments are collected from anywhere in the tree into a
//! separate, grouped list.

use std::sync::Arc;

use tree_sitter::{Node as TsNode, Parser};

use crate::domain::syntax::{
    BlockContainer, BlockKind, CallExpression, Callee, Comment, CommentGroup, DeclKind,
    Expression, Node, NodeKind, SourceText, Span, SyntaxTree,
};
use crate::error::ParseError;
use crate::ports::SourceParser;

/// Parser for Go source files. A fresh tree-sitter parser is created per call,
/// so one `GoParser` can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParser;

impl GoParser {
    fn tree_sitter_parser() -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }
}

impl SourceParser for GoParser {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Self::tree_sitter_parser()?;
        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, source));
        }
        Ok(TreeBuilder { source }.build(root))
    }
}

fn children<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn span_of(node: TsNode<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Named, non-trivia node: statements, declarations, expressions.
fn is_code(node: TsNode<'_>) -> bool {
    node.is_named() && !matches!(node.kind(), "comment" | "empty_statement")
}

fn is_clause(kind: &str) -> bool {
    matches!(
        kind,
        "expression_case" | "default_case" | "type_case" | "communication_case"
    )
}

fn decl_kind(kind: &str) -> DeclKind {
    match kind {
        "package_clause" => DeclKind::Package,
        "import_declaration" => DeclKind::Import,
        "function_declaration" => DeclKind::Func,
        "method_declaration" => DeclKind::Method,
        "type_declaration" => DeclKind::Type,
        "const_declaration" => DeclKind::Const,
        "var_declaration" => DeclKind::Var,
        _ => DeclKind::Other,
    }
}

fn first_error<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn syntax_error(root: TsNode<'_>, source: &str) -> ParseError {
    let node = first_error(root).unwrap_or(root);
    let position = node.start_position();
    let (line, column) = (position.row + 1, position.column + 1);
    if node.is_missing() {
        return ParseError::Missing {
            line,
            column,
            expected: node.kind().to_string(),
        };
    }
    let snippet = source
        .get(node.byte_range())
        .and_then(|text| text.lines().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or_default()
        .chars()
        .take(40)
        .collect();
    ParseError::Syntax {
        line,
        column,
        snippet,
    }
}

struct TreeBuilder<'s> {
    source: &'s str,
}

impl<'s> TreeBuilder<'s> {
    fn build(&self, root: TsNode<'_>) -> SyntaxTree {
        let mut comments = Vec::new();
        self.collect_comments(root, &mut comments);
        let comment_spans = comments.iter().map(|c: &Comment| c.span).collect();

        let decls = children(root)
            .into_iter()
            .filter(|node| is_code(*node))
            .map(|node| Node {
                span: span_of(node),
                kind: NodeKind::Decl(decl_kind(node.kind())),
                blocks: self.containers_within(node),
            })
            .collect();

        SyntaxTree {
            source: Arc::new(SourceText::new(self.source, comment_spans)),
            decls,
            comments: self.group_comments(comments),
        }
    }

    fn text(&self, node: TsNode<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn collect_comments(&self, node: TsNode<'_>, out: &mut Vec<Comment>) {
        if node.kind() == "comment" {
            out.push(Comment {
                span: span_of(node),
                text: self.text(node).to_string(),
            });
            return;
        }
        for child in children(node) {
            self.collect_comments(child, out);
        }
    }

    /// Comments separated only by whitespace with at most one line break
    /// form a group.
    fn group_comments(&self, comments: Vec<Comment>) -> Vec<CommentGroup> {
        let mut groups: Vec<Vec<Comment>> = Vec::new();
        for comment in comments {
            let adjacent = groups
                .last()
                .and_then(|group| group.last())
                .and_then(|prev| self.source.get(prev.span.end..comment.span.start))
                .is_some_and(|gap| {
                    gap.chars().all(char::is_whitespace) && gap.matches('\n').count() <= 1
                });
            match groups.last_mut() {
                Some(group) if adjacent => group.push(comment),
                _ => groups.push(vec![comment]),
            }
        }
        groups.into_iter().map(CommentGroup::new).collect()
    }

    fn containers_within(&self, node: TsNode<'_>) -> Vec<BlockContainer> {
        let mut out = Vec::new();
        self.collect_containers(node, &mut out);
        out
    }

    /// Outermost statement containers under `node`, in source order. Does not
    /// descend into a container: its statements collect their own.
    fn collect_containers(&self, node: TsNode<'_>, out: &mut Vec<BlockContainer>) {
        match node.kind() {
            "block" => out.push(BlockContainer {
                span: span_of(node),
                kind: BlockKind::Braced,
                statements: self.statements(&children(node)),
                pruned: false,
            }),
            "expression_switch_statement" | "type_switch_statement" | "select_statement" => {
                self.collect_clauses(node, out)
            }
            "comment" => {}
            _ => {
                for child in children(node) {
                    self.collect_containers(child, out);
                }
            }
        }
    }

    /// A switch or select: containers in the header, then the `{ ... }`
    /// clause list.
    fn collect_clauses(&self, node: TsNode<'_>, out: &mut Vec<BlockContainer>) {
        let kids = children(node);
        let Some(open) = kids.iter().position(|k| k.kind() == "{") else {
            for child in kids {
                self.collect_containers(child, out);
            }
            return;
        };
        for child in &kids[..open] {
            self.collect_containers(*child, out);
        }

        let end = kids
            .iter()
            .rev()
            .find(|k| k.kind() == "}")
            .map_or(node.end_byte(), |close| close.end_byte());
        // Comments after a clause's last statement are siblings of the clause,
        // not children; the clause body extends over them.
        let body = &kids[open + 1..];
        let statements = body
            .iter()
            .enumerate()
            .filter(|(_, k)| is_clause(k.kind()))
            .map(|(i, clause)| {
                let trailing = body[i + 1..]
                    .iter()
                    .take_while(|k| k.kind() == "comment")
                    .last()
                    .map(|comment| comment.end_byte());
                self.clause(*clause, trailing)
            })
            .collect();

        out.push(BlockContainer {
            span: Span::new(kids[open].start_byte(), end),
            kind: BlockKind::Clauses,
            statements,
            pruned: false,
        });
    }

    /// End of `node` without the statement terminators a clause can end with.
    fn trimmed_end(&self, node: TsNode<'_>) -> usize {
        let text = self.text(node);
        let trimmed = text.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
        node.start_byte() + trimmed.len()
    }

    fn clause(&self, node: TsNode<'_>, trailing_comment_end: Option<usize>) -> Node {
        let kids = children(node);
        let end = self
            .trimmed_end(node)
            .max(trailing_comment_end.unwrap_or(0));
        let blocks = match kids.iter().position(|k| k.kind() == ":") {
            Some(colon) => {
                let mut blocks = Vec::new();
                for child in &kids[..colon] {
                    self.collect_containers(*child, &mut blocks);
                }
                blocks.push(BlockContainer {
                    span: Span::new(kids[colon].end_byte(), end),
                    kind: BlockKind::Case,
                    statements: self.statements(&kids[colon + 1..]),
                    pruned: false,
                });
                blocks
            }
            None => self.containers_within(node),
        };
        Node {
            span: Span::new(node.start_byte(), end),
            kind: NodeKind::Clause,
            blocks,
        }
    }

    /// Statements among `nodes`, looking through `statement_list` wrappers.
    fn statements(&self, nodes: &[TsNode<'_>]) -> Vec<Node> {
        let mut out = Vec::new();
        for node in nodes {
            if node.kind() == "statement_list" {
                out.extend(self.statements(&children(*node)));
            } else if is_code(*node) {
                out.push(self.statement(*node));
            }
        }
        out
    }

    fn statement(&self, node: TsNode<'_>) -> Node {
        let kind = if node.kind() == "expression_statement" {
            let expr = children(node).into_iter().find(|child| is_code(*child));
            NodeKind::ExprStmt(self.expression(expr))
        } else {
            NodeKind::Stmt
        };
        Node {
            span: span_of(node),
            kind,
            blocks: self.containers_within(node),
        }
    }

    fn expression(&self, node: Option<TsNode<'_>>) -> Expression {
        let Some(node) = node.filter(|n| n.kind() == "call_expression") else {
            return Expression::Other;
        };
        let callee = node
            .child_by_field_name("function")
            .map_or(Callee::Other, |function| self.callee(function));
        let args = node
            .child_by_field_name("arguments")
            .map_or(0, |list| children(list).into_iter().filter(|a| is_code(*a)).count());
        Expression::Call(CallExpression { callee, args })
    }

    fn callee(&self, node: TsNode<'_>) -> Callee {
        match node.kind() {
            "identifier" => Callee::Ident(self.text(node).to_string()),
            "selector_expression" => {
                let operand = node.child_by_field_name("operand");
                let field = node.child_by_field_name("field");
                match (operand, field) {
                    (Some(operand), Some(field)) if operand.kind() == "identifier" => {
                        Callee::Selector {
                            qualifier: self.text(operand).to_string(),
                            member: self.text(field).to_string(),
                        }
                    }
                    _ => Callee::Other,
                }
            }
            _ => Callee::Other,
        }
    }
}
