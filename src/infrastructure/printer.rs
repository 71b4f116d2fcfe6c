//! Printer for [`SyntaxTree`]s parsed from Go.
//!
//! Source text is copied as is, minus comments that are no longer in the
//! tree. Only statement containers that lost statements are laid out again:
//! one item per line, indented one tab deeper than the line holding the
//! container's `{` (clauses at the same level), keeping the original vertical
//! gap between items but never more than one blank line. Comments that sat
//! inside a removed statement are printed as standalone items where that
//! statement was. The top level is laid out gofmt-style.

use std::collections::HashSet;

use crate::domain::syntax::{
    BlockContainer, BlockKind, Comment, DeclKind, Node, NodeKind, SourceText, Span, SyntaxTree,
};
use crate::error::RenderError;
use crate::ports::TreePrinter;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoPrinter;

impl TreePrinter for GoPrinter {
    fn print(&self, tree: &SyntaxTree) -> Result<String, RenderError> {
        let mut printer = Printer::new(tree);
        printer.file(&tree.decls)?;
        Ok(printer.out)
    }
}

#[derive(Clone, Copy)]
enum Item<'t> {
    Node(&'t Node),
    Comment(&'t Comment),
}

impl Item<'_> {
    fn span(&self) -> Span {
        match self {
            Item::Node(node) => node.span,
            Item::Comment(comment) => comment.span,
        }
    }

    fn is_comment(&self) -> bool {
        matches!(self, Item::Comment(_))
    }
}

/// Indentation of an item being moved: source lines starting with `from`
/// are written starting with `to` instead.
struct Reindent {
    from: String,
    to: String,
}

struct Printer<'t> {
    source: &'t SourceText,
    /// Comments still in the tree, in source order.
    comments: Vec<&'t Comment>,
    /// Comments present in the source but no longer in the tree.
    dropped: Vec<Span>,
    /// Innermost entry applies to copied text.
    reindent: Vec<Reindent>,
    at_line_start: bool,
    out: String,
}

impl<'t> Printer<'t> {
    fn new(tree: &'t SyntaxTree) -> Self {
        let mut comments: Vec<&Comment> = tree
            .comments
            .iter()
            .flat_map(|group| group.comments.iter())
            .collect();
        comments.sort_by_key(|comment| comment.span);
        let kept: HashSet<Span> = comments.iter().map(|comment| comment.span).collect();
        let dropped = tree
            .source
            .comment_spans()
            .iter()
            .copied()
            .filter(|span| !kept.contains(span))
            .collect();

        Self {
            source: tree.source.as_ref(),
            comments,
            dropped,
            reindent: Vec::new(),
            at_line_start: true,
            out: String::new(),
        }
    }

    /// Nodes plus the comments in `range` that no node covers, in source order.
    fn items(&self, range: Span, nodes: &'t [Node]) -> Vec<Item<'t>> {
        let mut items: Vec<Item<'t>> = nodes.iter().map(Item::Node).collect();
        items.extend(
            self.comments
                .iter()
                .copied()
                .filter(|comment| {
                    range.contains(comment.span)
                        && !nodes.iter().any(|node| node.span.contains(comment.span))
                })
                .map(Item::Comment),
        );
        items.sort_by_key(|item| item.span().start);
        items
    }

    fn lines_between(&self, from: usize, to: usize) -> usize {
        self.source
            .line_of(to)
            .saturating_sub(self.source.line_of(from))
    }

    /// Leading whitespace of the source line holding `offset`.
    fn line_indent(&self, offset: usize) -> &'t str {
        let text = self.source.text();
        let start = line_start(text, offset);
        let line = text.get(start..).unwrap_or_default();
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Indentation `offset`'s line has in the output.
    fn output_indent(&self, offset: usize) -> String {
        let indent = self.line_indent(offset);
        match self.reindent.last() {
            Some(r) if indent.starts_with(r.from.as_str()) => {
                format!("{}{}", r.to, &indent[r.from.len()..])
            }
            _ => indent.to_string(),
        }
    }

    /// Line breaks before `item`: a comment on the same line stays there,
    /// anything else gets its own line, at most one blank line is kept.
    fn breaks_before(&self, prev_end: usize, item: Item<'_>) -> usize {
        let lines = self.lines_between(prev_end, item.span().start);
        if lines == 0 && item.is_comment() {
            0
        } else {
            lines.clamp(1, 2)
        }
    }

    fn separator(&mut self, breaks: usize, indent: &str) {
        if breaks == 0 {
            self.out.push(' ');
        } else {
            for _ in 0..breaks {
                self.out.push('\n');
            }
            self.out.push_str(indent);
        }
        self.at_line_start = false;
    }

    /// Append copied text, moving the indentation of every line it starts.
    fn emit(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            match self.reindent.last() {
                Some(r) if self.at_line_start && piece.starts_with(r.from.as_str()) => {
                    self.out.push_str(&r.to);
                    self.out.push_str(&piece[r.from.len()..]);
                }
                _ => self.out.push_str(piece),
            }
            self.at_line_start = piece.ends_with('\n');
        }
    }

    fn file(&mut self, decls: &'t [Node]) -> Result<(), RenderError> {
        let whole = Span::new(0, self.source.text().len());
        let mut prev: Option<Item<'t>> = None;
        for item in self.items(whole, decls) {
            if let Some(prev) = prev {
                let breaks = if separates_sections(prev, item) {
                    2
                } else {
                    self.breaks_before(prev.span().end, item)
                };
                self.separator(breaks, "");
            }
            self.item(item)?;
            prev = Some(item);
        }
        self.out.push('\n');
        Ok(())
    }

    fn item(&mut self, item: Item<'t>) -> Result<(), RenderError> {
        match item {
            Item::Node(node) => self.node(node),
            Item::Comment(comment) => {
                self.emit(&comment.text);
                Ok(())
            }
        }
    }

    /// Lay out `items` of a pruned container. Items on the line of `open`
    /// have no indentation of their own and get `indent`; every item is
    /// moved to `indent` along with its continuation lines.
    fn item_list(
        &mut self,
        open: usize,
        items: &[Item<'t>],
        indent: &str,
    ) -> Result<(), RenderError> {
        let mut prev_end = open;
        for item in items {
            let start = item.span().start;
            let breaks = self.breaks_before(prev_end, *item);
            self.separator(breaks, indent);

            let from = if self.lines_between(open, start) == 0 {
                String::new()
            } else {
                self.line_indent(start).to_string()
            };
            self.reindent.push(Reindent {
                from,
                to: indent.to_string(),
            });
            let printed = self.item(*item);
            self.reindent.pop();
            printed?;
            prev_end = item.span().end;
        }
        Ok(())
    }

    fn node(&mut self, node: &'t Node) -> Result<(), RenderError> {
        self.blocks_between(node.span, &node.blocks)
    }

    /// Copy `span`, printing the containers in it from the tree.
    fn blocks_between(
        &mut self,
        span: Span,
        blocks: &'t [BlockContainer],
    ) -> Result<(), RenderError> {
        let mut cursor = span.start;
        for block in blocks {
            self.verbatim(cursor, block.span.start)?;
            self.container(block)?;
            cursor = block.span.end;
        }
        self.verbatim(cursor, span.end)
    }

    fn container(&mut self, block: &'t BlockContainer) -> Result<(), RenderError> {
        if !block.pruned {
            let nested: Vec<&'t BlockContainer> = block
                .statements
                .iter()
                .flat_map(|stmt| stmt.blocks.iter())
                .collect();
            let mut cursor = block.span.start;
            for inner in nested {
                self.verbatim(cursor, inner.span.start)?;
                self.container(inner)?;
                cursor = inner.span.end;
            }
            return self.verbatim(cursor, block.span.end);
        }

        let base = self.output_indent(block.span.start);
        if block.kind == BlockKind::Case {
            let items = self.items(block.span, &block.statements);
            return self.item_list(block.span.start, &items, &format!("{}\t", base));
        }

        let inner = Span::new(block.span.start + 1, block.span.end.saturating_sub(1));
        let items = self.items(inner, &block.statements);
        self.emit("{");
        if items.is_empty() {
            if self.lines_between(block.span.start, inner.end) > 0 {
                self.separator(1, &base);
            }
        } else {
            // Clauses sit at the indentation of their switch.
            let indent = match block.kind {
                BlockKind::Clauses => base.clone(),
                _ => format!("{}\t", base),
            };
            self.item_list(block.span.start, &items, &indent)?;
            self.separator(1, &base);
        }
        self.emit("}");
        Ok(())
    }

    /// Copy source text, cutting out dropped comments.
    fn verbatim(&mut self, start: usize, end: usize) -> Result<(), RenderError> {
        let text = self.source.text();
        let mut cursor = start;
        let cuts: Vec<(usize, usize)> = self
            .dropped
            .iter()
            .filter(|span| start <= span.start && span.end <= end)
            .map(|span| excision(text, *span))
            .collect();
        for (cut_start, cut_end) in cuts {
            let cut_start = cut_start.max(cursor);
            self.emit(slice(text, cursor, cut_start)?);
            cursor = cut_end.min(end).max(cut_start);
        }
        self.emit(slice(text, cursor, end)?);
        Ok(())
    }
}

/// Top-level declarations of different kinds, and every function, are set
/// apart by a blank line.
fn separates_sections(prev: Item<'_>, next: Item<'_>) -> bool {
    match (prev, next) {
        (Item::Node(a), Item::Node(b)) => match (&a.kind, &b.kind) {
            (NodeKind::Decl(a), NodeKind::Decl(b)) => {
                a != b || matches!(b, DeclKind::Func | DeclKind::Method)
            }
            _ => false,
        },
        _ => false,
    }
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str, RenderError> {
    text.get(start..end)
        .ok_or(RenderError::InvalidSpan { start, end })
}

fn line_start(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |i| i + 1)
}

fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r'))
}

/// Range to remove for a dropped comment: the whole line when the comment is
/// alone on it, the comment plus preceding spaces when it trails code, the
/// comment alone otherwise.
fn excision(text: &str, span: Span) -> (usize, usize) {
    let line_start = line_start(text, span.start);
    let line_end = text
        .get(span.end..)
        .and_then(|tail| tail.find('\n'))
        .map_or(text.len(), |i| span.end + i);
    let before = text.get(line_start..span.start);
    let after = text.get(span.end..line_end);
    let (Some(before), Some(after)) = (before, after) else {
        return (span.start, span.end);
    };

    match (is_blank(before), is_blank(after)) {
        (true, true) => (line_start, (line_end + 1).min(text.len())),
        (false, true) => {
            let padding = before.len() - before.trim_end_matches([' ', '\t']).len();
            (span.start - padding, span.end)
        }
        _ => (span.start, span.end),
    }
}
