//! Debug-print removal over a whole syntax tree.
//!
//! One pass, as a [`Fold`]: every statement container drops the expression
//! statements that are debug calls, and the file-wide comment list is
//! replaced by its scrubbed version. Nothing else is touched.

use crate::domain::comments::{comment_count, filter_comments};
use crate::domain::rules::RuleSet;
use crate::domain::syntax::{fold_block, fold_tree, BlockContainer, Fold, NodeKind, SyntaxTree};

/// Result of a walk.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub tree: SyntaxTree,
    pub removed_statements: usize,
    pub removed_comments: usize,
}

impl WalkOutcome {
    /// Whether the tree differs from the one that was walked.
    pub fn changed(&self) -> bool {
        self.removed_statements > 0 || self.removed_comments > 0
    }
}

/// Fold that removes debug prints according to a [`RuleSet`].
pub struct DebugPrintRemover<'a> {
    rules: &'a RuleSet,
    removed_statements: usize,
    removed_comments: usize,
}

impl<'a> DebugPrintRemover<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            removed_statements: 0,
            removed_comments: 0,
        }
    }
}

impl Fold for DebugPrintRemover<'_> {
    fn fold_tree(&mut self, tree: SyntaxTree) -> SyntaxTree {
        let tree = fold_tree(self, tree);
        let comments = filter_comments(&tree.comments, self.rules);
        if comments != tree.comments {
            self.removed_comments += comment_count(&tree.comments) - comment_count(&comments);
        }
        SyntaxTree { comments, ..tree }
    }

    fn fold_block(&mut self, block: BlockContainer) -> BlockContainer {
        let before = block.statements.len();
        let statements = block
            .statements
            .into_iter()
            .filter(|stmt| match &stmt.kind {
                NodeKind::ExprStmt(expr) => !self.rules.is_debug_call(expr),
                _ => true,
            })
            .collect::<Vec<_>>();
        self.removed_statements += before - statements.len();

        fold_block(
            self,
            BlockContainer {
                pruned: block.pruned || statements.len() < before,
                statements,
                ..block
            },
        )
    }
}

/// Remove every debug-print statement and commented-out debug print from `tree`.
pub fn remove_debug_prints(tree: SyntaxTree, rules: &RuleSet) -> WalkOutcome {
    let mut remover = DebugPrintRemover::new(rules);
    let tree = remover.fold_tree(tree);
    WalkOutcome {
        tree,
        removed_statements: remover.removed_statements,
        removed_comments: remover.removed_comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::syntax::{BlockKind, Node};
    use crate::infrastructure::GoParser;
    use crate::ports::SourceParser;

    fn walk(source: &str) -> WalkOutcome {
        let tree = GoParser.parse(source).expect("test source should parse");
        remove_debug_prints(tree, &RuleSet::defaults())
    }

    fn body(tree: &SyntaxTree, decl: usize) -> &BlockContainer {
        &tree.decls[decl].blocks[0]
    }

    fn text<'t>(tree: &'t SyntaxTree, node: &Node) -> &'t str {
        &tree.source.text()[node.span.start..node.span.end]
    }

    #[test]
    fn test_removes_top_level_statements_in_order() {
        let outcome = walk(
            "package main\n\nfunc main() {\n\ta()\n\tprintln(\"x\")\n\tb()\n\tfmt.Println(1)\n\tc()\n}\n",
        );
        assert!(outcome.changed());
        assert_eq!(outcome.removed_statements, 2);
        let tree = &outcome.tree;
        let kept: Vec<_> = body(tree, 1)
            .statements
            .iter()
            .map(|stmt| text(tree, stmt))
            .collect();
        assert_eq!(kept, vec!["a()", "b()", "c()"]);
    }

    #[test]
    fn test_reaches_nested_blocks() {
        let source = r#"package main

func main() {
	for i := 0; i < 3; i++ {
		if i > 1 {
			println(i)
		} else {
			log.Println(i)
		}
	}
	go func() {
		fmt.Println("in goroutine")
		work()
	}()
	switch x {
	case 1:
		ufmt.Println("one")
	default:
		println("other")
		other()
	}
}
"#;
        let outcome = walk(source);
        assert_eq!(outcome.removed_statements, 5);

        let again = remove_debug_prints(outcome.tree, &RuleSet::defaults());
        assert!(!again.changed());
    }

    #[test]
    fn test_select_and_bare_blocks() {
        let source = r#"package main

func main() {
	{
		println("bare block")
	}
	select {
	case v := <-ch:
		fmt.Println(v)
	}
}
"#;
        let outcome = walk(source);
        assert_eq!(outcome.removed_statements, 2);
    }

    #[test]
    fn test_function_literal_in_var_decl() {
        let outcome = walk("package main\n\nvar f = func() {\n\tprintln(\"x\")\n}\n");
        assert_eq!(outcome.removed_statements, 1);
    }

    #[test]
    fn test_result_uses_are_never_removed() {
        let source = r#"package main

func main() {
	s := ufmt.Sprintf("%d", 1)
	x := fmt.Println
	defer fmt.Println("deferred")
	go println("async")
	use(s, x)
}
"#;
        let outcome = walk(source);
        assert!(!outcome.changed());
    }

    #[test]
    fn test_comment_only_change_counts() {
        let outcome = walk("package main\n\n// println(\"x\")\nfunc main() {\n\tdoWork()\n}\n");
        assert!(outcome.changed());
        assert_eq!(outcome.removed_statements, 0);
        assert_eq!(outcome.removed_comments, 1);
        assert!(outcome.tree.comments.is_empty());
    }

    #[test]
    fn test_statement_removal_keeps_comments() {
        let outcome = walk(
            "package main\n\nfunc main() {\n\t// keep me\n\tprintln(\"x\") // trailing note\n}\n",
        );
        assert_eq!(outcome.removed_statements, 1);
        assert_eq!(outcome.removed_comments, 0);
        let texts: Vec<_> = outcome
            .tree
            .comments
            .iter()
            .flat_map(|group| group.comments.iter().map(|c| c.text.as_str()))
            .collect();
        assert_eq!(texts, vec!["// keep me", "// trailing note"]);
    }

    #[test]
    fn test_no_matches_is_unchanged() {
        let source = "package main\n\nfunc main() {\n\tprint(\"keep\")\n\tfmt.Printf(\"keep\")\n}\n";
        let original = GoParser.parse(source).expect("test source should parse");
        let outcome = remove_debug_prints(original.clone(), &RuleSet::defaults());
        assert!(!outcome.changed());
        assert_eq!(outcome.tree, original);
    }

    #[test]
    fn test_case_bodies_are_containers() {
        let outcome = walk(
            "package main\n\nfunc main() {\n\tswitch {\n\tcase true:\n\t\tprintln(1)\n\t\tkeep()\n\t}\n}\n",
        );
        let tree = &outcome.tree;
        let switch = &body(tree, 1).statements[0];
        let clauses = &switch.blocks[0];
        assert_eq!(clauses.kind, BlockKind::Clauses);
        let case = &clauses.statements[0].blocks[0];
        assert_eq!(case.kind, BlockKind::Case);
        assert_eq!(case.statements.len(), 1);
        assert_eq!(text(tree, &case.statements[0]), "keep()");
    }

    #[test]
    fn test_only_containers_that_lost_statements_are_pruned() {
        let outcome = walk(
            "package main\n\nfunc main() {\n\tif ok {\n\t\tprintln(1)\n\t}\n\tfor {\n\t\tstep()\n\t}\n}\n",
        );
        let main = body(&outcome.tree, 1);
        assert!(!main.pruned);
        assert!(main.statements[0].blocks[0].pruned);
        assert!(!main.statements[1].blocks[0].pruned);
    }
}

