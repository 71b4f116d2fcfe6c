use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::rules::RuleSet;
use crate::domain::serializer;
use crate::domain::walker::remove_debug_prints;
use crate::error::{Error, RenderError, Result, TransformError};
use crate::infrastructure::fs::replace_file;
use crate::infrastructure::{GoParser, GoPrinter};
use crate::ports::{SourceParser, TreePrinter};

/// Whether changed files are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// In-memory result of cleaning one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    /// New text, `None` when nothing changed.
    pub output: Option<String>,
    pub removed_statements: usize,
    pub removed_comments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    pub written: bool,
    pub removed_statements: usize,
    pub removed_comments: usize,
}

pub struct CleanupUsecase<'a> {
    pub parser: &'a dyn SourceParser,
    pub printer: &'a dyn TreePrinter,
    pub rules: &'a RuleSet,
}

impl<'a> CleanupUsecase<'a> {
    /// Parse, walk and, if the walk removed anything, render. The rendered
    /// text must parse again or the whole transformation fails.
    pub fn transform(&self, source: &str) -> std::result::Result<Transformation, TransformError> {
        let tree = self.parser.parse(source)?;
        let outcome = remove_debug_prints(tree, self.rules);
        if !outcome.changed() {
            return Ok(Transformation {
                output: None,
                removed_statements: 0,
                removed_comments: 0,
            });
        }

        let rendered = serializer::render(&outcome.tree, self.printer)?;
        self.parser
            .parse(&rendered)
            .map_err(RenderError::Unparseable)?;

        Ok(Transformation {
            output: (rendered != source).then_some(rendered),
            removed_statements: outcome.removed_statements,
            removed_comments: outcome.removed_comments,
        })
    }

    /// Clean one file. Unless it changed and `mode` is [`WriteMode::Write`],
    /// the file is not touched.
    pub fn process_file(&self, path: &Path, mode: WriteMode) -> Result<FileReport> {
        debug!(path = %path.display(), "processing");
        let source = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        let transformation = self
            .transform(&source)
            .map_err(|e| Error::from_transform(path, e))?;

        let mut report = FileReport {
            path: path.to_path_buf(),
            changed: transformation.output.is_some(),
            written: false,
            removed_statements: transformation.removed_statements,
            removed_comments: transformation.removed_comments,
        };

        match (transformation.output, mode) {
            (Some(output), WriteMode::Write) => {
                replace_file(path, &output)?;
                report.written = true;
                info!(
                    path = %path.display(),
                    statements = report.removed_statements,
                    comments = report.removed_comments,
                    "removed debug prints"
                );
            }
            (Some(_), WriteMode::DryRun) => {
                debug!(path = %path.display(), "would change (dry run)");
            }
            (None, _) => debug!(path = %path.display(), "no debug prints"),
        }
        Ok(report)
    }

    /// Clean every file independently, in parallel. Results keep the order
    /// of `paths`.
    pub fn process_all(&self, paths: &[PathBuf], mode: WriteMode) -> Vec<Result<FileReport>> {
        paths
            .par_iter()
            .map(|path| self.process_file(path, mode))
            .collect()
    }
}

/// Clean `path` in place with the built-in rule table.
pub fn process_file(path: &Path) -> Result<FileReport> {
    let rules = RuleSet::defaults();
    CleanupUsecase {
        parser: &GoParser,
        printer: &GoPrinter,
        rules: &rules,
    }
    .process_file(path, WriteMode::Write)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(source: &str) -> Transformation {
        let rules = RuleSet::defaults();
        CleanupUsecase {
            parser: &GoParser,
            printer: &GoPrinter,
            rules: &rules,
        }
        .transform(source)
        .unwrap()
    }

    #[test]
    fn test_unchanged_source_has_no_output() {
        let t = transform("package main\n\nfunc main() {\n\tfmt.Printf(\"keep\")\n}\n");
        assert_eq!(t.output, None);
        assert_eq!((t.removed_statements, t.removed_comments), (0, 0));
    }

    #[test]
    fn test_output_is_stable() {
        let source = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"a\")\n\n\n\n\tx := 1\n\t// log.Println(x)\n\tuse(x)\n}\n";
        let first = transform(source);
        assert_eq!(first.removed_statements, 1);
        assert_eq!(first.removed_comments, 1);
        let output = first.output.unwrap();
        assert!(!output.contains("\n\n\n"));

        let second = transform(&output);
        assert_eq!(second.output, None);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let rules = RuleSet::defaults();
        let usecase = CleanupUsecase {
            parser: &GoParser,
            printer: &GoPrinter,
            rules: &rules,
        };
        let err = usecase.transform("package main\n\nfunc main() {\n").unwrap_err();
        assert!(matches!(err, TransformError::Parse(_)));
    }
}
