use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The source text is not valid Go.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at {line}:{column} near `{snippet}`")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("missing `{expected}` at {line}:{column}")]
    Missing {
        line: usize,
        column: usize,
        expected: String,
    },

    #[error("failed to load Go grammar: {0}")]
    Language(String),

    #[error("parser returned no tree")]
    NoTree,
}

/// A tree could not be turned back into valid source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("span {start}..{end} is outside the source text")]
    InvalidSpan { start: usize, end: usize },

    #[error("rendered output is not valid Go: {0}")]
    Unparseable(ParseError),
}

/// Failure of the in-memory part of the pipeline.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn from_transform(path: impl Into<PathBuf>, err: TransformError) -> Self {
        let path = path.into();
        match err {
            TransformError::Parse(source) => Error::Parse { path, source },
            TransformError::Render(source) => Error::Render { path, source },
        }
    }

    /// Path of the file the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Parse { path, .. }
            | Error::Render { path, .. }
            | Error::Io { path, .. }
            | Error::Config { path, .. } => path,
        }
    }
}
