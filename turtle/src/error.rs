//! Error type returned while reading a document.

use std::error::Error;
use std::fmt;
use std::io;

/// Error that might be returned during a read.
///
/// It locates the offending byte in the document: `line` is 1-based,
/// `col` is 0-based and counts bytes, matching the cursor of a text editor.
#[derive(Debug)]
pub struct ReadError {
    pub(crate) name: String,
    pub(crate) line: usize,
    pub(crate) col: usize,
    pub(crate) kind: ReadErrorKind,
}

/// The kinds of fatal errors a read can end with.
///
/// Partial matches inside the grammar ("this production did not apply") are
/// handled internally and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum ReadErrorKind {
    /// The byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The document violates the grammar.
    #[error("{0}")]
    BadSyntax(String),
    /// A token that must be UTF-8 is not.
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,
    /// A reader entry point was called with an unusable argument.
    #[error("{0}")]
    BadArg(String),
    /// A sink asked for the read to stop.
    #[error("cancelled by sink")]
    Cancelled,
}

impl ReadError {
    pub(crate) fn bad_arg(message: String) -> Self {
        Self {
            name: String::new(),
            line: 0,
            col: 0,
            kind: ReadErrorKind::BadArg(message),
        }
    }

    pub(crate) fn with_document(name: &str, kind: ReadErrorKind) -> Self {
        Self {
            name: name.to_owned(),
            line: 0,
            col: 0,
            kind,
        }
    }

    /// The kind of failure.
    pub fn kind(&self) -> &ReadErrorKind {
        &self.kind
    }

    /// The name given to the document being read.
    pub fn document(&self) -> &str {
        &self.name
    }

    /// `(line, col)` of the byte the read stopped at.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            self.kind.fmt(f)
        } else if self.line == 0 {
            write!(f, "{}: {}", self.name, self.kind)
        } else {
            write!(f, "{}:{}:{}: {}", self.name, self.line, self.col, self.kind)
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}
