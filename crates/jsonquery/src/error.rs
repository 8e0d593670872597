use core::fmt;

/// An error that occurred while decoding a JSON document into a [`Tree`](crate::Tree).
///
/// Decoding is all-or-nothing: when this error is returned, no part of the tree is exposed.
#[derive(Debug)]
pub struct Error {
    repr: Box<ErrorRepr>,
}

#[derive(Debug)]
struct ErrorRepr {
    kind: ErrorKind,
    line: usize,
    column: usize,
    source: Option<serde_json::Error>,
}

/// The category of a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input is not valid JSON, or it ended prematurely.
    Syntax,
    /// Reading from the underlying source failed.
    Io,
    /// The document is nested deeper than the configured limit.
    DepthLimitExceeded { limit: usize },
}

impl Error {
    pub(crate) fn depth_limit_exceeded(limit: usize) -> Self {
        Self {
            repr: Box::new(ErrorRepr {
                kind: ErrorKind::DepthLimitExceeded { limit },
                line: 0,
                column: 0,
                source: None,
            }),
        }
    }

    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }

    /// One-based line of the offending input, or `0` when the error has no textual location.
    #[must_use]
    pub fn line(&self) -> usize {
        self.repr.line
    }

    /// One-based column of the offending input, or `0` when the error has no textual location.
    #[must_use]
    pub fn column(&self) -> usize {
        self.repr.column
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        let kind = if error.is_io() {
            ErrorKind::Io
        } else {
            ErrorKind::Syntax
        };
        Self {
            repr: Box::new(ErrorRepr {
                kind,
                line: error.line(),
                column: error.column(),
                source: Some(error),
            }),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.repr.kind, &self.repr.source) {
            (ErrorKind::DepthLimitExceeded { limit }, _) => {
                write!(f, "Document nesting exceeds the limit of {limit} levels")
            }
            (ErrorKind::Io, Some(source)) => write!(f, "Failed to read JSON input: {source}"),
            (_, Some(source)) => write!(f, "Invalid JSON document: {source}"),
            (_, None) => f.write_str("Invalid JSON document"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.repr
            .source
            .as_ref()
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}
