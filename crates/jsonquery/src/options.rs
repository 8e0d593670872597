use std::io;

use serde::Deserialize;
use serde_json::Value;

use crate::{decode, Error, Tree};

/// Default nesting limit. Matches the recursion limit `serde_json` applies while lexing text.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for decoding JSON documents into a [`Tree`].
///
/// ```rust
/// # fn main() -> Result<(), jsonquery::Error> {
/// let tree = jsonquery::options()
///     .with_max_depth(4)
///     .parse_str(r#"{"top": {"inner": [0, 1, 2, 3]}}"#)?;
/// assert_eq!(tree.document().inner_text(), "0123");
/// # Ok(())
/// # }
/// ```
///
/// Options can also be embedded in a host application's configuration:
///
/// ```rust
/// let options: jsonquery::DecodeOptions =
///     serde_json::from_str(r#"{"max_depth": 16}"#).expect("Valid options");
/// assert_eq!(options.max_depth(), 16);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Limit how many containers may be nested inside each other.
    ///
    /// The top-level object or array counts as the first level. Text input is additionally
    /// subject to the lexer's own limit of 128 levels.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode a JSON document read from `reader`.
    ///
    /// The reader is consumed without internal buffering; wrap it in [`io::BufReader`] when it
    /// is backed by a file or a socket.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, on read errors, and when the nesting limit is exceeded.
    pub fn parse<R: io::Read>(&self, reader: R) -> Result<Tree, Error> {
        let value = serde_json::from_reader(reader).map_err(log_failure)?;
        self.build(&value)
    }

    /// Decode a JSON document from a string.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON and when the nesting limit is exceeded.
    pub fn parse_str(&self, input: &str) -> Result<Tree, Error> {
        let value = serde_json::from_str(input).map_err(log_failure)?;
        self.build(&value)
    }

    /// Decode a JSON document from raw bytes.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON and when the nesting limit is exceeded.
    pub fn parse_slice(&self, input: &[u8]) -> Result<Tree, Error> {
        let value = serde_json::from_slice(input).map_err(log_failure)?;
        self.build(&value)
    }

    /// Import an already decoded JSON value without lexing it again.
    ///
    /// # Errors
    ///
    /// Fails when the nesting limit is exceeded.
    pub fn build(&self, value: &Value) -> Result<Tree, Error> {
        decode::build(value, self.max_depth).inspect_err(|error| {
            tracing::debug!(%error, "Failed to build a JSON tree");
        })
    }
}

fn log_failure(error: serde_json::Error) -> Error {
    let error = Error::from(error);
    tracing::debug!(
        %error,
        line = error.line(),
        column = error.column(),
        "Failed to decode JSON document"
    );
    error
}
