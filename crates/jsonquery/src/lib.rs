//! # jsonquery
//!
//! Ordered JSON document trees for path-query engines.
//!
//! A JSON document is decoded into an immutable [`Tree`] where every object member and array
//! element becomes a node. Members are labelled by their keys, array elements by [`ELEMENT`],
//! and scalars keep their exact source text. Query engines walk the tree through the
//! [`Navigator`] trait and matched nodes are turned back into JSON with [`nodes_to_value`],
//! either as bare values or as minimal fragments rooted at the document.
//!
//! ```rust
//! use jsonquery::{Mode, Navigator};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), jsonquery::Error> {
//! let tree = jsonquery::parse_str(r#"{"top": {"people": [{"name": "joe"}, {"name": "mark"}]}}"#)?;
//! let names: Vec<_> = tree
//!     .document()
//!     .descendants()
//!     .filter(|node| node.cursor().local_name() == "name")
//!     .collect();
//! assert_eq!(
//!     jsonquery::nodes_to_value(names.iter().copied(), Mode::Flat),
//!     json!(["joe", "mark"])
//! );
//! assert_eq!(
//!     jsonquery::nodes_to_value(names.iter().copied(), Mode::FullPath),
//!     json!([
//!         {"top": {"people": [{"name": "joe"}]}},
//!         {"top": {"people": [{"name": "mark"}]}}
//!     ])
//! );
//! # Ok(())
//! # }
//! ```
mod convert;
mod decode;
mod error;
mod navigator;
mod options;
mod tree;

use std::io;

pub use convert::{nodes_to_value, Mode};
pub use error::{Error, ErrorKind};
pub use navigator::{Cursor, Navigator, NodeType, PathEngine};
pub use options::DecodeOptions;
pub use tree::{
    Children, Descendants, Layout, NodeId, NodeKind, NodeRef, Scalar, Tree, XmlAdapter, ELEMENT,
};

/// Create a builder for configuring how documents are decoded.
#[must_use]
pub fn options() -> DecodeOptions {
    DecodeOptions::default()
}

/// Decode a JSON document read from `reader` with default options.
///
/// # Errors
///
/// Fails on malformed JSON, read errors, or documents nested deeper than 128 levels.
pub fn parse<R: io::Read>(reader: R) -> Result<Tree, Error> {
    options().parse(reader)
}

/// Decode a JSON document from a string with default options.
///
/// # Errors
///
/// Fails on malformed JSON or documents nested deeper than 128 levels.
pub fn parse_str(input: &str) -> Result<Tree, Error> {
    options().parse_str(input)
}

/// Decode a JSON document from raw bytes with default options.
///
/// # Errors
///
/// Fails on malformed JSON or documents nested deeper than 128 levels.
pub fn parse_slice(input: &[u8]) -> Result<Tree, Error> {
    options().parse_slice(input)
}

/// Build a tree from an already decoded JSON value with default options.
///
/// # Errors
///
/// Fails on values nested deeper than 128 levels.
pub fn from_value(value: &serde_json::Value) -> Result<Tree, Error> {
    options().build(value)
}
