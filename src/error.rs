use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Everything that can abort a render.
///
/// None of these are expected in normal operation: they mean the
/// upstream data does not have the shape the renderer assumes. A
/// failed render never yields partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// A `prefix_localname` label whose prefix is not in the prefix table.
    #[error("no namespace registered for prefix `{prefix}`")]
    UnresolvedNamespace { prefix: String },

    /// A pair label that cannot be split into a prefix and a local name.
    #[error("invalid pair label `{0}`")]
    InvalidPair(String),

    /// A node in a position where the current rule cannot render it.
    #[error("unsupported node: {0}")]
    UnsupportedNode(String),

    /// A map key that is not a legal XML element name.
    #[error("`{0}` is not a valid XML element name")]
    InvalidElementName(String),

    #[error("invalid prefix table: {0}")]
    InvalidPrefixTable(String),

    #[error("invalid base IRI: {0}")]
    InvalidBaseIri(String),

    #[error("RDF syntax error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
