//! Response renderers for a Linked Open Data publishing layer.
//!
//! The main piece is [`XmlRenderer`], which turns a nested, ordered
//! [`Node`] into namespaced XML, inferring element names from map keys
//! and namespaces from `prefix_localname` pair labels. [`RdfRenderer`]
//! re-serializes Turtle/N3 descriptions and [`PassthroughRenderer`]
//! covers bodies that need no conversion.
//!
//! All renderers are pure: they borrow their input, perform no I/O and
//! can be shared between threads.

pub mod error;
pub mod namespace;
pub mod node;
pub mod passthrough;
pub mod rdf;
pub mod xml;

pub use error::{Error, Result};
pub use namespace::{PrefixTable, QualifiedName};
pub use node::{Node, NodeMap, Scalar};
pub use passthrough::PassthroughRenderer;
pub use rdf::{RdfFormat, RdfRenderer};
pub use xml::{XmlRenderer, XmlRendererConfig, DEFAULT_ITEM_TAG};

/// A response body format selected by content negotiation.
pub trait Renderer {
    type Input: ?Sized;

    fn media_type(&self) -> &'static str;

    /// Short name used for `?format=` style negotiation.
    fn format(&self) -> &'static str;

    fn charset(&self) -> Option<&'static str> {
        Some("utf-8")
    }

    /// `Content-Type` header value.
    fn content_type(&self) -> String {
        match self.charset() {
            Some(charset) => format!("{}; charset={}", self.media_type(), charset),
            None => self.media_type().to_string(),
        }
    }

    /// Render `data`; `None` renders as an empty body.
    fn render(&self, data: Option<&Self::Input>) -> Result<String>;
}
