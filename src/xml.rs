use quick_xml::{Writer, escape::partial_escape, events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event}};
use std::{borrow::Cow, io::Write};

use crate::error::{Error, Result};
use crate::namespace::{is_xml_name, PrefixTable};
use crate::node::{Node, NodeMap, Scalar};
use crate::Renderer;

/// Item tag used when nothing more specific can be inferred.
pub const DEFAULT_ITEM_TAG: &str = "list-item";

// Inner tags that are dropped unless the first entry carries `i18n`.
const WRAPPERLESS_TAGS: [&str; 3] = ["item", "field", "relateditem"];

// Tags whose items collapse into one element with attributes.
const FLATTENED_TAGS: [&str; 2] = ["breadcrumb", "link"];

// Checked in this order, first present wins.
const DISPLAY_KEYS: [&str; 3] = ["display", "pageNumber", "displayString"];

#[derive(Clone, Debug)]
pub struct XmlRendererConfig {
    indent: usize,
    item_tag: String,
    prefixes: PrefixTable,
}

impl Default for XmlRendererConfig {
    fn default() -> Self {
        XmlRendererConfig::none()
    }
}

impl XmlRendererConfig {
    /// Compact output.
    pub fn none() -> Self {
        XmlRendererConfig {
            indent: 0,
            item_tag: DEFAULT_ITEM_TAG.to_string(),
            prefixes: PrefixTable::new(),
        }
    }

    /// Four space indentation.
    pub fn all() -> Self {
        XmlRendererConfig::none().indent(4)
    }

    pub fn prefixes(mut self, prefixes: PrefixTable) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn item_tag<S: Into<String>>(mut self, item_tag: S) -> Self {
        self.item_tag = item_tag.into();
        self
    }
}

/// Renders a [`Node`] as an XML document.
///
/// Element names come from map keys. Plural keys holding maps get a
/// singular wrapper per entry (`items` → `item`), labelled pairs become
/// namespaced elements, and `breadcrumb`/`link` entries are collapsed
/// into a single element whose display field is the text and whose
/// other fields are attributes.
///
/// ```
/// use lod_render::{Node, PrefixTable, XmlRenderer, XmlRendererConfig};
///
/// let renderer = XmlRenderer::new(
///     XmlRendererConfig::none().prefixes(PrefixTable::common())
/// );
/// let doc = Node::map(vec![("title", Node::seq(vec![Node::pair("dc_title", "Mona Lisa")]))]);
///
/// assert_eq!(
///     renderer.render(Some(&doc)).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><title>\
///      <dc:title xmlns:dc=\"http://purl.org/dc/elements/1.1\">Mona Lisa</dc:title></title>"
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct XmlRenderer {
    config: XmlRendererConfig,
}

impl XmlRenderer {
    pub fn new(config: XmlRendererConfig) -> Self {
        XmlRenderer { config }
    }

    pub fn config(&self) -> &XmlRendererConfig {
        &self.config
    }

    /// Render `data` as a complete document. `None` renders as an empty
    /// string.
    pub fn render(&self, data: Option<&Node>) -> Result<String> {
        self.render_as(data, &self.config.item_tag)
    }

    /// As [`render`](Self::render), but a top level sequence uses
    /// `item_tag` for its entries.
    pub fn render_as(&self, data: Option<&Node>, item_tag: &str) -> Result<String> {
        let data = match data {
            Some(data) => data,
            None => return Ok(String::new()),
        };

        let sink = self.write_as(Vec::new(), data, item_tag).map_err(|e| {
            tracing::warn!(error = %e, "aborted XML render");
            e
        })?;
        let out = String::from_utf8(sink)?;
        tracing::debug!(bytes = out.len(), "rendered XML document");
        Ok(out)
    }

    /// Write `data` to `write` and hand it back once the document is
    /// complete.
    pub fn write<W: Write>(&self, write: W, data: &Node) -> Result<W> {
        self.write_as(write, data, &self.config.item_tag)
    }

    fn write_as<W: Write>(&self, write: W, data: &Node, item_tag: &str) -> Result<W> {
        let writer = if self.config.indent > 0 {
            Writer::new_with_indent(write, b' ', self.config.indent)
        } else {
            Writer::new(write)
        };

        let mut emitter = Emitter {
            writer,
            prefixes: &self.config.prefixes,
            item_tag: &self.config.item_tag,
        };

        emitter.writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        emitter.emit(data, Tag::Named(item_tag))?;
        Ok(emitter.writer.into_inner())
    }
}

impl Renderer for XmlRenderer {
    type Input = Node;

    fn media_type(&self) -> &'static str {
        "application/xml"
    }

    fn format(&self) -> &'static str {
        "xml"
    }

    fn render(&self, data: Option<&Node>) -> Result<String> {
        XmlRenderer::render(self, data)
    }
}

// How the entries of a sequence are wrapped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tag<'t> {
    // Entries are written in place, no wrapper element.
    Inline,
    Named(&'t str),
}

/// `items` → `item`; keys not ending in `s` are only lower-cased.
fn inner_tag_name(key: &str) -> String {
    let lower = key.to_lowercase();
    if key.ends_with('s') {
        lower[..lower.len() - 1].to_string()
    } else {
        lower
    }
}

/// Character data for a scalar. Booleans keep their capitalised form
/// here; only attributes are normalized to `true`/`false`.
fn text_value(scalar: &Scalar) -> Cow<'_, str> {
    match scalar {
        Scalar::Bool(true) => Cow::Borrowed("True"),
        Scalar::Bool(false) => Cow::Borrowed("False"),
        Scalar::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

// Null attributes are written with an empty value.
fn attribute_value(key: &str, value: &Node) -> Result<String> {
    match value {
        Node::Scalar(scalar) => Ok(scalar.to_string()),
        other => Err(Error::UnsupportedNode(
            format!("attribute `{}` must be a scalar, found {}", key, other.kind())
        )),
    }
}

struct Emitter<'c, W: Write> {
    writer: Writer<W>,
    prefixes: &'c PrefixTable,
    item_tag: &'c str,
}

impl<'c, W: Write> Emitter<'c, W> {
    fn default_tag(&self) -> Tag<'c> {
        Tag::Named(self.item_tag)
    }

    fn start(&mut self, name: &str) -> Result<()> {
        if !is_xml_name(name) {
            return Err(Error::InvalidElementName(name.to_string()));
        }
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if !text.is_empty() {
            // Quotes stay literal in text, only `&`, `<` and `>` are escaped.
            self.writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        }
        Ok(())
    }

    fn emit(&mut self, node: &Node, tag: Tag<'_>) -> Result<()> {
        match node {
            Node::Scalar(Scalar::Null) => Ok(()),
            Node::Scalar(scalar) => self.text(&text_value(scalar)),
            Node::Pair(label, value) => self.emit_pair(label, value),
            Node::Map(map) => self.emit_map(map, tag),
            Node::Sequence(items) => self.emit_sequence(items, tag),
        }
    }

    fn emit_sequence(&mut self, items: &[Node], tag: Tag<'_>) -> Result<()> {
        for item in items {
            match (tag, item) {
                (Tag::Inline, _) => {
                    let tag = self.default_tag();
                    self.emit(item, tag)?
                }
                (_, Node::Pair(label, value)) => self.emit_pair(label, value)?,
                (Tag::Named(name), _) if FLATTENED_TAGS.contains(&name) => {
                    self.emit_flattened(name, item)?
                }
                (Tag::Named(name), _) => {
                    self.start(name)?;
                    let tag = self.default_tag();
                    self.emit(item, tag)?;
                    self.end(name)?;
                }
            }
        }
        Ok(())
    }

    fn emit_pair(&mut self, label: &str, value: &Node) -> Result<()> {
        let name = self.prefixes.resolve(label)?;
        let qname = name.qname();

        let mut open = BytesStart::new(qname.as_str());
        open.push_attribute((name.xmlns().as_str(), name.namespace));
        self.writer.write_event(Event::Start(open))?;

        let tag = self.default_tag();
        self.emit(value, tag)?;
        self.end(&qname)
    }

    fn emit_flattened(&mut self, name: &str, item: &Node) -> Result<()> {
        let fields = item.as_map().ok_or_else(|| Error::UnsupportedNode(
            format!("`{}` entries must be maps, found {}", name, item.kind())
        ))?;

        let display_key = DISPLAY_KEYS.iter()
            .copied()
            .find(|key| fields.contains_key(*key));

        let mut open = BytesStart::new(name);
        for (key, value) in fields {
            if Some(key.as_str()) == display_key {
                continue;
            }
            if !is_xml_name(key) {
                return Err(Error::InvalidElementName(key.clone()));
            }
            let value = attribute_value(key, value)?;
            open.push_attribute((key.as_str(), value.as_str()));
        }
        self.writer.write_event(Event::Start(open))?;

        // A null display value leaves the element without text.
        if let Some(key) = display_key {
            match &fields[key] {
                Node::Scalar(scalar) => self.text(&text_value(scalar))?,
                other => return Err(Error::UnsupportedNode(
                    format!("display field `{}` must be a scalar, found {}", key, other.kind())
                )),
            }
        }
        self.end(name)
    }

    fn emit_map(&mut self, map: &NodeMap, tag: Tag<'_>) -> Result<()> {
        for (key, value) in map {
            self.emit_entry(key, value, tag)?;
        }
        Ok(())
    }

    fn emit_entry(&mut self, key: &str, value: &Node, tag: Tag<'_>) -> Result<()> {
        self.start(key)?;

        match value {
            Node::Sequence(items) if matches!(items.first(), Some(Node::Map(_))) => {
                let inner = inner_tag_name(key);
                let first_has_i18n = items[0].as_map()
                    .map_or(false, |first| first.contains_key("i18n"));
                let inner_tag = if WRAPPERLESS_TAGS.contains(&inner.as_str()) && !first_has_i18n {
                    Tag::Inline
                } else {
                    Tag::Named(&inner)
                };
                self.emit_sequence(items, inner_tag)?;
            }
            Node::Map(fields) if key == "fields" => {
                // A list under one label repeats the labelled element.
                for (label, field) in fields {
                    match field {
                        Node::Sequence(entries) => {
                            for entry in entries {
                                self.emit_pair(label, entry)?;
                            }
                        }
                        _ => self.emit_pair(label, field)?,
                    }
                }
            }
            Node::Map(field) if key == "field" => {
                let tag = self.default_tag();
                self.emit_map(field, tag)?;
            }
            Node::Map(layout) if key == "layout" => {
                let inner = layout.get("layout").ok_or_else(|| Error::UnsupportedNode(
                    "`layout` map without a nested `layout` entry".to_string()
                ))?;
                let tag = self.default_tag();
                self.emit_entry("fields", inner, tag)?;
            }
            Node::Scalar(Scalar::String(_)) if matches!(tag, Tag::Inline | Tag::Named("field")) => {
                self.emit(value, Tag::Inline)?;
            }
            _ => {
                let tag = self.default_tag();
                self.emit(value, tag)?;
            }
        }

        self.end(key)
    }
}
