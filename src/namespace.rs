use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};

pub fn is_name_start_char(c: char) -> bool {
    // ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6] | [#xD8-#xF6] | [#xF8-#x2FF] | [#x370-#x37D] | [#x37F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF] | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
    matches!(c,
        ':'
        | 'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

pub fn is_name_char(c: char) -> bool {
    // NameStartChar | "-" | "." | [0-9] | #xB7 | [#x0300-#x036F] | [#x203F-#x2040]
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Is `name` usable as an XML element or attribute name.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

// Local parts end up after a `prefix:`, so a second colon is not allowed.
fn is_local_name(name: &str) -> bool {
    is_xml_name(name) && !name.contains(':')
}

/// A pair label resolved against a [`PrefixTable`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QualifiedName<'a> {
    pub prefix: &'a str,
    pub namespace: &'a str,
    pub local: &'a str,
}

impl QualifiedName<'_> {
    /// `prefix:local`
    pub fn qname(&self) -> String {
        format!("{}:{}", self.prefix, self.local)
    }

    /// The `xmlns:prefix` attribute name declaring this namespace.
    pub fn xmlns(&self) -> String {
        format!("xmlns:{}", self.prefix)
    }
}

/// Short prefix to candidate namespace URIs.
///
/// Only the first candidate of each prefix is used when rendering, with
/// any trailing `/` removed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PrefixTable {
    prefixes: IndexMap<String, Vec<String>>,
}

impl PrefixTable {
    pub fn new() -> Self {
        PrefixTable { prefixes: IndexMap::new() }
    }

    /// The vocabularies the publishing layer exposes by default.
    pub fn common() -> Self {
        PrefixTable::new()
            .with("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#")
            .with("rdfs", "http://www.w3.org/2000/01/rdf-schema#")
            .with("owl", "http://www.w3.org/2002/07/owl#")
            .with("xsd", "http://www.w3.org/2001/XMLSchema#")
            .with("dc", "http://purl.org/dc/elements/1.1/")
            .with("dcterms", "http://purl.org/dc/terms/")
            .with("edm", "http://www.europeana.eu/schemas/edm/")
            .with("ore", "http://www.openarchives.org/ore/terms/")
            .with("skos", "http://www.w3.org/2004/02/skos/core#")
            .with("foaf", "http://xmlns.com/foaf/0.1/")
            .with("nave", "http://schemas.delving.eu/nave/terms/")
    }

    /// Load a table from a JSON object. Each value is either one URI or
    /// an array of candidate URIs.
    ///
    /// ```
    /// let table = lod_render::PrefixTable::from_json(
    ///     r#"{"dc": ["http://purl.org/dc/elements/1.1/", "http://purl.org/dc/terms/"]}"#
    /// ).unwrap();
    /// assert_eq!(table.namespace("dc"), Some("http://purl.org/dc/elements/1.1"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = match value {
            Value::Object(object) => object,
            other => return Err(Error::InvalidPrefixTable(
                format!("expected an object, found {}", other)
            )),
        };

        let mut table = PrefixTable::new();
        for (prefix, uris) in object {
            let candidates = match uris {
                Value::String(uri) => vec![uri],
                Value::Array(items) => items.into_iter()
                    .map(|item| match item {
                        Value::String(uri) => Ok(uri),
                        other => Err(Error::InvalidPrefixTable(
                            format!("prefix `{}`: expected a URI string, found {}", prefix, other)
                        )),
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => return Err(Error::InvalidPrefixTable(
                    format!("prefix `{}`: expected a URI or a list of URIs, found {}", prefix, other)
                )),
            };
            if candidates.is_empty() {
                return Err(Error::InvalidPrefixTable(
                    format!("prefix `{}` has no namespace URI", prefix)
                ));
            }
            table.insert_candidates(prefix, candidates)?;
        }
        Ok(table)
    }

    pub fn with<P: Into<String>, U: Into<String>>(mut self, prefix: P, uri: U) -> Self {
        self.insert(prefix, uri);
        self
    }

    /// Add `uri` as a candidate for `prefix`, after any existing ones.
    pub fn insert<P: Into<String>, U: Into<String>>(&mut self, prefix: P, uri: U) {
        self.prefixes.entry(prefix.into()).or_default().push(uri.into());
    }

    /// Replace the candidates for `prefix`.
    pub fn insert_candidates<P: Into<String>>(&mut self, prefix: P, uris: Vec<String>) -> Result<()> {
        let prefix = prefix.into();
        if !is_local_name(&prefix) || prefix.contains('_') {
            return Err(Error::InvalidPrefixTable(format!("`{}` is not a usable prefix", prefix)));
        }
        self.prefixes.insert(prefix, uris);
        Ok(())
    }

    /// The namespace URI rendered for `prefix`.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .get(prefix)
            .and_then(|uris| uris.first())
            .map(|uri| uri.trim_end_matches('/'))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.keys().map(|p| p.as_str())
    }

    /// Split a `prefix_localname` label and look up its namespace.
    ///
    /// Everything after the first `_` is the local name, so
    /// `edm_isShownAt` and `nave_date_created` both resolve.
    pub fn resolve<'a>(&'a self, label: &'a str) -> Result<QualifiedName<'a>> {
        let (prefix, local) = match label.find('_') {
            Some(pos) => (&label[..pos], &label[pos + 1..]),
            None => return Err(Error::InvalidPair(label.to_string())),
        };

        // Prefixes added through `insert` are only checked here.
        if !is_local_name(prefix) || !is_local_name(local) {
            return Err(Error::InvalidPair(label.to_string()));
        }

        let namespace = self.namespace(prefix)
            .ok_or_else(|| Error::UnresolvedNamespace { prefix: prefix.to_string() })?;

        tracing::trace!(label, prefix, namespace, "resolved pair label");
        Ok(QualifiedName { prefix, namespace, local })
    }
}
