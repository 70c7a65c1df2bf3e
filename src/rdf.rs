use indexmap::IndexMap;
use oxiri::Iri;
use rio_api::{
    formatter::TriplesFormatter,
    model::{Literal, Subject, Term, Triple},
    parser::TriplesParser,
};
use rio_turtle::{NTriplesFormatter, TurtleFormatter, TurtleParser};
use rio_xml::RdfXmlFormatter;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::Renderer;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
    /// Expanded JSON-LD.
    JsonLd,
}

impl RdfFormat {
    pub const ALL: [RdfFormat; 4] = [
        RdfFormat::NTriples,
        RdfFormat::Turtle,
        RdfFormat::RdfXml,
        RdfFormat::JsonLd,
    ];

    /// The short name used in `?format=` negotiation.
    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::NTriples => "nt",
            RdfFormat::Turtle => "turtle",
            RdfFormat::RdfXml => "rdf",
            RdfFormat::JsonLd => "json-ld",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::NTriples => "text/plain",
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::JsonLd => "application/json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        RdfFormat::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Re-serializes a resource description held as N3/Turtle text.
#[derive(Clone, Debug)]
pub struct RdfRenderer {
    format: RdfFormat,
    base: Option<Iri<String>>,
}

impl RdfRenderer {
    pub fn new(format: RdfFormat) -> Self {
        RdfRenderer { format, base: None }
    }

    /// Resolve relative IRIs in the input against `base`.
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        let iri = Iri::parse(base.to_string())
            .map_err(|e| Error::InvalidBaseIri(format!("{}: {}", base, e)))?;
        self.base = Some(iri);
        Ok(self)
    }

    pub fn rdf_format(&self) -> RdfFormat {
        self.format
    }

    /// Parse `input` as Turtle and write every triple in the target format.
    pub fn convert(&self, input: &str) -> Result<String> {
        let sink = match self.format {
            RdfFormat::NTriples => {
                let mut formatter = NTriplesFormatter::new(Vec::new());
                self.parse_into(input, |t| Ok(formatter.format(t)?))?;
                formatter.finish()?
            }
            RdfFormat::Turtle => {
                let mut formatter = TurtleFormatter::new(Vec::new());
                self.parse_into(input, |t| Ok(formatter.format(t)?))?;
                formatter.finish()?
            }
            RdfFormat::RdfXml => {
                let mut formatter = RdfXmlFormatter::new(Vec::new())?;
                self.parse_into(input, |t| Ok(formatter.format(t)?))?;
                formatter.finish()?
            }
            RdfFormat::JsonLd => {
                let mut document = ExpandedJsonLd::default();
                self.parse_into(input, |t| document.push(t))?;
                document.finish()?
            }
        };
        Ok(String::from_utf8(sink)?)
    }

    fn parse_into<F>(&self, input: &str, mut sink: F) -> Result<usize>
    where F: FnMut(&Triple<'_>) -> Result<()>,
    {
        let mut count = 0;
        let mut parser = TurtleParser::new(input.as_bytes(), self.base.clone());
        parser.parse_all(&mut |t| -> Result<()> {
            sink(&t)?;
            count += 1;
            Ok(())
        })?;
        tracing::debug!(count, format = self.format.name(), "re-serialized triples");
        Ok(count)
    }
}

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Groups triples by subject into expanded JSON-LD node objects.
///
/// Subjects keep the order they are first seen in, properties the order
/// of their first triple. Literal values stay strings.
#[derive(Debug, Default)]
struct ExpandedJsonLd {
    nodes: IndexMap<String, Map<String, Value>>,
}

impl ExpandedJsonLd {
    fn push(&mut self, triple: &Triple<'_>) -> Result<()> {
        let id = match triple.subject {
            Subject::NamedNode(node) => node.iri.to_string(),
            Subject::BlankNode(node) => format!("_:{}", node.id),
            other => return Err(Error::UnsupportedNode(format!("subject {}", other))),
        };
        let node = self.nodes.entry(id.clone()).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(id));
            node
        });

        if let (RDF_TYPE, Term::NamedNode(class)) = (triple.predicate.iri, triple.object) {
            append(node, "@type", Value::String(class.iri.to_string()));
            return Ok(());
        }

        let object = match triple.object {
            Term::NamedNode(target) => json!({ "@id": target.iri }),
            Term::BlankNode(target) => json!({ "@id": format!("_:{}", target.id) }),
            Term::Literal(Literal::Simple { value }) => json!({ "@value": value }),
            Term::Literal(Literal::LanguageTaggedString { value, language }) => {
                json!({ "@value": value, "@language": language })
            }
            Term::Literal(Literal::Typed { value, datatype }) => {
                json!({ "@value": value, "@type": datatype.iri })
            }
            other => return Err(Error::UnsupportedNode(format!("object {}", other))),
        };
        append(node, triple.predicate.iri, object);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let nodes: Vec<Value> = self.nodes.into_iter().map(|(_, node)| Value::Object(node)).collect();
        Ok(serde_json::to_vec_pretty(&nodes)?)
    }
}

fn append(node: &mut Map<String, Value>, key: &str, value: Value) {
    if let Value::Array(values) = node.entry(key).or_insert_with(|| Value::Array(vec![])) {
        values.push(value);
    }
}

impl Renderer for RdfRenderer {
    type Input = str;

    fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    fn format(&self) -> &'static str {
        self.format.name()
    }

    fn render(&self, data: Option<&str>) -> Result<String> {
        match data {
            Some(input) => self.convert(input),
            None => Ok(String::new()),
        }
    }
}
