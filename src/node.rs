use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::fmt::{self, Formatter};

/// Insertion-ordered mapping from element name to content.
pub type NodeMap = IndexMap<String, Node>;

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(true) => f.write_str("true"),
            Scalar::Bool(false) => f.write_str("false"),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// The nested value handed to the XML renderer.
///
/// `Pair` carries a `prefix_localname` label, e.g. `dc_title`, which the
/// renderer turns into a namespaced element.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Pair(String, Box<Node>),
    Map(NodeMap),
    Sequence(Vec<Node>),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn pair<L: Into<String>, V: Into<Node>>(label: L, value: V) -> Self {
        Node::Pair(label.into(), Box::new(value.into()))
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where K: Into<String>,
          V: Into<Node>,
          I: IntoIterator<Item = (K, V)>,
    {
        Node::Map(
            entries.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect()
        )
    }

    pub fn seq<V: Into<Node>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Short description of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Number(_)) => "number",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Pair(..) => "pair",
            Node::Map(_) => "map",
            Node::Sequence(_) => "sequence",
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

impl From<u64> for Node {
    fn from(n: u64) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

// NaN and infinities have no JSON number form and render as nothing.
impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
            .map(|n| Node::Scalar(Scalar::Number(n)))
            .unwrap_or_else(Node::null)
    }
}

impl<V: Into<Node>> From<Option<V>> for Node {
    fn from(o: Option<V>) -> Self {
        o.map(Into::into).unwrap_or_else(Node::null)
    }
}

impl From<Vec<Node>> for Node {
    fn from(v: Vec<Node>) -> Self {
        Node::Sequence(v)
    }
}

impl From<NodeMap> for Node {
    fn from(m: NodeMap) -> Self {
        Node::Map(m)
    }
}

// Objects keep their key order, arrays become sequences. JSON has no
// pair form, so pairs only appear in nodes built by the caller.
impl From<Value> for Node {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Node::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => s.into(),
            Value::Array(items) => Node::seq(items),
            Value::Object(entries) => Node::map(entries),
        }
    }
}
