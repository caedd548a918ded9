//! Decoded document tree that keeps every mapping entry in source order
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::sync::OnceLock;

/// A decoded YAML value
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Sequence(_) => "list",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Render the value for a violation's "found" field
    pub fn describe(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Bool(b) => format!("boolean {}", b),
            Node::Integer(i) => format!("integer {}", i),
            Node::Float(x) => format!("float {}", x),
            Node::String(s) => format!("string '{}'", s),
            Node::Sequence(items) => format!("list of {} item(s)", items.len()),
            Node::Mapping(mapping) => format!("mapping with {} key(s)", mapping.len()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

/// Mapping entries in document order, duplicates included
///
/// Lookups return the first occurrence. Repeated keys are kept so the
/// duplicate-key guard can report them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>>(&mut self, key: K, value: Node) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// String value of `key`, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a YAML scalar, sequence or mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Node, E> {
        Ok(Node::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Node, E> {
        Ok(Node::Integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Node, E> {
        Ok(i64::try_from(value)
            .map(Node::Integer)
            .unwrap_or(Node::Float(value as f64)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Node, E> {
        Ok(Node::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::String(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some(KeyText(key)) = map.next_key::<KeyText>()? {
            let value = map.next_value::<Node>()?;
            mapping.push(key, value);
        }
        Ok(Node::Mapping(mapping))
    }
}

/// A mapping key exactly as written in the source
struct KeyText(String);

impl<'de> Deserialize<'de> for KeyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(KeyTextVisitor)
    }
}

struct KeyTextVisitor;

impl<'de> Visitor<'de> for KeyTextVisitor {
    type Value = KeyText;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar mapping key")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<KeyText, E> {
        Ok(KeyText(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<KeyText, E> {
        Ok(KeyText(value))
    }
}

static YAML11_INT: OnceLock<Regex> = OnceLock::new();
static YAML11_FLOAT: OnceLock<Regex> = OnceLock::new();

/// Whether a plain scalar resolves to a number under the YAML 1.1 rules
///
/// YAML 1.2 also reads forms like `5319e7` or `0o17` as numbers; YAML 1.1
/// keeps them as strings.
pub fn is_yaml11_number(text: &str) -> bool {
    let int = YAML11_INT.get_or_init(|| {
        Regex::new(
            r"^(?:[-+]?0b[01_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
        )
        .expect("int pattern is valid")
    });
    let float = YAML11_FLOAT.get_or_init(|| {
        Regex::new(
            r"^(?:[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
        )
        .expect("float pattern is valid")
    });
    int.is_match(text) || float.is_match(text)
}

/// Re-reads the source along an already decoded tree
///
/// Numbers whose source text is not a YAML 1.1 number come back as
/// strings holding that text; everything else is kept as decoded.
pub(crate) struct SourceText<'a>(pub &'a Node);

impl<'de, 'a> DeserializeSeed<'de> for SourceText<'a> {
    type Value = Node;

    fn deserialize<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Node::Integer(_) | Node::Float(_) => {
                let KeyText(text) = KeyText::deserialize(deserializer)?;
                if is_yaml11_number(&text) {
                    Ok(self.0.clone())
                } else {
                    Ok(Node::String(text))
                }
            }
            Node::Sequence(items) => deserializer.deserialize_seq(SequenceText(items)),
            Node::Mapping(mapping) => deserializer.deserialize_map(MappingText(mapping)),
            other => {
                IgnoredAny::deserialize(deserializer)?;
                Ok(other.clone())
            }
        }
    }
}

fn shape_changed<E: de::Error>() -> E {
    de::Error::custom("document shape changed while re-reading scalars")
}

struct SequenceText<'a>(&'a [Node]);

impl<'de, 'a> Visitor<'de> for SequenceText<'a> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(self.0.len());
        for decoded in self.0 {
            let item = seq
                .next_element_seed(SourceText(decoded))?
                .ok_or_else(shape_changed::<A::Error>)?;
            items.push(item);
        }
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(shape_changed());
        }
        Ok(Node::Sequence(items))
    }
}

struct MappingText<'a>(&'a Mapping);

impl<'de, 'a> Visitor<'de> for MappingText<'a> {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        let mut decoded = self.0.iter();
        while let Some(KeyText(key)) = map.next_key::<KeyText>()? {
            let (_, value) = decoded.next().ok_or_else(shape_changed::<A::Error>)?;
            let value = map.next_value_seed(SourceText(value))?;
            mapping.push(key, value);
        }
        Ok(Node::Mapping(mapping))
    }
}
