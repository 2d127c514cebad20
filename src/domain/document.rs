//! Generic document tree
//!
//! A [`Document`] is the format-neutral result of parsing a data file:
//! mappings, sequences and scalar leaves. Mappings keep their keys in the
//! order they were encountered so that re-serialization reproduces the
//! source layout.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use yaml_rust2::scanner::ScanError;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Syntax error: {0}")]
    Parse(#[from] ScanError),

    #[error("Expected a single document in the stream, found more")]
    MultipleDocuments,

    #[error("Unsupported mapping key: {0}")]
    UnsupportedKey(String),

    #[error("Unsupported YAML tag: {0}")]
    UnsupportedTag(String),

    #[error("Cannot read {value:?} as {tag}")]
    InvalidScalar { tag: String, value: String },

    #[error("Merge key expects a mapping or a list of mappings, found {0}")]
    InvalidMerge(&'static str),

    #[error("Alias refers to an unknown anchor")]
    UnknownAnchor,
}

/// Numeric leaf
///
/// Integers keep their integer form; non-negative values are always stored
/// as `PosInt` so equal numbers compare equal regardless of the parser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_i64(n: i64) -> Self {
        if n >= 0 {
            Number::PosInt(n as u64)
        } else {
            Number::NegInt(n)
        }
    }

    /// Integer of any width, degrading to a float past 64 bits
    pub fn from_i128(n: i128) -> Self {
        if let Ok(n) = u64::try_from(n) {
            Number::PosInt(n)
        } else if let Ok(n) = i64::try_from(n) {
            Number::NegInt(n)
        } else {
            Number::Float(n as f64)
        }
    }
}

/// Float text in shortest round-trip form with Python's layout
///
/// Positional notation for decimal exponents in `-4..16` (always with a
/// fractional part), otherwise `<mantissa>e<sign><at least two digits>`:
/// `2.0`, `0.0001`, `1e+16`, `1.5e-07`. Non-finite values use the
/// JavaScript spellings `NaN`, `Infinity` and `-Infinity`.
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let positional = n.to_string();
        if positional.contains('.') {
            positional
        } else {
            format!("{}.0", positional)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::PosInt(n) => write!(f, "{}", n),
            Number::NegInt(n) => write!(f, "{}", n),
            Number::Float(n) => f.write_str(&format_float(n)),
        }
    }
}

/// A parsed document node
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Document>),
    Mapping(Vec<(String, Document)>),
}

impl Document {
    /// Short name of the node kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
        }
    }

    /// Number of children for containers, `None` for scalars
    pub fn len(&self) -> Option<usize> {
        match self {
            Document::Sequence(items) => Some(items.len()),
            Document::Mapping(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Converts a scalar used as a mapping key into its JSON key text
    pub fn into_key(self) -> Result<String, DocumentError> {
        match self {
            Document::String(s) => Ok(s),
            Document::Null => Ok("null".to_string()),
            Document::Bool(b) => Ok(b.to_string()),
            Document::Number(n) => Ok(n.to_string()),
            Document::Sequence(_) => Err(DocumentError::UnsupportedKey("sequence".to_string())),
            Document::Mapping(_) => Err(DocumentError::UnsupportedKey("mapping".to_string())),
        }
    }

    /// Builds a mapping from ordered entries, later keys replacing earlier ones
    pub fn mapping_from_entries<I>(entries: I) -> Document
    where
        I: IntoIterator<Item = (String, Document)>,
    {
        let mut merged = Vec::new();
        for (key, value) in entries {
            insert_entry(&mut merged, key, value);
        }
        Document::Mapping(merged)
    }
}

#[cfg(test)]
impl Document {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Document::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Document::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            Document::Mapping(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Inserts an entry, replacing the value of an existing key in place
fn insert_entry(entries: &mut Vec<(String, Document)>, key: String, value: Document) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = value,
        None => entries.push((key, value)),
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Number(Number::PosInt(n)) => serializer.serialize_u64(*n),
            Document::Number(Number::NegInt(n)) => serializer.serialize_i64(*n),
            Document::Number(Number::Float(n)) => serializer.serialize_f64(*n),
            Document::String(s) => serializer.serialize_str(s),
            Document::Sequence(items) => serializer.collect_seq(items),
            Document::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping, sequence or scalar value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Document, E> {
        Ok(Document::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Document, E> {
        Ok(Document::Number(Number::from_i64(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Document, E> {
        Ok(Document::Number(Number::PosInt(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Document, E> {
        Ok(Document::Number(Number::from_i128(v)))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Document, E> {
        match u64::try_from(v) {
            Ok(n) => self.visit_u64(n),
            Err(_) => Ok(Document::Number(Number::Float(v as f64))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Document, E> {
        Ok(Document::Number(Number::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Document, E> {
        Ok(Document::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Document, E> {
        Ok(Document::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<Document>()? {
            let key = key.into_key().map_err(<A::Error as de::Error>::custom)?;
            let value = map.next_value()?;
            insert_entry(&mut entries, key, value);
        }
        Ok(Document::Mapping(entries))
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}
