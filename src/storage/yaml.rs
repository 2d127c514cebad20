//! YAML input
//!
//! Documents are composed from parser events so that scalar style is
//! visible: plain scalars are resolved with the YAML 1.1 rules (`yes`/`off`
//! are booleans, a leading `0` means octal, `1_000` is an integer), while
//! quoted and block scalars always stay strings. Anchors, aliases and `<<`
//! merge keys are expanded. Only the standard tags are constructed;
//! application-specific tags are rejected.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::domain::{Document, DocumentError, Number};

/// Tag prefix the `!!` shorthand expands to
const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

static NULL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:~|null|Null|NULL|)$").unwrap());

static BOOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:yes|Yes|YES|no|No|NO|true|True|TRUE|false|False|FALSE|on|On|ON|off|Off|OFF)$").unwrap()
});

static INT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$",
    )
    .unwrap()
});

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

/// Parses a YAML stream containing at most one document
///
/// An empty stream yields [`Document::Null`].
pub fn parse_document(text: &str) -> std::result::Result<Document, DocumentError> {
    let mut composer = Composer::default();
    let mut parser = Parser::new(text.chars());
    parser.load(&mut composer, true)?;

    if let Some(err) = composer.error {
        return Err(err);
    }

    let mut documents = composer.documents.into_iter();
    let document = documents.next().unwrap_or(Document::Null);
    if documents.next().is_some() {
        return Err(DocumentError::MultipleDocuments);
    }

    Ok(document)
}

/// Reads and parses a YAML file
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input: {}", path.display()))?;

    parse_document(&content).with_context(|| format!("Failed to parse YAML: {}", path.display()))
}

/// A mapping key as composed, before merge expansion
enum Key {
    Merge,
    Value(Document),
}

enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<Document>,
    },
    Mapping {
        anchor: usize,
        key: Option<Key>,
        entries: Vec<(Key, Document)>,
    },
}

/// Builds documents from parser events
///
/// The first composition error is kept and later events are ignored, since
/// the event callback cannot fail.
#[derive(Default)]
struct Composer {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Document>,
    documents: Vec<Document>,
    error: Option<DocumentError>,
}

impl MarkedEventReceiver for Composer {
    fn on_event(&mut self, event: Event, _mark: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(event) {
            self.error = Some(err);
        }
    }
}

impl Composer {
    fn handle(&mut self, event: Event) -> std::result::Result<(), DocumentError> {
        match event {
            Event::Scalar(value, style, anchor, tag) => {
                let plain = matches!(style, TScalarStyle::Plain);
                let is_merge = plain && tag.is_none() && value == "<<";
                let tag = tag.map(|t| tag_name(&t.handle, &t.suffix));
                let node = resolve_scalar(value, plain, tag.as_deref())?;
                self.remember(anchor, &node);
                self.push(node, is_merge);
            }
            Event::Alias(anchor) => {
                let node = self.anchors.get(&anchor).cloned().ok_or(DocumentError::UnknownAnchor)?;
                self.push(node, false);
            }
            Event::SequenceStart(anchor, tag) => {
                check_collection_tag(tag.map(|t| tag_name(&t.handle, &t.suffix)), "seq")?;
                self.stack.push(Frame::Sequence { anchor, items: Vec::new() });
            }
            Event::MappingStart(anchor, tag) => {
                check_collection_tag(tag.map(|t| tag_name(&t.handle, &t.suffix)), "map")?;
                self.stack.push(Frame::Mapping {
                    anchor,
                    key: None,
                    entries: Vec::new(),
                });
            }
            Event::SequenceEnd => {
                if let Some(Frame::Sequence { anchor, items }) = self.stack.pop() {
                    let node = Document::Sequence(items);
                    self.remember(anchor, &node);
                    self.push(node, false);
                }
            }
            Event::MappingEnd => {
                if let Some(Frame::Mapping { anchor, entries, .. }) = self.stack.pop() {
                    let node = flatten_mapping(entries)?;
                    self.remember(anchor, &node);
                    self.push(node, false);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn remember(&mut self, anchor: usize, node: &Document) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
    }

    /// Attaches a finished node to the enclosing collection or the stream
    fn push(&mut self, node: Document, is_merge: bool) {
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { key, entries, .. }) => match key.take() {
                Some(k) => entries.push((k, node)),
                None if is_merge => *key = Some(Key::Merge),
                None => *key = Some(Key::Value(node)),
            },
        }
    }
}

/// Expands merge keys and stringifies the rest
///
/// Merged entries come first and explicit keys override them. Within a
/// merged list, earlier mappings take precedence over later ones.
fn flatten_mapping(entries: Vec<(Key, Document)>) -> std::result::Result<Document, DocumentError> {
    let mut merged = Vec::new();
    let mut own = Vec::new();

    for (key, value) in entries {
        match key {
            Key::Value(key) => own.push((key.into_key()?, value)),
            Key::Merge => match value {
                Document::Mapping(pairs) => merged.extend(pairs),
                Document::Sequence(items) => {
                    let mut sources = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Document::Mapping(pairs) => sources.push(pairs),
                            other => return Err(DocumentError::InvalidMerge(other.kind())),
                        }
                    }
                    merged.extend(sources.into_iter().rev().flatten());
                }
                other => return Err(DocumentError::InvalidMerge(other.kind())),
            },
        }
    }

    Ok(Document::mapping_from_entries(merged.into_iter().chain(own)))
}

/// Short name of a standard tag (`str`, `int`, ...) or the full tag text
fn tag_name(handle: &str, suffix: &str) -> String {
    if handle == "!!" || handle == CORE_TAG_PREFIX {
        suffix.to_string()
    } else {
        format!("{}{}", handle, suffix)
    }
}

fn check_collection_tag(tag: Option<String>, expected: &str) -> std::result::Result<(), DocumentError> {
    match tag {
        None => Ok(()),
        Some(tag) if tag == expected || tag == "!" => Ok(()),
        Some(tag) => Err(DocumentError::UnsupportedTag(tag)),
    }
}

fn resolve_scalar(value: String, plain: bool, tag: Option<&str>) -> std::result::Result<Document, DocumentError> {
    let invalid = |tag: &str, value: &str| DocumentError::InvalidScalar {
        tag: tag.to_string(),
        value: value.to_string(),
    };

    match tag {
        Some("str") | Some("!") => Ok(Document::String(value)),
        Some("null") => Ok(Document::Null),
        Some("bool") => parse_bool(&value).map(Document::Bool).ok_or_else(|| invalid("bool", &value)),
        Some("int") => parse_int(&value).map(Document::Number).ok_or_else(|| invalid("int", &value)),
        Some("float") => parse_float(&value)
            .map(|n| Document::Number(Number::Float(n)))
            .ok_or_else(|| invalid("float", &value)),
        Some(other) => Err(DocumentError::UnsupportedTag(other.to_string())),
        None if !plain => Ok(Document::String(value)),
        None => Ok(resolve_plain(value)),
    }
}

/// Implicit typing of an untagged plain scalar
fn resolve_plain(value: String) -> Document {
    if NULL_RE.is_match(&value) {
        return Document::Null;
    }
    if BOOL_RE.is_match(&value) {
        if let Some(b) = parse_bool(&value) {
            return Document::Bool(b);
        }
    }
    if INT_RE.is_match(&value) {
        if let Some(n) = parse_int(&value) {
            return Document::Number(n);
        }
    }
    if FLOAT_RE.is_match(&value) {
        if let Some(n) = parse_float(&value) {
            return Document::Number(Number::Float(n));
        }
    }
    Document::String(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" => Some(true),
        "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Splits a leading sign off a scalar with underscores removed
fn split_sign(value: &str) -> (bool, String) {
    let digits: String = value.chars().filter(|&c| c != '_').collect();
    match digits.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, digits.strip_prefix('+').unwrap_or(&digits).to_string()),
    }
}

fn parse_int(value: &str) -> Option<Number> {
    let (negative, digits) = split_sign(value);

    let magnitude = if digits == "0" {
        0
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()?
    } else if let Some(hex) = digits.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()?
    } else if digits.starts_with('0') {
        i128::from_str_radix(&digits, 8).ok()?
    } else if digits.contains(':') {
        let mut total: i128 = 0;
        for part in digits.split(':') {
            total = total.checked_mul(60)?.checked_add(part.parse::<i128>().ok()?)?;
        }
        total
    } else {
        digits.parse::<i128>().ok()?
    };

    Some(Number::from_i128(if negative { -magnitude } else { magnitude }))
}

fn parse_float(value: &str) -> Option<f64> {
    let (negative, digits) = split_sign(value);
    let digits = digits.to_ascii_lowercase();

    let magnitude = if digits == ".inf" {
        f64::INFINITY
    } else if digits == ".nan" {
        return Some(f64::NAN);
    } else if digits.contains(':') {
        let mut total = 0.0;
        for part in digits.split(':') {
            total = total * 60.0 + part.parse::<f64>().ok()?;
        }
        total
    } else {
        digits.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}
