//! Node access helpers: shape checks, scalar extraction, map building.
//!
//! Decoders in the perilla codecs work against these helpers rather than
//! raw [`Yaml`] pattern matching, so every structural violation surfaces as
//! the same [`DocumentError`] vocabulary regardless of which record hit it.

use yaml_rust::yaml::{Array, Hash};
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

use crate::error::DocumentError;

/// Look up `name` in a map node.
///
/// Returns `None` when the field is absent or when `node` is not a map at
/// all; presence checks never fail structurally.
pub fn field<'a>(node: &'a Yaml, name: &str) -> Option<&'a Yaml> {
    match node {
        Yaml::Hash(map) => map.get(&Yaml::String(name.to_owned())),
        _ => None,
    }
}

/// Look up `name` in a map node, failing when it is absent.
pub fn required_field<'a>(node: &'a Yaml, name: &str) -> Result<&'a Yaml, DocumentError> {
    field(node, name).ok_or_else(|| DocumentError::missing_field(name))
}

/// Require `node` to be a map.
pub fn expect_map<'a>(node: &'a Yaml, context: &str) -> Result<&'a Hash, DocumentError> {
    node.as_hash().ok_or_else(|| DocumentError::not_a_map(context))
}

/// Require `node` to be a sequence.
pub fn expect_seq<'a>(node: &'a Yaml, context: &str) -> Result<&'a [Yaml], DocumentError> {
    node.as_vec()
        .map(Vec::as_slice)
        .ok_or_else(|| DocumentError::not_a_sequence(context))
}

/// The textual form of a scalar node, if it is a scalar.
///
/// Any scalar can be read as text; this mirrors the wire format, where
/// scalars carry no type tag and the written representation is
/// authoritative.
pub fn scalar_text(node: &Yaml) -> Option<String> {
    match node {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Real(r) => Some(r.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a scalar as a string.
pub fn string_field(node: &Yaml, context: &str) -> Result<String, DocumentError> {
    scalar_text(node).ok_or_else(|| DocumentError::bad_scalar(context, "string"))
}

/// Read a scalar as an integer.
pub fn i64_field(node: &Yaml, context: &str) -> Result<i64, DocumentError> {
    match node {
        Yaml::Integer(i) => Ok(*i),
        Yaml::String(s) => s
            .parse::<i64>()
            .map_err(|_| DocumentError::bad_scalar(context, "integer")),
        _ => Err(DocumentError::bad_scalar(context, "integer")),
    }
}

/// Read a scalar as a double.
///
/// Integer nodes and numeric strings are accepted; the textual form decides,
/// not the node's in-memory tag.
pub fn f64_field(node: &Yaml, context: &str) -> Result<f64, DocumentError> {
    match node {
        Yaml::Integer(i) => Ok(*i as f64),
        Yaml::Real(r) => r
            .parse::<f64>()
            .map_err(|_| DocumentError::bad_scalar(context, "double")),
        Yaml::String(s) => s
            .parse::<f64>()
            .map_err(|_| DocumentError::bad_scalar(context, "double")),
        _ => Err(DocumentError::bad_scalar(context, "double")),
    }
}

/// Read a scalar as a boolean.
pub fn bool_field(node: &Yaml, context: &str) -> Result<bool, DocumentError> {
    match node {
        Yaml::Boolean(b) => Ok(*b),
        Yaml::String(s) => s
            .parse::<bool>()
            .map_err(|_| DocumentError::bad_scalar(context, "boolean")),
        _ => Err(DocumentError::bad_scalar(context, "boolean")),
    }
}

/// Insert a string-keyed entry into a map under construction.
///
/// Encode order is insertion order, so callers control the emitted field
/// order by the sequence of `map_entry` calls.
pub fn map_entry(map: &mut Hash, key: &str, value: Yaml) {
    map.insert(Yaml::String(key.to_owned()), value);
}

/// Build a double node keeping the natural textual form.
pub fn real_node(value: f64) -> Yaml {
    Yaml::Real(format!("{value}"))
}

/// Build the compact flags-as-string-list node.
///
/// Presence of a name in the list means the flag is true; absent names keep
/// their defaults. This is the wire form shared by `Props` and `DimProps`.
pub fn flag_list(names: &[String]) -> Yaml {
    Yaml::Array(
        names
            .iter()
            .map(|n| Yaml::String(n.clone()))
            .collect::<Array>(),
    )
}

/// Read a flags-as-string-list node back into names.
pub fn flags(node: &Yaml, context: &str) -> Result<Vec<String>, DocumentError> {
    let seq = expect_seq(node, context)?;
    seq.iter()
        .map(|n| string_field(n, context))
        .collect::<Result<Vec<_>, _>>()
}

/// Parse a document from text, returning its root node.
pub fn parse_document(text: &str) -> Result<Yaml, DocumentError> {
    let mut docs =
        YamlLoader::load_from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))?;
    if docs.is_empty() {
        return Err(DocumentError::Parse("empty document".to_owned()));
    }
    Ok(docs.swap_remove(0))
}

/// Emit a document tree as text.
pub fn emit_document(node: &Yaml) -> Result<String, DocumentError> {
    let mut out = String::new();
    let mut emitter = YamlEmitter::new(&mut out);
    emitter
        .dump(node)
        .map_err(|e| DocumentError::Emit(format!("{e:?}")))?;
    Ok(out)
}
