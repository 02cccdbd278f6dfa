//! Opaque boundary to the animation-curve codec.
//!
//! Curve content is owned by the external curve codec; this record only
//! carries the sub-document across encode/decode and answers the one
//! question the knob codec asks: is the curve empty? Keeping the raw node
//! means a curve payload written by any host version survives re-encoding
//! unchanged.

use yaml_rust::Yaml;

/// An animation-curve sub-document, held opaquely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSerialization {
    node: Option<Yaml>,
}

impl CurveSerialization {
    /// An empty curve (nothing to serialize).
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing curve sub-document.
    pub fn from_node(node: Yaml) -> Self {
        Self { node: Some(node) }
    }

    /// Whether there is any curve content worth serializing.
    ///
    /// Empty sequences and maps count as empty: a curve with no keyframes
    /// must not cause a `Curve` field to be written.
    pub fn is_empty(&self) -> bool {
        match &self.node {
            None => true,
            Some(Yaml::Array(seq)) => seq.is_empty(),
            Some(Yaml::Hash(map)) => map.is_empty(),
            Some(Yaml::Null) => true,
            Some(_) => false,
        }
    }

    /// Take ownership of a decoded curve sub-document.
    pub fn decode(&mut self, node: &Yaml) {
        self.node = Some(node.clone());
    }

    /// The sub-document to embed, or `None` when the curve is empty.
    pub fn encode(&self) -> Option<Yaml> {
        if self.is_empty() {
            None
        } else {
            self.node.clone()
        }
    }
}
