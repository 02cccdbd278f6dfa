//! Structured document model for perilla serialization.
//!
//! This crate is a thin access layer over [`yaml_rust`] nodes. The perilla
//! codecs read and write plain YAML documents made of maps, sequences and
//! untagged scalars; this layer provides the shape checks, scalar extraction
//! and map/sequence building the codecs share, with a single error type for
//! structural violations.
//!
//! Maps are `yaml_rust::yaml::Hash` (a linked hash map), so encode order is
//! insertion order and emitted documents are deterministic.
//!
//! # Example
//!
//! ```rust
//! use perilla_document::{parse_document, field, string_field};
//!
//! let doc = parse_document("ScriptName: translate").unwrap();
//! let name = field(&doc, "ScriptName").unwrap();
//! assert_eq!(string_field(name, "ScriptName").unwrap(), "translate");
//! ```

mod error;
mod node;

pub use error::DocumentError;
pub use node::{
    bool_field, emit_document, expect_map, expect_seq, f64_field, field, flag_list, flags,
    i64_field, map_entry, parse_document, real_node, required_field, scalar_text, string_field,
};

pub use yaml_rust::Yaml;
pub use yaml_rust::yaml::{Array, Hash};
