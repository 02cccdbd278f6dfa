//! Parameter (knob) and group serialization codec.
//!
//! This crate converts detached snapshots of parameter descriptors into a
//! compact, human-editable YAML document and back, preserving semantic
//! fidelity across host versions. The format is minimal and diffable by
//! construction: every field equal to its default is omitted on encode and
//! rebuilt by the defaulting rules on decode.
//!
//! The codec is composed bottom-up:
//!
//! - [`Value`] / [`decode_scalar`] / [`encode_scalar`] — one scalar whose
//!   runtime type (boolean, integer, double, string) is inferred from its
//!   written form, never from a tag.
//! - [`ValueSerialization`] — one dimension of a possibly multi-component
//!   parameter: value, default, animation curve, expression, master link.
//! - [`ExtraData`] — kind-specific payloads (choice entries, numeric ranges,
//!   text formatting, path/file flags) attached only when relevant.
//! - [`KnobSerialization`] — the top-level parameter record.
//! - [`GroupKnobSerialization`] — a named recursive container of parameters
//!   and nested groups.
//!
//! # Example
//!
//! ```rust
//! use perilla_serialization::{KnobSerialization, Value, ValueSerialization};
//!
//! let mut knob = KnobSerialization::new("mix");
//! knob.dimension = 1;
//! let mut dim = ValueSerialization::new(0);
//! dim.set_value(Value::Double(0.5));
//! knob.values.push(dim);
//!
//! let doc = knob.encode().expect("knob is marked for serialization");
//!
//! let mut back = KnobSerialization::default();
//! back.decode(&doc).unwrap();
//! assert_eq!(back.script_name, "mix");
//! ```
//!
//! # Error model
//!
//! Decode distinguishes two classes. Structural errors (wrong node kind,
//! wrong master-link arity, missing `ScriptName`) abort the current record;
//! the caller must discard the partially-populated snapshot. Unknown names
//! in a `Props`-style flag list are logged at `warn` level and skipped so
//! documents written by newer hosts still load. Encode has no error path.

mod curve;
mod dimension;
mod error;
mod extra;
mod group;
mod knob;
mod value;

pub use curve::CurveSerialization;
pub use dimension::{MasterLink, ValueSerialization};
pub use error::SerializationError;
pub use extra::{
    ChoiceExtraData, ExtraData, FileExtraData, GenericExtraData, ParametricExtraData,
    PathExtraData, TextExtraData, ValueRangeExtraData, choice_mut, file_mut, generic_mut,
    parametric_mut, path_mut, text_mut, value_range_mut,
};
pub use group::{GroupKnobSerialization, KnobEntry};
pub use knob::KnobSerialization;
pub use value::{Value, decode_scalar, encode_scalar};

/// Font size assumed when a text parameter's document omits `FontSize`.
pub const DEFAULT_FONT_SIZE: i64 = 11;

/// Font family assumed when a text parameter's document omits `Font`.
pub const DEFAULT_FONT_FAMILY: &str = "Sans";

/// Item spacing assumed when a viewer-interface document omits
/// `InViewerSpacing`.
pub const DEFAULT_ITEM_SPACING: i64 = 5;

/// Layout marker meaning "plain spacing"; a layout equal to this is written
/// through `InViewerSpacing` instead of `InViewerLayout`.
pub const ITEM_LAYOUT_SPACING: &str = "Spacing";
