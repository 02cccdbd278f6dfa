//! Kind-specific extra data attached to a parameter.
//!
//! A parameter carries at most one extra-data payload, and the serialized
//! form never names its kind: decode discovers it from the first field it
//! encounters (`Entries` implies a choice, `Min` implies a value range, and
//! so on) and later fields for the same kind mutate the same instance. The
//! `*_mut` accessors implement that get-or-create pattern; asking for a kind
//! while a different one is live is a structural error.

use std::collections::BTreeMap;

use crate::curve::CurveSerialization;
use crate::error::SerializationError;
use crate::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// Choice-parameter payload: menu entries and optional per-entry help.
///
/// The two lists are parallel but their lengths need not match; the help
/// list may be shorter or absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceExtraData {
    /// Ordered menu entries.
    pub entries: Vec<String>,
    /// Ordered help strings, parallel to `entries`.
    pub help_strings: Vec<String>,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

/// Numeric-parameter payload: hard and display ranges.
///
/// `f64::MIN` / `f64::MAX` are the sentinels meaning "unbounded"; a bound
/// equal to its sentinel is never written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRangeExtraData {
    /// Hard minimum.
    pub min: f64,
    /// Hard maximum.
    pub max: f64,
    /// Minimum of the displayed slider range.
    pub display_min: f64,
    /// Maximum of the displayed slider range.
    pub display_max: f64,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

impl Default for ValueRangeExtraData {
    fn default() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
            display_min: f64::MIN,
            display_max: f64::MAX,
            use_host_overlay_handle: false,
        }
    }
}

/// Text-parameter payload: keyframed text plus font formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct TextExtraData {
    /// Keyframed text track, iterated in ascending frame order.
    pub keyframes: BTreeMap<i64, String>,
    /// Font color, three components in `[0, 1]`.
    pub font_color: [f64; 3],
    /// Font point size.
    pub font_size: i64,
    /// Font family name.
    pub font_family: String,
    /// The parameter renders as a static label.
    pub is_label: bool,
    /// The parameter is a multi-line text area.
    pub multi_line: bool,
    /// Rich-text markup is allowed.
    pub rich_text: bool,
    /// Italic styling is active.
    pub italic: bool,
    /// Bold styling is active.
    pub bold: bool,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

impl Default for TextExtraData {
    fn default() -> Self {
        Self {
            keyframes: BTreeMap::new(),
            font_color: [0.0, 0.0, 0.0],
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            is_label: false,
            multi_line: false,
            rich_text: false,
            italic: false,
            bold: false,
            use_host_overlay_handle: false,
        }
    }
}

impl TextExtraData {
    /// Switch to label mode.
    ///
    /// Label, multi-line and "neither" form a three-way mode: entering label
    /// mode clears multi-line and rich-text.
    pub fn set_as_label(&mut self) {
        self.is_label = true;
        self.multi_line = false;
        self.rich_text = false;
    }

    /// Switch to multi-line mode, clearing label and rich-text.
    pub fn set_multi_line(&mut self) {
        self.is_label = false;
        self.multi_line = true;
        self.rich_text = false;
    }
}

/// Path-parameter payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathExtraData {
    /// The parameter holds multiple search paths rather than one.
    pub multi_path: bool,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

/// File-parameter payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileExtraData {
    /// File sequences (frame ranges) are accepted, not just single files.
    pub use_sequences: bool,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

/// Parametric-parameter payload: one curve per dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParametricExtraData {
    /// The parametric curves, in dimension order.
    pub parametric_curves: Vec<CurveSerialization>,
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

/// Generic payload for kinds with no data beyond the shared flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericExtraData {
    /// Whether the host draws an overlay handle for this parameter.
    pub use_host_overlay_handle: bool,
}

/// The closed set of extra-data payloads.
///
/// Exactly one concrete payload is live per parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraData {
    /// Choice entries and help strings.
    Choice(ChoiceExtraData),
    /// Numeric hard/display ranges.
    ValueRange(ValueRangeExtraData),
    /// Text keyframes and font formatting.
    Text(TextExtraData),
    /// Path flags.
    Path(PathExtraData),
    /// File flags.
    File(FileExtraData),
    /// Parametric curves.
    Parametric(ParametricExtraData),
    /// Shared flags only.
    Generic(GenericExtraData),
}

impl ExtraData {
    /// The kind name, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtraData::Choice(_) => "Choice",
            ExtraData::ValueRange(_) => "ValueRange",
            ExtraData::Text(_) => "Text",
            ExtraData::Path(_) => "Path",
            ExtraData::File(_) => "File",
            ExtraData::Parametric(_) => "Parametric",
            ExtraData::Generic(_) => "Generic",
        }
    }

    /// The overlay-handle flag, whichever kind is live.
    pub fn use_host_overlay_handle(&self) -> bool {
        match self {
            ExtraData::Choice(d) => d.use_host_overlay_handle,
            ExtraData::ValueRange(d) => d.use_host_overlay_handle,
            ExtraData::Text(d) => d.use_host_overlay_handle,
            ExtraData::Path(d) => d.use_host_overlay_handle,
            ExtraData::File(d) => d.use_host_overlay_handle,
            ExtraData::Parametric(d) => d.use_host_overlay_handle,
            ExtraData::Generic(d) => d.use_host_overlay_handle,
        }
    }

    /// Set the overlay-handle flag on whichever kind is live.
    pub fn set_use_host_overlay_handle(&mut self, on: bool) {
        match self {
            ExtraData::Choice(d) => d.use_host_overlay_handle = on,
            ExtraData::ValueRange(d) => d.use_host_overlay_handle = on,
            ExtraData::Text(d) => d.use_host_overlay_handle = on,
            ExtraData::Path(d) => d.use_host_overlay_handle = on,
            ExtraData::File(d) => d.use_host_overlay_handle = on,
            ExtraData::Parametric(d) => d.use_host_overlay_handle = on,
            ExtraData::Generic(d) => d.use_host_overlay_handle = on,
        }
    }
}

macro_rules! get_or_create {
    ($fn_name:ident, $variant:ident, $data:ty, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Allocates a fresh payload when the slot is empty; returns
        /// [`SerializationError::ExtraDataMismatch`] when a different kind
        /// is already live.
        pub fn $fn_name(
            slot: &mut Option<ExtraData>,
        ) -> Result<&mut $data, SerializationError> {
            let data = slot.get_or_insert_with(|| ExtraData::$variant(<$data>::default()));
            match data {
                ExtraData::$variant(inner) => Ok(inner),
                other => Err(SerializationError::extra_data_mismatch(
                    stringify!($variant),
                    other.kind(),
                )),
            }
        }
    };
}

get_or_create!(
    choice_mut,
    Choice,
    ChoiceExtraData,
    "Access the choice payload, creating it on first use."
);
get_or_create!(
    value_range_mut,
    ValueRange,
    ValueRangeExtraData,
    "Access the value-range payload, creating it on first use."
);
get_or_create!(
    text_mut,
    Text,
    TextExtraData,
    "Access the text payload, creating it on first use."
);
get_or_create!(
    path_mut,
    Path,
    PathExtraData,
    "Access the path payload, creating it on first use."
);
get_or_create!(
    file_mut,
    File,
    FileExtraData,
    "Access the file payload, creating it on first use."
);
get_or_create!(
    parametric_mut,
    Parametric,
    ParametricExtraData,
    "Access the parametric payload, creating it on first use."
);

/// Access whichever payload is live, creating a generic one when none is.
///
/// Used for the shared flags (`UseOverlay`), which are legal on any kind.
pub fn generic_mut(slot: &mut Option<ExtraData>) -> &mut ExtraData {
    slot.get_or_insert_with(|| ExtraData::Generic(GenericExtraData::default()))
}
