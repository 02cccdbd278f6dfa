//! Top-level parameter record.
//!
//! Encode is a pure projection of a valid snapshot and cannot fail; it
//! returns nothing at all for parameters flagged "do not serialize". Every
//! field that equals its default is omitted and rebuilt by the defaulting
//! rules on decode, which keeps saved documents minimal and diffable.
//!
//! Decode processes fields in dependency order: core identity, dimensions,
//! extra-data blocks, the user-knob block (which flips `is_user_knob` and
//! gates everything a user-created parameter needs to be rebuilt from
//! nothing), the viewer-context block, and the trailing `Props` flag list —
//! applied last so it can override persistence and other flags set earlier.

use perilla_document::{
    Hash, Yaml, bool_field, expect_seq, f64_field, field, flag_list, flags, i64_field, map_entry,
    real_node, required_field, string_field,
};
use tracing::warn;

use crate::curve::CurveSerialization;
use crate::dimension::ValueSerialization;
use crate::error::SerializationError;
use crate::extra::{
    ExtraData, choice_mut, file_mut, generic_mut, parametric_mut, path_mut, text_mut,
    value_range_mut,
};
use crate::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_ITEM_SPACING, ITEM_LAYOUT_SPACING};

/// A detached snapshot of one parameter, ready to encode or freshly decoded.
///
/// Constructed per call from/to a live parameter; it owns its dimension
/// records and extra-data payload exclusively and is not persisted beyond
/// the call.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobSerialization {
    /// Stable identifier; the one field every document carries.
    pub script_name: String,
    /// Parameter type name; written only for user-created parameters, since
    /// built-in parameters are re-attached to live objects that already
    /// know their type.
    pub type_name: String,
    /// Human label, defaulting to the script name.
    pub label: String,
    /// Tooltip text.
    pub tooltip: String,
    /// Number of dimensions (components).
    pub dimension: usize,
    /// Dimension records, ascending index order; only dimensions needing
    /// serialization are present.
    pub values: Vec<ValueSerialization>,
    /// Kind-specific extra data, at most one payload.
    pub extra_data: Option<ExtraData>,
    /// Icon paths for the unchecked and checked states.
    pub icon_file_path: [String; 2],
    /// Whether the parameter was created by the user rather than a plug-in.
    pub is_user_knob: bool,
    /// Whether the parameter is saved at all; volatile parameters skip
    /// their dimensions and extra data.
    pub is_persistent: bool,
    /// Whether visibility diverged from its default.
    pub visibility_changed: bool,
    /// Whether the master link is an alias rather than a plain link.
    pub master_is_alias: bool,
    /// Whether the parameter starts a new layout line (default true).
    pub trigger_new_line: bool,
    /// Whether changing the parameter re-evaluates the node (default true).
    pub evaluates_on_change: bool,
    /// Whether the animation-enabled state diverged from its default.
    pub animates_changed: bool,
    /// Whether the parameter is exposed in the viewer overlay.
    pub has_viewer_interface: bool,
    /// Viewer layout identifier; empty means plain spacing.
    pub in_viewer_context_item_layout: String,
    /// Viewer item spacing, used when no layout identifier applies.
    pub in_viewer_context_item_spacing: i64,
    /// Viewer label (user-created parameters only).
    pub in_viewer_context_label: String,
    /// Viewer icon paths for the unchecked and checked states.
    pub in_viewer_context_icon_file_path: [String; 2],
    /// Whether this snapshot should be serialized at all.
    pub must_serialize: bool,
}

impl Default for KnobSerialization {
    fn default() -> Self {
        Self {
            script_name: String::new(),
            type_name: String::new(),
            label: String::new(),
            tooltip: String::new(),
            dimension: 0,
            values: Vec::new(),
            extra_data: None,
            icon_file_path: [String::new(), String::new()],
            is_user_knob: false,
            is_persistent: true,
            visibility_changed: false,
            master_is_alias: false,
            trigger_new_line: true,
            evaluates_on_change: true,
            animates_changed: false,
            has_viewer_interface: false,
            in_viewer_context_item_layout: String::new(),
            in_viewer_context_item_spacing: DEFAULT_ITEM_SPACING,
            in_viewer_context_label: String::new(),
            in_viewer_context_icon_file_path: [String::new(), String::new()],
            must_serialize: false,
        }
    }
}

impl KnobSerialization {
    /// A snapshot marked for serialization, labeled by its script name.
    pub fn new(script_name: impl Into<String>) -> Self {
        let script_name = script_name.into();
        Self {
            label: script_name.clone(),
            script_name,
            must_serialize: true,
            ..Self::default()
        }
    }

    /// Encode this snapshot as a map node.
    ///
    /// Returns `None` when the parameter is flagged "do not serialize";
    /// callers must check before embedding the output. Otherwise encoding
    /// always succeeds.
    pub fn encode(&self) -> Option<Yaml> {
        if !self.must_serialize {
            return None;
        }
        let mut map = Hash::new();
        map_entry(&mut map, "ScriptName", Yaml::String(self.script_name.clone()));

        // Booleans that default to false travel as a trailing list of
        // names; presence means true.
        let mut props: Vec<String> = Vec::new();
        if self.visibility_changed && self.is_persistent {
            props.push("VisibilityChanged".to_owned());
        }
        if self.master_is_alias {
            props.push("MasterIsAlias".to_owned());
        }

        let has_dimension_to_serialize =
            self.is_persistent && self.values.iter().any(|v| v.must_serialize);
        if has_dimension_to_serialize {
            let entries: Vec<Yaml> = self
                .values
                .iter()
                .filter(|v| v.must_serialize)
                .map(ValueSerialization::encode)
                .collect();
            map_entry(&mut map, "Dimensions", Yaml::Array(entries));
        }

        if self.is_persistent {
            match &self.extra_data {
                Some(ExtraData::Parametric(data)) => {
                    if !data.parametric_curves.is_empty() {
                        let curves: Vec<Yaml> = data
                            .parametric_curves
                            .iter()
                            .map(|c| c.encode().unwrap_or_else(|| Yaml::Array(Vec::new())))
                            .collect();
                        map_entry(&mut map, "ParametricCurves", Yaml::Array(curves));
                    }
                }
                Some(ExtraData::Text(data)) => {
                    if !data.keyframes.is_empty() {
                        // Flattened pairs: frame, text, frame, text, ...
                        let mut track: Vec<Yaml> = Vec::with_capacity(data.keyframes.len() * 2);
                        for (frame, text) in &data.keyframes {
                            track.push(Yaml::Integer(*frame));
                            track.push(Yaml::String(text.clone()));
                        }
                        map_entry(&mut map, "TextAnim", Yaml::Array(track));
                    }
                    if data.font_color.iter().any(|c| c.abs() > 0.01) {
                        let color: Vec<Yaml> =
                            data.font_color.iter().map(|c| real_node(*c)).collect();
                        map_entry(&mut map, "FontColor", Yaml::Array(color));
                    }
                    if data.font_size != DEFAULT_FONT_SIZE {
                        map_entry(&mut map, "FontSize", Yaml::Integer(data.font_size));
                    }
                    if data.font_family != DEFAULT_FONT_FAMILY {
                        map_entry(&mut map, "Font", Yaml::String(data.font_family.clone()));
                    }
                    if data.italic {
                        props.push("Italic".to_owned());
                    }
                    if data.bold {
                        props.push("Bold".to_owned());
                    }
                }
                _ => {}
            }
        }

        if self.is_user_knob {
            // Built-in parameters are re-attached to live objects that know
            // their own type and dimension count; only user-created ones
            // carry enough to be rebuilt from nothing.
            map_entry(&mut map, "NDims", Yaml::Integer(self.dimension as i64));
            map_entry(&mut map, "TypeName", Yaml::String(self.type_name.clone()));
            if self.label != self.script_name {
                map_entry(&mut map, "Label", Yaml::String(self.label.clone()));
            }
            if !self.tooltip.is_empty() {
                map_entry(&mut map, "Hint", Yaml::String(self.tooltip.clone()));
            }
            if !self.trigger_new_line {
                props.push("NoNewLine".to_owned());
            }
            if !self.evaluates_on_change {
                props.push("NoEval".to_owned());
            }
            if self.animates_changed {
                props.push("AnimatesChanged".to_owned());
            }
            if !self.is_persistent {
                props.push("Volatile".to_owned());
            }
            if !self.icon_file_path[0].is_empty() {
                map_entry(
                    &mut map,
                    "UncheckedIcon",
                    Yaml::String(self.icon_file_path[0].clone()),
                );
            }
            if !self.icon_file_path[1].is_empty() {
                map_entry(
                    &mut map,
                    "CheckedIcon",
                    Yaml::String(self.icon_file_path[1].clone()),
                );
            }

            match &self.extra_data {
                Some(ExtraData::Choice(data)) => {
                    if !data.entries.is_empty() {
                        let entries: Vec<Yaml> = data
                            .entries
                            .iter()
                            .map(|e| Yaml::String(e.clone()))
                            .collect();
                        map_entry(&mut map, "Entries", Yaml::Array(entries));
                    }
                    if !data.help_strings.is_empty() {
                        let hints: Vec<Yaml> = data
                            .help_strings
                            .iter()
                            .map(|h| Yaml::String(h.clone()))
                            .collect();
                        map_entry(&mut map, "Hints", Yaml::Array(hints));
                    }
                }
                Some(ExtraData::ValueRange(data)) => {
                    // Each bound is gated on its own sentinel.
                    if data.min != f64::MIN {
                        map_entry(&mut map, "Min", real_node(data.min));
                    }
                    if data.max != f64::MAX {
                        map_entry(&mut map, "Max", real_node(data.max));
                    }
                    if data.display_min != f64::MIN {
                        map_entry(&mut map, "DisplayMin", real_node(data.display_min));
                    }
                    if data.display_max != f64::MAX {
                        map_entry(&mut map, "DisplayMax", real_node(data.display_max));
                    }
                }
                Some(ExtraData::Text(data)) => {
                    if data.is_label {
                        props.push("IsLabel".to_owned());
                    }
                    if data.multi_line {
                        props.push("MultiLine".to_owned());
                    }
                    if data.rich_text {
                        props.push("RichText".to_owned());
                    }
                }
                Some(ExtraData::Path(data)) => {
                    if data.multi_path {
                        props.push("MultiPath".to_owned());
                    }
                }
                Some(ExtraData::File(data)) => {
                    if data.use_sequences {
                        props.push("Sequences".to_owned());
                    }
                }
                _ => {}
            }

            if let Some(extra) = &self.extra_data {
                if extra.use_host_overlay_handle() {
                    props.push("UseOverlay".to_owned());
                }
            }
        }

        if self.has_viewer_interface {
            if !self.in_viewer_context_item_layout.is_empty()
                && self.in_viewer_context_item_layout != ITEM_LAYOUT_SPACING
            {
                map_entry(
                    &mut map,
                    "InViewerLayout",
                    Yaml::String(self.in_viewer_context_item_layout.clone()),
                );
            } else if self.in_viewer_context_item_spacing != DEFAULT_ITEM_SPACING {
                map_entry(
                    &mut map,
                    "InViewerSpacing",
                    Yaml::Integer(self.in_viewer_context_item_spacing),
                );
            }
            if self.is_user_knob {
                if !self.in_viewer_context_label.is_empty() {
                    map_entry(
                        &mut map,
                        "InViewerLabel",
                        Yaml::String(self.in_viewer_context_label.clone()),
                    );
                }
                if !self.in_viewer_context_icon_file_path[0].is_empty() {
                    map_entry(
                        &mut map,
                        "InViewerIconUnchecked",
                        Yaml::String(self.in_viewer_context_icon_file_path[0].clone()),
                    );
                }
                if !self.in_viewer_context_icon_file_path[1].is_empty() {
                    map_entry(
                        &mut map,
                        "InViewerIconChecked",
                        Yaml::String(self.in_viewer_context_icon_file_path[1].clone()),
                    );
                }
            }
        }

        if !props.is_empty() {
            map_entry(&mut map, "Props", flag_list(&props));
        }

        Some(Yaml::Hash(map))
    }

    /// Decode a map node into this snapshot.
    ///
    /// Shape violations abort the decode with a structural error; the
    /// partially-populated record must then be discarded. Unknown `Props`
    /// names are logged and skipped.
    pub fn decode(&mut self, node: &Yaml) -> Result<(), SerializationError> {
        perilla_document::expect_map(node, "parameter")?;

        // Re-encoding a decoded snapshot must reproduce the document.
        self.must_serialize = true;
        self.script_name = string_field(required_field(node, "ScriptName")?, "ScriptName")?;

        if let Some(dims_node) = field(node, "Dimensions") {
            let entries = expect_seq(dims_node, "Dimensions")?;
            self.values = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut dim = ValueSerialization::default();
                dim.decode(entry)?;
                self.values.push(dim);
            }
        }

        if let Some(curves_node) = field(node, "ParametricCurves") {
            let entries = expect_seq(curves_node, "ParametricCurves")?;
            let data = parametric_mut(&mut self.extra_data)?;
            for entry in entries {
                let mut curve = CurveSerialization::new();
                curve.decode(entry);
                data.parametric_curves.push(curve);
            }
        }
        if let Some(track_node) = field(node, "TextAnim") {
            let entries = expect_seq(track_node, "TextAnim")?;
            let data = text_mut(&mut self.extra_data)?;
            // Flattened pairs; a trailing unpaired frame is ignored.
            for pair in entries.chunks_exact(2) {
                let frame = i64_field(&pair[0], "TextAnim frame")?;
                let text = string_field(&pair[1], "TextAnim text")?;
                data.keyframes.insert(frame, text);
            }
        }
        if let Some(color_node) = field(node, "FontColor") {
            let components = expect_seq(color_node, "FontColor")?;
            if components.len() != 3 {
                return Err(perilla_document::DocumentError::bad_arity(
                    "FontColor",
                    "3",
                    components.len(),
                )
                .into());
            }
            let data = text_mut(&mut self.extra_data)?;
            for (slot, component) in data.font_color.iter_mut().zip(components) {
                *slot = f64_field(component, "FontColor component")?;
            }
        }
        if let Some(size_node) = field(node, "FontSize") {
            text_mut(&mut self.extra_data)?.font_size = i64_field(size_node, "FontSize")?;
        }
        if let Some(family_node) = field(node, "Font") {
            text_mut(&mut self.extra_data)?.font_family = string_field(family_node, "Font")?;
        }

        if let Some(ndims_node) = field(node, "NDims") {
            // Presence of NDims is what marks a user-created parameter.
            self.is_user_knob = true;
            self.type_name = string_field(required_field(node, "TypeName")?, "TypeName")?;
            self.dimension = i64_field(ndims_node, "NDims")? as usize;

            self.label = match field(node, "Label") {
                Some(label_node) => string_field(label_node, "Label")?,
                None => self.script_name.clone(),
            };
            if let Some(hint_node) = field(node, "Hint") {
                self.tooltip = string_field(hint_node, "Hint")?;
            }
            // Legacy documents spell persistence as a map entry rather than
            // the Volatile prop.
            self.is_persistent = match field(node, "Persistent") {
                Some(persistent_node) => bool_field(persistent_node, "Persistent")?,
                None => true,
            };
            if let Some(icon_node) = field(node, "UncheckedIcon") {
                self.icon_file_path[0] = string_field(icon_node, "UncheckedIcon")?;
            }
            if let Some(icon_node) = field(node, "CheckedIcon") {
                self.icon_file_path[1] = string_field(icon_node, "CheckedIcon")?;
            }

            if let Some(entries_node) = field(node, "Entries") {
                let data = choice_mut(&mut self.extra_data)?;
                for entry in expect_seq(entries_node, "Entries")? {
                    data.entries.push(string_field(entry, "Entries entry")?);
                }
                if let Some(hints_node) = field(node, "Hints") {
                    let data = choice_mut(&mut self.extra_data)?;
                    for hint in expect_seq(hints_node, "Hints")? {
                        data.help_strings.push(string_field(hint, "Hints entry")?);
                    }
                }
            }

            if let Some(min_node) = field(node, "Min") {
                value_range_mut(&mut self.extra_data)?.min = f64_field(min_node, "Min")?;
            }
            if let Some(max_node) = field(node, "Max") {
                value_range_mut(&mut self.extra_data)?.max = f64_field(max_node, "Max")?;
            }
            if let Some(min_node) = field(node, "DisplayMin") {
                value_range_mut(&mut self.extra_data)?.display_min =
                    f64_field(min_node, "DisplayMin")?;
            }
            if let Some(max_node) = field(node, "DisplayMax") {
                value_range_mut(&mut self.extra_data)?.display_max =
                    f64_field(max_node, "DisplayMax")?;
            }
        }

        if let Some(layout_node) = field(node, "InViewerLayout") {
            self.in_viewer_context_item_layout = string_field(layout_node, "InViewerLayout")?;
            self.has_viewer_interface = true;
        }
        if let Some(spacing_node) = field(node, "InViewerSpacing") {
            self.in_viewer_context_item_spacing = i64_field(spacing_node, "InViewerSpacing")?;
            self.has_viewer_interface = true;
        }
        if self.is_user_knob {
            if let Some(label_node) = field(node, "InViewerLabel") {
                self.in_viewer_context_label = string_field(label_node, "InViewerLabel")?;
                self.has_viewer_interface = true;
            }
            if let Some(icon_node) = field(node, "InViewerIconUnchecked") {
                self.in_viewer_context_icon_file_path[0] =
                    string_field(icon_node, "InViewerIconUnchecked")?;
                self.has_viewer_interface = true;
            }
            if let Some(icon_node) = field(node, "InViewerIconChecked") {
                self.in_viewer_context_icon_file_path[1] =
                    string_field(icon_node, "InViewerIconChecked")?;
                self.has_viewer_interface = true;
            }
        }

        if let Some(props_node) = field(node, "Props") {
            for prop in flags(props_node, "Props")? {
                self.apply_prop(&prop)?;
            }
        }

        Ok(())
    }

    /// Apply one name from the trailing `Props` list.
    ///
    /// Runs after every other block so it can override flags set earlier
    /// (Volatile flips persistence off). Unknown names warn and are skipped.
    fn apply_prop(&mut self, prop: &str) -> Result<(), SerializationError> {
        match prop {
            "VisibilityChanged" => self.visibility_changed = true,
            "MasterIsAlias" => self.master_is_alias = true,
            "NoNewLine" => self.trigger_new_line = false,
            "NoEval" => self.evaluates_on_change = false,
            "AnimatesChanged" => self.animates_changed = true,
            "Volatile" => self.is_persistent = false,
            "IsLabel" => text_mut(&mut self.extra_data)?.set_as_label(),
            "MultiLine" => text_mut(&mut self.extra_data)?.set_multi_line(),
            "RichText" => text_mut(&mut self.extra_data)?.rich_text = true,
            "Italic" => text_mut(&mut self.extra_data)?.italic = true,
            "Bold" => text_mut(&mut self.extra_data)?.bold = true,
            "MultiPath" => path_mut(&mut self.extra_data)?.multi_path = true,
            "Sequences" => file_mut(&mut self.extra_data)?.use_sequences = true,
            "UseOverlay" => generic_mut(&mut self.extra_data).set_use_host_overlay_handle(true),
            other => warn!("unrecognized parameter property '{other}', skipping"),
        }
        Ok(())
    }
}
