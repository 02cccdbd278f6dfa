//! Per-dimension value record.
//!
//! A multi-component parameter serializes one entry per dimension that
//! diverges from its default state; a dimension absent from the document
//! means "equals default, nothing to restore beyond defaulting". Each entry
//! bundles the value, an optional default, the animation curve, an
//! expression and a master link, all individually optional.

use perilla_document::{
    Hash, Yaml, expect_seq, field, flag_list, flags, i64_field, map_entry, required_field,
    string_field,
};
use tracing::warn;

use crate::curve::CurveSerialization;
use crate::error::SerializationError;
use crate::value::{Value, decode_scalar, encode_scalar};

/// A slave/master relationship: this dimension follows another parameter's
/// dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterLink {
    /// Script name of the master parameter.
    pub master_knob_name: String,
    /// Dimension index on the master parameter.
    pub master_dimension: i64,
    /// Name of the node owning the master parameter.
    pub master_node_name: String,
    /// Sub-track name on the master, empty when not applicable.
    pub master_track_name: String,
}

/// One dimension of a parameter snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSerialization {
    /// 0-based dimension index within the owning parameter.
    pub dimension: usize,
    /// Whether this dimension diverges from its default state and must be
    /// written. Set by the owning application on encode; set to true by
    /// decode for every entry found.
    pub must_serialize: bool,
    /// Whether the current value itself must be written.
    pub serialize_value: bool,
    /// The current value; [`Value::None`] when the type is unknown.
    pub value: Value,
    /// Whether the default value must be written.
    pub serialize_default: bool,
    /// The default value.
    pub default_value: Value,
    /// The animation curve, empty when the dimension is not animated.
    pub animation_curve: CurveSerialization,
    /// The expression driving this dimension, empty when none.
    pub expression: String,
    /// Whether the expression declares an explicit return variable.
    pub expression_has_return_variable: bool,
    /// The master link, when this dimension is slaved.
    pub master: Option<MasterLink>,
    /// Whether the enabled state diverged from its default.
    pub enabled_changed: bool,
}

impl ValueSerialization {
    /// A dimension record marked for serialization.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            must_serialize: true,
            ..Self::default()
        }
    }

    /// Set the current value and mark it for serialization.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
        self.serialize_value = true;
    }

    /// Set the default value and mark it for serialization.
    pub fn set_default_value(&mut self, value: Value) {
        self.default_value = value;
        self.serialize_default = true;
    }

    /// Encode this dimension as one entry of the parent's `Dimensions`
    /// sequence.
    ///
    /// Every field equal to its default is omitted. The value is written
    /// only when there is no animation curve (the curve wins) and its type
    /// is known.
    pub fn encode(&self) -> Yaml {
        let mut map = Hash::new();
        let mut props: Vec<String> = Vec::new();

        map_entry(&mut map, "Index", Yaml::Integer(self.dimension as i64));

        if self.serialize_value && self.animation_curve.is_empty() {
            if let Some(node) = encode_scalar(&self.value) {
                map_entry(&mut map, "Value", node);
            }
        }
        if self.serialize_default {
            if let Some(node) = encode_scalar(&self.default_value) {
                map_entry(&mut map, "Default", node);
            }
        }
        if let Some(curve) = self.animation_curve.encode() {
            map_entry(&mut map, "Curve", curve);
        }
        if !self.expression.is_empty() {
            map_entry(&mut map, "Expr", Yaml::String(self.expression.clone()));
            // False is the default, so only the true case is written.
            if self.expression_has_return_variable {
                props.push("ExprHasRet".to_owned());
            }
        }
        if self.enabled_changed {
            props.push("EnabledChanged".to_owned());
        }
        if let Some(master) = &self.master {
            let mut seq = vec![
                Yaml::String(master.master_knob_name.clone()),
                Yaml::Integer(master.master_dimension),
                Yaml::String(master.master_node_name.clone()),
            ];
            if !master.master_track_name.is_empty() {
                seq.push(Yaml::String(master.master_track_name.clone()));
            }
            map_entry(&mut map, "Master", Yaml::Array(seq));
        }
        if !props.is_empty() {
            map_entry(&mut map, "DimProps", flag_list(&props));
        }

        Yaml::Hash(map)
    }

    /// Decode one entry of a `Dimensions` sequence into this record.
    ///
    /// Absent fields keep their implicit defaults. Unknown `DimProps` names
    /// are logged and skipped; shape violations abort the decode.
    pub fn decode(&mut self, node: &Yaml) -> Result<(), SerializationError> {
        perilla_document::expect_map(node, "dimension entry")?;
        self.must_serialize = true;
        self.dimension = i64_field(required_field(node, "Index")?, "Index")? as usize;

        if let Some(value_node) = field(node, "Value") {
            self.value = decode_scalar(value_node);
            self.serialize_value = true;
        }
        if let Some(value_node) = field(node, "Default") {
            self.default_value = decode_scalar(value_node);
            self.serialize_default = true;
        }
        if let Some(curve_node) = field(node, "Curve") {
            self.animation_curve.decode(curve_node);
        }
        if let Some(expr_node) = field(node, "Expr") {
            self.expression = string_field(expr_node, "Expr")?;
        }
        if let Some(master_node) = field(node, "Master") {
            self.master = Some(decode_master(master_node)?);
        }
        if let Some(props_node) = field(node, "DimProps") {
            for prop in flags(props_node, "DimProps")? {
                match prop.as_str() {
                    "EnabledChanged" => self.enabled_changed = true,
                    "ExprHasRet" => self.expression_has_return_variable = true,
                    other => warn!("unrecognized dimension property '{other}', skipping"),
                }
            }
        }

        Ok(())
    }
}

/// Decode a master link from its 3-or-4-element sequence form.
fn decode_master(node: &Yaml) -> Result<MasterLink, SerializationError> {
    let seq = expect_seq(node, "Master")?;
    if seq.len() != 3 && seq.len() != 4 {
        return Err(
            perilla_document::DocumentError::bad_arity("Master", "3 or 4", seq.len()).into(),
        );
    }

    let mut link = MasterLink {
        master_knob_name: string_field(&seq[0], "Master name")?,
        master_dimension: i64_field(&seq[1], "Master dimension")?,
        master_node_name: string_field(&seq[2], "Master node")?,
        master_track_name: String::new(),
    };
    if seq.len() == 4 {
        link.master_track_name = string_field(&seq[3], "Master track")?;
    }
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perilla_document::DocumentError;
    use perilla_document::parse_document;

    fn decode_entry(text: &str) -> Result<ValueSerialization, SerializationError> {
        let node = parse_document(text).unwrap();
        let mut dim = ValueSerialization::default();
        dim.decode(&node)?;
        Ok(dim)
    }

    // --- decode ---

    #[test]
    fn index_assigns_the_dimension_slot() {
        let dim = decode_entry("{Index: 2, Value: 0.5}").unwrap();
        assert_eq!(dim.dimension, 2);
        assert!(dim.must_serialize);
        assert!(dim.serialize_value);
        assert_eq!(dim.value, Value::Double(0.5));
    }

    #[test]
    fn absent_fields_keep_defaults() {
        let dim = decode_entry("{Index: 0}").unwrap();
        assert!(!dim.serialize_value);
        assert!(dim.value.is_none());
        assert!(dim.animation_curve.is_empty());
        assert!(dim.expression.is_empty());
        assert!(dim.master.is_none());
        assert!(!dim.enabled_changed);
    }

    #[test]
    fn missing_index_is_a_structural_error() {
        let err = decode_entry("{Value: 1}").unwrap_err();
        assert_eq!(
            err,
            SerializationError::Document(DocumentError::missing_field("Index"))
        );
    }

    #[test]
    fn non_map_entry_is_a_structural_error() {
        let node = parse_document("- 1\n- 2").unwrap();
        let mut dim = ValueSerialization::default();
        assert!(matches!(
            dim.decode(&node).unwrap_err(),
            SerializationError::Document(DocumentError::NotAMap { .. })
        ));
    }

    // --- master link arity ---

    #[test]
    fn three_element_master_decodes_with_empty_track() {
        let dim = decode_entry("{Index: 1, Master: [knobX, 1, NodeA]}").unwrap();
        let master = dim.master.unwrap();
        assert_eq!(master.master_knob_name, "knobX");
        assert_eq!(master.master_dimension, 1);
        assert_eq!(master.master_node_name, "NodeA");
        assert!(master.master_track_name.is_empty());
    }

    #[test]
    fn four_element_master_adds_the_track_name() {
        let dim = decode_entry("{Index: 1, Master: [knobX, 0, NodeA, track1]}").unwrap();
        assert_eq!(dim.master.unwrap().master_track_name, "track1");
    }

    #[test]
    fn two_element_master_is_a_structural_error() {
        let err = decode_entry("{Index: 1, Master: [knobX, 1]}").unwrap_err();
        assert_eq!(
            err,
            SerializationError::Document(DocumentError::bad_arity("Master", "3 or 4", 2))
        );
    }

    #[test]
    fn five_element_master_is_a_structural_error() {
        let err = decode_entry("{Index: 1, Master: [a, 1, b, c, d]}").unwrap_err();
        assert_eq!(
            err,
            SerializationError::Document(DocumentError::bad_arity("Master", "3 or 4", 5))
        );
    }

    // --- dim props ---

    #[test]
    fn dim_props_set_their_flags() {
        let dim = decode_entry("{Index: 0, Expr: 'a+b', DimProps: [ExprHasRet, EnabledChanged]}")
            .unwrap();
        assert_eq!(dim.expression, "a+b");
        assert!(dim.expression_has_return_variable);
        assert!(dim.enabled_changed);
    }

    #[test]
    fn unknown_dim_prop_is_skipped_not_fatal() {
        let dim = decode_entry("{Index: 0, DimProps: [SomethingNew, EnabledChanged]}").unwrap();
        assert!(dim.enabled_changed);
    }

    // --- encode ---

    #[test]
    fn encode_omits_everything_at_default() {
        let dim = ValueSerialization::new(1);
        let node = dim.encode();
        let map = perilla_document::expect_map(&node, "entry").unwrap();
        assert_eq!(map.len(), 1, "only Index should be written: {map:?}");
    }

    #[test]
    fn value_is_suppressed_while_a_curve_is_present() {
        let mut dim = ValueSerialization::new(0);
        dim.set_value(Value::Double(1.0));
        dim.animation_curve = CurveSerialization::from_node(
            parse_document("- {Frame: 1, Value: 2}").unwrap(),
        );
        let node = dim.encode();
        assert!(field(&node, "Value").is_none());
        assert!(field(&node, "Curve").is_some());
    }

    #[test]
    fn expr_has_ret_written_only_when_true() {
        let mut dim = ValueSerialization::new(0);
        dim.expression = "ret = x".to_owned();
        dim.expression_has_return_variable = true;
        let node = dim.encode();
        let props = flags(field(&node, "DimProps").unwrap(), "DimProps").unwrap();
        assert_eq!(props, vec!["ExprHasRet".to_owned()]);

        dim.expression_has_return_variable = false;
        let node = dim.encode();
        assert!(field(&node, "DimProps").is_none());
    }

    #[test]
    fn round_trip_preserves_all_non_default_fields() {
        let mut dim = ValueSerialization::new(2);
        dim.set_value(Value::Double(3.5));
        dim.set_default_value(Value::Double(1.0));
        dim.expression = "x * 2".to_owned();
        dim.enabled_changed = true;
        dim.master = Some(MasterLink {
            master_knob_name: "size".to_owned(),
            master_dimension: 0,
            master_node_name: "Blur1".to_owned(),
            master_track_name: String::new(),
        });

        let mut back = ValueSerialization::default();
        back.decode(&dim.encode()).unwrap();
        assert_eq!(back, dim);
    }
}
