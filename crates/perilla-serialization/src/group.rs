//! Group record: a named container of parameters and nested groups.
//!
//! The one place in the format where a type tag is written explicitly:
//! each child of a group carries a `Kind` discriminant so decode knows
//! whether to instantiate a nested group or a leaf parameter before reading
//! it. Everywhere else presence decides; here it cannot, because a leaf
//! parameter and a group are both maps.

use perilla_document::{
    Hash, Yaml, expect_seq, field, flag_list, flags, map_entry, required_field, string_field,
};
use tracing::warn;

use crate::error::SerializationError;
use crate::knob::KnobSerialization;

/// Discriminant value written for nested groups.
const KIND_GROUP: &str = "Group";
/// Discriminant value written for leaf parameters.
const KIND_PARAM: &str = "Param";

/// One child of a group: either a leaf parameter or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum KnobEntry {
    /// A leaf parameter record.
    Knob(KnobSerialization),
    /// A nested group record.
    Group(GroupKnobSerialization),
}

impl KnobEntry {
    /// Encode this child with its `Kind` discriminant.
    ///
    /// Returns `None` for leaf parameters flagged "do not serialize".
    pub fn encode(&self) -> Option<Yaml> {
        match self {
            KnobEntry::Knob(knob) => knob.encode().map(|node| tag_child(node, KIND_PARAM)),
            KnobEntry::Group(group) => Some(group.encode()),
        }
    }
}

/// Prepend the `Kind` discriminant to an encoded child map.
fn tag_child(node: Yaml, kind: &str) -> Yaml {
    match node {
        Yaml::Hash(inner) => {
            let mut tagged = Hash::new();
            map_entry(&mut tagged, "Kind", Yaml::String(kind.to_owned()));
            for (key, value) in inner {
                tagged.insert(key, value);
            }
            Yaml::Hash(tagged)
        }
        other => other,
    }
}

/// A serialized UI group (page, tab or collapsible section) of parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupKnobSerialization {
    /// The group's parameter type name.
    pub type_name: String,
    /// Stable script name.
    pub name: String,
    /// Human label, defaulting to the script name.
    pub label: String,
    /// Children in declaration order.
    pub children: Vec<KnobEntry>,
    /// Whether the group is expanded.
    pub is_opened: bool,
    /// Whether the group renders as a tab.
    pub is_set_as_tab: bool,
    /// Whether the group is hidden.
    pub secret: bool,
}

impl GroupKnobSerialization {
    /// A group marked by its type and script name.
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            type_name: type_name.into(),
            label: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Encode this group and all of its children as a map node.
    pub fn encode(&self) -> Yaml {
        let mut map = Hash::new();
        map_entry(&mut map, "Kind", Yaml::String(KIND_GROUP.to_owned()));
        map_entry(&mut map, "TypeName", Yaml::String(self.type_name.clone()));
        map_entry(&mut map, "ScriptName", Yaml::String(self.name.clone()));
        if self.label != self.name {
            map_entry(&mut map, "Label", Yaml::String(self.label.clone()));
        }

        let children: Vec<Yaml> = self.children.iter().filter_map(KnobEntry::encode).collect();
        if !children.is_empty() {
            map_entry(&mut map, "Params", Yaml::Array(children));
        }

        let mut props: Vec<String> = Vec::new();
        if self.is_opened {
            props.push("Opened".to_owned());
        }
        if self.is_set_as_tab {
            props.push("IsTab".to_owned());
        }
        if self.secret {
            props.push("Secret".to_owned());
        }
        if !props.is_empty() {
            map_entry(&mut map, "Props", flag_list(&props));
        }

        Yaml::Hash(map)
    }

    /// Decode a map node into this group, recursing into children.
    pub fn decode(&mut self, node: &Yaml) -> Result<(), SerializationError> {
        perilla_document::expect_map(node, "group")?;
        self.type_name = string_field(required_field(node, "TypeName")?, "TypeName")?;
        self.name = string_field(required_field(node, "ScriptName")?, "ScriptName")?;
        self.label = match field(node, "Label") {
            Some(label_node) => string_field(label_node, "Label")?,
            None => self.name.clone(),
        };

        if let Some(params_node) = field(node, "Params") {
            for child in expect_seq(params_node, "Params")? {
                // A child without a discriminant is a leaf parameter; only
                // nested groups are required to announce themselves.
                let is_group = match field(child, "Kind") {
                    Some(kind_node) => string_field(kind_node, "Kind")? == KIND_GROUP,
                    None => false,
                };
                if is_group {
                    let mut group = GroupKnobSerialization::default();
                    group.decode(child)?;
                    self.children.push(KnobEntry::Group(group));
                } else {
                    let mut knob = KnobSerialization::default();
                    knob.decode(child)?;
                    self.children.push(KnobEntry::Knob(knob));
                }
            }
        }

        if let Some(props_node) = field(node, "Props") {
            for prop in flags(props_node, "Props")? {
                match prop.as_str() {
                    "Opened" => self.is_opened = true,
                    "IsTab" => self.is_set_as_tab = true,
                    "Secret" => self.secret = true,
                    other => warn!("unrecognized group property '{other}', skipping"),
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perilla_document::{DocumentError, parse_document};

    fn leaf(name: &str) -> KnobEntry {
        KnobEntry::Knob(KnobSerialization::new(name))
    }

    fn decode_group(text: &str) -> Result<GroupKnobSerialization, SerializationError> {
        let node = parse_document(text).unwrap();
        let mut group = GroupKnobSerialization::default();
        group.decode(&node)?;
        Ok(group)
    }

    // --- child dispatch ---

    #[test]
    fn mixed_children_decode_with_correct_kinds_in_order() {
        let mut inner = GroupKnobSerialization::new("Group", "advanced");
        inner.children.push(leaf("threshold"));
        let mut outer = GroupKnobSerialization::new("Group", "controls");
        outer.children.push(KnobEntry::Group(inner));
        outer.children.push(leaf("mix"));

        let mut back = GroupKnobSerialization::default();
        back.decode(&outer.encode()).unwrap();
        assert_eq!(back.children.len(), 2);
        match &back.children[0] {
            KnobEntry::Group(group) => {
                assert_eq!(group.name, "advanced");
                assert_eq!(group.children.len(), 1);
            }
            other => panic!("expected a nested group first, got {other:?}"),
        }
        match &back.children[1] {
            KnobEntry::Knob(knob) => assert_eq!(knob.script_name, "mix"),
            other => panic!("expected a leaf parameter second, got {other:?}"),
        }
    }

    #[test]
    fn children_carry_an_explicit_discriminant() {
        let mut group = GroupKnobSerialization::new("Group", "g");
        group.children.push(leaf("a"));
        let node = group.encode();
        let params = expect_seq(field(&node, "Params").unwrap(), "Params").unwrap();
        assert_eq!(
            string_field(field(&params[0], "Kind").unwrap(), "Kind").unwrap(),
            "Param"
        );
        assert_eq!(
            string_field(field(&node, "Kind").unwrap(), "Kind").unwrap(),
            "Group"
        );
    }

    #[test]
    fn untagged_child_decodes_as_a_leaf_parameter() {
        let group = decode_group(
            "TypeName: Group\nScriptName: g\nParams:\n- {ScriptName: legacy}\n",
        )
        .unwrap();
        assert!(matches!(&group.children[0], KnobEntry::Knob(k) if k.script_name == "legacy"));
    }

    #[test]
    fn unserialized_leaf_children_are_skipped_on_encode() {
        let mut hidden = KnobSerialization::new("hidden");
        hidden.must_serialize = false;
        let mut group = GroupKnobSerialization::new("Group", "g");
        group.children.push(KnobEntry::Knob(hidden));
        group.children.push(leaf("shown"));

        let node = group.encode();
        let params = expect_seq(field(&node, "Params").unwrap(), "Params").unwrap();
        assert_eq!(params.len(), 1);
    }

    // --- identity and defaults ---

    #[test]
    fn label_defaults_to_script_name() {
        let group = decode_group("{TypeName: Group, ScriptName: transform}").unwrap();
        assert_eq!(group.label, "transform");
    }

    #[test]
    fn distinct_label_round_trips() {
        let mut group = GroupKnobSerialization::new("Group", "xform");
        group.label = "Transform".to_owned();
        let mut back = GroupKnobSerialization::default();
        back.decode(&group.encode()).unwrap();
        assert_eq!(back.label, "Transform");
    }

    #[test]
    fn missing_type_name_is_a_structural_error() {
        let err = decode_group("{ScriptName: g}").unwrap_err();
        assert_eq!(
            err,
            SerializationError::Document(DocumentError::missing_field("TypeName"))
        );
    }

    // --- props ---

    #[test]
    fn group_flags_round_trip() {
        let mut group = GroupKnobSerialization::new("Group", "g");
        group.is_opened = true;
        group.secret = true;
        let mut back = GroupKnobSerialization::default();
        back.decode(&group.encode()).unwrap();
        assert!(back.is_opened);
        assert!(!back.is_set_as_tab);
        assert!(back.secret);
    }

    #[test]
    fn unknown_group_prop_is_skipped_not_fatal() {
        let group =
            decode_group("{TypeName: Group, ScriptName: g, Props: [Shiny, IsTab]}").unwrap();
        assert!(group.is_set_as_tab);
    }

    // --- stability ---

    #[test]
    fn encode_decode_encode_is_stable_recursively() {
        let mut inner = GroupKnobSerialization::new("Group", "inner");
        inner.is_set_as_tab = true;
        inner.children.push(leaf("a"));
        let mut outer = GroupKnobSerialization::new("Group", "outer");
        outer.is_opened = true;
        outer.children.push(KnobEntry::Group(inner));
        outer.children.push(leaf("b"));

        let first = outer.encode();
        let mut decoded = GroupKnobSerialization::default();
        decoded.decode(&first).unwrap();
        assert_eq!(decoded.encode(), first);
    }
}
