//! Scalar value variant codec.
//!
//! Serialized values carry no type tag: a written scalar is classified on
//! decode by attempting parses in a fixed order. The precedence is
//! load-bearing and part of the compatibility contract — see
//! [`decode_scalar`].

use perilla_document::real_node;
use yaml_rust::Yaml;

/// A dynamically typed parameter value.
///
/// `None` means unset / not applicable; exactly one payload is meaningful
/// per tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value set.
    #[default]
    None,
    /// A boolean value.
    Boolean(bool),
    /// An integer value. Only produced by live snapshots; decode classifies
    /// every numeric scalar as [`Value::Double`] and derives the integer
    /// view by truncation.
    Integer(i64),
    /// A double value.
    Double(f64),
    /// A string value.
    String(String),
}

impl Value {
    /// Whether this is [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The integer view of this value.
    ///
    /// A double is truncated; there is never a separate integer parse on
    /// decode, so integer-typed consumers always see the truncation of the
    /// decoded double.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Double(d) => Some(*d as i64),
            _ => None,
        }
    }

    /// The double view of this value.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Classify a written scalar.
///
/// Parse precedence is double → boolean → string: a numeric form (including
/// a quoted one) is a [`Value::Double`]; failing that, `true`/`false` is a
/// [`Value::Boolean`]; everything else falls back to [`Value::String`],
/// which cannot fail, so decode as a whole never fails. A null scalar is
/// [`Value::None`]; non-scalar nodes also classify as `None` since there is
/// nothing textual to read.
///
/// Known ambiguity, deliberately not fixed: a string that looks numeric
/// ("3") re-classifies as a double on decode. Writing a tag would repair the
/// round trip but break every document produced under this ordering.
pub fn decode_scalar(node: &Yaml) -> Value {
    match node {
        Yaml::Null => Value::None,
        Yaml::Boolean(b) => Value::Boolean(*b),
        Yaml::Integer(i) => Value::Double(*i as f64),
        Yaml::Real(text) => match text.parse::<f64>() {
            Ok(d) => Value::Double(d),
            Err(_) => Value::String(text.clone()),
        },
        Yaml::String(text) => {
            if let Ok(d) = text.parse::<f64>() {
                Value::Double(d)
            } else if let Ok(b) = text.parse::<bool>() {
                Value::Boolean(b)
            } else {
                Value::String(text.clone())
            }
        }
        _ => Value::None,
    }
}

/// Write the active field of a value in its natural textual form.
///
/// No tag is written. Returns `None` for [`Value::None`], which callers use
/// to skip the field entirely.
pub fn encode_scalar(value: &Value) -> Option<Yaml> {
    match value {
        Value::None => None,
        Value::Boolean(b) => Some(Yaml::Boolean(*b)),
        Value::Integer(i) => Some(Yaml::Integer(*i)),
        Value::Double(d) => Some(real_node(*d)),
        Value::String(s) => Some(Yaml::String(s.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perilla_document::parse_document;

    fn scalar(text: &str) -> Yaml {
        // Parse through a map so plain-scalar resolution applies as it would
        // inside a real document.
        let doc = parse_document(&format!("V: {text}")).unwrap();
        perilla_document::field(&doc, "V").unwrap().clone()
    }

    // --- classification precedence ---

    #[test]
    fn numeric_literal_is_double_with_truncated_integer_view() {
        let v = decode_scalar(&scalar("3"));
        assert_eq!(v, Value::Double(3.0));
        assert_eq!(v.as_integer(), Some(3));
    }

    #[test]
    fn fractional_literal_is_double() {
        let v = decode_scalar(&scalar("2.75"));
        assert_eq!(v, Value::Double(2.75));
        assert_eq!(v.as_integer(), Some(2));
    }

    #[test]
    fn true_and_false_are_booleans() {
        assert_eq!(decode_scalar(&scalar("true")), Value::Boolean(true));
        assert_eq!(decode_scalar(&scalar("false")), Value::Boolean(false));
    }

    #[test]
    fn plain_text_is_string() {
        assert_eq!(
            decode_scalar(&scalar("abc")),
            Value::String("abc".to_owned())
        );
    }

    #[test]
    fn invalid_number_is_string_not_integer_or_boolean() {
        assert_eq!(
            decode_scalar(&scalar("3abc")),
            Value::String("3abc".to_owned())
        );
    }

    #[test]
    fn quoted_numeric_string_reclassifies_as_double() {
        // The documented ambiguity: no tag is written, so the textual form
        // wins and the string cannot round-trip as a string.
        let v = decode_scalar(&Yaml::String("3".to_owned()));
        assert_eq!(v, Value::Double(3.0));
    }

    #[test]
    fn null_is_none() {
        assert_eq!(decode_scalar(&Yaml::Null), Value::None);
    }

    #[test]
    fn negative_and_scientific_forms_are_doubles() {
        assert_eq!(decode_scalar(&scalar("-12")), Value::Double(-12.0));
        assert_eq!(decode_scalar(&scalar("1.5e3")), Value::Double(1500.0));
    }

    // --- encoding ---

    #[test]
    fn encode_none_emits_nothing() {
        assert!(encode_scalar(&Value::None).is_none());
    }

    #[test]
    fn encode_boolean_is_untagged_boolean_node() {
        assert_eq!(
            encode_scalar(&Value::Boolean(true)),
            Some(Yaml::Boolean(true))
        );
    }

    #[test]
    fn encode_integer_keeps_integral_form() {
        assert_eq!(encode_scalar(&Value::Integer(7)), Some(Yaml::Integer(7)));
    }

    #[test]
    fn encode_then_decode_preserves_double() {
        let node = encode_scalar(&Value::Double(0.125)).unwrap();
        assert_eq!(decode_scalar(&node), Value::Double(0.125));
    }

    #[test]
    fn encode_then_decode_preserves_non_numeric_string() {
        let node = encode_scalar(&Value::String("linear".to_owned())).unwrap();
        assert_eq!(decode_scalar(&node), Value::String("linear".to_owned()));
    }
}
