use serde::Serialize;

/// One decoded data element: a tag, its dictionary name, a value
/// representation code, and a value that is either text or a sequence of
/// nested attributes.
///
/// `depth` is the nesting level supplied by the producer and only drives
/// indentation in the rendered table; the actual nesting is given by the
/// [`AttributeValue::Sequence`] structure itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub depth: i32,
    pub tag: String,
    pub name: String,
    pub vr: String,
    pub value: AttributeValue,
}

/// An attribute value on the wire: a leaf string or a nested sequence,
/// carried under an explicit `{"type": ..., "content": ...}` shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    String(String),
    Sequence(Vec<Attribute>),
}

impl AttributeValue {
    pub fn is_sequence(&self) -> bool {
        matches!(self, AttributeValue::Sequence(_))
    }

    /// Number of nested attributes; zero for leaves.
    pub fn item_count(&self) -> usize {
        match self {
            AttributeValue::String(_) => 0,
            AttributeValue::Sequence(items) => items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_encodes_with_discriminator_and_content() {
        let value = AttributeValue::String("Doe^John".to_string());
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"type": "String", "content": "Doe^John"})
        );
    }

    #[test]
    fn sequence_encodes_nested_attributes() {
        let value = AttributeValue::Sequence(vec![Attribute {
            depth: 1,
            tag: "(0008,0060)".to_string(),
            name: "Modality".to_string(),
            vr: "CS".to_string(),
            value: AttributeValue::String("CT".to_string()),
        }]);

        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "type": "Sequence",
                "content": [{
                    "depth": 1,
                    "tag": "(0008,0060)",
                    "name": "Modality",
                    "vr": "CS",
                    "value": {"type": "String", "content": "CT"}
                }]
            })
        );
    }

    #[test]
    fn item_count_reflects_sequence_length() {
        assert_eq!(AttributeValue::String("x".to_string()).item_count(), 0);
        assert_eq!(AttributeValue::Sequence(Vec::new()).item_count(), 0);
    }
}
