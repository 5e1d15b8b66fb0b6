use crate::element::{Element, NodePath};
use crate::error::DecodeError;

use super::member::{Member, decode_members};
use super::{TypedElement, kind};

/// The lexical form of a `dataStructure` element.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStructure {
    /// A freshly declared, identified type. `base_kind` is the element the
    /// type extends: `object`, a primitive, or another named type.
    Named {
        id: String,
        description: Option<String>,
        members: Vec<Member>,
        base_kind: String,
    },
    /// An inline object without an identifier.
    Anonymous { members: Vec<Member> },
    /// A use of a type declared elsewhere.
    Reference { id: String },
    /// An identified list type over a single item type.
    Array { id: String, element_kind: String },
}

impl DataStructure {
    /// Identifier of the type this node declares, if it declares one.
    pub fn declared_id(&self) -> Option<&str> {
        match self {
            DataStructure::Named { id, .. } | DataStructure::Array { id, .. } => Some(id),
            DataStructure::Anonymous { .. } | DataStructure::Reference { .. } => None,
        }
    }
}

impl TypedElement for DataStructure {
    const KIND: &'static str = kind::DATA_STRUCTURE;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        match element.children() {
            [child] => classify(child, &path.child(0)),
            children => Err(DecodeError::UnknownDataStructure {
                children: children.len(),
                path: path.clone(),
            }),
        }
    }
}

/// Classify the single child of a `dataStructure` node. First match wins:
///
/// 1. identified `array` gives [`DataStructure::Array`]
/// 2. any other identified element gives [`DataStructure::Named`]
/// 3. unidentified `object` gives [`DataStructure::Anonymous`]
/// 4. anything else is a [`DataStructure::Reference`] to the child's kind
pub fn classify(child: &Element, path: &NodePath) -> Result<DataStructure, DecodeError> {
    match (child.id(), child.kind()) {
        (Some(id), kind::ARRAY) => match child.children() {
            [item] => Ok(DataStructure::Array {
                id: id.to_string(),
                element_kind: item.kind().to_string(),
            }),
            [] => Err(DecodeError::NotSupported {
                construct: "array data structure without an item type".to_string(),
                path: path.clone(),
            }),
            _ => Err(DecodeError::NotSupported {
                construct: "more than one item type in an array data structure".to_string(),
                path: path.clone(),
            }),
        },
        (Some(_), kind::ENUM) => Err(DecodeError::NotSupported {
            construct: "enum data structure".to_string(),
            path: path.clone(),
        }),
        (Some(id), base_kind) => Ok(DataStructure::Named {
            id: id.to_string(),
            description: child.description().map(String::from),
            members: decode_members(child, path)?,
            base_kind: base_kind.to_string(),
        }),
        (None, kind::OBJECT) => Ok(DataStructure::Anonymous {
            members: decode_members(child, path)?,
        }),
        (None, other) => Ok(DataStructure::Reference {
            id: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::member::MemberValue;

    fn decode(json: &str) -> Result<DataStructure, DecodeError> {
        let el: Element = serde_json::from_str(json).unwrap();
        DataStructure::decode(&el, &NodePath::root())
    }

    #[test]
    fn test_named_object() {
        let ds = decode(
            r#"{"element": "dataStructure", "content": {
                "element": "object",
                "meta": {"id": "Coupon Base"},
                "content": [
                    {"element": "member", "content": {
                        "key": {"element": "string", "content": "percent_off"},
                        "value": {"element": "number", "content": 25}
                    }},
                    {"element": "member", "content": {
                        "key": {"element": "string", "content": "redeem_by"},
                        "value": {"element": "number"}
                    }}
                ]
            }}"#,
        )
        .unwrap();

        let DataStructure::Named {
            id,
            members,
            base_kind,
            ..
        } = ds
        else {
            panic!("expected named data structure");
        };
        assert_eq!(id, "Coupon Base");
        assert_eq!(base_kind, "object");
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["percent_off", "redeem_by"]);
        assert!(members.iter().all(|m| !m.required));
        assert_eq!(members[0].example.as_deref(), Some("25"));
        assert_eq!(members[1].value, MemberValue::Number(None));
    }

    #[test]
    fn test_named_extends_other_type() {
        let ds = decode(
            r#"{"element": "dataStructure", "content": {
                "element": "Coupon Base",
                "meta": {"id": "Coupon"},
                "content": [
                    {"element": "member", "content": {
                        "key": {"element": "string", "content": "id"},
                        "value": {"element": "string"}
                    }}
                ]
            }}"#,
        )
        .unwrap();
        assert!(matches!(
            ds,
            DataStructure::Named { ref base_kind, .. } if base_kind == "Coupon Base"
        ));
        assert_eq!(ds.declared_id(), Some("Coupon"));
    }

    #[test]
    fn test_array_of_reference() {
        let ds = decode(
            r#"{"element": "dataStructure", "content": {
                "element": "array",
                "meta": {"id": "Coupons"},
                "content": [{"element": "Coupon"}]
            }}"#,
        )
        .unwrap();
        assert_eq!(
            ds,
            DataStructure::Array {
                id: "Coupons".into(),
                element_kind: "Coupon".into()
            }
        );
    }

    #[test]
    fn test_array_item_count() {
        let err = decode(
            r#"{"element": "dataStructure", "content": {
                "element": "array",
                "meta": {"id": "Mixed"},
                "content": [{"element": "Coupon"}, {"element": "Note"}]
            }}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::NotSupported { ref construct, .. }
            if construct == "more than one item type in an array data structure"));

        let err = decode(
            r#"{"element": "dataStructure", "content": {"element": "array", "meta": {"id": "Empty"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::NotSupported { .. }));
    }

    #[test]
    fn test_anonymous_object() {
        let ds = decode(
            r#"{"element": "dataStructure", "content": [{
                "element": "object",
                "content": [
                    {"element": "member", "attributes": {"typeAttributes": ["required"]}, "content": {
                        "key": {"element": "string", "content": "question"},
                        "value": {"element": "string", "content": "Favourite language?"}
                    }}
                ]
            }]}"#,
        )
        .unwrap();
        let DataStructure::Anonymous { members } = ds else {
            panic!("expected anonymous data structure");
        };
        assert_eq!(members.len(), 1);
        assert!(members[0].required);
    }

    #[test]
    fn test_reference() {
        let ds = decode(r#"{"element": "dataStructure", "content": {"element": "Coupon"}}"#).unwrap();
        assert_eq!(ds, DataStructure::Reference { id: "Coupon".into() });
        assert_eq!(ds.declared_id(), None);

        // An unidentified array is a reference to the array kind itself.
        let ds = decode(r#"{"element": "dataStructure", "content": {"element": "array"}}"#).unwrap();
        assert_eq!(ds, DataStructure::Reference { id: "array".into() });
    }

    #[test]
    fn test_child_count() {
        let err = decode(r#"{"element": "dataStructure"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDataStructure { children: 0, .. }));

        let err = decode(
            r#"{"element": "dataStructure", "content": [{"element": "A"}, {"element": "B"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDataStructure { children: 2, .. }));
    }

    #[test]
    fn test_enum_rejected() {
        let err = decode(
            r#"{"element": "dataStructure", "content": {"element": "enum", "meta": {"id": "Status"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::NotSupported { .. }));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let child: Element = serde_json::from_str(
            r#"{"element": "object", "meta": {"id": {"element": "string", "content": "Note"}}}"#,
        )
        .unwrap();
        let first = classify(&child, &NodePath::root()).unwrap();
        let second = classify(&child, &NodePath::root()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.declared_id(), Some("Note"));
    }
}
