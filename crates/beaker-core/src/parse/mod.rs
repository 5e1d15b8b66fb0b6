pub mod category;
pub mod data_structure;
pub mod member;
pub mod resource;
pub mod scalar;
pub mod transaction;

use serde_json::Value;

use crate::element::{Element, NodePath, text_list_value, text_value};
use crate::error::DecodeError;
use category::ParseResult;
use scalar::CopyElement;

/// Element names understood by the typed decoders.
pub mod kind {
    pub const PARSE_RESULT: &str = "parseResult";
    pub const ANNOTATION: &str = "annotation";
    pub const CATEGORY: &str = "category";
    pub const COPY: &str = "copy";
    pub const STRING: &str = "string";
    pub const NUMBER: &str = "number";
    pub const BOOLEAN: &str = "boolean";
    pub const OBJECT: &str = "object";
    pub const ARRAY: &str = "array";
    pub const ENUM: &str = "enum";
    pub const MEMBER: &str = "member";
    pub const ASSET: &str = "asset";
    pub const RESOURCE: &str = "resource";
    pub const TRANSITION: &str = "transition";
    pub const HTTP_TRANSACTION: &str = "httpTransaction";
    pub const HTTP_REQUEST: &str = "httpRequest";
    pub const HTTP_RESPONSE: &str = "httpResponse";
    pub const HTTP_HEADERS: &str = "httpHeaders";
    pub const HREF_VARIABLES: &str = "hrefVariables";
    pub const DATA_STRUCTURE: &str = "dataStructure";
}

/// A concrete element decoded from a generic [`Element`] with a fixed name.
pub trait TypedElement: Sized {
    const KIND: &'static str;

    /// Decode the element body. The element name has already been checked.
    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError>;

    fn decode(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        expect_kind(element, Self::KIND, path)?;
        Self::decode_content(element, path)
    }
}

/// A `category` element told apart from its siblings by a classification tag.
pub trait CategoryElement: Sized {
    const CLASS: &'static str;

    fn decode_category(element: &Element, path: &NodePath) -> Result<Self, DecodeError>;

    fn decode(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        expect_kind(element, kind::CATEGORY, path)?;
        if !element.has_class(Self::CLASS) {
            return Err(DecodeError::MissingClassification {
                expected: Self::CLASS,
                found: element.classes(),
                path: path.clone(),
            });
        }
        Self::decode_category(element, path)
    }
}

/// Encode a typed value back into a generic element.
pub trait ToElement {
    fn to_element(&self) -> Element;
}

/// Parse an API Elements document from JSON text.
pub fn from_json(input: &str) -> Result<ParseResult, DecodeError> {
    let root: Element = serde_json::from_str(input)?;
    ParseResult::decode(&root, &NodePath::root())
}

/// Parse an API Elements document from an already tokenized JSON value.
pub fn from_value(value: Value) -> Result<ParseResult, DecodeError> {
    let root: Element = serde_json::from_value(value)?;
    ParseResult::decode(&root, &NodePath::root())
}

/// Encode a typed value, serialize it to JSON, and decode it again.
pub fn reencode<T: TypedElement + ToElement>(value: &T) -> Result<T, DecodeError> {
    let json = serde_json::to_value(value.to_element())?;
    let element: Element = serde_json::from_value(json)?;
    T::decode(&element, &NodePath::root())
}

pub(crate) fn expect_kind(
    element: &Element,
    expected: &'static str,
    path: &NodePath,
) -> Result<(), DecodeError> {
    if element.kind() != expected {
        return Err(DecodeError::KindMismatch {
            expected,
            found: element.kind().to_string(),
            path: path.clone(),
        });
    }
    Ok(())
}

/// Read an optional scalar attribute such as `href` or `method`.
pub(crate) fn text_attribute(
    element: &Element,
    field: &'static str,
    path: &NodePath,
) -> Result<Option<String>, DecodeError> {
    match element.attribute(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => text_value(value).map(|s| Some(s.to_string())).ok_or_else(|| {
            DecodeError::MalformedScalar {
                field,
                raw: value.to_string(),
                path: path.attribute(field),
            }
        }),
    }
}

/// Read an optional string-list attribute such as `typeAttributes`.
pub(crate) fn text_list_attribute(
    element: &Element,
    field: &'static str,
    path: &NodePath,
) -> Result<Vec<String>, DecodeError> {
    match element.attribute(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => text_list_value(value).ok_or_else(|| DecodeError::MalformedScalar {
            field,
            raw: value.to_string(),
            path: path.attribute(field),
        }),
    }
}

/// Decode an attribute whose value is itself an element, e.g. `headers`.
pub(crate) fn element_attribute<T: TypedElement>(
    element: &Element,
    field: &'static str,
    path: &NodePath,
) -> Result<Option<T>, DecodeError> {
    let Some(value) = element.attribute(field).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let attr_path = path.attribute(field);
    let nested: Element =
        serde_json::from_value(value.clone()).map_err(|e| DecodeError::MalformedScalar {
            field,
            raw: e.to_string(),
            path: attr_path.clone(),
        })?;
    T::decode(&nested, &attr_path).map(Some)
}

/// Join the text of every `copy` child, in order.
pub(crate) fn collect_copy(
    element: &Element,
    path: &NodePath,
) -> Result<Option<String>, DecodeError> {
    let mut parts = Vec::new();
    for (i, child) in element.children().iter().enumerate() {
        if child.kind() == kind::COPY {
            parts.push(CopyElement::decode(child, &path.child(i))?.text);
        }
    }
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join("\n\n")))
    }
}
