use serde_json::{Number, Value};

use crate::element::{Content, Element, Meta, NodePath, TextList};
use crate::error::DecodeError;

use super::{ToElement, TypedElement, kind, text_attribute};

/// Free-form documentation text.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyElement {
    pub text: String,
}

impl TypedElement for CopyElement {
    const KIND: &'static str = kind::COPY;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let text = element.text().ok_or_else(|| DecodeError::MissingField {
            field: "content",
            path: path.clone(),
        })?;
        Ok(CopyElement {
            text: text.to_string(),
        })
    }
}

impl ToElement for CopyElement {
    fn to_element(&self) -> Element {
        Element::new(kind::COPY).with_content(Content::Text(self.text.clone()))
    }
}

/// A `string` element. The content is optional; a bare `{"element": "string"}`
/// names the type without a sample value.
#[derive(Debug, Clone, PartialEq)]
pub struct StringElement {
    pub value: Option<String>,
}

impl TypedElement for StringElement {
    const KIND: &'static str = kind::STRING;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        match &element.content {
            None => Ok(StringElement { value: None }),
            Some(Content::Text(s)) => Ok(StringElement {
                value: Some(s.clone()),
            }),
            Some(other) => Err(DecodeError::MalformedScalar {
                field: "content",
                raw: content_to_string(other),
                path: path.key("content"),
            }),
        }
    }
}

impl ToElement for StringElement {
    fn to_element(&self) -> Element {
        let el = Element::new(kind::STRING);
        match &self.value {
            Some(v) => el.with_content(Content::Text(v.clone())),
            None => el,
        }
    }
}

/// A `number` element with an optional sample value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberElement {
    pub value: Option<Number>,
}

impl TypedElement for NumberElement {
    const KIND: &'static str = kind::NUMBER;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        match &element.content {
            None => Ok(NumberElement { value: None }),
            Some(Content::Number(n)) => Ok(NumberElement {
                value: Some(n.clone()),
            }),
            // Some serializations quote numeric samples.
            Some(Content::Text(s)) => match s.parse::<Number>() {
                Ok(n) => Ok(NumberElement { value: Some(n) }),
                Err(_) => Err(DecodeError::MalformedScalar {
                    field: "content",
                    raw: s.clone(),
                    path: path.key("content"),
                }),
            },
            Some(other) => Err(DecodeError::MalformedScalar {
                field: "content",
                raw: content_to_string(other),
                path: path.key("content"),
            }),
        }
    }
}

/// A message body or schema attached to a request or response.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// `messageBody` or `messageBodySchema`.
    pub class: Option<String>,
    pub content_type: Option<String>,
    pub content: String,
}

impl Asset {
    pub fn is_body(&self) -> bool {
        self.class.as_deref() == Some("messageBody")
    }
}

impl TypedElement for Asset {
    const KIND: &'static str = kind::ASSET;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let content = element.text().ok_or_else(|| DecodeError::MissingField {
            field: "content",
            path: path.clone(),
        })?;
        Ok(Asset {
            class: element.classes().into_iter().next(),
            content_type: text_attribute(element, "contentType", path)?,
            content: content.to_string(),
        })
    }
}

impl ToElement for Asset {
    fn to_element(&self) -> Element {
        let mut el = Element::new(kind::ASSET).with_content(Content::Text(self.content.clone()));
        if let Some(ref class) = self.class {
            el = el.with_meta(Meta {
                classes: Some(TextList::Plain(vec![class.clone()])),
                ..Meta::default()
            });
        }
        if let Some(ref ct) = self.content_type {
            el = el.with_attribute("contentType", Value::String(ct.clone()));
        }
        el
    }
}

/// Render scalar content for error messages and example values.
pub(crate) fn content_to_string(content: &Content) -> String {
    match content {
        Content::Text(s) => s.clone(),
        Content::Number(n) => n.to_string(),
        Content::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Build a `{"element": "string", "content": ...}` key element.
pub(crate) fn string_element(value: &str) -> Element {
    Element::new(kind::STRING).with_content(Content::Text(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(json: &str) -> Element {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_copy() {
        let copy = CopyElement::decode(
            &el(r#"{"element": "copy", "content": "Hello"}"#),
            &NodePath::root(),
        )
        .unwrap();
        assert_eq!(copy.text, "Hello");
        assert_eq!(
            CopyElement::decode(&copy.to_element(), &NodePath::root()).unwrap(),
            copy
        );
    }

    #[test]
    fn test_copy_requires_text() {
        let err = CopyElement::decode(&el(r#"{"element": "copy"}"#), &NodePath::root()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "content", .. }));
    }

    #[test]
    fn test_number_accepts_quoted_sample() {
        let n = NumberElement::decode(
            &el(r#"{"element": "number", "content": "42"}"#),
            &NodePath::root(),
        )
        .unwrap();
        assert_eq!(n.value.map(|v| v.to_string()).as_deref(), Some("42"));

        let err = NumberElement::decode(
            &el(r#"{"element": "number", "content": "lots"}"#),
            &NodePath::root(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedScalar { .. }));
    }

    #[test]
    fn test_asset_round_trip() {
        let asset = Asset::decode(
            &el(r#"{
                "element": "asset",
                "meta": {"classes": ["messageBody"]},
                "attributes": {"contentType": "text/plain"},
                "content": "Hello World!\n"
            }"#),
            &NodePath::root(),
        )
        .unwrap();
        assert!(asset.is_body());
        assert_eq!(asset.content_type.as_deref(), Some("text/plain"));
        assert_eq!(asset.content, "Hello World!\n");

        let json = serde_json::to_string(&asset.to_element()).unwrap();
        let again = Asset::decode(&el(&json), &NodePath::root()).unwrap();
        assert_eq!(again, asset);
    }
}
