use crate::element::{Content, Element, KeyValue, Meta, NodePath, Text};
use crate::error::DecodeError;

use super::scalar::{NumberElement, StringElement, content_to_string, string_element};
use super::{ToElement, TypedElement, kind, text_list_attribute};

/// The type-attribute flag marking a member as required.
pub const REQUIRED: &str = "required";

/// The declared value of a member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    String(Option<String>),
    Number(Option<serde_json::Number>),
    Boolean(Option<bool>),
    /// An array; the payload is the kind of its first item, if declared.
    ArrayOf(Option<String>),
    /// A use of another type by name, or of a primitive not listed above.
    Reference(String),
    /// A boxed reference that breaks a recursive cycle. Never decoded,
    /// only produced by [`crate::transform::recursion`].
    Indirect(String),
}

impl MemberValue {
    /// The element kind this value was declared with.
    pub fn kind(&self) -> &str {
        match self {
            MemberValue::String(_) => kind::STRING,
            MemberValue::Number(_) => kind::NUMBER,
            MemberValue::Boolean(_) => kind::BOOLEAN,
            MemberValue::ArrayOf(_) => kind::ARRAY,
            MemberValue::Reference(id) | MemberValue::Indirect(id) => id,
        }
    }
}

/// A `member` element: one named field of an object, a variable, or a header.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub required: bool,
    pub description: Option<String>,
    pub value: MemberValue,
    /// Sample value rendered for documentation, e.g. `"abc"`, `25`, `["a", "b"]`.
    pub example: Option<String>,
    /// Item elements of an array value, kept so the member encodes back unchanged.
    pub samples: Vec<Element>,
}

impl Member {
    /// The sample as written in the document, without display quoting.
    pub fn raw_example(&self) -> Option<String> {
        match &self.value {
            MemberValue::String(v) => v.clone(),
            MemberValue::Number(v) => v.as_ref().map(ToString::to_string),
            MemberValue::Boolean(v) => v.map(|b| b.to_string()),
            _ => self.example.clone(),
        }
    }
}

impl TypedElement for Member {
    const KIND: &'static str = kind::MEMBER;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let pair = match &element.content {
            Some(Content::Pair(pair)) => pair,
            _ => {
                return Err(DecodeError::MissingField {
                    field: "content",
                    path: path.clone(),
                });
            }
        };
        let content_path = path.key("content");

        let name = StringElement::decode(&pair.key, &content_path.key("key"))?
            .value
            .ok_or_else(|| DecodeError::MissingField {
                field: "key",
                path: content_path.key("key"),
            })?;

        let value_el = pair.value.as_ref().ok_or_else(|| DecodeError::MissingField {
            field: "value",
            path: content_path.clone(),
        })?;
        let (value, example) = decode_value(value_el, &content_path.key("value"))?;
        let samples = if matches!(value, MemberValue::ArrayOf(_)) {
            value_el.children().to_vec()
        } else {
            Vec::new()
        };

        let type_attributes = text_list_attribute(element, "typeAttributes", path)?;

        Ok(Member {
            name,
            required: type_attributes.iter().any(|a| a == REQUIRED),
            description: element.description().map(String::from),
            value,
            example,
            samples,
        })
    }
}

fn decode_value(
    element: &Element,
    path: &NodePath,
) -> Result<(MemberValue, Option<String>), DecodeError> {
    match element.kind() {
        kind::STRING => {
            let value = StringElement::decode(element, path)?.value;
            let example = value.as_ref().map(|v| format!("\"{v}\""));
            Ok((MemberValue::String(value), example))
        }
        kind::NUMBER => {
            let value = NumberElement::decode(element, path)?.value;
            let example = value.as_ref().map(ToString::to_string);
            Ok((MemberValue::Number(value), example))
        }
        kind::BOOLEAN => {
            let value = match &element.content {
                None => None,
                Some(Content::Bool(b)) => Some(*b),
                Some(Content::Text(s)) if s == "true" || s == "false" => Some(s == "true"),
                Some(other) => {
                    return Err(DecodeError::MalformedScalar {
                        field: "content",
                        raw: content_to_string(other),
                        path: path.key("content"),
                    });
                }
            };
            Ok((MemberValue::Boolean(value), value.map(|b| b.to_string())))
        }
        kind::ARRAY => {
            let items = element.children();
            let item_kind = items.first().map(|i| i.kind().to_string());
            let samples: Vec<String> = items
                .iter()
                .filter_map(|item| item.content.as_ref())
                .map(|c| match c {
                    Content::Text(s) => format!("\"{s}\""),
                    other => content_to_string(other),
                })
                .collect();
            let example = if samples.is_empty() {
                None
            } else {
                Some(format!("[{}]", samples.join(", ")))
            };
            Ok((MemberValue::ArrayOf(item_kind), example))
        }
        kind::ENUM => Err(DecodeError::NotSupported {
            construct: "enum member value".to_string(),
            path: path.clone(),
        }),
        other => Ok((MemberValue::Reference(other.to_string()), None)),
    }
}

impl ToElement for Member {
    fn to_element(&self) -> Element {
        let value = match &self.value {
            MemberValue::String(v) => StringElement { value: v.clone() }.to_element(),
            MemberValue::Number(v) => {
                let el = Element::new(kind::NUMBER);
                match v {
                    Some(n) => el.with_content(Content::Number(n.clone())),
                    None => el,
                }
            }
            MemberValue::Boolean(v) => {
                let el = Element::new(kind::BOOLEAN);
                match v {
                    Some(b) => el.with_content(Content::Bool(*b)),
                    None => el,
                }
            }
            MemberValue::ArrayOf(item) => {
                let el = Element::new(kind::ARRAY);
                if !self.samples.is_empty() {
                    el.with_content(Content::Elements(self.samples.clone()))
                } else if let Some(k) = item {
                    el.with_content(Content::Elements(vec![Element::new(k.clone())]))
                } else {
                    el
                }
            }
            MemberValue::Reference(id) | MemberValue::Indirect(id) => Element::new(id.clone()),
        };

        let mut el = Element::new(kind::MEMBER).with_content(Content::Pair(Box::new(KeyValue {
            key: string_element(&self.name),
            value: Some(value),
        })));
        if let Some(ref description) = self.description {
            el = el.with_meta(Meta {
                description: Some(Text::Plain(description.clone())),
                ..Meta::default()
            });
        }
        if self.required {
            el = el.with_attribute("typeAttributes", serde_json::json!([REQUIRED]));
        }
        el
    }
}

/// Decode every `member` child of a member-list element, rejecting anything else.
pub(crate) fn decode_members(
    element: &Element,
    path: &NodePath,
) -> Result<Vec<Member>, DecodeError> {
    element
        .children()
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let child_path = path.child(i);
            if child.kind() != kind::MEMBER {
                return Err(DecodeError::NotSupported {
                    construct: format!("`{}` element among members", child.kind()),
                    path: child_path,
                });
            }
            Member::decode(child, &child_path)
        })
        .collect()
}

fn member_list_element(kind: &str, members: &[Member]) -> Element {
    Element::new(kind).with_content(Content::Elements(
        members.iter().map(ToElement::to_element).collect(),
    ))
}

/// URI template variables declared on a resource or transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableList {
    pub members: Vec<Member>,
}

impl TypedElement for VariableList {
    const KIND: &'static str = kind::HREF_VARIABLES;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        Ok(VariableList {
            members: decode_members(element, path)?,
        })
    }
}

impl ToElement for VariableList {
    fn to_element(&self) -> Element {
        member_list_element(kind::HREF_VARIABLES, &self.members)
    }
}

/// Literal header name that carries the media type instead of a header variable.
pub const CONTENT_TYPE: &str = "Content-Type";

/// An `httpHeaders` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
    pub members: Vec<Member>,
}

impl Headers {
    /// Value of the `Content-Type` header, if declared.
    pub fn content_type(&self) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.name == CONTENT_TYPE)
            .and_then(|m| match &m.value {
                MemberValue::String(v) => v.as_deref(),
                _ => None,
            })
    }

    /// Every header except `Content-Type`, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.name != CONTENT_TYPE)
    }
}

impl TypedElement for Headers {
    const KIND: &'static str = kind::HTTP_HEADERS;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        Ok(Headers {
            members: decode_members(element, path)?,
        })
    }
}

impl ToElement for Headers {
    fn to_element(&self) -> Element {
        member_list_element(kind::HTTP_HEADERS, &self.members)
    }
}
