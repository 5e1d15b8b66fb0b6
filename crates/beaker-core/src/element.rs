//! Generic API Elements nodes.
//!
//! Every node in an API Elements document has the same outer shape:
//! an `element` name, optional `meta` and `attributes`, and a `content`
//! whose shape depends on the element. [`Element`] models that shape
//! without knowing which concrete element it is, so a tree can be walked
//! before the typed decoders in [`crate::parse`] take over.
//!
//! Documents come in two flavours. Older serializations write meta values
//! and attributes as plain JSON (`"id": "Coupon"`), newer ones wrap each
//! value in a refract element (`"id": {"element": "string", "content":
//! "Coupon"}`). [`Text`] and [`TextList`] accept both.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A string value in either compact or refracted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Refracted { element: String, content: String },
}

impl Text {
    pub fn as_str(&self) -> &str {
        match self {
            Text::Plain(s) => s,
            Text::Refracted { content, .. } => content,
        }
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::Plain(value.to_string())
    }
}

/// A list of strings in either compact or refracted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Plain(Vec<String>),
    Refracted {
        element: String,
        #[serde(default)]
        content: Vec<Text>,
    },
}

impl TextList {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            TextList::Plain(items) => Box::new(items.iter().map(String::as_str)),
            TextList::Refracted { content, .. } => Box::new(content.iter().map(Text::as_str)),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.iter().any(|s| s == needle)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(String::from).collect()
    }
}

/// The `meta` record shared by all elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Text>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<TextList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Text>,
}

/// The `{key, value}` content of a `member` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Element,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Element>,
}

/// Element content. Variant order matters for untagged deserialization:
/// a `{key, value}` record must be tried before a bare nested element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Elements(Vec<Element>),
    Pair(Box<KeyValue>),
    Element(Box<Element>),
}

/// A generic, not yet typed, API Elements node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub element: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl Element {
    /// A bare element of the given kind with no meta, attributes or content.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            element: kind.into(),
            meta: None,
            attributes: None,
            content: None,
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn kind(&self) -> &str {
        &self.element
    }

    pub fn id(&self) -> Option<&str> {
        self.meta.as_ref()?.id.as_ref().map(Text::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref()?.title.as_ref().map(Text::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.meta.as_ref()?.description.as_ref().map(Text::as_str)
    }

    /// Classification tags from `meta.classes`, in declaration order.
    pub fn classes(&self) -> Vec<String> {
        self.meta
            .as_ref()
            .and_then(|m| m.classes.as_ref())
            .map(TextList::to_vec)
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.meta
            .as_ref()
            .and_then(|m| m.classes.as_ref())
            .is_some_and(|c| c.contains(class))
    }

    /// Child elements. A single nested element counts as one child.
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Some(Content::Elements(items)) => items,
            Some(Content::Element(item)) => std::slice::from_ref(item.as_ref()),
            _ => &[],
        }
    }

    /// Textual content of a scalar element.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(key)
    }
}

/// Reads a scalar value written either as a plain JSON string or as a
/// refracted `{"element": "string", "content": ...}` record.
pub fn text_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(obj) => obj.get("content").and_then(Value::as_str),
        _ => None,
    }
}

/// Reads a list of strings written either as a plain JSON array or as a
/// refracted `array` element whose items are plain or refracted strings.
pub fn text_list_value(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj.get("content")?.as_array()?,
        _ => return None,
    };
    Some(
        items
            .iter()
            .filter_map(text_value)
            .map(String::from)
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a node inside the input document, rendered as `$.content[0].attributes.href`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Path of the `index`th child in `content`.
    pub fn child(&self, index: usize) -> Self {
        self.key("content").index(index)
    }

    pub fn attribute(&self, key: &str) -> Self {
        self.key("attributes").key(key)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_and_refracted_meta() {
        let compact: Element = serde_json::from_str(
            r#"{"element": "category", "meta": {"classes": ["api"], "title": "Polls"}}"#,
        )
        .unwrap();
        let refracted: Element = serde_json::from_str(
            r#"{
                "element": "category",
                "meta": {
                    "classes": {"element": "array", "content": [{"element": "string", "content": "api"}]},
                    "title": {"element": "string", "content": "Polls"}
                }
            }"#,
        )
        .unwrap();

        for el in [&compact, &refracted] {
            assert_eq!(el.classes(), vec!["api".to_string()]);
            assert!(el.has_class("api"));
            assert_eq!(el.title(), Some("Polls"));
        }
    }

    #[test]
    fn test_content_shapes() {
        let text: Element = serde_json::from_str(r#"{"element": "copy", "content": "hi"}"#).unwrap();
        assert_eq!(text.text(), Some("hi"));
        assert!(text.children().is_empty());

        let number: Element =
            serde_json::from_str(r#"{"element": "number", "content": 25}"#).unwrap();
        assert!(matches!(number.content, Some(Content::Number(_))));

        let pair: Element = serde_json::from_str(
            r#"{"element": "member", "content": {"key": {"element": "string", "content": "id"}}}"#,
        )
        .unwrap();
        assert!(matches!(pair.content, Some(Content::Pair(_))));

        let single: Element = serde_json::from_str(
            r#"{"element": "dataStructure", "content": {"element": "Coupon"}}"#,
        )
        .unwrap();
        assert_eq!(single.children().len(), 1);
        assert_eq!(single.children()[0].kind(), "Coupon");
    }

    #[test]
    fn test_attribute_values() {
        let plain = serde_json::json!("200");
        let refracted = serde_json::json!({"element": "string", "content": "200"});
        assert_eq!(text_value(&plain), Some("200"));
        assert_eq!(text_value(&refracted), Some("200"));
        assert_eq!(text_value(&serde_json::json!(200)), None);

        let list = serde_json::json!({"element": "array", "content": [{"element": "string", "content": "required"}]});
        assert_eq!(text_list_value(&list), Some(vec!["required".to_string()]));
        assert_eq!(
            text_list_value(&serde_json::json!(["required", "fixed"])),
            Some(vec!["required".to_string(), "fixed".to_string()])
        );
    }

    #[test]
    fn test_node_path_display() {
        let path = NodePath::root().child(0).child(2).attribute("statusCode");
        assert_eq!(path.to_string(), "$.content[0].content[2].attributes.statusCode");
        assert_eq!(NodePath::root().to_string(), "$");
    }

    #[test]
    fn test_serialize_skips_empty_parts() {
        let el = Element::new("copy").with_content(Content::Text("x".into()));
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json, serde_json::json!({"element": "copy", "content": "x"}));
    }
}
