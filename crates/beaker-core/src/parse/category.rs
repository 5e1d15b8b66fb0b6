use serde_json::Value;

use crate::element::{Content, Element, NodePath};
use crate::error::DecodeError;

use super::data_structure::DataStructure;
use super::member::{Member, MemberValue, decode_members};
use super::resource::Resource;
use super::{CategoryElement, TypedElement, collect_copy, kind};

pub mod class {
    pub const API: &str = "api";
    pub const RESOURCE_GROUP: &str = "resourceGroup";
    pub const DATA_STRUCTURES: &str = "dataStructures";
}

/// The document root.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub annotations: Vec<Annotation>,
    pub api: Option<ApiCategory>,
}

impl TypedElement for ParseResult {
    const KIND: &'static str = kind::PARSE_RESULT;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut annotations = Vec::new();
        let mut api = None;
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::ANNOTATION => annotations.push(Annotation::decode(child, &child_path)?),
                kind::CATEGORY => {
                    if api.is_some() {
                        return Err(DecodeError::NotSupported {
                            construct: "more than one api category".to_string(),
                            path: child_path,
                        });
                    }
                    api = Some(ApiCategory::decode(child, &child_path)?);
                }
                other => log::debug!("ignoring `{other}` element in parse result at {child_path}"),
            }
        }
        Ok(ParseResult { annotations, api })
    }
}

/// A parser warning or error attached to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub classes: Vec<String>,
    pub code: Option<i64>,
    pub text: String,
}

impl Annotation {
    pub fn is_error(&self) -> bool {
        self.classes.iter().any(|c| c == "error")
    }
}

impl TypedElement for Annotation {
    const KIND: &'static str = kind::ANNOTATION;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let code = match element.attribute("code") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::Object(obj)) => obj.get("content").and_then(Value::as_i64),
            Some(other) => {
                return Err(DecodeError::MalformedScalar {
                    field: "code",
                    raw: other.to_string(),
                    path: path.attribute("code"),
                });
            }
        };
        Ok(Annotation {
            classes: element.classes(),
            code,
            text: element.text().unwrap_or_default().to_string(),
        })
    }
}

/// A `category` child, told apart by its classification tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Category {
    Api(ApiCategory),
    ResourceGroup(ResourceGroup),
    DataStructures(DataStructures),
}

impl Category {
    pub fn decode(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        super::expect_kind(element, kind::CATEGORY, path)?;
        let known: Vec<&str> = [class::API, class::RESOURCE_GROUP, class::DATA_STRUCTURES]
            .into_iter()
            .filter(|c| element.has_class(c))
            .collect();
        match known.as_slice() {
            [class::API] => Ok(Category::Api(ApiCategory::decode_category(element, path)?)),
            [class::RESOURCE_GROUP] => Ok(Category::ResourceGroup(
                ResourceGroup::decode_category(element, path)?,
            )),
            [class::DATA_STRUCTURES] => Ok(Category::DataStructures(
                DataStructures::decode_category(element, path)?,
            )),
            _ => Err(DecodeError::UnknownCategory {
                tags: element.classes(),
                path: path.clone(),
            }),
        }
    }
}

/// The `api` category: the described service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCategory {
    pub title: Option<String>,
    pub copy: Option<String>,
    /// User metadata such as `HOST`.
    pub metadata: Vec<Member>,
    pub resource_groups: Vec<ResourceGroup>,
    pub data_structures: Vec<DataStructure>,
}

impl ApiCategory {
    /// The `HOST` metadata entry, if declared.
    pub fn host(&self) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case("host"))
            .and_then(|m| match &m.value {
                MemberValue::String(v) => v.as_deref(),
                _ => None,
            })
    }
}

impl CategoryElement for ApiCategory {
    const CLASS: &'static str = class::API;

    fn decode_category(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut resource_groups = Vec::new();
        let mut data_structures = Vec::new();
        let mut loose = ResourceGroup::default();
        // Index the implicit group takes: where the first loose resource appeared.
        let mut loose_at = None;

        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::CATEGORY => match Category::decode(child, &child_path)? {
                    Category::ResourceGroup(group) => resource_groups.push(group),
                    Category::DataStructures(ds) => data_structures.extend(ds.items),
                    Category::Api(_) => {
                        return Err(DecodeError::NotSupported {
                            construct: "nested api category".to_string(),
                            path: child_path,
                        });
                    }
                },
                kind::RESOURCE => {
                    loose_at.get_or_insert(resource_groups.len());
                    loose.resources.push(Resource::decode(child, &child_path)?);
                }
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in api at {child_path}"),
            }
        }

        if let Some(at) = loose_at {
            log::debug!(
                "collecting {} ungrouped resources into an implicit group",
                loose.resources.len()
            );
            resource_groups.insert(at, loose);
        }

        Ok(ApiCategory {
            title: element.title().map(String::from),
            copy: collect_copy(element, path)?,
            metadata: decode_metadata(element, path)?,
            resource_groups,
            data_structures,
        })
    }
}

fn decode_metadata(element: &Element, path: &NodePath) -> Result<Vec<Member>, DecodeError> {
    let Some(value) = element.attribute("metadata").filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    let meta_path = path.attribute("metadata");
    let malformed = |e: serde_json::Error| DecodeError::MalformedScalar {
        field: "metadata",
        raw: e.to_string(),
        path: meta_path.clone(),
    };
    // Either a refracted `array` element or a bare list of members.
    let holder: Element = match value {
        Value::Array(_) => Element::new(kind::ARRAY).with_content(Content::Elements(
            serde_json::from_value(value.clone()).map_err(malformed)?,
        )),
        _ => serde_json::from_value(value.clone()).map_err(malformed)?,
    };
    decode_members(&holder, &meta_path)
}

/// A `resourceGroup` category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGroup {
    pub title: Option<String>,
    pub copy: Option<String>,
    pub resources: Vec<Resource>,
}

impl CategoryElement for ResourceGroup {
    const CLASS: &'static str = class::RESOURCE_GROUP;

    fn decode_category(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut resources = Vec::new();
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::RESOURCE => resources.push(Resource::decode(child, &child_path)?),
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in group at {child_path}"),
            }
        }
        Ok(ResourceGroup {
            title: element.title().map(String::from),
            copy: collect_copy(element, path)?,
            resources,
        })
    }
}

/// A `dataStructures` category holding reusable type definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStructures {
    pub items: Vec<DataStructure>,
}

impl CategoryElement for DataStructures {
    const CLASS: &'static str = class::DATA_STRUCTURES;

    fn decode_category(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let items = element
            .children()
            .iter()
            .enumerate()
            .map(|(i, child)| DataStructure::decode(child, &path.child(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataStructures { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(json: &str) -> Element {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_category_dispatch() {
        let group = Category::decode(
            &el(r#"{"element": "category", "meta": {"classes": ["resourceGroup"], "title": "Notes"}}"#),
            &NodePath::root(),
        )
        .unwrap();
        assert!(matches!(group, Category::ResourceGroup(ref g) if g.title.as_deref() == Some("Notes")));

        let ds = Category::decode(
            &el(r#"{"element": "category", "meta": {"classes": {"element": "array", "content": [{"element": "string", "content": "dataStructures"}]}}, "content": [
                {"element": "dataStructure", "content": {"element": "object", "meta": {"id": "Note"}}}
            ]}"#),
            &NodePath::root(),
        )
        .unwrap();
        assert!(matches!(ds, Category::DataStructures(ref d) if d.items.len() == 1));
    }

    #[test]
    fn test_unknown_category() {
        let err = Category::decode(
            &el(r#"{"element": "category", "meta": {"classes": ["scenario"]}}"#),
            &NodePath::root().child(2),
        )
        .unwrap_err();
        match err {
            DecodeError::UnknownCategory { tags, path } => {
                assert_eq!(tags, vec!["scenario".to_string()]);
                assert_eq!(path.to_string(), "$.content[2]");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Category::decode(
            &el(r#"{"element": "category", "meta": {"classes": ["api", "resourceGroup"]}}"#),
            &NodePath::root(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownCategory { .. }));
    }

    #[test]
    fn test_parse_result_requires_api_class() {
        let err = ParseResult::decode(
            &el(r#"{"element": "parseResult", "content": [
                {"element": "category", "meta": {"classes": ["resourceGroup"]}}
            ]}"#),
            &NodePath::root(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MissingClassification { expected: "api", .. }));
    }

    #[test]
    fn test_annotations_and_loose_resources() {
        let result = ParseResult::decode(
            &el(r#"{"element": "parseResult", "content": [
                {"element": "category", "meta": {"classes": ["api"], "title": "Polls"},
                 "attributes": {"metadata": [
                    {"element": "member", "content": {
                        "key": {"element": "string", "content": "HOST"},
                        "value": {"element": "string", "content": "https://polls.apiblueprint.org/"}
                    }}
                 ]},
                 "content": [
                    {"element": "copy", "content": "Polls is a simple API."},
                    {"element": "resource", "attributes": {"href": "/questions"}},
                    {"element": "category", "meta": {"classes": ["resourceGroup"], "title": "Votes"}, "content": [
                        {"element": "resource", "attributes": {"href": "/votes"}}
                    ]}
                 ]},
                {"element": "annotation", "meta": {"classes": ["warning"]}, "attributes": {"code": 6}, "content": "unexpected header"}
            ]}"#),
            &NodePath::root(),
        )
        .unwrap();

        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].code, Some(6));
        assert!(!result.annotations[0].is_error());

        let api = result.api.expect("should have an api category");
        assert_eq!(api.title.as_deref(), Some("Polls"));
        assert_eq!(api.copy.as_deref(), Some("Polls is a simple API."));
        assert_eq!(api.host(), Some("https://polls.apiblueprint.org/"));
        assert_eq!(api.resource_groups.len(), 2);
        assert_eq!(api.resource_groups[0].title, None);
        assert_eq!(api.resource_groups[0].resources[0].href, "/questions");
        assert_eq!(api.resource_groups[1].title.as_deref(), Some("Votes"));
    }

    #[test]
    fn test_loose_resources_keep_declaration_order() {
        let api = ApiCategory::decode(
            &el(r#"{"element": "category", "meta": {"classes": ["api"]}, "content": [
                {"element": "category", "meta": {"classes": ["resourceGroup"], "title": "A"}, "content": [
                    {"element": "resource", "attributes": {"href": "/a"}}
                ]},
                {"element": "resource", "attributes": {"href": "/b"}},
                {"element": "category", "meta": {"classes": ["resourceGroup"], "title": "C"}, "content": [
                    {"element": "resource", "attributes": {"href": "/c"}}
                ]},
                {"element": "resource", "attributes": {"href": "/d"}}
            ]}"#),
            &NodePath::root(),
        )
        .unwrap();

        let groups: Vec<(Option<&str>, Vec<&str>)> = api
            .resource_groups
            .iter()
            .map(|g| {
                (
                    g.title.as_deref(),
                    g.resources.iter().map(|r| r.href.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                (Some("A"), vec!["/a"]),
                (None, vec!["/b", "/d"]),
                (Some("C"), vec!["/c"]),
            ]
        );
    }
}
