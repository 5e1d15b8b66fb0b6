use crate::element::{Element, NodePath};
use crate::error::DecodeError;

use super::data_structure::DataStructure;
use super::member::VariableList;
use super::transaction::Transaction;
use super::{TypedElement, collect_copy, element_attribute, kind, text_attribute};

/// A `resource` element: a URI template and the operations on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub title: Option<String>,
    pub copy: Option<String>,
    pub href: String,
    pub href_variables: Option<VariableList>,
    pub transitions: Vec<Transition>,
    pub data_structures: Vec<DataStructure>,
}

impl TypedElement for Resource {
    const KIND: &'static str = kind::RESOURCE;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let href = text_attribute(element, "href", path)?.ok_or_else(|| DecodeError::MissingField {
            field: "href",
            path: path.attribute("href"),
        })?;

        let mut transitions = Vec::new();
        let mut data_structures = Vec::new();
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::TRANSITION => transitions.push(Transition::decode(child, &child_path)?),
                kind::DATA_STRUCTURE => {
                    data_structures.push(DataStructure::decode(child, &child_path)?)
                }
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in resource at {child_path}"),
            }
        }

        Ok(Resource {
            title: element.title().map(String::from),
            copy: collect_copy(element, path)?,
            href,
            href_variables: element_attribute(element, "hrefVariables", path)?,
            transitions,
            data_structures,
        })
    }
}

/// A `transition` element: one documented operation on a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub title: Option<String>,
    pub copy: Option<String>,
    /// Overrides the resource href when present.
    pub href: Option<String>,
    pub href_variables: Option<VariableList>,
    pub transactions: Vec<Transaction>,
}

impl TypedElement for Transition {
    const KIND: &'static str = kind::TRANSITION;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut transactions = Vec::new();
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::HTTP_TRANSACTION => {
                    transactions.push(Transaction::decode(child, &child_path)?)
                }
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in transition at {child_path}"),
            }
        }

        Ok(Transition {
            title: element.title().map(String::from),
            copy: collect_copy(element, path)?,
            href: text_attribute(element, "href", path)?,
            href_variables: element_attribute(element, "hrefVariables", path)?,
            transactions,
        })
    }
}
