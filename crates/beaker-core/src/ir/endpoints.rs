use super::schemas::{IrField, IrType};
use super::types::NormalizedName;

pub use crate::parse::transaction::HttpMethod;

/// One client operation: every transaction of a resource sharing a path and method.
#[derive(Debug, Clone, PartialEq)]
pub struct IrEndpoint {
    pub name: NormalizedName,
    pub method: HttpMethod,
    /// URI template, e.g. `/coupons/{id}{?limit}`.
    pub href: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub path_variables: Vec<IrVariable>,
    pub header_variables: Vec<IrVariable>,
    pub request_body: IrBody,
    pub request_content_type: Option<String>,
    pub responses: Vec<IrResponseVariant>,
}

/// A URI template variable or request header.
#[derive(Debug, Clone, PartialEq)]
pub struct IrVariable {
    /// Name as written in the template or header.
    pub key: String,
    pub name: NormalizedName,
    pub required: bool,
    /// Description followed by ` ex. <example>` when an example exists.
    pub documentation: Option<String>,
    pub example: Option<String>,
    pub value_type: IrType,
}

/// Shape of a request or response body.
#[derive(Debug, Clone, PartialEq)]
pub enum IrBody {
    /// No body.
    Empty,
    /// Plain text, for `text/*` messages without a data structure.
    Text,
    Type(IrType),
    /// An anonymous object; replaced by a promoted record before generation.
    Inline(Vec<IrField>),
}

/// One declared response of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct IrResponseVariant {
    /// e.g. `http200_application_json`.
    pub name: NormalizedName,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub description: Option<String>,
    pub body: IrBody,
}
