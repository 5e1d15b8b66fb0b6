use std::fmt;

use super::endpoints::IrEndpoint;
use super::schemas::IrDataType;

/// A fully resolved, generator-ready intermediate representation of an API Elements document.
#[derive(Debug, Clone, PartialEq)]
pub struct IrSpec {
    pub info: IrInfo,
    pub types: Vec<IrDataType>,
    pub endpoints: Vec<IrEndpoint>,
    pub groups: Vec<IrGroup>,
}

impl IrSpec {
    pub fn find_type(&self, pascal_name: &str) -> Option<&IrDataType> {
        self.types.iter().find(|t| t.name().pascal_case == pascal_name)
    }
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub host: Option<String>,
}

/// A resource group; untitled for resources declared outside any group.
#[derive(Debug, Clone, PartialEq)]
pub struct IrGroup {
    pub name: Option<NormalizedName>,
    pub description: Option<String>,
    pub endpoints: Vec<usize>, // indices into IrSpec.endpoints
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
