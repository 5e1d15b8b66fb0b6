use crate::error::ConversionError;
use crate::ir::IrVariable;
use crate::parse::member::{Headers, Member};

use super::name_normalizer::normalize_name;
use super::type_resolver::TypeContext;

/// Project declared URI template variables into IR variables, in declaration order.
pub fn extract_variables(
    members: &[Member],
    types: &TypeContext,
) -> Result<Vec<IrVariable>, ConversionError> {
    members.iter().map(|m| to_variable(m, types)).collect()
}

/// Project request headers into IR variables. `Content-Type` is left out;
/// it selects the body encoding instead.
pub fn extract_headers(
    headers: &Headers,
    types: &TypeContext,
) -> Result<Vec<IrVariable>, ConversionError> {
    headers.fields().map(|m| to_variable(m, types)).collect()
}

fn to_variable(member: &Member, types: &TypeContext) -> Result<IrVariable, ConversionError> {
    Ok(IrVariable {
        key: member.name.clone(),
        name: normalize_name(&member.name),
        required: member.required,
        documentation: documentation(member.description.as_deref(), member.example.as_deref()),
        example: member.example.clone(),
        value_type: types.member_type(&member.value)?,
    })
}

/// `<description> ex. <example>`, or whichever half exists.
pub fn documentation(description: Option<&str>, example: Option<&str>) -> Option<String> {
    match (description, example) {
        (Some(d), Some(e)) => Some(format!("{d} ex. {e}")),
        (Some(d), None) => Some(d.to_string()),
        (None, Some(e)) => Some(format!("ex. {e}")),
        (None, None) => None,
    }
}
