use std::collections::HashSet;

use beaker_core::GeneratorError;
use beaker_core::config::{ClientConfig, ClientLayout};
use beaker_core::error::ConversionError;
use beaker_core::ir::{HttpMethod, IrBody, IrEndpoint, IrResponseVariant, IrSpec, IrVariable};
use minijinja::{Environment, context};

use super::{comment_lines, render, visibility};
use crate::type_mapper::{ir_type_to_rust, rust_ident, variable_type};

/// Emit one module per endpoint, in resource group order.
pub fn emit_endpoints(
    env: &Environment<'_>,
    ir: &IrSpec,
    config: &ClientConfig,
) -> Result<String, GeneratorError> {
    let mut groups = Vec::new();
    let mut covered = HashSet::new();
    for group in &ir.groups {
        let endpoints = group
            .endpoints
            .iter()
            .filter_map(|&i| ir.endpoints.get(i).map(|e| (i, e)))
            .map(|(i, e)| {
                covered.insert(i);
                endpoint_to_ctx(e, config.no_doc)
            })
            .collect::<Result<Vec<_>, _>>()?;
        groups.push(context! {
            title => group.name.as_ref().map(|n| n.original.clone()),
            doc => comment_lines(group.description.as_deref(), "//", config.no_doc),
            endpoints => endpoints,
        });
    }

    let ungrouped = ir
        .endpoints
        .iter()
        .enumerate()
        .filter(|(i, _)| !covered.contains(i))
        .map(|(_, e)| endpoint_to_ctx(e, config.no_doc))
        .collect::<Result<Vec<_>, _>>()?;
    if !ungrouped.is_empty() {
        groups.push(context! {
            title => Option::<String>::None,
            doc => Vec::<String>::new(),
            endpoints => ungrouped,
        });
    }

    render(
        env,
        "endpoints.rs.j2",
        context! {
            vis => visibility(config.public),
            modular => config.layout == ClientLayout::Modular,
            groups => groups,
        },
    )
}

fn method_variant(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "Get",
        HttpMethod::Post => "Post",
        HttpMethod::Put => "Put",
        HttpMethod::Delete => "Delete",
        HttpMethod::Patch => "Patch",
    }
}

fn endpoint_to_ctx(endpoint: &IrEndpoint, no_doc: bool) -> Result<minijinja::Value, GeneratorError> {
    let doc_text = endpoint.description.as_deref().or(endpoint.title.as_deref());

    let (body_kind, body_type, body_content_type) = match &endpoint.request_body {
        IrBody::Empty => ("none", None, None),
        IrBody::Text => (
            "text",
            Some("String".to_string()),
            Some(endpoint.request_content_type.clone().unwrap_or_else(|| "text/plain".into())),
        ),
        IrBody::Type(ty) => (
            "json",
            Some(ir_type_to_rust(ty)),
            Some(
                endpoint
                    .request_content_type
                    .clone()
                    .unwrap_or_else(|| "application/json".into()),
            ),
        ),
        IrBody::Inline(_) => return Err(inline_body(endpoint)),
    };

    let responses = endpoint
        .responses
        .iter()
        .map(|r| response_to_ctx(endpoint, r, no_doc))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(context! {
        module => rust_ident(&endpoint.name.snake_case),
        doc => comment_lines(doc_text, "///", no_doc),
        method => method_variant(endpoint.method),
        href => endpoint.href.clone(),
        path_vars => variables_to_ctx(&endpoint.path_variables, no_doc),
        header_vars => variables_to_ctx(&endpoint.header_variables, no_doc),
        body_kind => body_kind,
        body_type => body_type,
        body_content_type => body_content_type,
        responses => responses,
    })
}

fn variables_to_ctx(variables: &[IrVariable], no_doc: bool) -> Vec<minijinja::Value> {
    variables
        .iter()
        .map(|v| {
            context! {
                key => v.key.clone(),
                ident => rust_ident(&v.name.snake_case),
                ty => variable_type(&v.value_type, v.required),
                required => v.required,
                doc => comment_lines(v.documentation.as_deref(), "///", no_doc),
            }
        })
        .collect()
}

fn response_to_ctx(
    endpoint: &IrEndpoint,
    response: &IrResponseVariant,
    no_doc: bool,
) -> Result<minijinja::Value, GeneratorError> {
    let variant = response.name.pascal_case.clone();
    // Matched against `content_mime_type`, which drops media type parameters.
    let pattern = match response.content_type.as_deref().map(mime_type) {
        Some(mime) => format!("({}, Some({mime:?}))", response.status_code),
        None => format!("({}, _)", response.status_code),
    };
    let (payload, value) = match &response.body {
        IrBody::Empty => (None, format!("Ok(Responses::{variant})")),
        IrBody::Text => (
            Some("String".to_string()),
            format!("Ok(Responses::{variant}(decode_text(status, content_type, body)?))"),
        ),
        IrBody::Type(ty) => (
            Some(ir_type_to_rust(ty)),
            format!("Ok(Responses::{variant}(decode_json(status, content_type, body)?))"),
        ),
        IrBody::Inline(_) => return Err(inline_body(endpoint)),
    };

    Ok(context! {
        variant => variant,
        payload => payload,
        pattern => pattern,
        value => value,
        doc => comment_lines(response.description.as_deref(), "///", no_doc),
    })
}

/// `application/json; charset=utf-8` -> `application/json`.
fn mime_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or(content_type).trim()
}

fn inline_body(endpoint: &IrEndpoint) -> GeneratorError {
    GeneratorError::Conversion(ConversionError::NotSupported(format!(
        "unpromoted inline body in {} {}",
        endpoint.method, endpoint.href
    )))
}
