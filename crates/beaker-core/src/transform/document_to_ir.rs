use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::config::NamingStrategy;
use crate::error::{ConversionError, TransformError};
use crate::ir::*;
use crate::parse::category::{Annotation, ApiCategory, ParseResult};
use crate::parse::data_structure::DataStructure;
use crate::parse::resource::Resource;

use super::correlator::{Correlation, correlate, endpoint_keys};
use super::name_normalizer::{normalize_name, response_variant_name, route_to_name};
use super::promote_inline::promote_inline_bodies;
use super::recursion::resolve_all;
use super::type_resolver::TypeContext;
use super::variables::{extract_headers, extract_variables};

/// Options controlling endpoint naming and response merging.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub naming_strategy: NamingStrategy,
    pub aliases: IndexMap<String, String>,
    pub keep_duplicate_responses: bool,
}

/// Transform a decoded API Elements document into the fully resolved IR.
pub fn transform(doc: &ParseResult) -> Result<IrSpec, TransformError> {
    transform_with_options(doc, &TransformOptions::default())
}

/// Transform with explicit naming and response options.
pub fn transform_with_options(
    doc: &ParseResult,
    options: &TransformOptions,
) -> Result<IrSpec, TransformError> {
    // Phase 1: Surface parser annotations, refusing documents with errors
    check_annotations(&doc.annotations)?;

    let api = doc
        .api
        .as_ref()
        .ok_or_else(|| ConversionError::Undefined("api category".to_string()))?;

    // Phase 2: Collect named data structures and break recursive cycles
    let declarations = collect_declarations(api)?;
    let resolved = resolve_all(&declarations)?;
    let ctx = TypeContext::new(&resolved);

    // Phase 3: Convert declarations to IR types
    let mut types = Vec::new();
    for ds in &resolved {
        let converted = ctx.data_structure_to_ir(ds).map_err(|e| match ds.declared_id() {
            Some(id) => e.context(format_args!("data structure `{id}`")),
            None => e,
        })?;
        types.extend(converted);
    }

    // Phase 4: Correlate transitions into endpoints, grouped by resource group
    let mut endpoints = Vec::new();
    let mut groups = Vec::new();
    for group in &api.resource_groups {
        let mut indices = Vec::new();
        for resource in &group.resources {
            for (href, method) in endpoint_keys(resource) {
                let Some(correlation) =
                    correlate(resource, &href, method, options.keep_duplicate_responses)
                else {
                    continue;
                };
                let endpoint = build_endpoint(resource, &href, method, &correlation, &ctx, options)
                    .map_err(|e| e.context(format_args!("{method} {href}")))?;
                indices.push(endpoints.len());
                endpoints.push(endpoint);
            }
        }
        groups.push(IrGroup {
            name: group
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(normalize_name),
            description: group.copy.clone(),
            endpoints: indices,
        });
    }

    // Phase 5: Make endpoint names unique
    dedupe_endpoint_names(&mut endpoints);

    let mut ir = IrSpec {
        info: IrInfo {
            title: api.title.clone().filter(|t| !t.is_empty()),
            description: api.copy.clone(),
            host: api.host().map(String::from),
        },
        types,
        endpoints,
        groups,
    };

    // Phase 6: Promote anonymous bodies to named records
    promote_inline_bodies(&mut ir);

    log::info!(
        "resolved {} endpoints and {} types in {} groups",
        ir.endpoints.len(),
        ir.types.len(),
        ir.groups.len()
    );
    Ok(ir)
}

fn check_annotations(annotations: &[Annotation]) -> Result<(), ConversionError> {
    for annotation in annotations {
        let class = annotation.classes.first().map_or("annotation", String::as_str);
        match annotation.code {
            Some(code) => log::warn!("{class} ({code}): {}", annotation.text),
            None => log::warn!("{class}: {}", annotation.text),
        }
    }
    match annotations.iter().find(|a| a.is_error()) {
        Some(error) => Err(ConversionError::Undefined(format!(
            "document with error annotation: {}",
            error.text
        ))),
        None => Ok(()),
    }
}

/// Named data structures of every resource, then of the `dataStructures` category.
fn collect_declarations(api: &ApiCategory) -> Result<Vec<DataStructure>, ConversionError> {
    let from_resources = api
        .resource_groups
        .iter()
        .flat_map(|g| &g.resources)
        .flat_map(|r| &r.data_structures);

    // Generated type name -> declared identifier.
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut out = Vec::new();
    for ds in from_resources.chain(&api.data_structures) {
        let Some(id) = ds.declared_id() else {
            log::debug!("skipping data structure without an identifier");
            continue;
        };
        match seen.insert(normalize_name(id).pascal_case, id) {
            Some(prev) if prev == id => {
                return Err(ConversionError::NotSupported(format!(
                    "data structure `{id}` declared more than once"
                )));
            }
            Some(prev) => {
                return Err(ConversionError::NotSupported(format!(
                    "data structure names `{prev}` and `{id}` collide"
                )));
            }
            None => {}
        }
        out.push(ds.clone());
    }
    Ok(out)
}

fn build_endpoint(
    resource: &Resource,
    href: &str,
    method: HttpMethod,
    correlation: &Correlation<'_>,
    ctx: &TypeContext,
    options: &TransformOptions,
) -> Result<IrEndpoint, ConversionError> {
    let owner = correlation.owner;
    let request = correlation.request;

    let raw_name = match options.naming_strategy {
        NamingStrategy::UseTitle => owner
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| route_to_name(method.as_str(), href)),
        NamingStrategy::UseRouteBased => route_to_name(method.as_str(), href),
    };

    let name = options
        .aliases
        .get(&raw_name)
        .or_else(|| options.aliases.get(&normalize_name(&raw_name).camel_case))
        .cloned()
        .unwrap_or(raw_name);

    let path_members = owner
        .href_variables
        .as_ref()
        .or(resource.href_variables.as_ref())
        .map(|v| v.members.as_slice())
        .unwrap_or_default();
    if owner.href_variables.is_none() && resource.href_variables.is_some() {
        log::debug!("{method} {href}: inheriting href variables from the resource");
    }

    let responses = correlation
        .responses
        .iter()
        .map(|response| {
            let content_type = response.content_type();
            Ok(IrResponseVariant {
                name: normalize_name(&response_variant_name(response.status_code, content_type)),
                status_code: response.status_code,
                content_type: content_type.map(String::from),
                description: response.copy.clone(),
                body: ctx.body_shape(response.data_structure.as_ref(), content_type)?,
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    Ok(IrEndpoint {
        name: normalize_name(&name),
        method,
        href: href.to_string(),
        title: owner.title.clone().filter(|t| !t.is_empty()),
        description: owner.copy.clone(),
        path_variables: extract_variables(path_members, ctx)?,
        header_variables: extract_headers(&request.headers, ctx)?,
        request_body: ctx.body_shape(request.data_structure.as_ref(), request.content_type())?,
        request_content_type: request.content_type().map(String::from),
        responses: dedupe_variant_names(responses),
    })
}

/// Suffix repeated variant names (only possible when duplicates are kept).
fn dedupe_variant_names(mut variants: Vec<IrResponseVariant>) -> Vec<IrResponseVariant> {
    let mut used = HashSet::new();
    for variant in &mut variants {
        let base = variant.name.original.clone();
        let mut candidate = base.clone();
        let mut i = 2;
        while !used.insert(candidate.clone()) {
            candidate = format!("{base}_{i}");
            i += 1;
        }
        if candidate != base {
            variant.name = normalize_name(&candidate);
        }
    }
    variants
}

fn dedupe_endpoint_names(endpoints: &mut [IrEndpoint]) {
    let mut used = HashSet::new();
    for endpoint in endpoints {
        let base = endpoint.name.camel_case.clone();
        let mut candidate = base.clone();
        let mut i = 2;
        while !used.insert(candidate.clone()) {
            candidate = format!("{base}{i}");
            i += 1;
        }
        if candidate != base {
            log::warn!(
                "endpoint name `{base}` is used more than once, renaming {} {} to `{candidate}`",
                endpoint.method,
                endpoint.href
            );
            endpoint.name = normalize_name(&candidate);
        }
    }
}
