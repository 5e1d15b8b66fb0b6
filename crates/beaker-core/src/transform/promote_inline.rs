use std::collections::HashSet;

use heck::ToPascalCase;

use crate::ir::{IrBody, IrDataType, IrRecord, IrSpec, IrType};

use super::name_normalizer::normalize_name;

/// Promote anonymous request and response bodies (`IrBody::Inline`) into
/// named records, replacing them with `IrBody::Type(IrType::Ref(..))`.
///
/// Request bodies become `<Endpoint>Param`, response bodies
/// `<Endpoint>Response<status><ContentType>`. Inline objects without fields
/// carry no shape and become untyped JSON instead.
pub fn promote_inline_bodies(ir: &mut IrSpec) {
    let mut used_names: HashSet<String> = ir
        .types
        .iter()
        .map(|t| t.name().pascal_case.clone())
        .collect();

    let mut new_types: Vec<IrDataType> = Vec::new();

    for endpoint in &mut ir.endpoints {
        let endpoint_pascal = endpoint.name.pascal_case.clone();

        let ctx = format!("{endpoint_pascal}Param");
        promote_body(&ctx, &mut endpoint.request_body, &mut new_types, &mut used_names);

        for variant in &mut endpoint.responses {
            let suffix = variant
                .name
                .pascal_case
                .strip_prefix("Http")
                .unwrap_or(&variant.name.pascal_case)
                .to_string();
            let ctx = format!("{endpoint_pascal}Response{suffix}");
            promote_body(&ctx, &mut variant.body, &mut new_types, &mut used_names);
        }
    }

    ir.types.extend(new_types);
}

fn promote_body(
    context_name: &str,
    body: &mut IrBody,
    new_types: &mut Vec<IrDataType>,
    used_names: &mut HashSet<String>,
) {
    let IrBody::Inline(fields) = body else {
        return;
    };
    if fields.is_empty() {
        *body = IrBody::Type(IrType::Any);
        return;
    }

    let name = unique_name(context_name, used_names);
    log::debug!("promoting inline body to `{name}`");
    new_types.push(IrDataType::Record(IrRecord {
        name: normalize_name(&name),
        description: None,
        base: None,
        fields: std::mem::take(fields),
    }));
    *body = IrBody::Type(IrType::Ref(name));
}

/// Generate a unique PascalCase name, appending numeric suffixes if needed.
fn unique_name(base: &str, used_names: &mut HashSet<String>) -> String {
    let pascal = base.to_pascal_case();
    if used_names.insert(pascal.clone()) {
        return pascal;
    }
    let mut i = 2;
    loop {
        let candidate = format!("{}{}", pascal, i);
        if used_names.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}
