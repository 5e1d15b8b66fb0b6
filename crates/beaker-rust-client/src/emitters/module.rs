use beaker_core::GeneratorError;
use beaker_core::config::ClientConfig;
use beaker_core::ir::IrSpec;
use minijinja::{Environment, context};

use super::{comment_lines, render, visibility};

/// Rendered bodies inlined into a bundled `mod.rs`.
pub struct Bundle<'a> {
    pub runtime: &'a str,
    pub types: &'a str,
    pub endpoints: &'a str,
}

/// Emit `mod.rs`: the client entry point. With a bundle it holds every
/// item itself, otherwise it declares and re-exports the sibling files.
pub fn emit_mod(
    env: &Environment<'_>,
    ir: &IrSpec,
    config: &ClientConfig,
    bundle: Option<&Bundle<'_>>,
) -> Result<String, GeneratorError> {
    render(
        env,
        "mod.rs.j2",
        context! {
            vis => visibility(config.public),
            title => ir.info.title.clone(),
            doc => comment_lines(ir.info.description.as_deref(), "//!", config.no_doc),
            host => ir.info.host.clone(),
            bundled => bundle.is_some(),
            runtime => bundle.map(|b| b.runtime),
            types => bundle.map(|b| b.types),
            endpoints => bundle.map(|b| b.endpoints),
        },
    )
}
