use beaker_core::GeneratorError;
use beaker_core::config::ClientConfig;
use minijinja::{Environment, context};

use super::{render, visibility};

/// Emit the transport-agnostic request trait, response errors and the
/// URI template expander shared by every endpoint.
pub fn emit_runtime(env: &Environment<'_>, config: &ClientConfig) -> Result<String, GeneratorError> {
    render(
        env,
        "runtime.rs.j2",
        context! {
            vis => visibility(config.public),
        },
    )
}
