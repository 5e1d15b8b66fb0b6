use beaker_core::config::{ClientConfig, ClientLayout};
use beaker_core::ir::IrSpec;
use beaker_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters;
use crate::emitters::module::Bundle;

/// Rust client code generator.
pub struct RustClientGenerator;

impl CodeGenerator for RustClientGenerator {
    fn generate(
        &self,
        ir: &IrSpec,
        config: &ClientConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let env = emitters::environment()?;
        let runtime = emitters::runtime::emit_runtime(&env, config)?;
        let types = emitters::types::emit_types(&env, ir, config)?;
        let endpoints = emitters::endpoints::emit_endpoints(&env, ir, config)?;

        let files = match config.layout {
            ClientLayout::Bundled => {
                let bundle = Bundle {
                    runtime: &runtime,
                    types: &types,
                    endpoints: &endpoints,
                };
                vec![GeneratedFile {
                    path: "mod.rs".to_string(),
                    content: emitters::module::emit_mod(&env, ir, config, Some(&bundle))?,
                }]
            }
            ClientLayout::Modular => vec![
                GeneratedFile {
                    path: "mod.rs".to_string(),
                    content: emitters::module::emit_mod(&env, ir, config, None)?,
                },
                GeneratedFile {
                    path: "runtime.rs".to_string(),
                    content: runtime,
                },
                GeneratedFile {
                    path: "types.rs".to_string(),
                    content: types,
                },
                GeneratedFile {
                    path: "endpoints.rs".to_string(),
                    content: endpoints,
                },
            ],
        };

        log::debug!(
            "rendered {} endpoints and {} types into {} files",
            ir.endpoints.len(),
            ir.types.len(),
            files.len()
        );
        Ok(files)
    }
}
