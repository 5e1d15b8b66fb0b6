pub mod endpoints;
pub mod module;
pub mod runtime;
pub mod types;

use beaker_core::GeneratorError;
use minijinja::Environment;

const TEMPLATES: &[(&str, &str)] = &[
    ("mod.rs.j2", include_str!("../../templates/mod.rs.j2")),
    ("runtime.rs.j2", include_str!("../../templates/runtime.rs.j2")),
    ("types.rs.j2", include_str!("../../templates/types.rs.j2")),
    ("endpoints.rs.j2", include_str!("../../templates/endpoints.rs.j2")),
];

/// Build the template environment shared by every emitter.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("rust_str", rust_str);
    for (name, source) in TEMPLATES {
        env.add_template(name, source).map_err(template_error)?;
    }
    Ok(env)
}

pub(crate) fn render(
    env: &Environment<'_>,
    name: &str,
    ctx: minijinja::Value,
) -> Result<String, GeneratorError> {
    env.get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(template_error)
}

fn template_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Template(err.to_string())
}

/// Quote a value as a Rust string literal.
fn rust_str(value: String) -> String {
    format!("{value:?}")
}

/// `pub` or `pub(crate)`, per `client.public`.
pub fn visibility(public: bool) -> &'static str {
    if public { "pub" } else { "pub(crate)" }
}

/// Comment lines for `text`, each starting with `prefix` (`///`, `//!`, `//`).
pub fn comment_lines(text: Option<&str>, prefix: &str, no_doc: bool) -> Vec<String> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    if no_doc {
        return Vec::new();
    }
    text.lines()
        .map(|line| match line.trim_end() {
            "" => prefix.to_string(),
            line => format!("{prefix} {line}"),
        })
        .collect()
}
