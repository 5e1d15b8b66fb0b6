use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level project configuration loaded from `.beaker.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeakerConfig {
    pub input: String,
    pub output: String,
    pub naming: NamingConfig,
    pub responses: ResponseConfig,
    pub client: ClientConfig,
}

impl Default for BeakerConfig {
    fn default() -> Self {
        Self {
            input: "api.json".to_string(),
            output: "src/generated".to_string(),
            naming: NamingConfig::default(),
            responses: ResponseConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from derived endpoint name (title or route based) to custom alias.
    pub aliases: IndexMap<String, String>,
}

/// How endpoint names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// The owning transition's title, falling back to the route.
    #[default]
    UseTitle,
    UseRouteBased,
}

/// How responses sharing a status code and content type are merged.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Keep every duplicate as its own variant instead of the first one seen.
    pub keep_duplicates: bool,
}

/// How generated client files are laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientLayout {
    /// A single `mod.rs`.
    #[default]
    Bundled,
    /// `types.rs`, `endpoints.rs`, `runtime.rs` and a `mod.rs` re-exporting them.
    Modular,
}

/// Client generation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub layout: ClientLayout,
    pub no_doc: bool,
    /// Emit `pub` items instead of `pub(crate)`.
    pub public: bool,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".beaker.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<BeakerConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: BeakerConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# beaker configuration
input: api.json         # API Elements JSON, e.g. from `drafter -f json -t refract`
output: src/generated

naming:
  strategy: use_title   # use_title | use_route_based
  aliases: {}
    # retrieveACoupon: coupon    # derived name → custom name

responses:
  keep_duplicates: false  # keep responses repeating a status code and content type

client:
  layout: bundled       # bundled | modular
  no_doc: false
  public: false         # pub instead of pub(crate)
"#
}
