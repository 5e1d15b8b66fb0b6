use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use beaker_core::config::{self, BeakerConfig, CONFIG_FILE_NAME};
use beaker_core::ir::{IrBody, IrDataType, IrSpec};
use beaker_core::parse::{self, category::ParseResult};
use beaker_core::transform::{self, TransformOptions};
use beaker_core::{CodeGenerator, GeneratedFile};
use beaker_rust_client::RustClientGenerator;

#[derive(Parser)]
#[command(name = "beaker", about = "Rust client generator for API Blueprint", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client from an API Elements document
    Generate {
        /// Path to the API Elements JSON (e.g. `drafter -f json -t refract`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write the client module into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate an API Elements document
    Validate {
        /// Path to the API Elements JSON
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the resolved endpoints and types of a document
    Inspect {
        /// Path to the API Elements JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new beaker configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "beaker", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<BeakerConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))?;
    if cfg.is_none() {
        log::debug!("no {} found, using defaults", config_path.display());
    }
    Ok(cfg)
}

fn read_document(path: &Path) -> Result<ParseResult> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse::from_json(&content).with_context(|| format!("failed to decode {}", path.display()))
}

fn transform_options(cfg: &BeakerConfig) -> TransformOptions {
    TransformOptions {
        naming_strategy: cfg.naming.strategy,
        aliases: cfg.naming.aliases.clone(),
        keep_duplicate_responses: cfg.responses.keep_duplicates,
    }
}

fn load_spec(path: &Path, cfg: &BeakerConfig) -> Result<IrSpec> {
    let doc = read_document(path)?;
    let ir = transform::transform_with_options(&doc, &transform_options(cfg))
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    log::debug!(
        "{}: {} endpoints, {} types",
        path.display(),
        ir.endpoints.len(),
        ir.types.len()
    );
    Ok(ir)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// Try to run rustfmt over the generated files.
fn try_run_rustfmt(output_dir: &Path, files: &[GeneratedFile]) {
    let paths: Vec<PathBuf> = files.iter().map(|f| output_dir.join(&f.path)).collect();
    match Command::new("rustfmt")
        .args(["--edition", "2024"])
        .args(&paths)
        .output()
    {
        Ok(result) if result.status.success() => {
            eprintln!("  formatted with rustfmt");
        }
        Ok(_) => {
            eprintln!("  warning: rustfmt had issues (non-zero exit), output may need manual formatting");
        }
        Err(_) => {
            eprintln!(
                "  note: rustfmt not found, run `rustfmt --edition 2024` on {} to format",
                output_dir.display()
            );
        }
    }
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let ir = load_spec(&input, &cfg)?;

    eprintln!("Generating {} → {}", input.display(), output_dir.display());
    let files = RustClientGenerator
        .generate(&ir, &cfg.client)
        .context("failed to render the client")?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;
    try_run_rustfmt(&output_dir, &files);

    eprintln!(
        "Generated {} files in {}. They are overwritten on every run; do not edit them.",
        files.len(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let doc = read_document(&input)?;

    for annotation in &doc.annotations {
        eprintln!("  {}: {}", annotation.classes.join(","), annotation.text);
    }
    if let Some(ref api) = doc.api {
        eprintln!(
            "Valid API Elements document: {}",
            api.title.as_deref().unwrap_or("(untitled)")
        );
        eprintln!("  Resource groups: {}", api.resource_groups.len());
        eprintln!(
            "  Resources: {}",
            api.resource_groups
                .iter()
                .map(|g| g.resources.len())
                .sum::<usize>()
        );
        eprintln!("  Data structures: {}", api.data_structures.len());
    }

    // Also validate that it resolves to IR successfully
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = transform::transform_with_options(&doc, &transform_options(&cfg))
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    eprintln!("  Endpoints: {}", ir.endpoints.len());
    eprintln!("  Types: {}", ir.types.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = load_spec(&input, &cfg)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn body_kind(body: &IrBody) -> String {
    match body {
        IrBody::Empty => "empty".to_string(),
        IrBody::Text => "text".to_string(),
        IrBody::Type(ty) => format!("{ty:?}"),
        IrBody::Inline(_) => "inline".to_string(),
    }
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let types: Vec<serde_json::Value> = ir
        .types
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name().pascal_case,
                "kind": match t {
                    IrDataType::Record(_) => "record",
                    IrDataType::Alias(_) => "alias",
                    IrDataType::List(_) => "list",
                },
            })
        })
        .collect();

    let endpoints: Vec<serde_json::Value> = ir
        .endpoints
        .iter()
        .map(|e| {
            let responses: Vec<serde_json::Value> = e
                .responses
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "variant": r.name.original,
                        "status": r.status_code,
                        "content_type": r.content_type,
                        "body": body_kind(&r.body),
                    })
                })
                .collect();
            serde_json::json!({
                "name": e.name.camel_case,
                "method": e.method.as_str(),
                "href": e.href,
                "path_variables": e.path_variables.iter().map(|v| &v.key).collect::<Vec<_>>(),
                "headers": e.header_variables.iter().map(|v| &v.key).collect::<Vec<_>>(),
                "request_body": body_kind(&e.request_body),
                "responses": responses,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "host": ir.info.host,
        },
        "types": types,
        "endpoints": endpoints,
        "groups": ir
            .groups
            .iter()
            .map(|g| g.name.as_ref().map(|n| &n.original))
            .collect::<Vec<_>>(),
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
