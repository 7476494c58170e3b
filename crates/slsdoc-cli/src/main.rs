use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use slsdoc_core::config::{OutputConfig, OutputFormat};
use slsdoc_core::document::OpenApiDocument;
use slsdoc_core::generator::DefinitionGenerator;
use slsdoc_core::service;
use slsdoc_core::validate::ValidationReport;

#[derive(Parser)]
#[command(
    name = "slsdoc",
    about = "OpenAPI 3.0 documentation generator for declarative service descriptions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an OpenAPI document from a service description
    Generate {
        /// Path to the service description (YAML)
        #[arg(short, long, default_value = "service.yml")]
        config: PathBuf,

        /// Output file location [default: openapi.yml|openapi.json]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (yaml|json)
        #[arg(short, long)]
        format: Option<String>,

        /// File indentation in spaces
        #[arg(short, long)]
        indent: Option<usize>,
    },

    /// Generate in memory and report validation only
    Validate {
        /// Path to the service description (YAML)
        #[arg(short, long, default_value = "service.yml")]
        config: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            output,
            format,
            indent,
        } => cmd_generate(config, output, format, indent),

        Commands::Validate { config } => cmd_validate(config),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "slsdoc", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Run phases 1 and 2 against the given service description.
fn generate_definition(config_path: &Path) -> Result<DefinitionGenerator> {
    let description = service::load_service(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let documentation = description.documentation()?.clone();

    // Model file paths resolve relative to the service description.
    let root = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();

    let mut generator = DefinitionGenerator::new(documentation, root);
    generator
        .parse()
        .context("failed to resolve documentation models")?;
    generator
        .read_functions(&description.function_descriptors())
        .context("failed to read function documentation")?;

    Ok(generator)
}

fn report_validation(report: &ValidationReport) {
    if report.valid {
        eprintln!("[validation] OpenAPI document valid");
        return;
    }

    eprintln!("[validation] OpenAPI document failed validation:");
    if let Some(issues) = &report.error {
        for issue in issues {
            eprintln!("  at {:?}: {}", issue.data_path, issue.message);
            log::debug!("schema path: {}", issue.schema_path);
        }
    }
}

/// Serialize the document in the configured format. The indent option
/// applies to JSON; YAML uses the serializer's 2-space style.
fn render_document(document: &OpenApiDocument, config: &OutputConfig) -> Result<String> {
    match config.format {
        OutputFormat::Yaml => {
            if config.indent != 2 {
                log::warn!("yaml output always uses 2-space indentation; --indent applies to json");
            }
            Ok(serde_yaml_ng::to_string(document)?)
        }
        OutputFormat::Json => {
            let indent = vec![b' '; config.indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut buffer = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            document
                .serialize(&mut serializer)
                .context("failed to serialize document to JSON")?;
            Ok(String::from_utf8(buffer)?)
        }
    }
}

fn cmd_generate(
    config: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    indent: Option<usize>,
) -> Result<()> {
    let out = OutputConfig::resolve(format.as_deref(), output, indent)?;
    eprintln!(
        "[options] format: {}, output: {}, indent: {}",
        out.format,
        out.file.display(),
        out.indent
    );

    let generator = generate_definition(&config)?;

    // Validation is reported, never fatal: a non-conformant document is
    // still written so the caller can inspect it.
    report_validation(&generator.validate());

    let rendered = render_document(generator.definition(), &out)?;
    fs::write(&out.file, rendered)
        .with_context(|| format!("failed to write {}", out.file.display()))?;
    eprintln!("[output] wrote {}", out.file.display());

    Ok(())
}

fn cmd_validate(config: PathBuf) -> Result<()> {
    let generator = generate_definition(&config)?;
    let report = generator.validate();
    report_validation(&report);

    if !report.valid {
        anyhow::bail!("document failed OpenAPI 3.0 validation");
    }
    Ok(())
}
