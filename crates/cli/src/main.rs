//! idlbridge CLI
//!
//! Command-line interface for converting between OpenAPI documents and
//! Protobuf/Thrift IDL.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use idlbridge_common::openapi::Document;
use idlbridge_common::{BridgeConfig, EnumStyle, GenerationMode, IdlFile, NamingStyle};
use idlbridge_generator::{OpenApiGenerator, ProtoGenerator};
use idlbridge_parser::{OpenApiParser, ProtobufParser, ThriftParser};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idlbridge")]
#[command(version, about = "Convert between OpenAPI documents and Protobuf/Thrift IDL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an OpenAPI document to a proto3 file
    #[command(after_help = "EXAMPLES:\n  \
        # Convert with defaults (package \"openapi\", api.* route options)\n  \
        idlbridge to-proto --input petstore.yaml --output petstore.proto\n\n  \
        # Custom package, embed each operation as an option\n  \
        idlbridge to-proto \\\n    \
        --input petstore.json \\\n    \
        --output proto/petstore.proto \\\n    \
        --package petstore.v1 \\\n    \
        --openapi-options")]
    ToProto {
        /// OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Output .proto file
        #[arg(short, long)]
        output: PathBuf,

        /// proto package name
        #[arg(long)]
        package: Option<String>,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Attach each operation as an (openapi.operation) option
        #[arg(long)]
        openapi_options: bool,

        /// Do not emit (api.*) route options
        #[arg(long)]
        no_api_options: bool,
    },

    /// Convert Thrift IDL or a protobuf descriptor set to OpenAPI YAML
    #[command(after_help = "EXAMPLES:\n  \
        # Thrift with api.* annotations\n  \
        idlbridge to-openapi --input pet.thrift --output openapi.yaml\n\n  \
        # Protobuf descriptor set (protoc --include_imports --descriptor_set_out)\n  \
        idlbridge to-openapi --input pet.pb --output openapi.yaml\n\n  \
        # One POST per method\n  \
        idlbridge to-openapi --input pet.thrift --output openapi.yaml --mode rpc")]
    ToOpenapi {
        /// Thrift file or FileDescriptorSet
        #[arg(short, long)]
        input: PathBuf,

        /// Output YAML file
        #[arg(short, long)]
        output: PathBuf,

        /// Input format (auto-detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<InputFormat>,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Operation layout
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Property names for protobuf fields
        #[arg(long)]
        naming: Option<NamingArg>,

        /// Schema style for enum fields
        #[arg(long)]
        enum_style: Option<EnumStyleArg>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Server used when no annotation provides one
        #[arg(long)]
        default_server: Option<String>,
    },

    /// Load an input and print a summary
    Inspect {
        /// OpenAPI document, Thrift file or FileDescriptorSet
        #[arg(short, long)]
        input: PathBuf,

        /// Input format (auto-detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<InputFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// OpenAPI 3.x JSON or YAML
    Openapi,
    /// Thrift IDL
    Thrift,
    /// Protocol Buffer FileDescriptorSet
    Protobuf,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Openapi => write!(f, "OpenAPI"),
            InputFormat::Thrift => write!(f, "Thrift"),
            InputFormat::Protobuf => write!(f, "Protobuf"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Http,
    Rpc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NamingArg {
    Json,
    Proto,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EnumStyleArg {
    Integer,
    String,
}

/// Flags that override the `openapi` section of the configuration
struct OpenApiOverrides {
    mode: Option<ModeArg>,
    naming: Option<NamingArg>,
    enum_style: Option<EnumStyleArg>,
    title: Option<String>,
    default_server: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::ToProto {
            input,
            output,
            package,
            config,
            openapi_options,
            no_api_options,
        } => {
            let mut settings = load_config(config.as_deref())?;
            if let Some(package) = package {
                settings.proto.package = package;
            }
            if openapi_options {
                settings.proto.openapi_options = true;
            }
            if no_api_options {
                settings.proto.api_options = false;
            }
            to_proto_command(&input, &output, settings, cli.verbose)?;
        },
        Commands::ToOpenapi {
            input,
            output,
            format,
            config,
            mode,
            naming,
            enum_style,
            title,
            default_server,
        } => {
            let mut settings = load_config(config.as_deref())?;
            apply_openapi_overrides(
                &mut settings,
                OpenApiOverrides {
                    mode,
                    naming,
                    enum_style,
                    title,
                    default_server,
                },
            );
            to_openapi_command(&input, &output, format, &settings, cli.verbose)?;
        },
        Commands::Inspect { input, format } => {
            inspect_command(&input, format, cli.verbose)?;
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    match path {
        Some(path) => {
            println!("{} Loading config: {}", "→".cyan(), path.display());
            let settings = BridgeConfig::load(path).context("Failed to load configuration")?;
            tracing::debug!(config = ?settings, "loaded configuration");
            Ok(settings)
        },
        None => Ok(BridgeConfig::default()),
    }
}

fn apply_openapi_overrides(settings: &mut BridgeConfig, overrides: OpenApiOverrides) {
    let openapi = &mut settings.openapi;
    if let Some(mode) = overrides.mode {
        openapi.mode = match mode {
            ModeArg::Http => GenerationMode::Http,
            ModeArg::Rpc => GenerationMode::Rpc,
        };
    }
    if let Some(naming) = overrides.naming {
        openapi.naming = match naming {
            NamingArg::Json => NamingStyle::Json,
            NamingArg::Proto => NamingStyle::Proto,
        };
    }
    if let Some(enum_style) = overrides.enum_style {
        openapi.enum_style = match enum_style {
            EnumStyleArg::Integer => EnumStyle::Integer,
            EnumStyleArg::String => EnumStyle::String,
        };
    }
    if let Some(title) = overrides.title {
        openapi.title = Some(title);
    }
    if let Some(server) = overrides.default_server {
        openapi.default_server = server;
    }
}

fn to_proto_command(
    input: &Path,
    output: &Path,
    settings: BridgeConfig,
    verbose: bool,
) -> Result<()> {
    println!("{} Loading OpenAPI document: {}", "→".cyan(), input.display());
    let document = load_openapi(input)?;

    if verbose {
        println!("  Package: {}", settings.proto.package);
        println!("  API options: {}", settings.proto.api_options);
        println!("  OpenAPI options: {}", settings.proto.openapi_options);
        println!("  Output: {}", output.display());
    }

    println!("{} Converting to proto3...", "→".cyan());
    let generator = ProtoGenerator::from_openapi(&document, settings.proto)
        .context("Failed to convert OpenAPI document")?;

    let file = generator.proto_file();
    println!(
        "{} Built {} messages, {} enums, {} services",
        "✓".green(),
        file.messages.len(),
        file.enums.len(),
        file.services.len()
    );

    generator
        .generate_to_file(output)
        .context("Failed to write proto file")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("  📄 {}", output.display());

    Ok(())
}

fn to_openapi_command(
    input: &Path,
    output: &Path,
    format: Option<InputFormat>,
    settings: &BridgeConfig,
    verbose: bool,
) -> Result<()> {
    let format = resolve_format(input, format);
    if format == InputFormat::Openapi {
        anyhow::bail!(
            "{} is not an IDL input; use --format thrift or --format protobuf",
            input.display()
        );
    }

    println!("{} Loading {} input: {}", "→".cyan(), format, input.display());
    let idl = load_idl(input, format)?;

    if verbose {
        println!("  Mode: {:?}", settings.openapi.mode);
        println!("  Naming: {:?}", settings.openapi.naming);
        println!("  Enum style: {:?}", settings.openapi.enum_style);
        println!("  Output: {}", output.display());
    }

    println!("{} Building OpenAPI document...", "→".cyan());
    let generator = OpenApiGenerator::from_idl(&idl, &settings.openapi)
        .context("Failed to build OpenAPI document")?;

    let document = generator.document();
    println!(
        "{} Built {} paths, {} schemas",
        "✓".green(),
        document.paths.len(),
        document.components.schemas.len()
    );

    generator
        .generate_to_file(output)
        .context("Failed to write OpenAPI document")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("  📄 {}", output.display());

    Ok(())
}

fn inspect_command(input: &Path, format: Option<InputFormat>, verbose: bool) -> Result<()> {
    let format = resolve_format(input, format);
    println!("{} Inspecting {} input: {}", "→".cyan(), format, input.display());

    match format {
        InputFormat::Openapi => {
            let document = load_openapi(input)?;
            print_document_summary(&document, verbose);
        },
        InputFormat::Thrift | InputFormat::Protobuf => {
            let idl = load_idl(input, format)?;
            print_idl_summary(&idl, verbose);
        },
    }

    Ok(())
}

fn load_openapi(path: &Path) -> Result<Document> {
    let parser = OpenApiParser::from_file(path).context("Failed to load OpenAPI document")?;
    Ok(parser.into_document())
}

fn load_idl(path: &Path, format: InputFormat) -> Result<IdlFile> {
    match format {
        InputFormat::Thrift => {
            let parser = ThriftParser::from_file(path).context("Failed to load Thrift IDL")?;
            parser.parse().context("Failed to convert Thrift IDL")
        },
        InputFormat::Protobuf => {
            let parser = ProtobufParser::from_file(path)
                .context("Failed to load Protobuf FileDescriptorSet")?;
            parser
                .parse()
                .context("Failed to convert Protobuf FileDescriptorSet")
        },
        InputFormat::Openapi => anyhow::bail!("{} is not an IDL input", path.display()),
    }
}

fn resolve_format(path: &Path, format: Option<InputFormat>) -> InputFormat {
    format.unwrap_or_else(|| {
        let detected = detect_format(path);
        println!(
            "{} Auto-detected format: {}",
            "→".cyan(),
            detected.to_string().yellow()
        );
        detected
    })
}

/// Detect the input format from the file extension
fn detect_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("thrift") => InputFormat::Thrift,
        Some("pb" | "desc" | "bin" | "protoset") => InputFormat::Protobuf,
        _ => InputFormat::Openapi,
    }
}

fn print_document_summary(document: &Document, verbose: bool) {
    println!("\n{}", "✓ Load successful!".green().bold());
    println!("\n{}", "OpenAPI Document:".bold());
    println!("  Title: {}", document.info.title.yellow());
    println!("  Version: {}", document.info.version.yellow());
    println!("  Paths: {}", document.paths.len());
    println!("  Schemas: {}", document.components.schemas.len());

    if verbose {
        println!("\n{}", "Operations:".bold());
        for (path, item) in &document.paths {
            for (method, operation) in item.operations() {
                println!(
                    "  • {} {} ({})",
                    method.to_uppercase().cyan(),
                    path,
                    operation.operation_id.as_deref().unwrap_or("-")
                );
            }
        }
    }
}

fn print_idl_summary(idl: &IdlFile, verbose: bool) {
    println!("\n{}", "✓ Load successful!".green().bold());
    println!("\n{}", "IDL Definition:".bold());
    println!("  Name: {}", idl.name.yellow());
    println!("  Syntax: {:?}", idl.syntax);
    println!("  Services: {}", idl.services.len());
    println!("  Structs: {}", idl.structs.len());
    println!("  Enums: {}", idl.enums.len());

    if verbose {
        println!("\n{}", "Services:".bold());
        for service in &idl.services {
            println!("  • {} ({} methods)", service.name.cyan(), service.methods.len());
            for method in &service.methods {
                let routes: Vec<String> = method
                    .annotations
                    .iter()
                    .filter(|(key, _)| key.starts_with("api."))
                    .map(|(key, value)| format!("{}={}", key, value.values().join(",")))
                    .collect();
                println!("    {} {}", method.name, routes.join(" "));
            }
        }
    }
}
