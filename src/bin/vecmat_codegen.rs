//! vecmat-codegen CLI
//!
//! # Usage
//!
//! ```bash
//! # Render one template, then rustfmt the result
//! vecmat-codegen --template vector.rs.hbs --output vector.rs
//!
//! # Derive the f64 tree from the current (f32) tree
//! vecmat-codegen --vecmat64 --dir ../vecmat64
//! ```
//!
//! Run without a mode flag (or with stray positional arguments) it prints
//! usage and exits with status 2.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use vecmat_codegen::{CodegenConfig, CommandSpec, Deriver, TemplateRenderer, Toolchain};

const DEFAULT_TEMPLATE: &str = "file.rs.hbs";
const DEFAULT_OUTPUT: &str = "file.rs";
const DEFAULT_DEST: &str = "../vecmat64";

#[derive(Parser, Debug)]
#[command(name = "vecmat-codegen")]
#[command(version)]
#[command(about = "Generate vector/matrix sources from templates, or derive the f64 tree from the f32 one")]
struct Cli {
    /// Template to render
    #[arg(long, value_name = "FILE", conflicts_with = "vecmat64")]
    template: Option<PathBuf>,

    /// Where to write the rendered template
    #[arg(long, value_name = "FILE", conflicts_with = "vecmat64")]
    output: Option<PathBuf>,

    /// Derive the f64 tree from the current directory
    #[arg(long)]
    vecmat64: bool,

    /// Destination root for --vecmat64
    #[arg(long, value_name = "DIR", requires = "vecmat64")]
    dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, value_name = "FILE", env = "VECMAT_CODEGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Formatter command line, program plus arguments (overrides the config file)
    #[arg(long, value_name = "COMMAND", env = "VECMAT_FORMATTER")]
    formatter: Option<String>,

    /// Import normalization command line, program plus arguments (overrides the config file)
    #[arg(long, value_name = "COMMAND", env = "VECMAT_IMPORT_FIXER")]
    import_fixer: Option<String>,
}

impl Cli {
    fn has_mode(&self) -> bool {
        self.vecmat64 || self.template.is_some() || self.output.is_some()
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) if cli.has_mode() => cli,
        Ok(_) => return usage(),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{e}");
            return usage();
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,vecmat_codegen=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ExitCode {
    println!("Usage: vecmat-codegen --template {DEFAULT_TEMPLATE} --output {DEFAULT_OUTPUT}");
    println!("Usage: vecmat-codegen --vecmat64 [--dir {DEFAULT_DEST}]");
    println!();
    println!("{}", Cli::command().render_help());
    ExitCode::from(2)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CodegenConfig::load(path)?,
        None => CodegenConfig::default(),
    };
    if let Some(line) = cli.formatter {
        config.tools.formatter = CommandSpec::parse_line(&line).context("Invalid --formatter")?;
    }
    if let Some(line) = cli.import_fixer {
        config.tools.import_fixer =
            CommandSpec::parse_line(&line).context("Invalid --import-fixer")?;
    }
    let toolchain = Toolchain::new(config.tools);

    if cli.vecmat64 {
        let dest = cli.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DEST));
        Deriver::new(config.derive, &toolchain)
            .run(Path::new("."), &dest)
            .with_context(|| format!("Failed to derive vecmat64 into {}", dest.display()))?;
        return Ok(());
    }

    let template = cli
        .template
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE));
    let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    TemplateRenderer::new()
        .render_file(&template, &output, &toolchain)
        .with_context(|| format!("Failed to generate {} from {}", output.display(), template.display()))
}
