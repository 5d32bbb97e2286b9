//! Pyrite CLI entry point.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rhizome_pyrite_ast::{validate, Program};
use rhizome_pyrite_backend_python::{compile, Options};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pyrite")]
#[command(about = "Compile resolved MATLAB-style programs to Python")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a resolved AST (JSON) to Python
    Compile {
        /// Input AST file (or - for stdin)
        file: String,

        /// Options file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Omit `# file:line` annotations
        #[arg(long)]
        no_numbers: bool,

        /// Source file name used in line annotations
        #[arg(long)]
        filename: Option<String>,

        /// Write to stdout instead of file
        #[arg(long)]
        stdout: bool,
    },

    /// Parse and validate a resolved AST without compiling it
    Check {
        /// Input AST file (or - for stdin)
        file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pyrite=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            file,
            config,
            no_numbers,
            filename,
            stdout,
        } => {
            let options = resolve_options(config.as_deref(), no_numbers, filename)?;
            debug!(?options, "resolved options");

            let program: Program = serde_json::from_str(&read_input(&file)?)?;
            let python = compile(&program, options)?;

            if stdout {
                print!("{}", python);
            } else {
                let out_path = output_path(&file);
                std::fs::write(&out_path, &python)?;
                info!(decls = program.decls.len(), "compiled {}", file);
                println!("Wrote: {}", out_path.display());
            }
        }

        Commands::Check { file } => {
            let program: Program = serde_json::from_str(&read_input(&file)?)?;
            validate(&program)?;
            println!("{}: ok ({} declarations)", file, program.decls.len());
        }
    }

    Ok(())
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

/// Config file first, then flags on top.
fn resolve_options(
    config: Option<&Path>,
    no_numbers: bool,
    filename: Option<String>,
) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };
    if no_numbers {
        options.line_numbers = false;
    }
    if let Some(filename) = filename {
        options.filename = filename;
    }
    Ok(options)
}

fn output_path(file: &str) -> PathBuf {
    if file == "-" {
        PathBuf::from("output.py")
    } else {
        Path::new(file).with_extension("py")
    }
}
