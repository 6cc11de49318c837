//! vui-shorthand - Voice Model Shorthand Compiler
//!
//! CLI entry point for compiling `.als` shorthand files into interaction
//! model JSON and slot-mapping artifacts.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use vui_shorthand::parse;

const INPUT_EXTENSION: &str = "als";

#[derive(Parser)]
#[command(name = "vuis")]
#[command(version)]
#[command(about = "Voice model shorthand compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a shorthand file to interaction model JSON
    Compile {
        /// Input .als file
        input: PathBuf,

        /// Output JSON file (default: input with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the intent slot mapping for the request classifier
        #[arg(long, value_name = "FILE")]
        slot_mapping: Option<PathBuf>,

        /// Suppress the model summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse a shorthand file and report diagnostics without writing output
    Check {
        /// Input .als file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            slot_mapping,
            quiet,
        } => compile(&input, output.as_deref(), slot_mapping.as_deref(), quiet),
        Commands::Check { input } => check(&input),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.extension().map_or(true, |ext| ext != INPUT_EXTENSION) {
        bail!(
            "input file {} does not have the .{} extension",
            input.display(),
            INPUT_EXTENSION
        );
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn compile(
    input: &Path,
    output: Option<&Path>,
    slot_mapping: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let source = read_input(input)?;
    let (model, pc) = parse(&source);

    if !quiet {
        let mut rng = rand::thread_rng();
        for line in model.summary_lines(&mut rng) {
            println!("{}", line);
        }
    }
    report_diagnostics(&pc);

    // diagnostics are advisory, a partially broken model still renders
    let rendered = model.to_interaction_model();
    let json = serde_json::to_string_pretty(&rendered)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("json"));
    fs::write(&output, json).with_context(|| format!("failed to write {}", output.display()))?;
    println!("wrote output file: {}", output.display());

    if let Some(mapping_path) = slot_mapping {
        let mapping = model.intent_slot_mapping();
        let json = serde_json::to_string_pretty(&mapping)?;
        fs::write(mapping_path, json)
            .with_context(|| format!("failed to write {}", mapping_path.display()))?;
        println!("wrote slot mapping: {}", mapping_path.display());
    }

    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let source = read_input(input)?;
    let (_, pc) = parse(&source);
    report_diagnostics(&pc);

    if pc.has_errors() {
        bail!("{} error(s) found", pc.errors.len());
    }
    Ok(())
}

fn report_diagnostics(pc: &vui_shorthand::ParserContext) {
    for line in pc.error_report() {
        eprintln!("{}", line);
    }
    for line in pc.warning_report() {
        eprintln!("{}", line);
    }
}
