//! prompt-tools CLI - Run interactive input wizards described in YAML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use prompt_core::{version, TtyTerminal, WizardManifest, WizardResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const UPGRADE_COMMAND: &str = "cargo install prompt-tools --force";

/// Environment variable holding the log filter
const LOG_ENV: &str = "PROMPT_TOOLS_LOG";

#[derive(Parser, Debug)]
#[command(name = "prompt-tools")]
#[command(about = "CLI for running interactive input wizards")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the wizard described by a manifest and print the answers
    Run(RunArgs),
    /// Validate a manifest without running it
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Wizard manifest (YAML)
    pub manifest: PathBuf,

    /// Pre-supply an answer and skip its prompt (repeatable; comma-separated for multi inputs)
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_preset)]
    pub set: Vec<(String, String)>,

    /// Format of the answers printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Wizard manifest (YAML)
    pub manifest: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Plain,
}

/// Parse an `id=value` pair
fn parse_preset(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected ID=VALUE, got '{}'", raw)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_manifest(path: &Path) -> Result<WizardManifest> {
    WizardManifest::load(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))
}

fn run(args: RunArgs) -> Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    cliclack::intro(&manifest.name)?;

    if let Some(required) = &manifest.version {
        if let Some(warning) = version::check_compatibility(CLI_VERSION, required, UPGRADE_COMMAND)
        {
            cliclack::log::warning(format!("Version warning: {}", warning))?;
        }
    }

    let mut presets = BTreeMap::new();
    for (id, value) in args.set {
        if manifest.find_input(&id).is_none() {
            cliclack::log::warning(format!("Ignoring --set for unknown input '{}'", id))?;
            continue;
        }
        presets.insert(id, value);
    }
    debug!(presets = presets.len(), "pre-supplied answers");

    let mut terminal = TtyTerminal::new();
    let prompted = manifest.prompted_inputs(&presets);
    if !prompted.is_empty() && !terminal.is_interactive() {
        bail!(
            "No terminal to prompt on; pass --set for: {}",
            prompted.join(", ")
        );
    }
    let result = manifest.run(&mut terminal, &presets)?;
    cliclack::outro("All inputs collected")?;

    print!("{}", format_result(&result, args.output)?);
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    let inputs: usize = manifest.stages.iter().map(|s| s.inputs.len()).sum();
    cliclack::log::success(format!(
        "{} is valid ({} stages, {} inputs)",
        args.manifest.display(),
        manifest.stages.len(),
        inputs
    ))?;
    Ok(())
}

fn format_result(result: &WizardResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(result)?),
        OutputFormat::Plain => Ok(format_plain(result)),
    }
}

/// `id=value` lines sorted by id, multi values comma-joined
fn format_plain(result: &WizardResult) -> String {
    let mut lines: BTreeMap<&str, String> = BTreeMap::new();
    for (id, value) in result.text_inputs().iter().chain(result.single_inputs()) {
        lines.insert(id, value.clone());
    }
    for (id, values) in result.multi_inputs() {
        lines.insert(id, values.join(","));
    }
    lines
        .into_iter()
        .map(|(id, value)| format!("{}={}\n", id, value))
        .collect()
}

fn main() {
    // Ensure the terminal leaves raw mode on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        TtyTerminal::restore();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        TtyTerminal::restore();
        std::process::exit(130);
    })
    .ok();

    init_tracing();
    let args = Args::parse();

    let result = match args.command {
        Command::Run(run_args) => run(run_args),
        Command::Check(check_args) => check(check_args),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
