//! Shared helpers for CLI commands: configuration, backend creation and
//! result printing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::debug;

use qdiv_adapter_sim::SimulatorBackend;
use qdiv_arith::{DEFAULT_WIDTH, DivisionCircuit, DivisionOutcome, Divider, MAX_WIDTH};
use qdiv_hal::{Backend, BackendConfig, BackendRegistry, ExecutionResult};

/// Samples per circuit when neither a flag nor the config file sets them.
pub const DEFAULT_SHOTS: u32 = 3;

/// Output format of `run` and `random`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Execution flags shared by `run`, `random` and `sweep`.
#[derive(Debug, Clone, Default, Args)]
pub struct ExecArgs {
    /// Operand width in bits
    #[arg(short, long, env = "QDIV_WIDTH")]
    pub width: Option<usize>,

    /// Samples per circuit
    #[arg(short, long, env = "QDIV_SHOTS")]
    pub shots: Option<u32>,

    /// Backend to use
    #[arg(long)]
    pub backend: Option<String>,

    /// Simulation engine (auto, basis, statevector)
    #[arg(long)]
    pub engine: Option<String>,

    /// Qubit budget of the statevector engine
    #[arg(long, env = "QDIV_MAX_QUBITS")]
    pub max_qubits: Option<u64>,
}

/// Contents of the `--config` YAML file.
///
/// ```yaml
/// width: 3
/// shots: 5
/// backend:
///   name: simulator
///   engine: statevector
///   max_qubits: 24
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub width: Option<usize>,
    pub shots: Option<u32>,
    pub backend: Option<BackendConfig>,
}

impl FileConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Effective settings: flags over config file over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub width: usize,
    pub shots: u32,
    pub backend: BackendConfig,
}

impl Settings {
    /// Merge flags, the optional config file and defaults.
    pub fn resolve(args: &ExecArgs, config: Option<&Path>) -> Result<Self> {
        let file = match config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut backend = file
            .backend
            .unwrap_or_else(|| BackendConfig::new("simulator"));
        if let Some(name) = &args.backend {
            backend.name.clone_from(name);
        }
        if let Some(engine) = &args.engine {
            backend = backend.with_extra("engine", serde_json::json!(engine));
        }
        if let Some(max_qubits) = args.max_qubits {
            backend = backend.with_extra("max_qubits", serde_json::json!(max_qubits));
        }

        let width = args.width.or(file.width).unwrap_or(DEFAULT_WIDTH);
        if width == 0 || width > MAX_WIDTH {
            anyhow::bail!("Width must be between 1 and {MAX_WIDTH}, got {width}");
        }
        let shots = args.shots.or(file.shots).unwrap_or(DEFAULT_SHOTS);
        if shots == 0 {
            anyhow::bail!("Shots must be at least 1");
        }

        let settings = Self {
            width,
            shots,
            backend,
        };
        debug!(?settings, "resolved settings");
        Ok(settings)
    }
}

/// Every backend the CLI can construct.
pub fn registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>(
        "simulator",
        "Local simulator (exact basis-state or statevector engine)",
    );
    registry
}

/// Construct the configured backend and check that it accepts jobs.
pub async fn create_backend(config: &BackendConfig) -> Result<Box<dyn Backend>> {
    let backend = registry()
        .create(config.clone())
        .with_context(|| format!("Failed to create backend '{}'", config.name))?;
    let availability = backend.availability().await?;
    if !availability.is_available {
        anyhow::bail!(
            "Backend '{}' is not available: {}",
            config.name,
            availability.status_message.unwrap_or_default()
        );
    }
    Ok(backend)
}

/// Build the division circuit for `a / b` and run it.
pub async fn divide(
    backend: &dyn Backend,
    divider: &Divider,
    a: u64,
    b: u64,
    shots: u32,
) -> Result<(DivisionCircuit, ExecutionResult)> {
    let built = divider.build(a, b)?;
    let result = backend
        .run(built.circuit(), shots)
        .await
        .with_context(|| format!("Failed to run {}", built.circuit().name()))?;
    Ok((built, result))
}

/// Decode every sampled bit string, in sampling order.
///
/// Backends that return only a histogram are expanded from their counts in
/// descending frequency.
pub fn samples(built: &DivisionCircuit, result: &ExecutionResult) -> Result<Vec<DivisionOutcome>> {
    if !result.memory.is_empty() {
        return result
            .memory
            .iter()
            .map(|bits| built.decode(bits).map_err(Into::into))
            .collect();
    }
    let mut outcomes = vec![];
    for (bits, &count) in result.counts.sorted() {
        let outcome = built.decode(bits)?;
        outcomes.extend(std::iter::repeat_n(outcome, count as usize));
    }
    Ok(outcomes)
}

/// A spinner for a single long-running step.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// `a(5) / b(2) = Q …(q) R …(r)` in the operand width.
pub fn describe_expected(a: u64, b: u64, expected: &DivisionOutcome) -> String {
    let w = expected.width;
    format!(
        "{a:0w$b}({a}) / {b:0w$b}({b}) = Q {}({}) R {}({})",
        expected.quotient_bits(),
        expected.quotient,
        expected.remainder_bits(),
        expected.remainder
    )
}

/// Print the expected outcome followed by every sample, marking mismatches.
pub fn print_samples(a: u64, b: u64, expected: &DivisionOutcome, outcomes: &[DivisionOutcome]) {
    println!("{}", style("Expected:").bold());
    println!("  {}", describe_expected(a, b, expected));
    println!("{}", style("Result:").bold());
    for outcome in outcomes {
        if outcome == expected {
            println!("  {} {}", style("✓").green().bold(), style(outcome).cyan());
        } else {
            println!("  {} {}", style("✗").red().bold(), style(outcome).red());
        }
    }
}
