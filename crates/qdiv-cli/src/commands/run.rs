//! Run command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use qdiv_arith::{DivisionOutcome, Divider};
use qdiv_hal::Counts;

use super::common::{
    ExecArgs, OutputFormat, Settings, create_backend, divide, print_samples, samples, spinner,
};

/// Machine-readable report of one division.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    dividend: u64,
    divisor: u64,
    width: usize,
    backend: &'a str,
    shots: u32,
    qubits: usize,
    depth: usize,
    expected: DivisionOutcome,
    samples: Vec<String>,
    counts: &'a Counts,
    correct: bool,
}

/// Execute the run command.
pub async fn execute(
    dividend: u64,
    divisor: u64,
    exec: &ExecArgs,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let settings = Settings::resolve(exec, config)?;
    divide_and_report(&settings, dividend, divisor, format).await
}

/// Divide `a` by `b` on the configured backend and report every sample.
///
/// Fails if any sample disagrees with classical integer division.
pub async fn divide_and_report(
    settings: &Settings,
    a: u64,
    b: u64,
    format: OutputFormat,
) -> Result<()> {
    let divider = Divider::new(settings.width)?;
    let backend = create_backend(&settings.backend).await?;

    if format == OutputFormat::Table {
        println!(
            "{} Dividing {} by {} ({}-bit operands, {} shots on {})",
            style("→").cyan().bold(),
            style(a).green(),
            style(b).green(),
            settings.width,
            settings.shots,
            style(backend.name()).yellow()
        );
    }

    let progress = spinner(format!("Simulating {}-qubit circuit...", divider.layout().num_qubits()));
    let outcome = divide(backend.as_ref(), &divider, a, b, settings.shots).await;
    progress.finish_and_clear();
    let (built, result) = outcome?;

    let outcomes = samples(&built, &result)?;
    let expected = built.expected();
    let mismatches = outcomes.iter().filter(|o| **o != expected).count();

    match format {
        OutputFormat::Table => {
            print_samples(a, b, &expected, &outcomes);
            if let Some(ms) = result.execution_time_ms {
                println!("\n  Execution time: {} ms", style(ms).yellow());
            }
        }
        OutputFormat::Json => {
            let report = RunReport {
                dividend: a,
                divisor: b,
                width: settings.width,
                backend: backend.name(),
                shots: result.shots,
                qubits: built.circuit().num_qubits(),
                depth: built.circuit().depth(),
                expected,
                samples: outcomes.iter().map(ToString::to_string).collect(),
                counts: &result.counts,
                correct: mismatches == 0,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if mismatches > 0 {
        anyhow::bail!(
            "{mismatches} of {} samples disagree with {a} / {b} = {expected}",
            outcomes.len()
        );
    }
    Ok(())
}
