//! Sweep command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use qdiv_arith::{DivisionOutcome, Divider};

use super::common::{ExecArgs, Settings, create_backend, describe_expected, divide, samples};

/// A pair whose samples did not all match.
struct Mismatch {
    a: u64,
    b: u64,
    expected: DivisionOutcome,
    observed: Vec<DivisionOutcome>,
}

/// Execute the sweep command.
pub async fn execute(exec: &ExecArgs, config: Option<&Path>) -> Result<()> {
    let settings = Settings::resolve(exec, config)?;
    let divider = Divider::new(settings.width)?;
    let backend = create_backend(&settings.backend).await?;

    let range = 1_u64 << settings.width;
    let total = range * (range - 1);
    println!(
        "{} Checking {} pairs of {}-bit operands on {} ({} qubits, {} shots each)",
        style("→").cyan().bold(),
        total,
        settings.width,
        style(backend.name()).yellow(),
        divider.layout().num_qubits(),
        settings.shots
    );

    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut mismatches = vec![];
    for a in 0..range {
        for b in 1..range {
            let (built, result) = divide(backend.as_ref(), &divider, a, b, settings.shots).await?;
            let observed = samples(&built, &result)?;
            let expected = built.expected();
            if observed.iter().any(|o| *o != expected) {
                warn!(a, b, %expected, "sample mismatch");
                mismatches.push(Mismatch {
                    a,
                    b,
                    expected,
                    observed,
                });
            }
            progress.inc(1);
        }
    }
    progress.finish_and_clear();

    if mismatches.is_empty() {
        println!(
            "{} All {} pairs divided correctly",
            style("✓").green().bold(),
            total
        );
        return Ok(());
    }

    for m in &mismatches {
        let observed: Vec<String> = m.observed.iter().map(ToString::to_string).collect();
        println!(
            "  {} {}: got {}",
            style("✗").red().bold(),
            describe_expected(m.a, m.b, &m.expected),
            observed.join(", ")
        );
    }
    anyhow::bail!("{} of {} pairs disagree with classical division", mismatches.len(), total)
}
