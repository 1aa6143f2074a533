//! Inspect command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qdiv_arith::{Divider, DividerLayout};
use qdiv_ir::Circuit;

use super::common::{ExecArgs, Settings, describe_expected};

/// Execute the inspect command.
///
/// Without operands the reversible schedule alone is shown; with operands the
/// full circuit including initialization and measurement.
pub fn execute(
    width: Option<usize>,
    operands: Option<(u64, u64)>,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let exec = ExecArgs {
        width,
        ..ExecArgs::default()
    };
    let settings = Settings::resolve(&exec, config)?;
    let divider = Divider::new(settings.width)?;
    let layout = divider.layout();

    let (circuit, expected) = match operands {
        Some((a, b)) => {
            let built = divider.build(a, b)?;
            let expected = describe_expected(a, b, &built.expected());
            (built.into_circuit(), Some(expected))
        }
        None => {
            let mut schedule = layout.circuit("schedule");
            divider.emit_schedule(&mut schedule)?;
            (schedule, None)
        }
    };

    if json {
        println!("{}", circuit.to_json()?);
        return Ok(());
    }

    println!(
        "{} Divider for {}-bit operands",
        style("→").cyan().bold(),
        settings.width
    );
    print_layout(layout)?;
    println!();
    print_statistics(&circuit);
    if let Some(expected) = expected {
        println!("  Expected:   {expected}");
    }
    Ok(())
}

fn print_layout(layout: &DividerLayout) -> Result<()> {
    println!(
        "\n  {:<10} {:<12} {}",
        style("Register").bold(),
        style("Qubits").bold(),
        style("Size").bold()
    );
    for (name, register) in layout.registers() {
        let span = match (register.lsb(), register.msb()) {
            (Some(lsb), Some(msb)) if lsb != msb => format!("{lsb}..{msb}"),
            (Some(lsb), _) => lsb.to_string(),
            _ => String::new(),
        };
        println!("  {:<10} {:<12} {}", name, span, register.len());
    }

    let measured: Vec<String> = layout
        .measured_qubits()?
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("\n  Measured:   {}", measured.join(" "));
    Ok(())
}

fn print_statistics(circuit: &Circuit) {
    println!("  Circuit:    {}", style(circuit.name()).green());
    println!(
        "  Qubits:     {} ({} classical bits)",
        circuit.num_qubits(),
        circuit.num_clbits()
    );
    println!("  Operations: {}", circuit.num_ops());
    println!("  Depth:      {}", circuit.depth());
    let gates: Vec<String> = circuit
        .gate_counts()
        .iter()
        .map(|(name, count)| format!("{name}: {count}"))
        .collect();
    println!("  Gates:      {}", gates.join(", "));
}
