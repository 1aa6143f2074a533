//! Backends command implementation.

use anyhow::Result;
use console::style;

use qdiv_hal::BackendConfig;

use super::common::registry;

/// Execute the backends command.
pub async fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("qdiv").cyan().bold());

    let registry = registry();
    for (name, description) in registry.describe() {
        let backend = registry.create(BackendConfig::new(name))?;
        let caps = backend.capabilities();
        let available = backend.availability().await?.is_available;

        println!(
            "  {} {} {}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(name).bold(),
            if caps.is_simulator { "(local)" } else { "" }
        );
        println!("    {description}");
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        let gates: Vec<&str> = caps
            .gate_set
            .single_qubit
            .iter()
            .chain(&caps.gate_set.two_qubit)
            .chain(&caps.gate_set.three_qubit)
            .map(String::as_str)
            .collect();
        println!("    Gates: {}", gates.join(", "));
        if !caps.features.is_empty() {
            println!("    Features: {}", caps.features.join(", "));
        }
        println!();
    }

    println!(
        "  Engines: {} (default), {}, {}",
        style("auto").cyan(),
        style("basis").cyan(),
        style("statevector").cyan()
    );
    println!("  Select with --engine or `backend.engine` in the config file.");
    Ok(())
}
