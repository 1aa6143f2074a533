//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - reversible quantum integer division",
        style("qdiv").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qdiv-ir           Circuit intermediate representation");
    println!("  qdiv-arith        Reversible adders and the non-restoring divider");
    println!("  qdiv-hal          Backend abstraction layer");
    println!("  qdiv-adapter-sim  Local basis-state and statevector simulator");
    println!("  qdiv-cli          Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
