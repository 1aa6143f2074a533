//! qdiv Command-Line Interface
//!
//! Builds reversible non-restoring division circuits, runs them on the local
//! simulator and compares the sampled quotient and remainder with classical
//! integer division.
//!
//! ```text
//! $ qdiv run -a 5 -b 2
//! → Dividing 5 by 2 (3-bit operands, 3 shots on simulator)
//! Expected:
//!   101(5) / 010(2) = Q 010(2) R 0001(1)
//! Result:
//!   ✓ Q 010 R 0001
//!   ✓ Q 010 R 0001
//!   ✓ Q 010 R 0001
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{ExecArgs, OutputFormat};
use commands::{backends, inspect, random, run, sweep, version};

/// qdiv - reversible quantum integer division on a local simulator
#[derive(Parser)]
#[command(name = "qdiv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file with defaults for width, shots and backend options
    #[arg(short, long, global = true, env = "QDIV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Divide two integers with the reversible circuit
    Run {
        /// Dividend
        #[arg(short = 'a', long)]
        dividend: u64,

        /// Divisor (non-zero)
        #[arg(short = 'b', long)]
        divisor: u64,

        #[command(flatten)]
        exec: ExecArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Divide two random operands drawn from 1..=2^(n-1)
    Random {
        /// Seed for operand selection
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        exec: ExecArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check every operand pair of the given width
    Sweep {
        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Show the register layout and gate statistics
    Inspect {
        /// Operand width in bits
        #[arg(short, long, env = "QDIV_WIDTH")]
        width: Option<usize>,

        /// Dividend to initialize (requires --divisor)
        #[arg(short = 'a', long, requires = "divisor")]
        dividend: Option<u64>,

        /// Divisor to initialize (requires --dividend)
        #[arg(short = 'b', long, requires = "dividend")]
        divisor: Option<u64>,

        /// Print the circuit as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            dividend,
            divisor,
            exec,
            format,
        } => run::execute(dividend, divisor, &exec, config, format).await,

        Commands::Random { seed, exec, format } => {
            random::execute(seed, &exec, config, format).await
        }

        Commands::Sweep { exec } => sweep::execute(&exec, config).await,

        Commands::Inspect {
            width,
            dividend,
            divisor,
            json,
        } => inspect::execute(width, dividend.zip(divisor), config, json),

        Commands::Backends => backends::execute().await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_minimal() {
        let cli = Cli::try_parse_from(["qdiv", "run", "-a", "5", "-b", "2"]).unwrap();
        match cli.command {
            Commands::Run {
                dividend,
                divisor,
                exec,
                format,
            } => {
                assert_eq!((dividend, divisor), (5, 2));
                assert!(exec.shots.is_none());
                assert!(exec.backend.is_none());
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_with_options() {
        let cli = Cli::try_parse_from([
            "qdiv",
            "run",
            "--dividend",
            "9",
            "--divisor",
            "4",
            "-w",
            "4",
            "-s",
            "10",
            "--engine",
            "statevector",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { exec, format, .. } => {
                assert_eq!(exec.width, Some(4));
                assert_eq!(exec.shots, Some(10));
                assert_eq!(exec.engine.as_deref(), Some("statevector"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_missing_divisor() {
        assert!(Cli::try_parse_from(["qdiv", "run", "-a", "5"]).is_err());
    }

    #[test]
    fn test_parse_random_seed() {
        let cli = Cli::try_parse_from(["qdiv", "random", "--seed", "42"]).unwrap();
        assert!(matches!(cli.command, Commands::Random { seed: Some(42), .. }));
    }

    #[test]
    fn test_parse_inspect_operands_go_together() {
        assert!(Cli::try_parse_from(["qdiv", "inspect", "-a", "3"]).is_err());
        let cli = Cli::try_parse_from(["qdiv", "inspect", "-a", "3", "-b", "1", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect {
                dividend: Some(3),
                divisor: Some(1),
                json: true,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["qdiv", "-vv", "--config", "qdiv.yaml", "backends"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("qdiv.yaml")));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["qdiv", "multiply"]).is_err());
    }
}
