//! Random command implementation.

use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::common::{ExecArgs, OutputFormat, Settings};
use super::run::divide_and_report;

/// Draw both operands uniformly from `1..=2^(width-1)`.
pub fn draw_operands<R: Rng>(rng: &mut R, width: usize) -> (u64, u64) {
    let max = 1_u64 << (width - 1);
    (rng.gen_range(1..=max), rng.gen_range(1..=max))
}

/// Execute the random command.
pub async fn execute(
    seed: Option<u64>,
    exec: &ExecArgs,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let settings = Settings::resolve(exec, config)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (a, b) = draw_operands(&mut rng, settings.width);
    info!(a, b, ?seed, "drew operands");

    divide_and_report(&settings, a, b, format).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for width in 1..=6 {
            for _ in 0..200 {
                let (a, b) = draw_operands(&mut rng, width);
                let max = 1 << (width - 1);
                assert!((1..=max).contains(&a));
                assert!((1..=max).contains(&b));
            }
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let first = draw_operands(&mut StdRng::seed_from_u64(42), 3);
        let second = draw_operands(&mut StdRng::seed_from_u64(42), 3);
        assert_eq!(first, second);
    }
}
