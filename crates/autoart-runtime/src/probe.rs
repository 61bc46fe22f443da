//! Sample a program over a regular grid of bindings.

use crate::evaluator::Evaluator;
use autoart_core::{Error, ProbeStats, Rectifier, Result};
use autoart_ir::Program;

/// Evaluate `program` over a `resolution`-step grid and summarize the output.
///
/// The first variable sweeps `[0, 1)`; with two or more variables the second
/// sweeps `[0, 1)` as well, giving `resolution²` samples. Remaining variables
/// stay at 0.
pub fn probe(program: &Program, rectifier: Rectifier, resolution: usize) -> Result<ProbeStats> {
    if resolution == 0 {
        return Err(Error::Validation("Probe resolution must be at least 1".to_string()));
    }

    let mut evaluator = Evaluator::for_program(program);
    let mut vars = vec![0.0; program.arity().max(1)];
    let rows = if program.arity() >= 2 { resolution } else { 1 };
    let step = 1.0 / resolution as f64;
    let mut stats = ProbeStats::new();

    for row in 0..rows {
        if vars.len() >= 2 {
            vars[1] = row as f64 * step;
        }
        for col in 0..resolution {
            vars[0] = col as f64 * step;
            let raw = evaluator.evaluate(program, &vars)?;
            stats.record(raw, rectifier.rectify(raw));
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoart_ir::synthesize;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_probe_sample_counts() {
        let one = Program::parse(1, "v0").unwrap();
        assert_eq!(probe(&one, Rectifier::Clamp, 8).unwrap().samples, 8);

        let two = Program::parse(2, "v0 v1 +").unwrap();
        assert_eq!(probe(&two, Rectifier::Clamp, 8).unwrap().samples, 64);
    }

    #[test]
    fn test_probe_identity_range() {
        let program = Program::parse(2, "v0").unwrap();
        let stats = probe(&program, Rectifier::Clamp, 4).unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.75);
        assert!((stats.mean - 0.375).abs() < 1e-12);
        assert!((stats.mean_rectified - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_probe_zero_resolution() {
        let program = Program::parse(1, "v0").unwrap();
        assert!(probe(&program, Rectifier::Mod, 0).is_err());
    }

    #[test]
    fn test_probe_random_programs_finite() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for _ in 0..25 {
            let program = synthesize(3, 40, &mut rng).unwrap();
            let stats = probe(&program, Rectifier::Sigmoid, 8).unwrap();
            assert!(stats.is_finite());
            assert!(stats.mean_rectified > -1e-9 && stats.mean_rectified < 1.0 + 1e-9);
        }
    }
}
