use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Barycentric Julian Date of the first synthetic observation.
const START_BJD: f64 = 2_459_000.5;
const PERIOD_DAYS: f64 = 0.566_8;
const N_OBSERVATIONS: usize = 400;
/// Every n-th row is written broken to exercise row skipping.
const MALFORMED_EVERY: usize = 97;

#[derive(Parser)]
#[command(about = "Write a synthetic pulsating-star light curve CSV")]
struct Args {
    /// Output CSV path
    #[arg(default_value = "sample_light_curve.csv")]
    output: PathBuf,
    /// Write V magnitudes instead of relative flux
    #[arg(long, default_value_t = false)]
    magnitude: bool,
}

/// RR Lyrae-like pulse: fast rise over the first 15% of the cycle, slow
/// decline for the rest. Returns relative flux in `[0, 1]`.
fn pulse_shape(phase: f64) -> f64 {
    const RISE: f64 = 0.15;
    if phase < RISE {
        phase / RISE
    } else {
        1.0 - (phase - RISE) / (1.0 - RISE)
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let brightness_name = if args.magnitude { "mag" } else { "raw" };
    writer.write_record(["BJD", brightness_name, "err"])?;

    let mut t = START_BJD;
    let mut malformed = 0;
    for i in 0..N_OBSERVATIONS {
        // irregular cadence: ~40 minutes with jitter, plus nightly gaps
        t += 0.028 + rng.next_f64() * 0.01;
        if i % 60 == 59 {
            t += 0.6;
        }

        let phase = ((t - START_BJD) / PERIOD_DAYS).fract();
        let err = 0.004 + rng.next_f64() * 0.004;
        let flux = 0.8 + 0.4 * pulse_shape(phase) + rng.gauss(0.0, err);
        let brightness = if args.magnitude {
            12.0 - 2.5 * flux.log10()
        } else {
            flux
        };

        if i % MALFORMED_EVERY == MALFORMED_EVERY - 1 {
            writer.write_record([format!("{t:.6}"), "NaN?".to_string(), format!("{err:.5}")])?;
            malformed += 1;
        } else {
            writer.write_record([
                format!("{t:.6}"),
                format!("{brightness:.5}"),
                format!("{err:.5}"),
            ])?;
        }
    }
    writer.flush()?;

    println!(
        "Wrote {N_OBSERVATIONS} observations ({malformed} deliberately malformed) to {}",
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_rises_fast_and_declines_slowly() {
        assert_eq!(pulse_shape(0.0), 0.0);
        assert!((pulse_shape(0.15) - 1.0).abs() < 1e-12);
        assert!(pulse_shape(0.5) > pulse_shape(0.9));
    }

    #[test]
    fn rng_is_deterministic() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert!((0.0..1.0).contains(&SimpleRng::new(1).next_f64()));
    }
}
