//! Writes a deterministic delimited sample file for demos and manual
//! testing: one header line, then numeric rows suitable for range-based
//! training/testing splits.

/// Minimal deterministic PRNG (splitmix64).
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
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

fn main() {
    let mut rng = SampleRng::new(42);
    let rows = 500;

    let output_path = "sample_data.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_path(output_path)
        .expect("Failed to create output file");

    writer
        .write_record(["phase", "slow_wave", "fast_wave", "drift", "event"])
        .expect("Failed to write header");

    // Two sinusoids at different periods plus a slow random drift; the
    // event column flags fast-wave zero crossings so it makes a usable
    // binary output column.
    let mut drift = 0.0;
    for i in 0..rows {
        let phase = i as f64 / rows as f64;
        let slow = (2.0 * std::f64::consts::PI * phase).sin() + rng.gauss(0.0, 0.02);
        let fast = (14.0 * std::f64::consts::PI * phase).sin() + rng.gauss(0.0, 0.05);
        drift += rng.gauss(0.0, 0.01);
        let event = if fast.abs() < 0.1 { 1.0 } else { 0.0 };

        writer
            .write_record([
                format!("{phase:.6}"),
                format!("{slow:.6}"),
                format!("{fast:.6}"),
                format!("{drift:.6}"),
                format!("{event}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {rows} rows (plus 1 header line) to {output_path}");
}
