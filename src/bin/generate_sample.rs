use chrono::NaiveDate;

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

fn main() {
    let mut rng = SimpleRng::new(42);

    // Damped, slowly precessing elliptical swing: axes decay exponentially,
    // the ellipse orientation wanders, eccentricity follows from the axes.
    let a0 = 142.0; // semi-major axis, mm
    let b0 = 96.0; // semi-minor axis, mm
    let tau_a = 420.0; // decay constants, s
    let tau_b = 310.0;

    let samples = 600;
    let dt = 0.5; // 2 Hz sampling
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .expect("valid date")
        .and_hms_opt(14, 2, 11)
        .expect("valid time");

    let output_path = "sample_pendulum.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "date_recorded",
            "time_recorded",
            "semi_major_axis",
            "semi_minor_axis",
            "rotation_angle_deg",
            "eccentricity",
        ])
        .expect("Failed to write header");

    let mut outliers = 0;
    for i in 0..samples {
        let t = i as f64 * dt;

        let mut a = a0 * (-t / tau_a).exp() + rng.gauss(0.0, 0.9);
        let b = (b0 * (-t / tau_b).exp() + rng.gauss(0.0, 0.7)).min(a - 1.0);
        let angle = 18.0 + 3.5 * (2.0 * std::f64::consts::PI * t / 95.0).sin() + rng.gauss(0.0, 0.4);

        // Occasional tracking glitch, so the IQR filter has work to do.
        if i % 97 == 96 {
            a *= 2.5;
            outliers += 1;
        }

        let ecc = (1.0 - (b / a).powi(2)).max(0.0).sqrt();

        let timestamp = start + chrono::Duration::milliseconds((t * 1000.0) as i64);
        writer
            .write_record([
                timestamp.format("%Y-%m-%d").to_string(),
                timestamp.format("%H:%M:%S%.3f").to_string(),
                format!("{a:.3}"),
                format!("{b:.3}"),
                format!("{angle:.3}"),
                format!("{ecc:.5}"),
            ])
            .expect("Failed to write record");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {samples} samples ({outliers} injected outliers) to {output_path}");
}
