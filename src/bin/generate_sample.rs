use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Writes the four sample scenario logs the built-in catalog points at.
///
/// Each run is one calendar day, 10-second sampling over 42 minutes: an idle
/// stretch, a steam ramp, a stabilization phase, then steady state. Scenarios
/// 1 and 2 carry a totalizer column; 3 and 4 predate the flow computer and
/// exercise the flow-integration fallback. Scenario 4 also lacks a pressure
/// setpoint column.
struct ScenarioShape {
    file: &'static str,
    seed: u64,
    date: NaiveDate,
    /// Minute the steam ramp begins.
    ramp_start: f64,
    /// Minute the ramp tops out.
    ramp_end: f64,
    /// Minute the controller is considered settled.
    settle_end: f64,
    /// Outlet-pressure oscillation amplitude during stabilization (bar).
    swing: f64,
    has_totalizer: bool,
    has_pressure_sp: bool,
}

const SAMPLE_SECONDS: i64 = 10;
const RUN_MINUTES: f64 = 42.0;
const TEMP_SP: f64 = 121.0;
const PRESSURE_SP: f64 = 3.0;

fn gaussian_decay(x: f64, rate: f64) -> f64 {
    (-x * rate).exp()
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

/// One sample of every simulated channel at minute `t`.
struct Sample {
    temp_pv: f64,
    temp_sp: f64,
    flow: f64,
    valve: f64,
    inlet_p: f64,
    outlet_p: f64,
}

fn sample_at(shape: &ScenarioShape, t: f64, rng: &mut SimpleRng) -> Sample {
    let ramp_span = shape.ramp_end - shape.ramp_start;

    let (valve_base, temp_base, outlet_base) = if t < shape.ramp_start {
        // Idle: line warm, valve cracked open.
        (8.0, 25.0 + 0.1 * t, 1.2)
    } else if t < shape.ramp_end {
        // Ramp: valve wide open, temperature and pressure climbing.
        let progress = (t - shape.ramp_start) / ramp_span;
        (
            92.0,
            25.0 + (TEMP_SP + 4.0 - 25.0) * progress.powf(0.8),
            1.2 + (PRESSURE_SP + 0.5 - 1.2) * progress,
        )
    } else if t < shape.settle_end {
        // Stabilization: overshoot decaying, controller hunting.
        let since = t - shape.ramp_end;
        let decay = gaussian_decay(since, 0.45);
        let hunt = shape.swing * decay * (since * 2.6).sin();
        (
            35.0 + 57.0 * decay,
            TEMP_SP + 4.0 * decay,
            PRESSURE_SP + 0.5 * decay + hunt,
        )
    } else {
        // Steady state.
        (35.0, TEMP_SP, PRESSURE_SP)
    };

    let valve = (valve_base + rng.gauss(0.0, 1.2)).clamp(0.0, 100.0);
    Sample {
        temp_pv: temp_base + rng.gauss(0.0, 0.3),
        temp_sp: TEMP_SP,
        flow: (valve * 5.2 + rng.gauss(0.0, 4.0)).max(0.0),
        valve,
        inlet_p: 6.0 + rng.gauss(0.0, 0.05),
        outlet_p: (outlet_base + rng.gauss(0.0, 0.03)).max(0.0),
    }
}

fn write_scenario(shape: &ScenarioShape) -> Result<()> {
    let path = std::path::Path::new(shape.file);
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "Timestamp",
        "Process Temp",
        "Process Temp SP",
        "Steam Flow Rate",
        "QualSteam Valve Opening",
        "Inlet Steam Pressure",
        "Outlet Steam Pressure",
    ];
    if shape.has_pressure_sp {
        header.push("Pressure SP");
    }
    if shape.has_totalizer {
        header.push("Steam Totalizer");
    }
    writer.write_record(&header).context("writing header")?;

    let mut rng = SimpleRng::new(shape.seed);
    let start: NaiveDateTime = shape.date.and_hms_opt(0, 0, 0).expect("midnight exists");
    let n_samples = (RUN_MINUTES * 60.0 / SAMPLE_SECONDS as f64) as i64 + 1;
    let dt_hours = SAMPLE_SECONDS as f64 / 3600.0;
    let mut totalizer = 1500.0;

    for i in 0..n_samples {
        let ts = start + Duration::seconds(i * SAMPLE_SECONDS);
        let t = (i * SAMPLE_SECONDS) as f64 / 60.0;
        let sample = sample_at(shape, t, &mut rng);
        totalizer += sample.flow * dt_hours;

        let mut row = vec![
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", sample.temp_pv),
            format!("{:.1}", sample.temp_sp),
            format!("{:.1}", sample.flow),
            format!("{:.1}", sample.valve),
            format!("{:.3}", sample.inlet_p),
            format!("{:.3}", sample.outlet_p),
        ];
        if shape.has_pressure_sp {
            row.push(format!("{PRESSURE_SP:.1}"));
        }
        if shape.has_totalizer {
            row.push(format!("{totalizer:.2}"));
        }
        writer.write_record(&row).context("writing row")?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {n_samples} samples to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    std::fs::create_dir_all("data").context("creating data directory")?;

    let shapes = [
        ScenarioShape {
            file: "data/scenario_1.csv",
            seed: 42,
            date: NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date"),
            ramp_start: 18.0,
            ramp_end: 21.0,
            settle_end: 27.0,
            swing: 0.15,
            has_totalizer: true,
            has_pressure_sp: true,
        },
        ScenarioShape {
            file: "data/scenario_2.csv",
            seed: 43,
            date: NaiveDate::from_ymd_opt(2024, 3, 11).expect("valid date"),
            ramp_start: 15.0,
            ramp_end: 19.0,
            settle_end: 25.0,
            swing: 0.45,
            has_totalizer: true,
            has_pressure_sp: true,
        },
        ScenarioShape {
            file: "data/scenario_3.csv",
            seed: 44,
            date: NaiveDate::from_ymd_opt(2024, 3, 18).expect("valid date"),
            ramp_start: 20.0,
            ramp_end: 24.0,
            settle_end: 30.0,
            swing: 0.08,
            has_totalizer: false,
            has_pressure_sp: true,
        },
        ScenarioShape {
            file: "data/scenario_4.csv",
            seed: 45,
            date: NaiveDate::from_ymd_opt(2024, 3, 25).expect("valid date"),
            ramp_start: 16.0,
            ramp_end: 20.0,
            settle_end: 26.0,
            swing: 0.30,
            has_totalizer: false,
            has_pressure_sp: false,
        },
    ];

    for shape in &shapes {
        write_scenario(shape)?;
    }
    Ok(())
}
