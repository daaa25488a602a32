use std::f64::consts::TAU;
use tdse2d::{
    config::{ SimConfig, Wavepacket },
    propagator::Propagator,
};

// displaced Gaussian in a harmonic trap; ⟨x⟩ should follow x0 cos(ω t)

const OMEGA: f64 = 1.0;
const X0: f64 = 0.5;
const DT: f64 = 0.01;
const PERIODS: f64 = 2.0;
const SAMPLES_PER_PERIOD: usize = 16;

fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_secs().init();

    let config = SimConfig::new(64, 64, DT)
        .with_potential("HarmonicOscillator", &[OMEGA])
        .with_wavepacket(
            Wavepacket::new((X0, 0.0), (0.5, 0.5), (0.0, 0.0)));
    let mut prop = Propagator::new(&config)?;

    let period = TAU / OMEGA;
    let every = (period / DT / SAMPLES_PER_PERIOD as f64).round() as usize;
    let total = (PERIODS * period / DT).round() as usize;

    println!("{:>8}  {:>10}  {:>10}  {:>10}  {:>12}",
        "t", "<x>", "x0 cos wt", "dx", "E");
    let mut max_err: f64 = 0.0;
    while prop.steps() < total {
        let t = prop.current_time();
        let (x, _) = prop.centroid();
        let (sx, _) = prop.spread();
        let expected = X0 * (OMEGA * t).cos();
        max_err = max_err.max((x - expected).abs());
        println!("{:8.4}  {:+10.6}  {:+10.6}  {:10.6}  {:12.8}",
            t, x, expected, sx, prop.total_energy()?);
        prop.run(every.min(total - prop.steps()))?;
    }
    println!("max |<x> - x0 cos wt| = {:.3e}", max_err);
    println!("final probability = {:.12}", prop.total_probability());
    Ok(())
}
