use std::{ fs, path::{ Path, PathBuf }, time::Instant };
use anyhow::Context;
use clap::Parser;
use log::{ LevelFilter, info };
use tdse2d::{
    config::{ SimConfig, Wavepacket },
    propagator::Propagator,
};

/// Propagate a Gaussian wavepacket through a stationary 2D potential.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file holding a simulation configuration; a barrier scattering
    /// setup is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of time steps to take
    #[arg(short = 'n', long, default_value_t = 1000)]
    steps: usize,

    /// Log observables every this many steps (0 to disable)
    #[arg(short, long, default_value_t = 100)]
    report_every: usize,

    /// Number of worker threads for the data-parallel loops (0 for one per
    /// core)
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn default_config() -> SimConfig {
    SimConfig::new(128, 128, 0.001)
        .with_potential("SquareBarrier", &[20.0, 0.2, 0.0, 0.0])
        .with_wavepacket(
            Wavepacket::new((-1.0, 0.0), (0.2, 0.2), (5.0, 0.0)))
}

fn load_config(path: &Path) -> anyhow::Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(level)
        .parse_default_env()
        .init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .context("failed to start worker threads")?;
    info!("using {} worker threads", rayon::current_num_threads());

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    let mut prop = Propagator::new(&config)
        .context("failed to build propagator")?;

    let report_every = args.report_every;
    if report_every > 0 {
        prop.register_step_observer(move |p: &Propagator| {
            if p.steps() % report_every != 0 { return; }
            let (x, y) = p.centroid();
            let (sx, sy) = p.spread();
            info!(
                "step {:6}  t = {:.4}  P = {:.9}  <r> = ({:+.4}, {:+.4})  \
                dr = ({:.4}, {:.4})",
                p.steps(), p.current_time(), p.total_probability(),
                x, y, sx, sy,
            );
        });
    }

    let e0 = prop.total_energy()?;
    let start = Instant::now();
    prop.run(args.steps).context("propagation failed")?;
    let elapsed = start.elapsed();

    let e1 = prop.total_energy()?;
    println!("steps:       {}", prop.steps());
    println!("time:        {:.6}", prop.current_time());
    println!("probability: {:.12}", prop.total_probability());
    println!("energy:      {:.6} -> {:.6}", e0, e1);
    println!(
        "x > 0:       {:.6}",
        prop.probability_in_region(0.0.., ..),
    );
    println!(
        "wall time:   {:.3} s ({:.3} ms/step)",
        elapsed.as_secs_f64(),
        1e3 * elapsed.as_secs_f64() / args.steps.max(1) as f64,
    );
    Ok(())
}
