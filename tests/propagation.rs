use std::{
    f64::consts::TAU,
    sync::{ Arc, Mutex, atomic::{ AtomicUsize, Ordering } },
};
use approx::assert_abs_diff_eq;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tdse2d::{
    config::{ SimConfig, Wavepacket },
    error::SimError,
    fft::FftEngine,
    potential::Potential,
    propagator::Propagator,
    wavefunction::Wavefunction,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(n: usize, dt: f64, wavepacket: Wavepacket) -> SimConfig {
    SimConfig::new(n, n, dt).with_wavepacket(wavepacket)
}

fn l2_diff(a: &Wavefunction, b: &Wavefunction) -> f64 {
    a.as_array().iter().zip(b.as_array().iter())
        .map(|(za, zb)| (za - zb).norm_sqr())
        .sum::<f64>()
        .sqrt()
}

fn assert_peak_near(prop: &Propagator, x: f64, y: f64) {
    let grid = prop.grid();
    let (i, j) = prop.wavefunction().peak();
    assert!(
        (grid.x[i] - x).abs() <= grid.dx + 1e-12
            && (grid.y[j] - y).abs() <= grid.dy + 1e-12,
        "peak at ({}, {}), expected near ({x}, {y})",
        grid.x[i], grid.y[j],
    );
}

#[test]
fn free_gaussian_stays_centered() {
    init_logger();
    let wp = Wavepacket::new((0.0, 0.0), (0.5, 0.5), (0.0, 0.0));
    let mut prop = Propagator::new(&config(32, 0.01, wp)).unwrap();
    let (sx0, _) = prop.spread();
    prop.run(100).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-6);
    assert_peak_near(&prop, 0.0, 0.0);
    let (x, y) = prop.centroid();
    assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
    let (sx, sy) = prop.spread();
    assert!(sx > sx0);
    assert_abs_diff_eq!(sx, sy, epsilon = 1e-9);
}

#[test]
fn free_gaussian_translates() {
    init_logger();
    let wp = Wavepacket::new((-2.0, 0.0), (0.3, 0.3), (10.0, 0.0));
    let mut prop = Propagator::new(&config(128, 0.001, wp)).unwrap();
    prop.run(200).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-6);
    assert_peak_near(&prop, 0.0, 0.0);
}

#[test]
fn narrow_barrier_scatters() {
    init_logger();
    let wp = Wavepacket::new((-1.0, 0.0), (0.2, 0.2), (5.0, 0.0));
    let free = config(128, 0.001, wp);
    let barrier = free.clone()
        .with_potential("SquareBarrier", &[20.0, 0.2, 0.0, 0.0]);

    let mut prop = Propagator::new(&free).unwrap();
    prop.run(300).unwrap();
    let free_transmitted = prop.probability_in_region(0.2.., ..);

    let mut prop = Propagator::new(&barrier).unwrap();
    assert_eq!(prop.potential_map()[(64, 64)], 20.0);
    prop.run(300).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-4);
    let transmitted = prop.probability_in_region(0.2.., ..);
    assert!(
        transmitted > 0.01 && transmitted < free_transmitted,
        "transmitted {transmitted}, free {free_transmitted}"
    );
}

#[test]
fn wide_barrier_reflects() {
    init_logger();
    let wp = Wavepacket::new((-5.0, 0.0), (0.5, 0.5), (10.0, 0.0));
    let free = config(128, 0.002, wp);
    let blocked = free.clone()
        .with_potential("SquareBarrier", &[200.0, 4.0, 0.0, 0.0]);

    let mut prop = Propagator::new(&free).unwrap();
    prop.run(300).unwrap();
    assert!(prop.probability_in_region(0.0.., ..) > 0.5);

    let mut prop = Propagator::new(&blocked).unwrap();
    prop.run(300).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-4);
    assert!(prop.probability_in_region(0.0.., ..) < 0.1);
    assert!(prop.centroid().0 < -2.0);
}

#[test]
fn harmonic_norm() {
    init_logger();
    let wp = Wavepacket::new((0.5, 0.0), (0.5, 0.5), (0.0, 0.0));
    let config = config(64, 0.001, wp)
        .with_potential("HarmonicOscillator", &[1.0]);
    let mut prop = Propagator::new(&config).unwrap();
    prop.run(500).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-5);
}

#[test]
fn harmonic_period() {
    init_logger();
    let wp = Wavepacket::new((0.5, 0.0), (0.5, 0.5), (0.0, 0.0));
    let config = config(64, 0.01, wp)
        .with_potential("HarmonicOscillator", &[1.0]);
    let mut prop = Propagator::new(&config).unwrap();

    // times at which ⟨x⟩ changes sign, by linear interpolation
    let crossings: Arc<Mutex<Vec<f64>>> = Arc::default();
    let last: Arc<Mutex<(f64, f64)>> = Arc::new(Mutex::new((0.0, 0.5)));
    let (c, l) = (Arc::clone(&crossings), Arc::clone(&last));
    prop.register_step_observer(move |p: &Propagator| {
        let (t, x) = (p.current_time(), p.centroid().0);
        let mut last = l.lock().unwrap();
        let (t0, x0) = *last;
        if x0.signum() != x.signum() {
            c.lock().unwrap().push(t0 + (t - t0) * x0 / (x0 - x));
        }
        *last = (t, x);
    });
    prop.run(700).unwrap();

    let crossings = crossings.lock().unwrap();
    assert!(crossings.len() >= 2, "found crossings {crossings:?}");
    let period = 2.0 * (crossings[1] - crossings[0]);
    assert!(
        (period - TAU).abs() < 0.05 * TAU,
        "period {period} differs from 2π"
    );
    assert_abs_diff_eq!(crossings[0], TAU / 4.0, epsilon = 0.05 * TAU);
}

#[test]
fn harmonic_energy_conserved() {
    init_logger();
    let wp = Wavepacket::new((0.5, 0.0), (0.5, 0.5), (0.0, 0.0));
    let config = config(64, 0.005, wp)
        .with_potential("HarmonicOscillator", &[1.0]);
    let mut prop = Propagator::new(&config).unwrap();
    let e0 = prop.total_energy().unwrap();
    // ⟨K⟩ = 1/(4σx²) + 1/(4σy²); ⟨V⟩ = (x0² + σx²/2 + σy²/2) / 2
    assert_abs_diff_eq!(e0, 2.25, epsilon = 1e-6);
    for _ in 0..4 {
        prop.run(100).unwrap();
        assert_abs_diff_eq!(prop.total_energy().unwrap(), e0, epsilon = 1e-3);
    }
}

#[test]
fn norm_conserved_free_space() {
    init_logger();
    for &n in [32_usize, 64, 128].iter() {
        let wp = Wavepacket::new((1.0, -2.0), (1.5, 2.0), (1.0, -1.0));
        let mut prop = Propagator::new(&config(n, 0.01, wp)).unwrap();
        prop.run(100).unwrap();
        assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn norm_conserved_stationary_potentials() {
    init_logger();
    let wp = Wavepacket::new((-2.0, 0.5), (0.8, 0.8), (4.0, 1.0));
    let barrier = config(64, 0.005, wp)
        .with_potential("SquareBarrier", &[20.0, 1.0, 0.0, 0.0]);
    let mut prop = Propagator::new(&barrier).unwrap();
    prop.run(1000).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-4);

    let oscillator = config(64, 0.005, wp)
        .with_potential("HarmonicOscillator", &[5.0]);
    let mut prop = Propagator::new(&oscillator).unwrap();
    prop.run(1000).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-5);
}

#[test]
fn large_dt_is_unitary() {
    init_logger();
    let wp = Wavepacket::new((1.0, 1.0), (1.0, 1.0), (3.0, 0.0));
    let config = config(32, 0.5, wp)
        .with_potential("HarmonicOscillator", &[5.0]);
    let mut prop = Propagator::new(&config).unwrap();
    prop.run(20).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-10);
    assert!(prop.probability_density().iter().all(|p| p.is_finite()));
}

#[test]
fn reset_is_idempotent() {
    init_logger();
    let wp = Wavepacket::new((-1.0, 0.5), (0.7, 0.9), (3.0, -2.0));
    let config = config(64, 0.01, wp)
        .with_potential("SquareBarrier", &[10.0, 1.0, 0.5, 0.0]);
    let fresh = Propagator::new(&config).unwrap();
    let mut prop = Propagator::new(&config).unwrap();
    prop.run(25).unwrap();
    assert!(l2_diff(prop.wavefunction(), fresh.wavefunction()) > 1e-3);
    prop.reset().unwrap();
    assert_eq!(prop.current_time(), 0.0);
    assert_eq!(prop.steps(), 0);
    assert!(l2_diff(prop.wavefunction(), fresh.wavefunction()) < 1e-12);
}

#[test]
fn fft_round_trip_on_field() {
    let wp = Wavepacket::new((0.5, -0.5), (0.8, 0.6), (2.0, 3.0));
    let config = config(32, 0.001, wp)
        .with_potential("HarmonicOscillator", &[1.0]);
    let prop = Propagator::new(&config).unwrap();
    let psi0 = prop.wavefunction().as_array().to_owned();
    let mut psi = psi0.clone();
    let mut engine = FftEngine::new(32, 32).unwrap();
    engine.forward(&mut psi).unwrap();
    engine.inverse(&mut psi).unwrap();
    psi.mapv_inplace(|z| z / 1024.0);
    let err = nd::Zip::from(&psi).and(&psi0)
        .fold(0.0_f64, |acc, z, z0| acc + (z - z0).norm_sqr())
        .sqrt();
    assert!(err < 1e-10, "round trip error {err}");
}

#[test]
fn zero_grid_is_rejected() {
    let wp = Wavepacket::default();
    let config = SimConfig::new(0, 32, 0.001).with_wavepacket(wp);
    assert!(matches!(
        Propagator::new(&config),
        Err(SimError::InvalidGrid { nx: 0, ny: 32 })
    ));
}

#[test]
fn reconfigure_reshapes() {
    init_logger();
    let wp = Wavepacket::new((0.0, 0.0), (1.0, 1.0), (1.0, 0.0));
    let mut prop = Propagator::new(&config(32, 0.01, wp)).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    prop.register_step_observer(move |_: &Propagator| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    prop.run(5).unwrap();

    let wp = Wavepacket::new((2.0, -1.0), (0.8, 0.8), (0.0, 0.0));
    let new = config(64, 0.005, wp)
        .with_potential("HarmonicOscillator", &[])
        .with_omega(2.0);
    prop.update_config(&new).unwrap();
    assert_eq!(prop.grid().shape(), (64, 64));
    assert_eq!(prop.wavefunction().shape(), (64, 64));
    assert_eq!(prop.current_time(), 0.0);
    assert_eq!(prop.dt(), 0.005);
    assert_eq!(prop.potential(), &Potential::HarmonicOscillator { omega: 2.0 });
    assert_eq!(prop.wavepacket(), &wp);
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-12);
    let (x, y) = prop.centroid();
    assert_abs_diff_eq!(x, 2.0, epsilon = 1e-8);
    assert_abs_diff_eq!(y, -1.0, epsilon = 1e-8);

    prop.run(5).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-10);
}

#[test]
fn failed_reconfigure_keeps_state() {
    init_logger();
    let wp = Wavepacket::new((0.0, 0.0), (1.0, 1.0), (1.0, 0.0));
    let original = config(32, 0.01, wp)
        .with_potential("SquareBarrier", &[5.0, 1.0, 2.0, 0.0]);
    let mut prop = Propagator::new(&original).unwrap();
    prop.run(5).unwrap();
    let psi = prop.wavefunction().clone();
    let t = prop.current_time();

    let check_unchanged = |prop: &Propagator| {
        assert_eq!(prop.wavefunction(), &psi);
        assert_eq!(prop.current_time(), t);
        assert_eq!(prop.steps(), 5);
        assert_eq!(prop.dt(), 0.01);
        assert_eq!(prop.grid().shape(), (32, 32));
        assert_eq!(prop.potential().type_name(), "SquareBarrier");
    };

    let bad_dt = SimConfig { dt: -1.0, ..original.clone() }
        .with_potential("FreeSpace", &[]);
    match prop.update_config(&bad_dt) {
        Err(SimError::Reconfigure(err)) => {
            assert!(matches!(*err, SimError::InvalidDt(_)))
        },
        other => panic!("expected a reconfiguration error, got {other:?}"),
    }
    check_unchanged(&prop);

    let bad_grid = SimConfig { nx: 0, ..original.clone() };
    match prop.update_config(&bad_grid) {
        Err(SimError::Reconfigure(err)) => {
            assert!(matches!(*err, SimError::InvalidGrid { .. }))
        },
        other => panic!("expected a reconfiguration error, got {other:?}"),
    }
    check_unchanged(&prop);

    let flat = Wavepacket::new((0.0, 0.0), (0.0, 1.0), (0.0, 0.0));
    let bad_packet = config(64, 0.02, flat);
    match prop.update_config(&bad_packet) {
        Err(SimError::Reconfigure(err)) => {
            assert!(matches!(*err, SimError::DegenerateNorm(_)))
        },
        other => panic!("expected a reconfiguration error, got {other:?}"),
    }
    check_unchanged(&prop);

    prop.run(1).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-10);
}

#[test]
fn panicking_observer_is_isolated() {
    init_logger();
    let mut prop = Propagator::new(
        &config(16, 0.01, Wavepacket::default())).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    prop.register_step_observer(|_: &Propagator| panic!("observer failure"));
    let counter = Arc::clone(&calls);
    prop.register_step_observer(move |_: &Propagator| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    prop.run(3).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(prop.steps(), 3);
    assert_eq!(prop.num_observers(), 2);
}

#[test]
fn swap_potential_mid_run() {
    init_logger();
    let wp = Wavepacket::new((1.0, 0.0), (0.7, 0.7), (0.0, 0.0));
    let mut prop = Propagator::new(&config(64, 0.01, wp)).unwrap();
    prop.run(10).unwrap();
    let t = prop.current_time();
    prop.set_potential(Potential::harmonic_oscillator(1.0));
    assert_eq!(prop.current_time(), t);
    prop.run(10).unwrap();
    assert_abs_diff_eq!(prop.total_probability(), 1.0, epsilon = 1e-10);
    // pulled back toward the origin
    assert!(prop.centroid().0 < 1.0 - 1e-3);
}

#[test]
fn density_snapshot() {
    let wp = Wavepacket::new((0.0, 0.0), (1.0, 1.0), (0.0, 0.0));
    let config = SimConfig::new(32, 16, 0.01).with_wavepacket(wp);
    let prop = Propagator::new(&config).unwrap();
    let rho = prop.probability_density();
    assert_eq!(rho.len(), 32 * 16);
    let grid = prop.grid();
    let total: f64 = rho.iter().map(|p| *p as f64).sum::<f64>() * grid.cell_area();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-5);
    let psi = prop.wavefunction()[(16, 8)];
    assert_eq!(rho[16 * 16 + 8], psi.norm_sqr() as f32);
    assert_eq!(psi, C64::new(psi.re, 0.0));
}
