//! Symmetric split-step Fourier propagation of the 2D TDSE.
//!
//! With ħ = m = 1 and *H* = *K* + *V*, one step of length *dt* applies the
//! Strang splitting
//! ```text
//! exp(-i H dt) ≈ exp(-i V dt/2) exp(-i K dt) exp(-i V dt/2)
//! ```
//! where the potential factors are diagonal in position space and the kinetic
//! factor is diagonal in momentum space. Each factor is a pure phase, so every
//! step is unitary regardless of `dt`. See [`crate::docs`] for background.

use std::ops::RangeBounds;
use ndarray as nd;
use num_complex::Complex64 as C64;
use log::{ debug, info, warn };
use crate::{
    Arr2,
    config::{ SimConfig, Wavepacket },
    error::{ SimError, SimResult },
    fft::FftEngine,
    grid::Grid,
    observe::Observers,
    potential::Potential,
    wavefunction::{ Wavefunction, sum_norm_sqr },
};

// multiply by exp(-i V dt) in position space
fn apply_split_potential<S>(
    potential: &Potential,
    grid: &Grid,
    psi: &mut Arr2<S>,
    dt: f64,
)
where S: nd::DataMut<Elem = C64>
{
    if potential.is_free() { return; }
    nd::Zip::indexed(psi)
        .par_for_each(|(i, j), psi_ij| {
            let v = potential.evaluate(grid.x[i], grid.y[j]);
            *psi_ij *= C64::cis(-v * dt);
        });
}

// multiply by exp(-i (kx² + ky²)/2 dt) in momentum space
fn apply_split_kinetic<S>(grid: &Grid, psi: &mut Arr2<S>, dt: f64)
where S: nd::DataMut<Elem = C64>
{
    nd::Zip::indexed(psi)
        .par_for_each(|(i, j), psi_ij| {
            let k2 = grid.kx[i].powi(2) + grid.ky[j].powi(2);
            *psi_ij *= C64::cis(-0.5 * k2 * dt);
        });
}

/// Owns a wavefunction together with everything needed to advance it in
/// time: grid, potential, FFT plans, and step observers.
#[derive(Debug)]
pub struct Propagator {
    grid: Grid,
    dt: f64,
    time: f64,
    steps: usize,
    potential: Potential,
    wavepacket: Wavepacket,
    wf: Wavefunction,
    fft: FftEngine,
    observers: Observers,
    // survives the swap in `notify`
    num_observers: usize,
}

impl Propagator {
    /// Build a propagator and initialize the wavefunction to the configured
    /// Gaussian wavepacket at `t = 0`.
    ///
    /// Fails with [`SimError::InvalidDt`], [`SimError::InvalidGrid`],
    /// [`SimError::InvalidExtent`], [`SimError::Fft`] if the transforms
    /// cannot be planned, or [`SimError::DegenerateNorm`] if the wavepacket
    /// vanishes on the grid.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        SimError::check_dt(config.dt)?;
        let grid = Grid::new(config.nx, config.ny, config.lx, config.ly)?;
        // plan before the field is populated
        let fft = FftEngine::new(grid.nx, grid.ny)?;
        let mut wf = Wavefunction::new(grid.nx, grid.ny)?;
        let potential = Potential::from_config(config);
        wf.init_gaussian(&config.wavepacket, &grid)?;
        info!(
            "propagator ready: {} × {} grid over {} × {}, dt = {}, {}",
            grid.nx, grid.ny, grid.lx, grid.ly, config.dt,
            potential.type_name(),
        );
        Ok(Self {
            grid,
            dt: config.dt,
            time: 0.0,
            steps: 0,
            potential,
            wavepacket: config.wavepacket,
            wf,
            fft,
            observers: Observers::default(),
            num_observers: 0,
        })
    }

    /// Advance the wavefunction by one time step, then notify observers.
    ///
    /// An error here leaves the field in an unspecified state; the caller
    /// should stop stepping and [reset][Self::reset] or
    /// [reconfigure][Self::update_config].
    pub fn step(&mut self) -> SimResult<()> {
        let half_dt = 0.5 * self.dt;
        let scale = (self.grid.len() as f64).recip();
        let psi = self.wf.as_array_mut();
        apply_split_potential(&self.potential, &self.grid, psi, half_dt);
        self.fft.forward(psi)?;
        apply_split_kinetic(&self.grid, psi, self.dt);
        self.fft.inverse(psi)?;
        psi.par_mapv_inplace(|z| z * scale);
        apply_split_potential(&self.potential, &self.grid, psi, half_dt);
        self.time += self.dt;
        self.steps += 1;
        self.notify();
        Ok(())
    }

    /// Take `n` steps, stopping at the first error.
    pub fn run(&mut self, n: usize) -> SimResult<()> {
        (0..n).try_for_each(|_| self.step())
    }

    fn notify(&mut self) {
        if self.observers.is_empty() { return; }
        let mut observers = std::mem::take(&mut self.observers);
        observers.notify(self);
        self.observers = observers;
    }

    /// Reinitialize the wavefunction to the stored wavepacket and set
    /// `t = 0`. FFT plans and buffers are kept.
    ///
    /// On [`SimError::DegenerateNorm`] neither the field nor the time is
    /// changed.
    pub fn reset(&mut self) -> SimResult<()> {
        self.wf.init_gaussian(&self.wavepacket, &self.grid)?;
        self.time = 0.0;
        self.steps = 0;
        debug!("reset to t = 0");
        Ok(())
    }

    /// Install a new configuration and reinitialize the wavefunction at
    /// `t = 0`.
    ///
    /// Either the whole configuration is installed or none of it is: on
    /// failure the propagator is left exactly as it was and the cause is
    /// returned wrapped in [`SimError::Reconfigure`]. FFT plans and the field
    /// buffer are rebuilt only if the grid shape changes. Registered
    /// observers are kept.
    pub fn update_config(&mut self, config: &SimConfig) -> SimResult<()> {
        self.reconfigure(config)
            .map_err(|err| {
                warn!("rejected reconfiguration: {err}");
                SimError::Reconfigure(Box::new(err))
            })
    }

    fn reconfigure(&mut self, config: &SimConfig) -> SimResult<()> {
        // everything fallible happens before anything is installed
        SimError::check_dt(config.dt)?;
        let grid = Grid::new(config.nx, config.ny, config.lx, config.ly)?;
        let reshape = grid.shape() != self.grid.shape();
        let fft
            = if reshape {
                Some(FftEngine::new(grid.nx, grid.ny)?)
            } else {
                None
            };
        let mut wf = Wavefunction::new(grid.nx, grid.ny)?;
        wf.init_gaussian(&config.wavepacket, &grid)?;
        let potential = Potential::from_config(config);

        if let Some(fft) = fft {
            // old plans go before the old field
            drop(std::mem::replace(&mut self.fft, fft));
            self.wf = wf;
        } else {
            self.wf.as_array_mut().assign(&wf.as_array());
        }
        self.grid = grid;
        self.dt = config.dt;
        self.potential = potential;
        self.wavepacket = config.wavepacket;
        self.time = 0.0;
        self.steps = 0;
        debug!(
            "reconfigured: {} × {} grid, dt = {}, {}{}",
            self.grid.nx, self.grid.ny, self.dt, self.potential.type_name(),
            if reshape { " (replanned)" } else { "" },
        );
        Ok(())
    }

    /// Replace the potential. The wavefunction, time, and FFT plans are
    /// untouched.
    pub fn set_potential(&mut self, potential: Potential) {
        debug!(
            "potential {} -> {} at t = {}",
            self.potential.type_name(), potential.type_name(), self.time,
        );
        self.potential = potential;
    }

    /// Append an observer to be called after every completed step, after
    /// all previously registered observers.
    pub fn register_step_observer<F>(&mut self, observer: F)
    where F: FnMut(&Propagator) + Send + 'static
    {
        self.observers.push(observer);
        self.num_observers += 1;
    }

    /// Return the number of registered step observers. The count is also
    /// correct when queried from inside an observer.
    pub fn num_observers(&self) -> usize { self.num_observers }

    /// Return the current simulation time.
    pub fn current_time(&self) -> f64 { self.time }

    /// Return the number of steps taken since construction or the last
    /// reset.
    pub fn steps(&self) -> usize { self.steps }

    /// Return the time step.
    pub fn dt(&self) -> f64 { self.dt }

    pub fn grid(&self) -> &Grid { &self.grid }

    pub fn potential(&self) -> &Potential { &self.potential }

    pub fn wavepacket(&self) -> &Wavepacket { &self.wavepacket }

    pub fn wavefunction(&self) -> &Wavefunction { &self.wf }

    /// Compute `Σ |ψ|² dx dy`.
    pub fn total_probability(&self) -> f64 {
        self.wf.total_probability(&self.grid)
    }

    /// Return a snapshot of `|ψ|²`; see
    /// [`Wavefunction::probability_density`].
    pub fn probability_density(&self) -> Vec<f32> {
        self.wf.probability_density()
    }

    /// Return `(⟨x⟩, ⟨y⟩)`.
    pub fn centroid(&self) -> (f64, f64) { self.wf.centroid(&self.grid) }

    /// Return `(Δx, Δy)`.
    pub fn spread(&self) -> (f64, f64) { self.wf.spread(&self.grid) }

    /// Return the probability of finding the particle in a rectangle.
    pub fn probability_in_region<X, Y>(&self, xs: X, ys: Y) -> f64
    where
        X: RangeBounds<f64>,
        Y: RangeBounds<f64>,
    {
        self.wf.probability_in_region(&self.grid, xs, ys)
    }

    /// Compute the energy expectation value `⟨ψ|H|ψ⟩ / ⟨ψ|ψ⟩`.
    ///
    /// The kinetic part is evaluated in momentum space from a transformed
    /// copy of the field, so the propagator's own buffers are not touched.
    pub fn total_energy(&self) -> SimResult<f64> {
        let psi = self.wf.as_array();
        let phi = self.fft.spectrum(&psi)?;
        let (kin, phi_norm) = phi.indexed_iter()
            .fold((0.0, 0.0), |(kin, norm), ((i, j), phi_ij)| {
                let p = phi_ij.norm_sqr();
                let k2 = self.grid.kx[i].powi(2) + self.grid.ky[j].powi(2);
                (kin + 0.5 * k2 * p, norm + p)
            });
        let pot
            = if self.potential.is_free() {
                0.0
            } else {
                psi.indexed_iter()
                    .map(|((i, j), psi_ij)| {
                        self.potential.evaluate(self.grid.x[i], self.grid.y[j])
                            * psi_ij.norm_sqr()
                    })
                    .sum::<f64>()
            };
        let psi_norm = sum_norm_sqr(&psi);
        SimError::check_norm(psi_norm)?;
        Ok(kin / phi_norm + pot / psi_norm)
    }

    /// Tabulate the current potential over the grid.
    pub fn potential_map(&self) -> nd::Array2<f64> {
        self.potential.sample(&self.grid)
    }
}
