//! Provides a numerical core for the two-dimensional, time-dependent
//! Schrödinger equation with a stationary potential, propagated by the
//! symmetric split-step Fourier method on a periodic rectangular grid.
//!
//! The main entry point is [`propagator::Propagator`], built from a
//! [`config::SimConfig`]:
//! ```no_run
//! use tdse2d::{ config::{ SimConfig, Wavepacket }, propagator::Propagator };
//!
//! let config = SimConfig::new(128, 128, 0.005)
//!     .with_potential("SquareBarrier", &[20.0, 0.5, 0.0, 0.0])
//!     .with_wavepacket(
//!         Wavepacket::new((-5.0, 0.0), (0.5, 0.5), (5.0, 0.0)));
//! let mut prop = Propagator::new(&config)?;
//! prop.register_step_observer(|p| {
//!     println!("t = {:.3}, P = {:.6}", p.current_time(), p.total_probability());
//! });
//! prop.run(100)?;
//! assert_eq!(prop.probability_density().len(), 128 * 128);
//! # Ok::<(), tdse2d::error::SimError>(())
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod config;
pub mod grid;
pub mod potential;
pub mod wavefunction;
pub mod fft;
pub mod observe;
pub mod propagator;

pub mod docs;

/// Default domain extent along either axis.
pub(crate) const DEF_EXTENT: f64 = 20.0;

pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
