//! Uniform rectangular grids in position and momentum space.
//!
//! A grid of `nx × ny` samples covers the periodic domain
//! `[-lx/2, lx/2) × [-ly/2, ly/2)`. Coordinate arrays run along the first
//! (`x`) and second (`y`) array axes, matching the row-major layout of
//! [`Wavefunction`][crate::wavefunction::Wavefunction].

use std::f64::consts::TAU;
use ndarray as nd;
use crate::error::{ SimError, SimResult };

/// Generate the angular wavenumbers accompanying a FFT of `n` points over a
/// periodic domain of length `l`, in FFT order.
///
/// Index `k` holds `2π k / l` for `k <= n / 2` and `2π (k - n) / l`
/// otherwise, so the Nyquist entry of an even-length axis is positive.
pub fn k_grid(n: usize, l: f64) -> nd::Array1<f64> {
    let dk = TAU / l;
    (0..n)
        .map(|k| {
            if k <= n / 2 {
                k as f64 * dk
            } else {
                -((n - k) as f64) * dk
            }
        })
        .collect()
}

/// Generate `n` evenly spaced coordinates starting at `-l/2` with spacing
/// `l / n`.
///
/// The right endpoint `l/2` is excluded; it is identified with `-l/2` by the
/// periodic boundary.
pub fn coordinates(n: usize, l: f64) -> nd::Array1<f64> {
    let d = l / n as f64;
    (0..n).map(|i| -l / 2.0 + i as f64 * d).collect()
}

/// Sampling of a rectangular domain, with precomputed coordinate and
/// wavenumber arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Number of samples along `x`
    pub nx: usize,
    /// Number of samples along `y`
    pub ny: usize,
    /// Domain extent along `x`
    pub lx: f64,
    /// Domain extent along `y`
    pub ly: f64,
    /// Sample spacing along `x`
    pub dx: f64,
    /// Sample spacing along `y`
    pub dy: f64,
    /// Position coordinates along `x`
    pub x: nd::Array1<f64>,
    /// Position coordinates along `y`
    pub y: nd::Array1<f64>,
    /// Angular wavenumbers along `x`, in FFT order
    pub kx: nd::Array1<f64>,
    /// Angular wavenumbers along `y`, in FFT order
    pub ky: nd::Array1<f64>,
}

impl Grid {
    /// Create a new grid.
    ///
    /// Fails with [`SimError::InvalidGrid`] if either dimension is zero and
    /// [`SimError::InvalidExtent`] if either extent is non-positive or
    /// non-finite.
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> SimResult<Self> {
        SimError::check_grid(nx, ny)?;
        SimError::check_extent(lx, ly)?;
        Ok(Self {
            nx,
            ny,
            lx,
            ly,
            dx: lx / nx as f64,
            dy: ly / ny as f64,
            x: coordinates(nx, lx),
            y: coordinates(ny, ly),
            kx: k_grid(nx, lx),
            ky: k_grid(ny, ly),
        })
    }

    /// Return `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) { (self.nx, self.ny) }

    /// Return the total number of samples.
    pub fn len(&self) -> usize { self.nx * self.ny }

    /// Always `false`; grids are non-empty by construction.
    pub fn is_empty(&self) -> bool { false }

    /// Return the area element `dx * dy`.
    pub fn cell_area(&self) -> f64 { self.dx * self.dy }

    /// Return the physical coordinates of sample `(i, j)`.
    ///
    /// *Panics if either index is out of bounds*.
    pub fn point(&self, i: usize, j: usize) -> (f64, f64) {
        (self.x[i], self.y[j])
    }
}
