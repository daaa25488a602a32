//! The complex scalar field ψ sampled on a [`Grid`].
//!
//! Samples are stored in a row-major `nx × ny` array, so that sample `(i, j)`
//! sits at linear offset `i * ny + j` and the `y` axis is contiguous. The
//! buffer is allocated once at construction and only ever written in place.

use std::ops::{ Index, IndexMut, RangeBounds };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    config::Wavepacket,
    error::{ SimError, SimResult },
    grid::Grid,
};

/// Complex field on a rectangular grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Wavefunction {
    psi: nd::Array2<C64>,
}

impl Index<(usize, usize)> for Wavefunction {
    type Output = C64;

    fn index(&self, ij: (usize, usize)) -> &C64 { &self.psi[ij] }
}

impl IndexMut<(usize, usize)> for Wavefunction {
    fn index_mut(&mut self, ij: (usize, usize)) -> &mut C64 {
        &mut self.psi[ij]
    }
}

impl Wavefunction {
    /// Allocate a zero-valued field of shape `nx × ny`.
    pub fn new(nx: usize, ny: usize) -> SimResult<Self> {
        SimError::check_grid(nx, ny)?;
        Ok(Self { psi: nd::Array2::zeros((nx, ny)) })
    }

    /// Return the number of samples along `x`.
    pub fn nx(&self) -> usize { self.psi.nrows() }

    /// Return the number of samples along `y`.
    pub fn ny(&self) -> usize { self.psi.ncols() }

    /// Return `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) { self.psi.dim() }

    /// Return a read-only view of the samples.
    pub fn as_array(&self) -> nd::ArrayView2<'_, C64> { self.psi.view() }

    pub(crate) fn as_array_mut(&mut self) -> &mut nd::Array2<C64> {
        &mut self.psi
    }

    /// Overwrite the field with a normalized Gaussian wavepacket,
    ///
    /// ```text
    /// ψ(x, y) = exp(-((x - x0)²/σx² + (y - y0)²/σy²) / 2) exp(i (kx x + ky y))
    /// ```
    ///
    /// followed by [normalization][Self::normalize]. Values are built in a
    /// scratch array first so that the field is left untouched if the
    /// wavepacket is degenerate (e.g. a zero width).
    ///
    /// *Panics if `grid` does not have the same shape as `self`*.
    pub fn init_gaussian(&mut self, wavepacket: &Wavepacket, grid: &Grid)
        -> SimResult<()>
    {
        let Wavepacket { x0, y0, sigma_x, sigma_y, kx, ky } = *wavepacket;
        let mut scratch: nd::Array2<C64> = nd::Array2::zeros(self.shape());
        nd::Zip::indexed(&mut scratch)
            .par_for_each(|(i, j), psi| {
                let (x, y) = (grid.x[i], grid.y[j]);
                let envelope = (
                    -0.5 * (
                        (x - x0).powi(2) / sigma_x.powi(2)
                        + (y - y0).powi(2) / sigma_y.powi(2)
                    )
                ).exp();
                *psi = envelope * C64::cis(kx * x + ky * y);
            });
        let norm = sum_norm_sqr(&scratch) * grid.cell_area();
        SimError::check_norm(norm)?;
        let scale = norm.sqrt().recip();
        scratch.par_mapv_inplace(|psi| psi * scale);
        self.psi.assign(&scratch);
        Ok(())
    }

    /// Rescale the field to unit [total probability][Self::total_probability].
    ///
    /// Fails with [`SimError::DegenerateNorm`], leaving the field untouched,
    /// if the total probability is zero or not finite.
    pub fn normalize(&mut self, grid: &Grid) -> SimResult<()> {
        let norm = self.total_probability(grid);
        SimError::check_norm(norm)?;
        let scale = norm.sqrt().recip();
        self.psi.par_mapv_inplace(|psi| psi * scale);
        Ok(())
    }

    /// Compute `Σ |ψ|² dx dy`.
    pub fn total_probability(&self, grid: &Grid) -> f64 {
        sum_norm_sqr(&self.psi) * grid.cell_area()
    }

    /// Return a newly allocated snapshot of `|ψ|²` in single precision, laid
    /// out row-major like the field itself (entry `i * ny + j`).
    ///
    /// Consumers that display in `y`-major order must transpose.
    pub fn probability_density(&self) -> Vec<f32> {
        self.psi.iter().map(|psi| psi.norm_sqr() as f32).collect()
    }

    /// Compute the probability-weighted mean position `(⟨x⟩, ⟨y⟩)`.
    ///
    /// The field need not be normalized. Returns `NaN`s for a zero field.
    pub fn centroid(&self, grid: &Grid) -> (f64, f64) {
        let (w, wx, wy) = self.psi.indexed_iter()
            .fold((0.0, 0.0, 0.0), |(w, wx, wy), ((i, j), psi)| {
                let p = psi.norm_sqr();
                (w + p, wx + p * grid.x[i], wy + p * grid.y[j])
            });
        (wx / w, wy / w)
    }

    /// Compute the standard deviations `(Δx, Δy)` of `|ψ|²`.
    ///
    /// Returns `NaN`s for a zero field.
    pub fn spread(&self, grid: &Grid) -> (f64, f64) {
        let (x0, y0) = self.centroid(grid);
        let (w, wxx, wyy) = self.psi.indexed_iter()
            .fold((0.0, 0.0, 0.0), |(w, wxx, wyy), ((i, j), psi)| {
                let p = psi.norm_sqr();
                (
                    w + p,
                    wxx + p * (grid.x[i] - x0).powi(2),
                    wyy + p * (grid.y[j] - y0).powi(2),
                )
            });
        ((wxx / w).sqrt(), (wyy / w).sqrt())
    }

    /// Compute `Σ |ψ|² dx dy` restricted to grid points with `x` in `xs` and
    /// `y` in `ys`.
    pub fn probability_in_region<X, Y>(&self, grid: &Grid, xs: X, ys: Y)
        -> f64
    where
        X: RangeBounds<f64>,
        Y: RangeBounds<f64>,
    {
        self.psi.indexed_iter()
            .filter(|((i, j), _)| {
                xs.contains(&grid.x[*i]) && ys.contains(&grid.y[*j])
            })
            .map(|(_, psi)| psi.norm_sqr())
            .sum::<f64>()
            * grid.cell_area()
    }

    /// Return the index of the sample with the largest `|ψ|²`. Ties resolve
    /// to the first in row-major order.
    pub fn peak(&self) -> (usize, usize) {
        self.psi.indexed_iter()
            .fold(((0, 0), f64::NEG_INFINITY), |(best, pmax), (ij, psi)| {
                let p = psi.norm_sqr();
                if p > pmax { (ij, p) } else { (best, pmax) }
            })
            .0
    }
}

// sequential; summation order is fixed
pub(crate) fn sum_norm_sqr<S>(psi: &crate::Arr2<S>) -> f64
where S: nd::Data<Elem = C64>
{
    psi.iter().map(|z| z.norm_sqr()).sum()
}
