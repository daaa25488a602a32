//! In-place two-dimensional complex FFTs composed from one-dimensional
//! [`rustfft`] plans.
//!
//! An [`FftEngine`] is planned once for a fixed `nx × ny` shape and then
//! executed any number of times without allocating. The `y` axis is contiguous
//! in memory and is transformed row by row directly in the caller's buffer;
//! the `x` axis is transformed through an owned transposition buffer.
//!
//! Following the usual convention, [`FftEngine::inverse`] is un-normalized:
//! `inverse(forward(ψ)) == nx * ny * ψ`.

use std::sync::Arc;
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use rustfft::{ Fft, FftPlanner };
use crate::{ Arr2, error::FftError };

/// Planned forward and inverse 2D transforms for one array shape.
pub struct FftEngine {
    nx: usize,
    ny: usize,
    forward_x: Arc<dyn Fft<f64>>,
    inverse_x: Arc<dyn Fft<f64>>,
    forward_y: Arc<dyn Fft<f64>>,
    inverse_y: Arc<dyn Fft<f64>>,
    scratch: Vec<C64>,
    transposed: nd::Array2<C64>,
}

impl std::fmt::Debug for FftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftEngine")
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction { Forward, Inverse }

impl FftEngine {
    /// Plan transforms for arrays of shape `nx × ny`.
    ///
    /// Fails with [`FftError::Plan`] if either dimension is zero or the
    /// total size overflows.
    pub fn new(nx: usize, ny: usize) -> Result<Self, FftError> {
        FftError::check_plan(nx, ny)?;
        let mut planner = FftPlanner::<f64>::new();
        let forward_x = planner.plan_fft_forward(nx);
        let inverse_x = planner.plan_fft_inverse(nx);
        let forward_y = planner.plan_fft_forward(ny);
        let inverse_y = planner.plan_fft_inverse(ny);
        let scratch_len
            = [&forward_x, &inverse_x, &forward_y, &inverse_y].into_iter()
            .map(|plan| plan.get_inplace_scratch_len())
            .max()
            .unwrap_or(0);
        log::debug!("planned {nx} × {ny} fft (scratch length {scratch_len})");
        Ok(Self {
            nx,
            ny,
            forward_x,
            inverse_x,
            forward_y,
            inverse_y,
            scratch: vec![C64::zero(); scratch_len],
            transposed: nd::Array2::zeros((ny, nx)),
        })
    }

    /// Return the shape `(nx, ny)` the engine was planned for.
    pub fn shape(&self) -> (usize, usize) { (self.nx, self.ny) }

    /// Apply the forward transform in place.
    ///
    /// Fails if `psi` does not have the planned shape or is not contiguous in
    /// standard (row-major) order; `psi` is not modified in that case.
    pub fn forward<S>(&mut self, psi: &mut Arr2<S>) -> Result<(), FftError>
    where S: nd::DataMut<Elem = C64>
    {
        self.execute(psi, Direction::Forward)
    }

    /// Apply the un-normalized inverse transform in place.
    ///
    /// Fails if `psi` does not have the planned shape or is not contiguous in
    /// standard (row-major) order; `psi` is not modified in that case.
    pub fn inverse<S>(&mut self, psi: &mut Arr2<S>) -> Result<(), FftError>
    where S: nd::DataMut<Elem = C64>
    {
        self.execute(psi, Direction::Inverse)
    }

    /// Return the forward transform of a copy of `psi`, leaving both `psi`
    /// and the engine's working buffers untouched.
    ///
    /// Unlike [`Self::forward`], this allocates and accepts any memory
    /// layout.
    pub fn spectrum<S>(&self, psi: &Arr2<S>)
        -> Result<nd::Array2<C64>, FftError>
    where S: nd::Data<Elem = C64>
    {
        FftError::check_shape(self.shape(), psi.dim())?;
        let mut rows = psi.as_standard_layout().into_owned();
        self.forward_y.process(rows.as_slice_mut().ok_or(FftError::Layout)?);
        let mut cols = rows.t().as_standard_layout().into_owned();
        self.forward_x.process(cols.as_slice_mut().ok_or(FftError::Layout)?);
        Ok(cols.t().as_standard_layout().into_owned())
    }

    fn execute<S>(&mut self, psi: &mut Arr2<S>, dir: Direction)
        -> Result<(), FftError>
    where S: nd::DataMut<Elem = C64>
    {
        FftError::check_shape(self.shape(), psi.dim())?;
        let (plan_x, plan_y) = match dir {
            Direction::Forward => (&self.forward_x, &self.forward_y),
            Direction::Inverse => (&self.inverse_x, &self.inverse_y),
        };

        // rows: contiguous along y
        let data = psi.as_slice_mut().ok_or(FftError::Layout)?;
        plan_y.process_with_scratch(data, &mut self.scratch);

        // columns: transpose so that x is contiguous, then transpose back
        self.transposed.assign(&psi.t());
        let data = self.transposed.as_slice_mut().ok_or(FftError::Layout)?;
        plan_x.process_with_scratch(data, &mut self.scratch);
        psi.assign(&self.transposed.t());
        Ok(())
    }
}
