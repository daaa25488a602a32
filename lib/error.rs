//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Returned by the [FFT engine][crate::fft::FftEngine].
#[derive(Debug, Error)]
pub enum FftError {
    /// Returned when transforms cannot be planned for the requested shape.
    #[error("cannot plan a {0} × {1} transform")]
    Plan(usize, usize),

    /// Returned when a buffer's shape differs from the one the plans were
    /// built for.
    #[error("plans are bound to shape {expected:?}; got a buffer of shape {got:?}")]
    Shape { expected: (usize, usize), got: (usize, usize) },

    /// Returned when a buffer is not contiguous in row-major order.
    #[error("transform buffers must be contiguous and row-major")]
    Layout,
}

impl FftError {
    pub(crate) fn check_plan(nx: usize, ny: usize) -> Result<(), Self> {
        (nx > 0 && ny > 0 && nx.checked_mul(ny).is_some())
            .then_some(())
            .ok_or(Self::Plan(nx, ny))
    }

    pub(crate) fn check_shape(expected: (usize, usize), got: (usize, usize))
        -> Result<(), Self>
    {
        (expected == got).then_some(()).ok_or(Self::Shape { expected, got })
    }
}

/// Returned from field, propagator, and configuration operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Returned when a grid dimension is zero or the total sample count
    /// overflows.
    #[error("grid dimensions must be positive; got {nx} × {ny}")]
    InvalidGrid { nx: usize, ny: usize },

    /// Returned when a domain extent is non-positive or non-finite.
    #[error("domain extents must be positive and finite; got {lx} × {ly}")]
    InvalidExtent { lx: f64, ly: f64 },

    /// Returned when a time step is non-positive or non-finite.
    #[error("time step must be positive and finite; got {0}")]
    InvalidDt(f64),

    /// Returned when normalization meets a total probability that is zero,
    /// negative, or not a number.
    #[error("cannot normalize a field with total probability {0}")]
    DegenerateNorm(f64),

    /// [`FftError`]
    #[error("fft error: {0}")]
    Fft(#[from] FftError),

    /// Returned from
    /// [`Propagator::update_config`][crate::propagator::Propagator::update_config]
    /// when the new configuration could not be installed. The previous
    /// configuration remains in effect.
    #[error("reconfiguration failed; previous configuration retained: {0}")]
    Reconfigure(Box<SimError>),
}

impl SimError {
    pub(crate) fn check_grid(nx: usize, ny: usize) -> Result<(), Self> {
        (nx > 0 && ny > 0 && nx.checked_mul(ny).is_some())
            .then_some(())
            .ok_or(Self::InvalidGrid { nx, ny })
    }

    pub(crate) fn check_extent(lx: f64, ly: f64) -> Result<(), Self> {
        (lx.is_finite() && ly.is_finite() && lx > 0.0 && ly > 0.0)
            .then_some(())
            .ok_or(Self::InvalidExtent { lx, ly })
    }

    pub(crate) fn check_dt(dt: f64) -> Result<(), Self> {
        (dt.is_finite() && dt > 0.0).then_some(()).ok_or(Self::InvalidDt(dt))
    }

    pub(crate) fn check_norm(norm: f64) -> Result<(), Self> {
        (norm.is_finite() && norm > 0.0)
            .then_some(())
            .ok_or(Self::DegenerateNorm(norm))
    }
}

