//! Stationary, real-valued potentials.

use ndarray as nd;
use log::warn;
use crate::{ config::SimConfig, grid::Grid };

/// Smallest barrier width accepted by [`Potential::square_barrier`].
pub const MIN_WIDTH: f64 = 1e-3;

/// Smallest frequency accepted by [`Potential::harmonic_oscillator`].
pub const MIN_OMEGA: f64 = 1e-3;

/// Default barrier height used when none is given.
pub const DEF_HEIGHT: f64 = 1.0;

/// Default barrier width used when none is given.
pub const DEF_WIDTH: f64 = 1.0;

/// Default oscillator frequency used when none is given.
pub const DEF_OMEGA: f64 = 1.0;

/// A stationary potential *V*(*x*, *y*).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Potential {
    /// *V* ≡ 0.
    FreeSpace,
    /// *V* = `height` inside the `width × width` square centered on
    /// (`x_center`, `y_center`), boundary included, and zero elsewhere.
    /// Negative heights describe a well.
    SquareBarrier {
        height: f64,
        width: f64,
        x_center: f64,
        y_center: f64,
    },
    /// *V* = ½ *ω*² (*x*² + *y*²).
    HarmonicOscillator { omega: f64 },
}

impl Default for Potential {
    fn default() -> Self { Self::FreeSpace }
}

impl Potential {
    /// Create a square barrier, clamping `width` to at least [`MIN_WIDTH`].
    pub fn square_barrier(
        height: f64,
        width: f64,
        x_center: f64,
        y_center: f64,
    ) -> Self
    {
        Self::SquareBarrier {
            height,
            width: width.max(MIN_WIDTH),
            x_center,
            y_center,
        }
    }

    /// Create a harmonic oscillator, clamping `omega` to at least
    /// [`MIN_OMEGA`].
    pub fn harmonic_oscillator(omega: f64) -> Self {
        Self::HarmonicOscillator { omega: omega.max(MIN_OMEGA) }
    }

    /// Construct a potential from its name and an ordered parameter list.
    ///
    /// - `"FreeSpace"`: parameters are ignored.
    /// - `"SquareBarrier"`: `[height, width, x_center, y_center]`, defaulting
    ///   to [`DEF_HEIGHT`], [`DEF_WIDTH`], 0, and 0.
    /// - `"HarmonicOscillator"`: `[omega]`, defaulting to [`DEF_OMEGA`].
    ///
    /// Missing trailing parameters take their defaults and extra ones are
    /// ignored. Unrecognized names produce [`Potential::FreeSpace`] with a
    /// warning; this function never fails.
    pub fn from_name(name: &str, parameters: &[f64]) -> Self {
        let param = |k: usize, default: f64| -> f64 {
            parameters.get(k).copied().unwrap_or(default)
        };
        match name {
            "FreeSpace" => Self::FreeSpace,
            "SquareBarrier" => Self::square_barrier(
                param(0, DEF_HEIGHT),
                param(1, DEF_WIDTH),
                param(2, 0.0),
                param(3, 0.0),
            ),
            "HarmonicOscillator" => Self::harmonic_oscillator(
                param(0, DEF_OMEGA)),
            other => {
                warn!("unknown potential type {other:?}; using FreeSpace");
                Self::FreeSpace
            },
        }
    }

    /// Construct the potential described by a configuration.
    ///
    /// When the oscillator is requested without parameters, the
    /// configuration's `omega` mirror supplies the frequency.
    pub fn from_config(config: &SimConfig) -> Self {
        let pot = &config.potential;
        match (pot.kind.as_str(), config.omega) {
            ("HarmonicOscillator", Some(omega)) if pot.parameters.is_empty()
                => Self::harmonic_oscillator(omega),
            (name, _) => Self::from_name(name, &pot.parameters),
        }
    }

    /// Evaluate the potential at a point.
    #[inline]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match *self {
            Self::FreeSpace => 0.0,
            Self::SquareBarrier { height, width, x_center, y_center } => {
                let hw = width / 2.0;
                if (x - x_center).abs() <= hw && (y - y_center).abs() <= hw {
                    height
                } else {
                    0.0
                }
            },
            Self::HarmonicOscillator { omega } => {
                0.5 * omega * omega * (x * x + y * y)
            },
        }
    }

    /// Return the name recognized by [`Self::from_name`] for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FreeSpace => "FreeSpace",
            Self::SquareBarrier { .. } => "SquareBarrier",
            Self::HarmonicOscillator { .. } => "HarmonicOscillator",
        }
    }

    /// Return `true` if the potential vanishes identically.
    pub fn is_free(&self) -> bool { matches!(self, Self::FreeSpace) }

    /// Tabulate the potential over a grid.
    pub fn sample(&self, grid: &Grid) -> nd::Array2<f64> {
        nd::Array2::from_shape_fn(
            grid.shape(),
            |(i, j)| self.evaluate(grid.x[i], grid.y[j]),
        )
    }
}
