//! Simulation configuration.
//!
//! These structs are what the [`Propagator`][crate::propagator::Propagator]
//! consumes. They derive `serde` traits with camelCase keys so that external
//! loaders can deserialize them from any self-describing format; the core
//! itself never touches the filesystem.

use serde::{ Deserialize, Serialize };
use crate::DEF_EXTENT;

fn default_extent() -> f64 { DEF_EXTENT }

/// Parameters of an initial Gaussian wavepacket.
///
/// ```text
/// ψ(x, y) ∝ exp(-(x - x0)²/2σx² - (y - y0)²/2σy²) exp(i (kx x + ky y))
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wavepacket {
    /// Center along `x`
    pub x0: f64,
    /// Center along `y`
    pub y0: f64,
    /// Width along `x`
    pub sigma_x: f64,
    /// Width along `y`
    pub sigma_y: f64,
    /// Mean wavenumber along `x`
    pub kx: f64,
    /// Mean wavenumber along `y`
    pub ky: f64,
}

impl Default for Wavepacket {
    fn default() -> Self {
        Self { x0: 0.0, y0: 0.0, sigma_x: 1.0, sigma_y: 1.0, kx: 0.0, ky: 0.0 }
    }
}

impl Wavepacket {
    /// Create a new wavepacket description.
    pub fn new(
        center: (f64, f64),
        sigma: (f64, f64),
        k: (f64, f64),
    ) -> Self
    {
        Self {
            x0: center.0,
            y0: center.1,
            sigma_x: sigma.0,
            sigma_y: sigma.1,
            kx: k.0,
            ky: k.1,
        }
    }
}

/// Named potential with an ordered parameter list.
///
/// See [`Potential::from_name`][crate::potential::Potential::from_name] for
/// the recognized names and the meaning of each parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PotentialConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parameters: Vec<f64>,
}

impl Default for PotentialConfig {
    fn default() -> Self {
        Self { kind: "FreeSpace".into(), parameters: Vec::new() }
    }
}

/// Output settings. Carried for external collaborators; the core does not
/// act on them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub checkpoint_interval: f64,
    #[serde(default)]
    pub export_observables: bool,
}

/// Full configuration of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Number of grid points along `x`
    pub nx: usize,
    /// Number of grid points along `y`
    pub ny: usize,
    /// Time step
    pub dt: f64,
    /// Domain extent along `x`
    #[serde(default = "default_extent")]
    pub lx: f64,
    /// Domain extent along `y`
    #[serde(default = "default_extent")]
    pub ly: f64,
    #[serde(default)]
    pub potential: PotentialConfig,
    #[serde(default)]
    pub wavepacket: Wavepacket,
    /// Mirror of the harmonic oscillator frequency, used when the oscillator
    /// potential is given no parameters.
    #[serde(default)]
    pub omega: Option<f64>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimConfig {
    /// Create a free-space configuration with default extents and a unit
    /// Gaussian at the origin.
    pub fn new(nx: usize, ny: usize, dt: f64) -> Self {
        Self {
            nx,
            ny,
            dt,
            lx: DEF_EXTENT,
            ly: DEF_EXTENT,
            potential: PotentialConfig::default(),
            wavepacket: Wavepacket::default(),
            omega: None,
            output: OutputConfig::default(),
        }
    }

    /// Set the potential by name and parameters.
    pub fn with_potential<S>(mut self, kind: S, parameters: &[f64]) -> Self
    where S: Into<String>
    {
        self.potential = PotentialConfig {
            kind: kind.into(),
            parameters: parameters.to_vec(),
        };
        self
    }

    /// Set the initial wavepacket.
    pub fn with_wavepacket(mut self, wavepacket: Wavepacket) -> Self {
        self.wavepacket = wavepacket;
        self
    }

    /// Set the domain extents.
    pub fn with_extents(mut self, lx: f64, ly: f64) -> Self {
        self.lx = lx;
        self.ly = ly;
        self
    }

    /// Set the harmonic oscillator frequency mirror.
    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = Some(omega);
        self
    }
}
