//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units and discretization](#units-and-discretization)
//! - [The split-step scheme](#the-split-step-scheme)
//! - [Momentum space in two dimensions](#momentum-space-in-two-dimensions)
//! - [Conservation and accuracy](#conservation-and-accuracy)
//!
//! # Background
//! This crate evolves a single complex scalar field ψ(*x*, *y*, *t*) under the
//! two-dimensional time-dependent Schrödinger equation (TDSE),
//! ```text
//!   ∂ψ     ħ²  ∂²    ∂²
//! i -- = - -- (--- + ---) ψ + V(x, y) ψ
//!   ∂t     2m  ∂x²   ∂y²
//! ```
//! for a stationary, real potential *V*. Because *V* does not depend on time,
//! the Hamiltonian *H* = *K* + *V* is constant and the formal solution over a
//! single step is ψ(*t* + *dt*) = exp(-*i* *H* *dt* / ħ) ψ(*t*).
//!
//! # Units and discretization
//! All quantities are in natural units with ħ = *m* = 1, so that the kinetic
//! operator is *K* = (*k*<sub>*x*</sub>² + *k*<sub>*y*</sub>²) / 2.
//!
//! The field is sampled on a uniform `nx × ny` grid covering the rectangle
//! `[-Lx/2, Lx/2) × [-Ly/2, Ly/2)`:
//! ```text
//! x[i] = -Lx/2 + i dx,  dx = Lx / nx,  i ∊ {0, ..., nx - 1}
//! y[j] = -Ly/2 + j dy,  dy = Ly / ny,  j ∊ {0, ..., ny - 1}
//! ```
//! The right and top edges are excluded because the boundary is periodic; a
//! packet leaving through one side re-enters through the other. Integrals are
//! replaced by Riemann sums, so that the total probability is
//! ```text
//! P = Σ |ψ[i, j]|² dx dy
//! ```
//! which, for a periodic and band-limited field, is spectrally accurate.
//!
//! # The split-step scheme
//! *K* and *V* do not commute, so exp(-*i* *H* *dt*) cannot be factored
//! exactly. By the Baker-Campbell-Hausdorff formula, the naive product
//! exp(-*i* *V* *dt*) exp(-*i* *K* *dt*) carries an error term proportional to
//! the commutator \[*K*, *V*\] at *O*(*dt*²). Sandwiching the kinetic factor
//! between two half-steps of the potential (Strang splitting) cancels that
//! term:
//! ```text
//!              -i V dt/2  -i K dt  -i V dt/2
//! ψ(t + dt) = e          e        e          ψ(t) + O(dt³)
//! ```
//! Each factor is diagonal in a convenient basis. The potential factor is a
//! pointwise phase in position space, and the kinetic factor is a pointwise
//! phase in momentum space, reached with the fast Fourier transform:
//! ```text
//!        ψ(t, x, y)
//!             |
//!             V
//!     -i V(x, y) dt/2
//!    e
//!             |
//!             '--> FFT ---.
//!                         |
//!                         V
//!               -i (kx² + ky²) dt/2
//!              e
//!                         |
//!             .-- iFFT <--'
//!             |
//!             V  / (nx ny)
//!     -i V(x, y) dt/2
//!    e
//!             |
//!             V
//!     ψ(t + dt, x, y)
//! ```
//! The inverse transform is computed un-normalized, so the field is divided
//! by `nx ny` once per step, immediately after it.
//!
//! For a free particle (*V* ≡ 0) the potential factors are the identity and
//! the scheme is exact up to rounding.
//!
//! # Momentum space in two dimensions
//! The 2D discrete Fourier transform factors into 1D transforms along each
//! axis. The field is stored row-major, so each row (fixed *x*, varying *y*)
//! is contiguous and is transformed directly; columns are transformed after a
//! transposition into a scratch buffer, and transposed back.
//!
//! The transform's output index *n* along an axis of length *N* and extent
//! *L* corresponds to the angular wavenumber
//! ```text
//!        { 2π n / L          n ≤ N/2
//! k[n] = {
//!        { 2π (n - N) / L    otherwise
//! ```
//! i.e. non-negative frequencies first, followed by the negative block, with
//! the Nyquist frequency of an even-length axis taken as positive. The
//! largest representable |*k*| is π / *dx*; a wavepacket with significant
//! weight beyond that is aliased.
//!
//! # Conservation and accuracy
//! Every factor above is a pure phase and the FFT pair is unitary up to its
//! normalization, so the scheme conserves total probability exactly in exact
//! arithmetic, independent of *dt*. In floating point, the drift per step is
//! at the level of rounding error. A large *dt* is therefore never unstable,
//! only inaccurate: the local error grows as *dt*³ and the phase of
//! high-energy components wraps around.
//!
//! The same argument makes the energy ⟨*H*⟩ approximately conserved, with an
//! error bounded by the splitting error rather than drifting secularly. This
//! is a useful diagnostic for choosing *dt*; see
//! [`Propagator::total_energy`][crate::propagator::Propagator::total_energy].
