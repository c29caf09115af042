//! Single-mode Gaussian and non-Gaussian gates, represented by their matrix
//! elements in a truncated Fock basis.
//!
//! All conventions use ħ = 2:
//! - squeezing: *S*(*z*) = exp[(*z*\* *a*² − *z* *a*†²) / 2], with *z* = *r*
//!   exp(*iφ*)
//! - displacement: *D*(*α*) = exp(*α* *a*† − *α*\* *a*), with *α* = *r*
//!   exp(*iφ*)
//! - Kerr interaction: *K*(*κ*) = exp(*iκ* *n*²)
//! - phase-space rotation: *R*(*θ*) = exp(*iθ* *n*)
//!
//! Displacement and squeezing matrices are filled in with the usual
//! three-term recurrences in the Fock indices, which gives the exact matrix
//! elements of the infinite-dimensional operators restricted to the first
//! `cutoff` number states. This is *not* the same as exponentiating a truncated
//! generator, and is what makes results at different cutoffs comparable.

use std::fmt;
use nalgebra as na;
use num_complex::Complex64 as C64;

/// Description of a single gate acting on the (only) mode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gate {
    /// Squeezing with magnitude `r` and phase `φ`.
    S(f64, f64),
    /// Displacement with magnitude `r` and phase `φ`.
    D(f64, f64),
    /// Kerr interaction with strength `κ`.
    K(f64),
    /// Rotation by angle `θ`.
    R(f64),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::S(r, ph) => write!(f, "Sgate({}, {})", r, ph),
            Self::D(r, ph) => write!(f, "Dgate({}, {})", r, ph),
            Self::K(k) => write!(f, "Kgate({})", k),
            Self::R(th) => write!(f, "Rgate({})", th),
        }
    }
}

impl Gate {
    /// Return `true` if `self` is `K`.
    pub fn is_k(&self) -> bool { matches!(self, Self::K(..)) }

    /// Return `true` if `self` is `R`.
    pub fn is_r(&self) -> bool { matches!(self, Self::R(..)) }

    /// Return `true` if `self` is diagonal in the Fock basis.
    pub fn is_diagonal(&self) -> bool { self.is_k() || self.is_r() }

    /// Phase picked up by the number state ∣`n`⟩ under a diagonal gate.
    ///
    /// Returns `None` for non-diagonal gates.
    pub fn diagonal_phase(&self, n: usize) -> Option<C64> {
        let n = n as f64;
        match *self {
            Self::K(k) => Some(C64::cis(k * n * n)),
            Self::R(th) => Some(C64::cis(th * n)),
            _ => None,
        }
    }

    /// Compute the `cutoff` × `cutoff` Fock-basis matrix for the gate.
    pub fn matrix(&self, cutoff: usize) -> na::DMatrix<C64> {
        match *self {
            Self::S(r, ph) => squeezing(r, ph, cutoff),
            Self::D(r, ph) => displacement(r, ph, cutoff),
            Self::K(_) | Self::R(_) => {
                let diag: na::DVector<C64>
                    = na::DVector::from_iterator(
                        cutoff,
                        (0..cutoff).map(|n| {
                            self.diagonal_phase(n).unwrap_or(C64::from(1.0))
                        }),
                    );
                na::DMatrix::from_diagonal(&diag)
            },
        }
    }
}

fn sqrt_table(cutoff: usize) -> Vec<f64> {
    (0..cutoff).map(|n| (n as f64).sqrt()).collect()
}

/// Matrix elements ⟨*m*∣*D*(*α*)∣*n*⟩ for *m*, *n* < `cutoff`.
pub fn displacement(r: f64, phi: f64, cutoff: usize) -> na::DMatrix<C64> {
    let mut d: na::DMatrix<C64> = na::DMatrix::zeros(cutoff, cutoff);
    if cutoff == 0 { return d; }
    let alpha = C64::from_polar(r, phi);
    let sqrt = sqrt_table(cutoff);
    d[(0, 0)] = C64::from((-0.5 * r * r).exp());
    for m in 1..cutoff {
        d[(m, 0)] = alpha / sqrt[m] * d[(m - 1, 0)];
    }
    for m in 0..cutoff {
        for n in 1..cutoff {
            let mut elem = -alpha.conj() / sqrt[n] * d[(m, n - 1)];
            if m > 0 {
                elem += sqrt[m] / sqrt[n] * d[(m - 1, n - 1)];
            }
            d[(m, n)] = elem;
        }
    }
    d
}

/// Matrix elements ⟨*m*∣*S*(*z*)∣*n*⟩ for *m*, *n* < `cutoff`.
///
/// Only elements with *m* + *n* even are nonzero.
pub fn squeezing(r: f64, phi: f64, cutoff: usize) -> na::DMatrix<C64> {
    let mut s: na::DMatrix<C64> = na::DMatrix::zeros(cutoff, cutoff);
    if cutoff == 0 { return s; }
    let sqrt = sqrt_table(cutoff);
    let eiph_tanh = C64::from_polar(r.tanh(), phi);
    let sech = r.cosh().recip();
    let r00 = -eiph_tanh;
    let r01 = C64::from(sech);
    let r11 = eiph_tanh.conj();
    s[(0, 0)] = C64::from(sech.sqrt());
    for m in (2..cutoff).step_by(2) {
        s[(m, 0)] = sqrt[m - 1] / sqrt[m] * r00 * s[(m - 2, 0)];
    }
    for m in 0..cutoff {
        for n in 1..cutoff {
            if (m + n) % 2 != 0 { continue; }
            let mut elem = C64::from(0.0);
            if n >= 2 {
                elem += sqrt[n - 1] / sqrt[n] * r11 * s[(m, n - 2)];
            }
            if m >= 1 {
                elem += sqrt[m] / sqrt[n] * r01 * s[(m - 1, n - 1)];
            }
            s[(m, n)] = elem;
        }
    }
    s
}
