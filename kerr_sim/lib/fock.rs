//! Pure single-mode states in a truncated Fock basis.
//!
//! A state is stored as its `cutoff` number-state amplitudes, starting from the
//! vacuum. Gates are applied as dense matrix-vector products, except for the
//! Kerr and rotation gates, which are diagonal and act as phases.
//!
//! Wigner functions are evaluated with the usual iterative scheme over the
//! Wigner functions of the dyadic products ∣*m*⟩⟨*n*∣, seeded by
//! *W*<sub>00</sub> = exp(−2∣*A*∣²) / π with *A* = (*x* + *ip*) / (2√(ħ/2)).
//! With ħ = 2 the vacuum evaluates to exp[−(*x*² + *p*²) / 2] / 2π.

use std::f64::consts::PI;
use nalgebra as na;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ KerrError, KerrResult },
    gate::Gate,
};

/// Value of ħ fixing the phase-space scaling of quadratures.
pub const HBAR: f64 = 2.0;

/// A pure state of a single bosonic mode, truncated to the first `cutoff`
/// number states.
#[derive(Clone, Debug, PartialEq)]
pub struct FockState {
    psi: na::DVector<C64>,
}

impl FockState {
    /// Create the vacuum state ∣0⟩ with Fock cutoff dimension `cutoff`.
    pub fn vacuum(cutoff: usize) -> KerrResult<Self> {
        if cutoff == 0 { return Err(KerrError::InvalidCutoff(cutoff)); }
        let mut psi: na::DVector<C64> = na::DVector::zeros(cutoff);
        psi[0] = C64::from(1.0);
        Ok(Self { psi })
    }

    /// Wrap a set of number-state amplitudes, without normalizing them.
    pub fn from_amplitudes<I>(amps: I) -> KerrResult<Self>
    where I: IntoIterator<Item = C64>
    {
        let amps: Vec<C64> = amps.into_iter().collect();
        if amps.is_empty() { return Err(KerrError::InvalidCutoff(0)); }
        Ok(Self { psi: na::DVector::from_vec(amps) })
    }

    /// Fock cutoff dimension.
    pub fn cutoff(&self) -> usize { self.psi.len() }

    /// Number-state amplitudes.
    pub fn amplitudes(&self) -> &na::DVector<C64> { &self.psi }

    /// Apply a single gate.
    pub fn apply_gate(&mut self, gate: &Gate) -> &mut Self {
        if gate.is_diagonal() {
            self.psi.iter_mut()
                .enumerate()
                .for_each(|(n, a)| {
                    if let Some(ph) = gate.diagonal_phase(n) { *a *= ph; }
                });
        } else {
            self.psi = gate.matrix(self.cutoff()) * &self.psi;
        }
        self
    }

    /// Apply a sequence of gates in order.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> &mut Self
    where I: IntoIterator<Item = &'a Gate>
    {
        gates.into_iter()
            .for_each(|g| {
                log::trace!("apply {}", g);
                self.apply_gate(g);
            });
        self
    }

    /// Norm of the (truncated) state vector.
    ///
    /// This drops below 1 when a gate moves population past the cutoff.
    pub fn norm(&self) -> f64 { self.psi.norm() }

    /// Return `true` if every amplitude is finite and the state is not the
    /// zero vector.
    pub fn is_valid(&self) -> bool {
        self.psi.iter().all(|a| a.re.is_finite() && a.im.is_finite())
            && self.norm() > 0.0
    }

    /// Probabilities of each number state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.psi.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Expectation value of the number operator.
    pub fn mean_photon_number(&self) -> f64 {
        self.psi.iter()
            .enumerate()
            .map(|(n, a)| n as f64 * a.norm_sqr())
            .sum()
    }

    /// Evaluate the Wigner function at a single phase-space point.
    pub fn wigner_point(&self, x: f64, p: f64) -> f64 {
        let mut buf: Vec<C64> = vec![C64::from(0.0); self.cutoff()];
        let sqrt: Vec<f64> = sqrt_table(self.cutoff());
        self.wigner_point_buf(x, p, &sqrt, &mut buf)
    }

    fn wigner_point_buf(&self, x: f64, p: f64, sqrt: &[f64], w: &mut [C64])
        -> f64
    {
        let dim = self.cutoff();
        let psi = &self.psi;
        let rho = |m: usize, n: usize| psi[m] * psi[n].conj();
        let a = C64::new(x, p) / (2.0 * (HBAR / 2.0).sqrt());

        // w[n] holds the Wigner function of ∣m⟩⟨n∣ for the current m
        w[0] = C64::from((-2.0 * a.norm_sqr()).exp() / PI);
        let mut acc: f64 = rho(0, 0).re * w[0].re;
        for n in 1..dim {
            w[n] = 2.0 * a * w[n - 1] / sqrt[n];
            acc += 2.0 * (rho(0, n) * w[n]).re;
        }
        let mut prev: C64;
        let mut next: C64;
        for m in 1..dim {
            prev = w[m];
            w[m] = (2.0 * a.conj() * prev - sqrt[m] * w[m - 1]) / sqrt[m];
            acc += (rho(m, m) * w[m]).re;
            for n in m + 1..dim {
                next = (2.0 * a * w[n - 1] - sqrt[m] * prev) / sqrt[n];
                prev = w[n];
                w[n] = next;
                acc += 2.0 * (rho(m, n) * w[n]).re;
            }
        }
        acc / HBAR
    }

    /// Evaluate the Wigner function on the grid spanned by `xvec` and `pvec`.
    ///
    /// The returned array has shape `(pvec.len(), xvec.len())`, so that element
    /// `[i, j]` is *W*(`xvec[j]`, `pvec[i]`).
    pub fn wigner(&self, xvec: &[f64], pvec: &[f64]) -> nd::Array2<f64> {
        let mut buf: Vec<C64> = vec![C64::from(0.0); self.cutoff()];
        let sqrt: Vec<f64> = sqrt_table(self.cutoff());
        nd::Array2::from_shape_fn(
            (pvec.len(), xvec.len()),
            |(i, j)| self.wigner_point_buf(xvec[j], pvec[i], &sqrt, &mut buf),
        )
    }
}

fn sqrt_table(cutoff: usize) -> Vec<f64> {
    (0..cutoff).map(|n| (n as f64).sqrt()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn fock(n: usize, cutoff: usize) -> FockState {
        FockState::from_amplitudes(
            (0..cutoff).map(|k| C64::from(if k == n { 1.0 } else { 0.0 }))
        ).unwrap()
    }

    #[test]
    fn vacuum_requires_cutoff() {
        assert!(matches!(FockState::vacuum(0), Err(KerrError::InvalidCutoff(0))));
        let vac = FockState::vacuum(5).unwrap();
        assert_eq!(vac.cutoff(), 5);
        assert_eq!(vac.probabilities(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn vacuum_wigner_is_gaussian() {
        let vac = FockState::vacuum(10).unwrap();
        for &(x, p) in [(0.0_f64, 0.0_f64), (1.0, -0.5), (-2.0, 2.5)].iter() {
            let expected = (-(x * x + p * p) / 2.0).exp() / (2.0 * PI);
            assert!((vac.wigner_point(x, p) - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn single_photon_wigner_is_negative_at_origin() {
        // W_1(x, p) = (r² - 1) exp(-r² / 2) / 2π, with r² = x² + p²
        let one = fock(1, 6);
        assert!((one.wigner_point(0.0, 0.0) + 1.0 / (2.0 * PI)).abs() < EPSILON);
        let (x, p): (f64, f64) = (1.2, -0.7);
        let r2 = x * x + p * p;
        let expected = (r2 - 1.0) * (-r2 / 2.0).exp() / (2.0 * PI);
        assert!((one.wigner_point(x, p) - expected).abs() < EPSILON);
    }

    #[test]
    fn displaced_vacuum_is_shifted_gaussian() {
        let mut state = FockState::vacuum(40).unwrap();
        state.apply_gate(&Gate::D(1.5, 0.0));
        assert!((state.norm() - 1.0).abs() < 1e-8);
        assert!((state.mean_photon_number() - 2.25).abs() < 1e-8);
        // ⟨x⟩ = 2 Re(α) √(ħ/2) = 3
        let peak = state.wigner_point(3.0, 0.0);
        assert!((peak - 1.0 / (2.0 * PI)).abs() < 1e-8);
        assert!(state.wigner_point(0.0, 0.0) < peak);
    }

    #[test]
    fn diagonal_gates_preserve_probabilities() {
        let mut state = FockState::vacuum(30).unwrap();
        state.apply_gate(&Gate::D(1.0, 0.3));
        let before = state.probabilities();
        state.apply_circuit(&[Gate::K(-0.4), Gate::R(0.4)]);
        let after = state.probabilities();
        before.iter().zip(after.iter())
            .for_each(|(b, a)| assert!((b - a).abs() < EPSILON));
    }

    #[test]
    fn wigner_grid_orientation() {
        let mut state = FockState::vacuum(30).unwrap();
        state.apply_gate(&Gate::D(1.0, 0.0));
        let xvec = [0.0, 2.0];
        let pvec = [0.0, 2.0, 4.0];
        let z = state.wigner(&xvec, &pvec);
        assert_eq!(z.shape(), &[3, 2]);
        for (i, p) in pvec.iter().enumerate() {
            for (j, x) in xvec.iter().enumerate() {
                assert!((z[[i, j]] - state.wigner_point(*x, *p)).abs() < EPSILON);
            }
        }
    }
}
