//! Tools for simulating single-mode Kerr states of light and rendering their
//! Wigner functions.
//!
//! States are prepared as *K*(*ξ*) *D*(*α*) *S*(*z*) ∣0⟩ in a truncated Fock
//! basis, with the Kerr stage set by an integer *k* through *ξ* = π / *k*,
//! sampled over a square region of phase space, and drawn as PNG heat maps or
//! surfaces. Since the truncation is a numerical parameter, [`convergence`]
//! provides a search for the smallest Fock cutoff at which the sampled Wigner
//! function settles.

pub mod error;
pub mod gate;
pub mod fock;
pub mod circuit;
pub mod wigner;
pub mod convergence;
pub mod plot;
pub mod sweep;
pub mod config;

pub use error::{ KerrError, KerrResult };
