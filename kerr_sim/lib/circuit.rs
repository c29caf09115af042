//! Building and running the squeeze–displace–Kerr program on a single mode.
//!
//! The program prepares *K*(*ξ*) *D*(*α*) *S*(*z*) ∣0⟩, where the Kerr stage is
//! a Kerr gate of strength −*ξ* followed by a rotation by +*ξ*, with *ξ* = π /
//! *k* for an integer *k*. For *k* = 2 this produces a two-component cat-like
//! state from a coherent state, for *k* = 3 a three-component state, and so
//! on.
//!
//! Gates whose parameter is zero are left out of the program altogether
//! instead of being applied as identities.

use std::f64::consts::PI;
use crate::{
    error::{ check_finite, KerrError, KerrResult },
    fock::FockState,
    gate::Gate,
};

/// Physical settings that fully determine the state produced by a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Squeezing magnitude *r*; applied as *S*(−*r*, *φ*).
    pub squeezing: f64,
    /// Squeezing phase *φ*, in radians.
    pub squeezing_phase: f64,
    /// Real displacement amplitude *α*.
    pub displacement: f64,
    /// Kerr integer *k*, setting *ξ* = π / *k*. Zero skips the Kerr stage.
    pub kerr_integer: i32,
    /// Fock cutoff dimension.
    pub cutoff_dim: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            squeezing: 0.0,
            squeezing_phase: 0.0,
            displacement: 2.0,
            kerr_integer: 2,
            cutoff_dim: 20,
        }
    }
}

impl SimulationParameters {
    /// Check that every value is usable.
    pub fn validate(&self) -> KerrResult<()> {
        check_finite("squeezing", self.squeezing)?;
        check_finite("squeezing_phase", self.squeezing_phase)?;
        check_finite("displacement", self.displacement)?;
        if self.kerr_integer < 0 {
            return Err(KerrError::InvalidKerrInteger(self.kerr_integer));
        }
        if self.cutoff_dim == 0 {
            return Err(KerrError::InvalidCutoff(self.cutoff_dim));
        }
        Ok(())
    }

    /// Kerr angle *ξ* = π / *k*, or `None` if *k* = 0.
    pub fn kerr_angle(&self) -> Option<f64> {
        (self.kerr_integer != 0).then(|| PI / self.kerr_integer as f64)
    }

    /// Copy of `self` at a different cutoff.
    pub fn with_cutoff(self, cutoff_dim: usize) -> Self {
        Self { cutoff_dim, ..self }
    }
}

/// An ordered list of gates acting on a single mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    gates: Vec<Gate>,
}

impl Program {
    /// Number of modes the program acts on.
    pub const MODES: usize = 1;

    pub fn new() -> Self { Self::default() }

    /// Append a gate.
    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn gates(&self) -> &[Gate] { &self.gates }

    pub fn len(&self) -> usize { self.gates.len() }

    pub fn is_empty(&self) -> bool { self.gates.is_empty() }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.gates.is_empty() { return write!(f, "(empty)"); }
        for (k, g) in self.gates.iter().enumerate() {
            write!(f, "{} | q[0]", g)?;
            if k < self.gates.len() - 1 { write!(f, "; ")?; }
        }
        Ok(())
    }
}

/// Outcome of executing a [`Program`].
///
/// A simulation may come back without a state, in which case sampling it
/// fails with [`KerrError::InvalidState`].
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    pub state: Option<FockState>,
    pub cutoff_dim: usize,
}

impl Simulation {
    /// Borrow the state, checking that it can be sampled.
    pub fn valid_state(&self) -> KerrResult<&FockState> {
        let state
            = self.state.as_ref()
            .ok_or(KerrError::InvalidState(
                "simulation must contain a state in order to be sampled"))?;
        if !state.is_valid() {
            return Err(KerrError::InvalidState(
                "state amplitudes are not normalizable"));
        }
        Ok(state)
    }
}

/// Anything able to execute a single-mode program at a given Fock cutoff.
pub trait Backend {
    fn run(&self, program: &Program, cutoff_dim: usize)
        -> KerrResult<Simulation>;
}

/// Dense state-vector simulation in a truncated Fock basis.
#[derive(Copy, Clone, Debug, Default)]
pub struct FockBackend;

impl Backend for FockBackend {
    fn run(&self, program: &Program, cutoff_dim: usize)
        -> KerrResult<Simulation>
    {
        let mut state = FockState::vacuum(cutoff_dim)?;
        state.apply_circuit(program.gates());
        log::debug!(
            "ran {} gate(s) at cutoff {}; norm = {:.6}",
            program.len(), cutoff_dim, state.norm(),
        );
        Ok(Simulation { state: Some(state), cutoff_dim })
    }
}

/// Build the program for *K*(*ξ*) *D*(*α*) *S*(*z*) ∣0⟩ without running it.
pub fn kerr_displace_squeeze_program(params: &SimulationParameters)
    -> KerrResult<Program>
{
    params.validate()?;
    let mut prog = Program::new();
    if params.squeezing != 0.0 {
        prog.push(Gate::S(-params.squeezing, params.squeezing_phase));
    }
    if params.displacement != 0.0 {
        prog.push(Gate::D(params.displacement, 0.0));
    }
    if let Some(xi) = params.kerr_angle() {
        prog.push(Gate::K(-xi));
        prog.push(Gate::R(xi));
    }
    Ok(prog)
}

/// Build and run the program on `backend`.
pub fn kerr_displace_squeeze_on<B>(backend: &B, params: &SimulationParameters)
    -> KerrResult<Simulation>
where B: Backend + ?Sized
{
    let prog = kerr_displace_squeeze_program(params)?;
    log::debug!("program: {}", prog);
    backend.run(&prog, params.cutoff_dim)
}

/// Build and run the program on a [`FockBackend`].
pub fn kerr_displace_squeeze(params: &SimulationParameters)
    -> KerrResult<Simulation>
{
    kerr_displace_squeeze_on(&FockBackend, params)
}
