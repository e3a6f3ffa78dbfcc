//! Element-level weak-form assembly for the Hele-Shaw equation
//!
//! $$ \pd{h}{t} + \nabla \cdot \left( h^3 \nabla p \right) = 0 $$
//!
//! on two-dimensional domains, where $p$ is the pressure and $h$ the gap width.
//!
//! The crate computes per-element residual vectors, exact Jacobians with respect to the nodal
//! pressures and exact derivatives of the residual with respect to the nodal positions (mesh
//! sensitivities). Prescribed-flux boundary conditions are imposed through separate
//! [`FluxElement`](assembly::FluxElement)s attached to faces of the bulk elements.
//! Mesh generation, the Newton iteration and the linear solver are the responsibility of
//! the caller; [`assembly::global`] only offers a small helper for scattering element
//! contributions into global storage.
use nalgebra::RealField;

pub mod assembly;
pub mod calculus;
pub mod coefficient;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod mapping;
pub mod nodes;
pub mod quadrature;
pub mod tensor;

pub use assembly::{
    compute_residual, compute_residual_and_jacobian, compute_residual_sensitivities, AssemblyMode,
    ElementContribution, FluxElement, HeleShawElement, SensitivityTensor, WeakFormElement,
};
pub use diagnostics::{compute_pointwise_error, reconstruct_velocity, ErrorNorms};
pub use error::AssemblyError;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

/// Scalar types supported by the crate.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
