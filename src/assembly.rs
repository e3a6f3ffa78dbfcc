//! Element residuals, Jacobians and mesh sensitivities.
//!
//! Every element type implements [`WeakFormElement`]. Element contributions are indexed by
//! local equation numbers (see [`ElementDofs`]), so pinned degrees of freedom never appear in
//! the local vectors and matrices. Mapping local equations to global ones is the job of the
//! caller, or of the helpers in [`global`].
use crate::nalgebra::{DMatrix, DVector};
use crate::nodes::{ElementDofs, NodeArena};
use crate::Real;

mod bulk;
mod flux;
pub mod global;
mod sensitivity;

pub use bulk::*;
pub use flux::*;
pub use sensitivity::*;

/// What to compute in a call to [`WeakFormElement::assemble`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssemblyMode {
    Residual,
    ResidualAndJacobian,
}

/// Local residual and (optionally) Jacobian of a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContribution<T: Real> {
    pub residual: DVector<T>,
    /// Derivative of the residual with respect to the free nodal pressures, present only
    /// when requested.
    pub jacobian: Option<DMatrix<T>>,
}

/// An element contributing a weak-form residual to the global system.
pub trait WeakFormElement<T: Real> {
    /// Arena indices of the nodes the element contributes to, in local node order.
    fn node_indices(&self) -> &[usize];

    /// Local equation numbers of the element's nodes.
    fn element_dofs(&self, nodes: &NodeArena<T>) -> ElementDofs {
        ElementDofs::for_element(nodes, self.node_indices())
    }

    fn assemble(&self, nodes: &NodeArena<T>, mode: AssemblyMode) -> eyre::Result<ElementContribution<T>>;

    /// Exact derivatives of the residual with respect to the positions of the element's nodes.
    fn assemble_sensitivities(&self, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>>;

    fn compute_residual(&self, nodes: &NodeArena<T>) -> eyre::Result<DVector<T>> {
        Ok(self.assemble(nodes, AssemblyMode::Residual)?.residual)
    }

    fn compute_residual_and_jacobian(&self, nodes: &NodeArena<T>) -> eyre::Result<(DVector<T>, DMatrix<T>)> {
        let ElementContribution { residual, jacobian } = self.assemble(nodes, AssemblyMode::ResidualAndJacobian)?;
        let n = residual.len();
        Ok((residual, jacobian.unwrap_or_else(|| DMatrix::zeros(n, n))))
    }

    fn compute_residual_sensitivities(&self, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>> {
        self.assemble_sensitivities(nodes)
    }
}

impl<T: Real, E: WeakFormElement<T> + ?Sized> WeakFormElement<T> for &E {
    fn node_indices(&self) -> &[usize] {
        E::node_indices(self)
    }

    fn element_dofs(&self, nodes: &NodeArena<T>) -> ElementDofs {
        E::element_dofs(self, nodes)
    }

    fn assemble(&self, nodes: &NodeArena<T>, mode: AssemblyMode) -> eyre::Result<ElementContribution<T>> {
        E::assemble(self, nodes, mode)
    }

    fn assemble_sensitivities(&self, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>> {
        E::assemble_sensitivities(self, nodes)
    }
}

/// Computes the local residual of the element.
pub fn compute_residual<T, E>(element: &E, nodes: &NodeArena<T>) -> eyre::Result<DVector<T>>
where
    T: Real,
    E: WeakFormElement<T> + ?Sized,
{
    element.compute_residual(nodes)
}

/// Computes the local residual and its Jacobian with respect to the free nodal pressures.
pub fn compute_residual_and_jacobian<T, E>(element: &E, nodes: &NodeArena<T>) -> eyre::Result<(DVector<T>, DMatrix<T>)>
where
    T: Real,
    E: WeakFormElement<T> + ?Sized,
{
    element.compute_residual_and_jacobian(nodes)
}

/// Computes the derivatives of the local residual with respect to the nodal positions.
pub fn compute_residual_sensitivities<T, E>(element: &E, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>>
where
    T: Real,
    E: WeakFormElement<T> + ?Sized,
{
    element.compute_residual_sensitivities(nodes)
}
