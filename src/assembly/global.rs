//! Accumulation of element contributions into global storage.
//!
//! Element contributions are computed in parallel and then scattered sequentially in element
//! order, so the result does not depend on the number of threads.
use crate::assembly::{AssemblyMode, ElementContribution, WeakFormElement};
use crate::error::AssemblyError;
use crate::nalgebra::DVector;
use crate::nalgebra_sparse::CooMatrix;
use crate::nodes::NodeArena;
use crate::Real;
use eyre::eyre;
use log::debug;
use rayon::prelude::*;

/// Global equation numbers of the local equations of an element, in local equation order.
pub fn global_equations<T, E>(element: &E, nodes: &NodeArena<T>) -> eyre::Result<Vec<usize>>
where
    T: Real,
    E: WeakFormElement<T> + ?Sized,
{
    let node_indices = element.node_indices();
    nodes.check_indices(node_indices)?;
    node_indices
        .iter()
        .filter(|&&node| !nodes.is_pinned(node))
        .map(|&node| {
            nodes
                .equation(node)
                .ok_or_else(|| eyre!(AssemblyError::MissingEquationNumber { node }))
        })
        .collect()
}

/// Checks that all equation numbers of the element lie within a system of the given size.
fn check_equations<T, E>(element: &E, nodes: &NodeArena<T>, equations: &[usize], num_equations: usize) -> eyre::Result<()>
where
    T: Real,
    E: WeakFormElement<T> + ?Sized,
{
    let free_nodes = element
        .node_indices()
        .iter()
        .copied()
        .filter(|&node| !nodes.is_pinned(node));
    match free_nodes.zip(equations).find(|&(_, &equation)| equation >= num_equations) {
        Some((node, &equation)) => Err(eyre!(AssemblyError::EquationOutOfBounds {
            node,
            equation,
            num_equations,
        })),
        None => Ok(()),
    }
}

/// Computes all element contributions without touching the global storage, so that a failure
/// leaves the output unchanged.
fn compute_contributions<T, E>(
    elements: &[E],
    nodes: &NodeArena<T>,
    num_equations: usize,
    mode: AssemblyMode,
) -> eyre::Result<Vec<(Vec<usize>, ElementContribution<T>)>>
where
    T: Real,
    E: WeakFormElement<T> + Sync,
{
    elements
        .par_iter()
        .map(|element| {
            let equations = global_equations(element, nodes)?;
            check_equations(element, nodes, &equations, num_equations)?;
            let contribution = element.assemble(nodes, mode)?;
            Ok((equations, contribution))
        })
        .collect()
}

fn check_size(expected: usize, actual: usize) -> eyre::Result<()> {
    if expected != actual {
        Err(eyre!(AssemblyError::BufferSizeMismatch { expected, actual }))
    } else {
        Ok(())
    }
}

/// Adds the residuals of all elements to `residual`.
///
/// The length of `residual` must equal the number of equations of the arena, and every
/// equation number must be smaller than it. Pinning nodes after numbering violates the latter
/// until [`NodeArena::assign_equation_numbers`] is called again.
pub fn assemble_residual_into<T, E>(residual: &mut DVector<T>, elements: &[E], nodes: &NodeArena<T>) -> eyre::Result<()>
where
    T: Real,
    E: WeakFormElement<T> + Sync,
{
    let num_equations = nodes.num_equations();
    check_size(num_equations, residual.len())?;
    let contributions = compute_contributions(elements, nodes, num_equations, AssemblyMode::Residual)?;
    for (equations, contribution) in &contributions {
        for (local, &global) in equations.iter().enumerate() {
            residual[global] += contribution.residual[local];
        }
    }
    debug!(
        "Assembled residual of {} elements into {} equations",
        elements.len(),
        residual.len()
    );
    Ok(())
}

/// Adds the residuals of all elements to `residual` and pushes the entries of their Jacobians
/// to `jacobian`.
///
/// Duplicate entries in `jacobian` are summed when the matrix is converted to a compressed
/// format.
pub fn assemble_residual_and_jacobian_into<T, E>(
    residual: &mut DVector<T>,
    jacobian: &mut CooMatrix<T>,
    elements: &[E],
    nodes: &NodeArena<T>,
) -> eyre::Result<()>
where
    T: Real,
    E: WeakFormElement<T> + Sync,
{
    let num_equations = nodes.num_equations();
    check_size(num_equations, residual.len())?;
    check_size(num_equations, jacobian.nrows())?;
    check_size(num_equations, jacobian.ncols())?;

    let contributions = compute_contributions(elements, nodes, num_equations, AssemblyMode::ResidualAndJacobian)?;
    for (equations, contribution) in &contributions {
        for (local, &global) in equations.iter().enumerate() {
            residual[global] += contribution.residual[local];
        }
        if let Some(element_jacobian) = &contribution.jacobian {
            for (local_row, &row) in equations.iter().enumerate() {
                for (local_col, &col) in equations.iter().enumerate() {
                    jacobian.push(row, col, element_jacobian[(local_row, local_col)]);
                }
            }
        }
    }
    debug!(
        "Assembled residual and Jacobian of {} elements, {} equations, {} triplets",
        elements.len(),
        num_equations,
        jacobian.nnz()
    );
    Ok(())
}
