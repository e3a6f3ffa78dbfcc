use crate::assembly::{AssemblyMode, ElementContribution, SensitivityTensor, WeakFormElement};
use crate::coefficient::{GapWidth, GapWidthValue};
use crate::element::ReferenceShape;
use crate::error::AssemblyError;
use crate::mapping::evaluate_mapped_basis;
use crate::nalgebra::{DMatrix, DVector, Point2};
use crate::nodes::NodeArena;
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use eyre::eyre;
use itertools::izip;
use log::{trace, warn};

/// Bulk element for the Hele-Shaw equation `dh/dt + div(h^3 grad p) = 0`.
///
/// The weak form with test functions `psi_l` reads
///
/// `R_l = int (dh/dt) psi_l + h^3 grad p . grad psi_l dx`.
///
/// The gap width `h` depends on position and time only, so the Jacobian with respect to the
/// nodal pressures is the stiffness matrix `K_{l l'} = int h^3 grad psi_l' . grad psi_l dx`.
#[derive(Debug, Clone)]
pub struct HeleShawElement<T: Real, S, G> {
    shape: S,
    node_indices: Vec<usize>,
    gap: G,
    quadrature: QuadraturePair2d<T>,
}

impl<T, S, G> HeleShawElement<T, S, G>
where
    T: Real,
    S: ReferenceShape,
    G: GapWidth<T>,
{
    /// Creates an element of the given shape over the given arena nodes, using the default
    /// quadrature rule of the shape.
    pub fn new(shape: S, node_indices: Vec<usize>, gap: G) -> eyre::Result<Self> {
        if node_indices.len() != shape.num_nodes() {
            return Err(eyre!(AssemblyError::NodeCountMismatch {
                expected: shape.num_nodes(),
                actual: node_indices.len(),
            }));
        }
        let quadrature = shape.default_quadrature();
        Ok(Self {
            shape,
            node_indices,
            gap,
            quadrature,
        })
    }

    pub fn with_quadrature(self, quadrature: QuadraturePair2d<T>) -> Self {
        Self { quadrature, ..self }
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    pub fn gap(&self) -> &G {
        &self.gap
    }

    pub fn quadrature(&self) -> &QuadraturePair2d<T> {
        &self.quadrature
    }

    pub(crate) fn gather_nodal_data(&self, nodes: &NodeArena<T>) -> eyre::Result<(Vec<Point2<T>>, Vec<T>)> {
        nodes.check_indices(&self.node_indices)?;
        let mut positions = Vec::with_capacity(self.node_indices.len());
        let mut pressures = Vec::with_capacity(self.node_indices.len());
        nodes.gather_positions(&self.node_indices, &mut positions);
        nodes.gather_pressures(&self.node_indices, &mut pressures);
        Ok((positions, pressures))
    }
}

impl<T, S, G> WeakFormElement<T> for HeleShawElement<T, S, G>
where
    T: Real,
    S: ReferenceShape,
    G: GapWidth<T>,
{
    fn node_indices(&self) -> &[usize] {
        &self.node_indices
    }

    fn assemble(&self, nodes: &NodeArena<T>, mode: AssemblyMode) -> eyre::Result<ElementContribution<T>> {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        let dofs = self.element_dofs(nodes);
        let n = self.shape.num_nodes();
        let num_equations = dofs.num_equations();

        let mut residual = DVector::zeros(num_equations);
        let mut jacobian = match mode {
            AssemblyMode::Residual => None,
            AssemblyMode::ResidualAndJacobian => Some(DMatrix::zeros(num_equations, num_equations)),
        };
        let mut min_gap: Option<T> = None;

        let (weights, points) = &self.quadrature;
        for (ipt, (&weight, xi)) in izip!(weights, points).enumerate() {
            let basis = evaluate_mapped_basis(&self.shape, &positions, xi)?;
            let dpdx = basis.interpolate_gradient(&pressures);
            let GapWidthValue { h, dhdt } = self.gap.evaluate(ipt, &basis.x);
            if h <= T::zero() {
                min_gap = Some(min_gap.map_or(h, |min| min.min(h)));
            }
            let h3 = h * h * h;
            let scale = weight * basis.jacobian_det;

            for l in 0..n {
                if let Some(eqn) = dofs.local_equation(l) {
                    let dpsidx_l = basis.dpsidx.column(l);
                    residual[eqn] += dhdt * basis.psi[l] * scale + h3 * dpdx.dot(&dpsidx_l) * scale;

                    if let Some(jacobian) = jacobian.as_mut() {
                        for l2 in 0..n {
                            if let Some(eqn2) = dofs.local_equation(l2) {
                                jacobian[(eqn, eqn2)] += h3 * basis.dpsidx.column(l2).dot(&dpsidx_l) * scale;
                            }
                        }
                    }
                }
            }
        }

        if let Some(h) = min_gap {
            warn!(
                "Non-positive gap width h = {:?} encountered in element with nodes {:?}",
                h, self.node_indices
            );
        }
        trace!(
            "Assembled element with nodes {:?}: {} equations, Jacobian: {}",
            self.node_indices,
            num_equations,
            jacobian.is_some()
        );

        Ok(ElementContribution { residual, jacobian })
    }

    fn assemble_sensitivities(&self, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>> {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        let dofs = self.element_dofs(nodes);
        let mut sensitivities = SensitivityTensor::zeros(dofs, self.node_indices.clone());
        let (weights, points) = &self.quadrature;
        for (ipt, (&weight, xi)) in izip!(weights, points).enumerate() {
            let basis = evaluate_mapped_basis(&self.shape, &positions, xi)?;
            let gap = self.gap.evaluate(ipt, &basis.x);
            let gap_gradient = self.gap.evaluate_gradient(ipt, &basis.x).ok_or_else(|| {
                eyre!(AssemblyError::Unsupported(
                    "mesh sensitivities require the spatial gradient of the gap width"
                ))
            })?;
            sensitivities.accumulate_bulk_point(weight, &basis, &pressures, gap, &gap_gradient);
        }
        trace!("Assembled mesh sensitivities of element with nodes {:?}", self.node_indices);
        Ok(sensitivities)
    }
}
