use crate::coefficient::{GapWidthGradient, GapWidthValue};
use crate::mapping::MappedBasis;
use crate::nalgebra::{DVector, Vector2};
use crate::nodes::ElementDofs;
use crate::tensor::RankThreeTensor;
use crate::Real;

/// Derivatives of an element residual with respect to the positions of its nodes.
///
/// Entry `(eqn, p, q)` is the derivative of local equation `eqn` with respect to coordinate
/// `p` of local node `q`. The residual of an element does not depend on any node outside the
/// element, so lookups by arena index return zero for such nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTensor<T: Real> {
    data: RankThreeTensor<T>,
    dofs: ElementDofs,
    node_indices: Vec<usize>,
}

impl<T: Real> SensitivityTensor<T> {
    pub fn zeros(dofs: ElementDofs, node_indices: Vec<usize>) -> Self {
        assert_eq!(dofs.num_nodes(), node_indices.len());
        Self {
            data: RankThreeTensor::zeros(dofs.num_equations(), 2, node_indices.len()),
            dofs,
            node_indices,
        }
    }

    pub fn num_equations(&self) -> usize {
        self.dofs.num_equations()
    }

    pub fn num_nodes(&self) -> usize {
        self.node_indices.len()
    }

    pub fn dofs(&self) -> &ElementDofs {
        &self.dofs
    }

    pub fn node_indices(&self) -> &[usize] {
        &self.node_indices
    }

    pub fn as_tensor(&self) -> &RankThreeTensor<T> {
        &self.data
    }

    pub fn get(&self, eqn: usize, direction: usize, local_node: usize) -> T {
        self.data[(eqn, direction, local_node)]
    }

    /// Derivative of local equation `eqn` with respect to coordinate `direction` of the arena
    /// node `node`.
    pub fn get_global(&self, eqn: usize, direction: usize, node: usize) -> T {
        self.node_indices
            .iter()
            .enumerate()
            .filter(|(_, &global)| global == node)
            .fold(T::zero(), |acc, (q, _)| acc + self.data[(eqn, direction, q)])
    }

    /// Contracts the tensor with a displacement of each local node, giving the first-order
    /// change of the local residual.
    pub fn contract(&self, displacements: &[Vector2<T>]) -> DVector<T> {
        assert_eq!(displacements.len(), self.num_nodes(), "One displacement per local node required");
        DVector::from_fn(self.num_equations(), |eqn, _| {
            let mut change = T::zero();
            for (q, displacement) in displacements.iter().enumerate() {
                for p in 0..2 {
                    change += self.data[(eqn, p, q)] * displacement[p];
                }
            }
            change
        })
    }

    pub(crate) fn add(&mut self, eqn: usize, direction: usize, local_node: usize, value: T) {
        self.data[(eqn, direction, local_node)] += value;
    }

    /// Adds the contribution of one quadrature point of the bulk residual
    ///
    /// `R_l = sum w J (dhdt psi_l + h^3 grad p . grad psi_l)`,
    ///
    /// differentiated with the product rule. Moving node `q` in direction `p` moves the
    /// quadrature point by `psi_q e_p`, which enters through the gap width.
    #[allow(non_snake_case)]
    pub(crate) fn accumulate_bulk_point(
        &mut self,
        weight: T,
        basis: &MappedBasis<T>,
        pressures: &[T],
        gap: GapWidthValue<T>,
        gap_gradient: &GapWidthGradient<T>,
    ) {
        let n = basis.num_nodes();
        let J = basis.jacobian_det;
        let psi = &basis.psi;
        let dpsidx = &basis.dpsidx;
        let GapWidthValue { h, dhdt } = gap;
        let h2 = h * h;
        let h3 = h2 * h;
        let three = T::one() + T::one() + T::one();

        let sensitivity = basis.sensitivity();
        let dJ_dX = &sensitivity.d_jacobian_det_dx;
        let d_dpsidx_dX = &sensitivity.d_dpsidx_dx;
        let dpdx = basis.interpolate_gradient(pressures);

        // d(dp/dx_i)/dX_pq = sum_j p_j d(dpsi_j/dx_i)/dX_pq, stored at (p, q, i)
        let mut d_dpdx_dX = RankThreeTensor::zeros(2, n, 2);
        for p in 0..2 {
            for q in 0..n {
                for i in 0..2 {
                    d_dpdx_dX[(p, q, i)] = pressures
                        .iter()
                        .enumerate()
                        .fold(T::zero(), |acc, (j, &p_j)| acc + p_j * d_dpsidx_dX[(p, q, j, i)]);
                }
            }
        }

        for l in 0..n {
            if let Some(eqn) = self.dofs.local_equation(l) {
                let dot = dpdx.dot(&dpsidx.column(l));
                for p in 0..2 {
                    for q in 0..n {
                        let dJ = dJ_dX[(p, q)];
                        let time_term = dhdt * psi[l] * dJ + gap_gradient.d_dhdt_dx[p] * psi[q] * psi[l] * J;

                        let mut flux_term = T::zero();
                        for i in 0..2 {
                            flux_term += dpdx[i] * (dpsidx[(i, l)] * dJ + d_dpsidx_dX[(p, q, l, i)] * J)
                                + d_dpdx_dX[(p, q, i)] * dpsidx[(i, l)] * J;
                        }

                        let gap_term = dot * J * three * h2 * gap_gradient.dhdx[p] * psi[q];

                        self.add(eqn, p, q, weight * (time_term + h3 * flux_term + gap_term));
                    }
                }
            }
        }
    }
}
