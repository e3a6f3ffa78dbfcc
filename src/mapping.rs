//! Isoparametric mapping from the reference domain to physical space.
use crate::element::ReferenceShape;
use crate::error::AssemblyError;
use crate::nalgebra::{try_convert, Matrix2, Matrix2xX, Point2, Vector2};
use crate::tensor::RankFourTensor;
use crate::Real;
use eyre::eyre;

/// Basis functions of an element evaluated at a single reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBasis<T: Real> {
    /// Basis function values, one per element node.
    pub psi: Vec<T>,
    /// Physical gradients, column `l` is the gradient of basis function `l`.
    pub dpsidx: Matrix2xX<T>,
    /// Determinant of the reference-to-physical Jacobian `dx/ds`.
    pub jacobian_det: T,
    /// Physical position of the reference point.
    pub x: Point2<T>,
}

/// Derivatives of a [`MappedBasis`] with respect to the nodal positions.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBasisSensitivity<T: Real> {
    /// Entry `(p, q)` is `dJ / dX_{pq}`, the derivative of the Jacobian determinant with respect
    /// to coordinate `p` of node `q`.
    pub d_jacobian_det_dx: Matrix2xX<T>,
    /// Entry `(p, q, l, i)` is `d(dpsi_l/dx_i) / dX_{pq}`.
    pub d_dpsidx_dx: RankFourTensor<T>,
}

/// Evaluates the basis of `shape` mapped onto the element with the given nodal positions.
///
/// Returns [`AssemblyError::DegenerateElement`] if the Jacobian determinant is not positive.
///
/// # Panics
///
/// Panics if the number of positions does not match the number of nodes of the shape.
#[allow(non_snake_case)]
pub fn evaluate_mapped_basis<T, S>(shape: &S, positions: &[Point2<T>], xi: &Point2<T>) -> eyre::Result<MappedBasis<T>>
where
    T: Real,
    S: ReferenceShape + ?Sized,
{
    let n = shape.num_nodes();
    assert_eq!(positions.len(), n, "Number of positions must match number of element nodes");

    let mut psi = vec![T::zero(); n];
    let mut G = Matrix2xX::zeros(n);
    shape.populate_basis(&mut psi, xi);
    shape.populate_basis_gradients(&mut G, xi);

    // J = X G^T, i.e. J_ij = dx_i / ds_j
    let mut J = Matrix2::zeros();
    let mut x = Point2::origin();
    for (l, X_l) in positions.iter().enumerate() {
        J += X_l.coords * G.column(l).transpose();
        x.coords += X_l.coords * psi[l];
    }

    let jacobian_det = J.determinant();
    if jacobian_det <= T::zero() {
        return Err(eyre!(AssemblyError::DegenerateElement {
            jacobian_det: try_convert(jacobian_det).unwrap_or(f64::NAN),
        }));
    }
    let J_inv_t = J
        .try_inverse()
        .ok_or_else(|| eyre!(AssemblyError::DegenerateElement { jacobian_det: 0.0 }))?
        .transpose();

    let dpsidx = J_inv_t * G;

    Ok(MappedBasis {
        psi,
        dpsidx,
        jacobian_det,
        x,
    })
}

impl<T: Real> MappedBasis<T> {
    pub fn num_nodes(&self) -> usize {
        self.psi.len()
    }

    /// Interpolates nodal scalar values.
    pub fn interpolate(&self, nodal_values: &[T]) -> T {
        assert_eq!(nodal_values.len(), self.num_nodes());
        self.psi
            .iter()
            .zip(nodal_values)
            .fold(T::zero(), |acc, (&psi, &u)| acc + psi * u)
    }

    /// Physical gradient of the interpolant of nodal scalar values.
    pub fn interpolate_gradient(&self, nodal_values: &[T]) -> Vector2<T> {
        assert_eq!(nodal_values.len(), self.num_nodes());
        self.dpsidx
            .column_iter()
            .zip(nodal_values)
            .fold(Vector2::zeros(), |acc, (grad, &u)| acc + grad * u)
    }

    /// Derivatives of the determinant and the physical gradients with respect to the nodal
    /// positions.
    ///
    /// Perturbing node `q` in direction `p` changes the mapping Jacobian by
    /// `dJ = e_p (grad_s psi_q)^T`, which gives `dJ/dX_{pq} = J dpsi_q/dx_p` and
    /// `d(dpsi_l/dx_i)/dX_{pq} = -(dpsi_l/dx_p) (dpsi_q/dx_i)`.
    pub fn sensitivity(&self) -> MappedBasisSensitivity<T> {
        let n = self.num_nodes();
        let d_jacobian_det_dx = &self.dpsidx * self.jacobian_det;
        let mut d_dpsidx_dx = RankFourTensor::zeros(2, n, n, 2);
        for p in 0..2 {
            for q in 0..n {
                for l in 0..n {
                    for i in 0..2 {
                        d_dpsidx_dx[(p, q, l, i)] = -self.dpsidx[(p, l)] * self.dpsidx[(i, q)];
                    }
                }
            }
        }
        MappedBasisSensitivity {
            d_jacobian_det_dx,
            d_dpsidx_dx,
        }
    }
}
