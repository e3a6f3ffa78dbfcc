use numeric_literals::replace_float_literals;

use crate::quadrature::{gauss, QuadraturePair1d};
use crate::Real;
use serde::{Deserialize, Serialize};

/// Lagrange interpolation along a face, parametrized by `s` in `[-1, 1]`.
///
/// Node order follows the face: the linear segment has nodes at `s = -1, 1`, the quadratic
/// segment at `s = -1, 0, 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentShape {
    Linear,
    Quadratic,
}

impl SegmentShape {
    pub fn num_nodes(&self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Quadratic => 3,
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn populate_basis<T: Real>(&self, basis_values: &mut [T], s: T) {
        assert_eq!(basis_values.len(), self.num_nodes(), "Basis buffer must have one entry per node");
        match self {
            Self::Linear => basis_values.copy_from_slice(&[0.5 * (1.0 - s), 0.5 * (1.0 + s)]),
            Self::Quadratic => {
                basis_values.copy_from_slice(&[0.5 * s * (s - 1.0), 1.0 - s * s, 0.5 * s * (s + 1.0)])
            }
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn populate_basis_derivatives<T: Real>(&self, basis_derivatives: &mut [T], s: T) {
        assert_eq!(
            basis_derivatives.len(),
            self.num_nodes(),
            "Derivative buffer must have one entry per node"
        );
        match self {
            Self::Linear => basis_derivatives.copy_from_slice(&[-0.5, 0.5]),
            Self::Quadratic => basis_derivatives.copy_from_slice(&[s - 0.5, -2.0 * s, s + 0.5]),
        }
    }

    /// Gauss rule with one point per node, exact for the mass-like integrands on straight faces.
    pub fn default_quadrature<T: Real>(&self) -> QuadraturePair1d<T> {
        gauss(self.num_nodes()).expect("Internal error: low-order Gauss rules are always available")
    }
}
