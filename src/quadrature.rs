//! Quadrature rules on the reference domains, converted to the working scalar type.
use crate::nalgebra::{convert, OPoint, Point1, Point2, U1, U2};
use crate::Real;

/// Errors returned by quadrature constructors.
pub use hele_shaw_quadrature::Error as QuadratureError;

pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);
pub type QuadraturePair1d<T> = QuadraturePair<T, U1>;
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;

/// Gauss-Legendre rule with the given number of points on `[-1, 1]`.
pub fn gauss<T: Real>(num_points: usize) -> Result<QuadraturePair1d<T>, QuadratureError> {
    let (weights, points) = hele_shaw_quadrature::univariate::gauss(num_points)?;
    let weights = weights.into_iter().map(convert).collect();
    let points = points.into_iter().map(|[x]| Point1::new(convert(x))).collect();
    Ok((weights, points))
}

/// Tensor-product Gauss rule with the given number of points per dimension on `[-1, 1]^2`.
pub fn quadrilateral_gauss<T: Real>(num_points_per_dim: usize) -> Result<QuadraturePair2d<T>, QuadratureError> {
    Ok(convert_rule_2d(hele_shaw_quadrature::tensor::quadrilateral_gauss(num_points_per_dim)?))
}

/// Symmetric rule of the given polynomial strength on the reference triangle.
pub fn triangle<T: Real>(strength: usize) -> Result<QuadraturePair2d<T>, QuadratureError> {
    Ok(convert_rule_2d(hele_shaw_quadrature::simplex::triangle(strength)?))
}

fn convert_rule_2d<T: Real>(rule: hele_shaw_quadrature::Rule2d) -> QuadraturePair2d<T> {
    let (weights, points) = rule;
    let weights = weights.into_iter().map(convert).collect();
    let points = points
        .into_iter()
        .map(|[x, y]| Point2::new(convert(x), convert(y)))
        .collect();
    (weights, points)
}
