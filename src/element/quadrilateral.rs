use numeric_literals::replace_float_literals;

use crate::element::{evenly_spaced, ReferenceShape, SegmentShape};
use crate::nalgebra::{Matrix2xX, Point2, Vector2};
use crate::quadrature::{quadrilateral_gauss, QuadraturePair2d};
use crate::Real;
use serde::{Deserialize, Serialize};

/// Bilinear quadrilateral on `[-1, 1]^2`.
///
/// Nodes are numbered counter-clockwise from the corner `(-1, -1)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quad4;

/// Biquadratic (nine-node Lagrange) quadrilateral on `[-1, 1]^2`.
///
/// Nodes 0-3 are the corners as in [`Quad4`], nodes 4-7 the edge midpoints starting from the
/// edge between node 0 and 1, and node 8 is the center.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quad9;

static QUAD4_FACES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
static QUAD9_FACES: [[usize; 3]; 4] = [[0, 4, 1], [1, 5, 2], [2, 6, 3], [3, 7, 0]];

/// Reference coordinates of the Quad9 nodes, which also identify the 1D factors of each
/// basis function.
#[rustfmt::skip]
const QUAD9_NODES: [(f64, f64); 9] = [
    (-1.0, -1.0), ( 1.0, -1.0), ( 1.0,  1.0), (-1.0,  1.0),
    ( 0.0, -1.0), ( 1.0,  0.0), ( 0.0,  1.0), (-1.0,  0.0),
    ( 0.0,  0.0),
];

#[rustfmt::skip]
const QUAD4_NODES: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

fn quad_sample_points<T: Real>(points_per_edge: usize) -> Vec<Point2<T>> {
    let n = points_per_edge.max(1);
    let mut points = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            points.push(Point2::new(evenly_spaced(i, n), evenly_spaced(j, n)));
        }
    }
    points
}

impl ReferenceShape for Quad4 {
    fn num_nodes(&self) -> usize {
        4
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>) {
        assert_eq!(basis_values.len(), 4, "Basis buffer must have one entry per node");
        // N_{alpha, beta}(xi) = (1 + alpha xi_0) (1 + beta xi_1) / 4, so that
        //  N_{alpha, beta}([alpha, beta]) = 1
        for (value, &(alpha, beta)) in basis_values.iter_mut().zip(&QUAD4_NODES) {
            let alpha = T::from_f64(alpha).expect("Literal must fit in T");
            let beta = T::from_f64(beta).expect("Literal must fit in T");
            *value = (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) / 4.0;
        }
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, xi: &Point2<T>) {
        assert_eq!(basis_gradients.ncols(), 4, "Gradient buffer must have one column per node");
        for (mut gradient, &(alpha, beta)) in basis_gradients.column_iter_mut().zip(&QUAD4_NODES) {
            let alpha = T::from_f64(alpha).expect("Literal must fit in T");
            let beta = T::from_f64(beta).expect("Literal must fit in T");
            gradient.copy_from(&Vector2::new(
                alpha * (1.0 + beta * xi[1]) / 4.0,
                beta * (1.0 + alpha * xi[0]) / 4.0,
            ));
        }
    }

    fn num_faces(&self) -> usize {
        4
    }

    fn face_nodes(&self, face: usize) -> Option<&'static [usize]> {
        QUAD4_FACES.get(face).map(|nodes| nodes.as_slice())
    }

    fn face_segment(&self) -> SegmentShape {
        SegmentShape::Linear
    }

    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T> {
        quadrilateral_gauss(2).expect("Internal error: two-point Gauss rule is always available")
    }

    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>> {
        quad_sample_points(points_per_edge)
    }
}

/// One-dimensional quadratic Lagrange factor associated with the node at `alpha` in
/// `{-1, 0, 1}`, evaluated at `xi`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn quad9_phi_1d<T: Real>(alpha: T, xi: T) -> T {
    let alpha2 = alpha * alpha;
    let a = (3.0 / 2.0) * alpha2 - 1.0;
    let b = alpha / 2.0;
    let c = 1.0 - alpha2;
    a * xi * xi + b * xi + c
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn quad9_phi_grad_1d<T: Real>(alpha: T, xi: T) -> T {
    let alpha2 = alpha * alpha;
    let a = (3.0 / 2.0) * alpha2 - 1.0;
    let b = alpha / 2.0;
    2.0 * a * xi + b
}

impl ReferenceShape for Quad9 {
    fn num_nodes(&self) -> usize {
        9
    }

    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>) {
        assert_eq!(basis_values.len(), 9, "Basis buffer must have one entry per node");
        for (value, &(alpha, beta)) in basis_values.iter_mut().zip(&QUAD9_NODES) {
            let alpha = T::from_f64(alpha).expect("Literal must fit in T");
            let beta = T::from_f64(beta).expect("Literal must fit in T");
            *value = quad9_phi_1d(alpha, xi[0]) * quad9_phi_1d(beta, xi[1]);
        }
    }

    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, xi: &Point2<T>) {
        assert_eq!(basis_gradients.ncols(), 9, "Gradient buffer must have one column per node");
        for (mut gradient, &(alpha, beta)) in basis_gradients.column_iter_mut().zip(&QUAD9_NODES) {
            let alpha = T::from_f64(alpha).expect("Literal must fit in T");
            let beta = T::from_f64(beta).expect("Literal must fit in T");
            gradient.copy_from(&Vector2::new(
                quad9_phi_grad_1d(alpha, xi[0]) * quad9_phi_1d(beta, xi[1]),
                quad9_phi_1d(alpha, xi[0]) * quad9_phi_grad_1d(beta, xi[1]),
            ));
        }
    }

    fn num_faces(&self) -> usize {
        4
    }

    fn face_nodes(&self, face: usize) -> Option<&'static [usize]> {
        QUAD9_FACES.get(face).map(|nodes| nodes.as_slice())
    }

    fn face_segment(&self) -> SegmentShape {
        SegmentShape::Quadratic
    }

    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T> {
        quadrilateral_gauss(3).expect("Internal error: three-point Gauss rule is always available")
    }

    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>> {
        quad_sample_points(points_per_edge)
    }
}
