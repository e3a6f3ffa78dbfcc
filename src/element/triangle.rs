use numeric_literals::replace_float_literals;

use crate::element::{evenly_spaced, ReferenceShape, SegmentShape};
use crate::nalgebra::{Matrix2xX, Point2, Vector2};
use crate::quadrature::{triangle, QuadraturePair2d};
use crate::Real;
use serde::{Deserialize, Serialize};

/// Linear triangle on the reference triangle with vertices `(-1, -1)`, `(1, -1)` and `(-1, 1)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tri3;

/// Quadratic triangle on the same reference domain as [`Tri3`].
///
/// Nodes 0-2 are the vertices, nodes 3, 4 and 5 the midpoints of the edges `(0, 1)`, `(1, 2)`
/// and `(2, 0)` respectively.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tri6;

static TRI3_FACES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
static TRI6_FACES: [[usize; 3]; 3] = [[0, 3, 1], [1, 4, 2], [2, 5, 0]];

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn barycentric<T: Real>(xi: &Point2<T>) -> [T; 3] {
    [-0.5 * xi.x - 0.5 * xi.y, 0.5 * xi.x + 0.5, 0.5 * xi.y + 0.5]
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
fn barycentric_gradients<T: Real>() -> [Vector2<T>; 3] {
    [Vector2::new(-0.5, -0.5), Vector2::new(0.5, 0.0), Vector2::new(0.0, 0.5)]
}

fn triangle_sample_points<T: Real>(points_per_edge: usize) -> Vec<Point2<T>> {
    let n = points_per_edge.max(1);
    if n == 1 {
        let third: T = crate::nalgebra::convert(1.0 / 3.0);
        return vec![Point2::new(-third, -third)];
    }
    let mut points = Vec::with_capacity(n * (n + 1) / 2);
    for j in 0..n {
        for i in 0..n - j {
            points.push(Point2::new(evenly_spaced(i, n), evenly_spaced(j, n)));
        }
    }
    points
}

impl ReferenceShape for Tri3 {
    fn num_nodes(&self) -> usize {
        3
    }

    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>) {
        assert_eq!(basis_values.len(), 3, "Basis buffer must have one entry per node");
        basis_values.copy_from_slice(&barycentric(xi));
    }

    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, _xi: &Point2<T>) {
        assert_eq!(basis_gradients.ncols(), 3, "Gradient buffer must have one column per node");
        for (mut column, gradient) in basis_gradients
            .column_iter_mut()
            .zip(barycentric_gradients::<T>())
        {
            column.copy_from(&gradient);
        }
    }

    fn num_faces(&self) -> usize {
        3
    }

    fn face_nodes(&self, face: usize) -> Option<&'static [usize]> {
        TRI3_FACES.get(face).map(|nodes| nodes.as_slice())
    }

    fn face_segment(&self) -> SegmentShape {
        SegmentShape::Linear
    }

    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T> {
        triangle(2).expect("Internal error: strength 2 triangle rule is always available")
    }

    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>> {
        triangle_sample_points(points_per_edge)
    }
}

impl ReferenceShape for Tri6 {
    fn num_nodes(&self) -> usize {
        6
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>) {
        assert_eq!(basis_values.len(), 6, "Basis buffer must have one entry per node");
        // Products of the linear (barycentric) basis functions
        let psi = barycentric(xi);
        basis_values.copy_from_slice(&[
            psi[0] * (2.0 * psi[0] - 1.0),
            psi[1] * (2.0 * psi[1] - 1.0),
            psi[2] * (2.0 * psi[2] - 1.0),
            4.0 * psi[0] * psi[1],
            4.0 * psi[1] * psi[2],
            4.0 * psi[2] * psi[0],
        ]);
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, xi: &Point2<T>) {
        assert_eq!(basis_gradients.ncols(), 6, "Gradient buffer must have one column per node");
        let psi = barycentric(xi);
        let g = barycentric_gradients::<T>();

        let vertex_gradient = |i: usize| g[i] * (4.0 * psi[i] - 1.0);
        // Edge node between vertex i and j
        let edge_gradient = |i: usize, j: usize| g[i] * (4.0 * psi[j]) + g[j] * (4.0 * psi[i]);

        let gradients = [
            vertex_gradient(0),
            vertex_gradient(1),
            vertex_gradient(2),
            edge_gradient(0, 1),
            edge_gradient(1, 2),
            edge_gradient(2, 0),
        ];
        for (mut column, gradient) in basis_gradients.column_iter_mut().zip(gradients) {
            column.copy_from(&gradient);
        }
    }

    fn num_faces(&self) -> usize {
        3
    }

    fn face_nodes(&self, face: usize) -> Option<&'static [usize]> {
        TRI6_FACES.get(face).map(|nodes| nodes.as_slice())
    }

    fn face_segment(&self) -> SegmentShape {
        SegmentShape::Quadratic
    }

    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T> {
        triangle(4).expect("Internal error: strength 4 triangle rule is always available")
    }

    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>> {
        triangle_sample_points(points_per_edge)
    }
}
