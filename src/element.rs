//! Reference element shapes.
//!
//! A shape only knows its basis functions on the reference domain and its face topology.
//! Node positions live in a [`NodeArena`](crate::nodes::NodeArena); elements map from the
//! reference domain isoparametrically, i.e. `x(xi) = sum_l X_l psi_l(xi)`.
use crate::nalgebra::{Matrix2xX, Point2};
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod quadrilateral;
mod segment;
mod triangle;

pub use quadrilateral::*;
pub use segment::*;
pub use triangle::*;

/// Basis functions and topology of a two-dimensional reference element.
pub trait ReferenceShape: Debug {
    /// Returns the number of nodes in the element.
    fn num_nodes(&self) -> usize;

    /// Evaluates each basis function at the given reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the length of `basis_values` is not equal to the number of nodes.
    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>);

    /// Stores the gradient of each basis function with respect to the reference coordinates
    /// in the corresponding column of `basis_gradients`.
    ///
    /// # Panics
    ///
    /// Panics if the number of columns is not equal to the number of nodes.
    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, xi: &Point2<T>);

    fn num_faces(&self) -> usize;

    /// The local nodes on the given face, ordered along the face in the direction of
    /// increasing face coordinate, or `None` if the face does not exist.
    fn face_nodes(&self, face: usize) -> Option<&'static [usize]>;

    /// The segment shape that interpolates along each face.
    fn face_segment(&self) -> SegmentShape;

    /// The quadrature rule used when none is explicitly configured.
    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T>;

    /// Evenly spaced points covering the reference domain, with `points_per_edge` points
    /// along each edge.
    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>>;
}

/// Tagged variant over the supported shapes, for meshes that mix element types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementShape {
    Quad4,
    Quad9,
    Tri3,
    Tri6,
}

macro_rules! dispatch_shape {
    ($self:expr, $shape:ident => $body:expr) => {
        match $self {
            ElementShape::Quad4 => {
                let $shape = Quad4;
                $body
            }
            ElementShape::Quad9 => {
                let $shape = Quad9;
                $body
            }
            ElementShape::Tri3 => {
                let $shape = Tri3;
                $body
            }
            ElementShape::Tri6 => {
                let $shape = Tri6;
                $body
            }
        }
    };
}

impl ReferenceShape for ElementShape {
    fn num_nodes(&self) -> usize {
        dispatch_shape!(self, shape => shape.num_nodes())
    }

    fn populate_basis<T: Real>(&self, basis_values: &mut [T], xi: &Point2<T>) {
        dispatch_shape!(self, shape => shape.populate_basis(basis_values, xi))
    }

    fn populate_basis_gradients<T: Real>(&self, basis_gradients: &mut Matrix2xX<T>, xi: &Point2<T>) {
        dispatch_shape!(self, shape => shape.populate_basis_gradients(basis_gradients, xi))
    }

    fn num_faces(&self) -> usize {
        dispatch_shape!(self, shape => shape.num_faces())
    }

    fn face_nodes(&self, face: usize) -> Option<&'static [usize]> {
        dispatch_shape!(self, shape => shape.face_nodes(face))
    }

    fn face_segment(&self) -> SegmentShape {
        dispatch_shape!(self, shape => shape.face_segment())
    }

    fn default_quadrature<T: Real>(&self) -> QuadraturePair2d<T> {
        dispatch_shape!(self, shape => shape.default_quadrature())
    }

    fn sample_points<T: Real>(&self, points_per_edge: usize) -> Vec<Point2<T>> {
        dispatch_shape!(self, shape => shape.sample_points(points_per_edge))
    }
}

/// Coordinate of point `i` out of `n` evenly spaced points on `[-1, 1]`.
fn evenly_spaced<T: Real>(i: usize, n: usize) -> T {
    if n <= 1 {
        T::zero()
    } else {
        let fraction: T = crate::nalgebra::convert(i as f64 / (n - 1) as f64);
        fraction + fraction - T::one()
    }
}
