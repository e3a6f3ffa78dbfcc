//! Post-processing of bulk elements: velocity reconstruction, error norms and plot data.
use crate::assembly::HeleShawElement;
use crate::coefficient::GapWidth;
use crate::element::ReferenceShape;
use crate::error::AssemblyError;
use crate::mapping::{evaluate_mapped_basis, MappedBasis};
use crate::nalgebra::{Point2, Vector2, Vector3};
use crate::nodes::NodeArena;
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use eyre::eyre;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Squared error and squared norm of the exact solution, accumulated over an integration
/// domain.
///
/// Both quantities are left unrooted so that contributions of several elements can be summed
/// before taking a single square root.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNorms<T> {
    pub error: T,
    pub norm: T,
}

impl<T: Real> ErrorNorms<T> {
    pub fn zero() -> Self {
        Self {
            error: T::zero(),
            norm: T::zero(),
        }
    }

    /// Error relative to the norm of the exact solution, `sqrt(error / norm)`.
    pub fn relative_error(&self) -> T {
        (self.error / self.norm).sqrt()
    }
}

impl<T: Real> Add for ErrorNorms<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            error: self.error + rhs.error,
            norm: self.norm + rhs.norm,
        }
    }
}

impl<T: Real> AddAssign for ErrorNorms<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Real> Sum for ErrorNorms<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// Error of the numerical solution at a single quadrature point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Real + Serialize + for<'a> Deserialize<'a>")]
pub struct PointwiseError<T: Real> {
    pub x: Point2<T>,
    /// Exact minus computed velocity.
    pub velocity_error: Vector2<T>,
    /// Exact minus computed pressure.
    pub pressure_error: T,
}

/// Solution data sampled at a point of an element, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Real + Serialize + for<'a> Deserialize<'a>")]
pub struct PlotPoint<T: Real> {
    pub x: Point2<T>,
    pub velocity: Vector2<T>,
    pub pressure: T,
    pub gap_width: T,
    /// Spatial gradient of the gap width, if the gap width provides one.
    pub gap_width_gradient: Option<Vector2<T>>,
}

impl<T, S, G> HeleShawElement<T, S, G>
where
    T: Real,
    S: ReferenceShape,
    G: GapWidth<T>,
{
    fn mapped_basis(&self, nodes: &NodeArena<T>, xi: &Point2<T>) -> eyre::Result<(MappedBasis<T>, Vec<T>)> {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        let basis = evaluate_mapped_basis(self.shape(), &positions, xi)?;
        Ok((basis, pressures))
    }

    /// The velocity `-h^2 grad p`. The gap width is requested for integration point 0.
    fn velocity_from(&self, basis: &MappedBasis<T>, pressures: &[T]) -> Vector2<T> {
        let h = self.gap().evaluate(0, &basis.x).h;
        -basis.interpolate_gradient(pressures) * (h * h)
    }

    pub fn interpolated_position(&self, nodes: &NodeArena<T>, xi: &Point2<T>) -> eyre::Result<Point2<T>> {
        Ok(self.mapped_basis(nodes, xi)?.0.x)
    }

    pub fn interpolated_pressure(&self, nodes: &NodeArena<T>, xi: &Point2<T>) -> eyre::Result<T> {
        let (basis, pressures) = self.mapped_basis(nodes, xi)?;
        Ok(basis.interpolate(&pressures))
    }

    pub fn pressure_gradient(&self, nodes: &NodeArena<T>, xi: &Point2<T>) -> eyre::Result<Vector2<T>> {
        let (basis, pressures) = self.mapped_basis(nodes, xi)?;
        Ok(basis.interpolate_gradient(&pressures))
    }

    /// Depth-averaged velocity `-h^2 grad p` at the given reference coordinates.
    pub fn velocity(&self, nodes: &NodeArena<T>, xi: &Point2<T>) -> eyre::Result<Vector2<T>> {
        let (basis, pressures) = self.mapped_basis(nodes, xi)?;
        Ok(self.velocity_from(&basis, &pressures))
    }

    /// Compares velocity and pressure against an exact solution `x -> (u, v, p)` using the
    /// element's quadrature rule.
    pub fn compute_error<F>(&self, nodes: &NodeArena<T>, exact_solution: F) -> eyre::Result<ErrorNorms<T>>
    where
        F: Fn(&Point2<T>) -> Vector3<T>,
    {
        self.compute_error_with_quadrature(nodes, exact_solution, self.quadrature())
    }

    /// As [`compute_error`](Self::compute_error), but integrating with the given rule.
    pub fn compute_error_with_quadrature<F>(
        &self,
        nodes: &NodeArena<T>,
        exact_solution: F,
        quadrature: &QuadraturePair2d<T>,
    ) -> eyre::Result<ErrorNorms<T>>
    where
        F: Fn(&Point2<T>) -> Vector3<T>,
    {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        let (weights, points) = quadrature;
        let mut norms = ErrorNorms::zero();
        for (&weight, xi) in weights.iter().zip(points) {
            let basis = evaluate_mapped_basis(self.shape(), &positions, xi)?;
            let velocity = self.velocity_from(&basis, &pressures);
            let computed = Vector3::new(velocity.x, velocity.y, basis.interpolate(&pressures));
            let exact = exact_solution(&basis.x);
            let scale = weight * basis.jacobian_det;
            norms += ErrorNorms {
                error: (exact - computed).norm_squared() * scale,
                norm: exact.norm_squared() * scale,
            };
        }
        Ok(norms)
    }

    /// Error against a time-dependent exact solution.
    ///
    /// The gap width carries all time dependence, so comparing against a time-dependent
    /// solution is not defined for this element and the call always fails with
    /// [`AssemblyError::Unsupported`].
    pub fn compute_unsteady_error<F>(&self, _nodes: &NodeArena<T>, _exact_solution: F, _time: T) -> eyre::Result<ErrorNorms<T>>
    where
        F: Fn(T, &Point2<T>) -> Vector3<T>,
    {
        Err(eyre!(AssemblyError::Unsupported(
            "error computation against a time-dependent exact solution"
        )))
    }

    /// Velocity and pressure errors at each quadrature point of the element.
    pub fn pointwise_errors<F>(&self, nodes: &NodeArena<T>, exact_solution: F) -> eyre::Result<Vec<PointwiseError<T>>>
    where
        F: Fn(&Point2<T>) -> Vector3<T>,
    {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        let (_, points) = self.quadrature();
        points
            .iter()
            .map(|xi| {
                let basis = evaluate_mapped_basis(self.shape(), &positions, xi)?;
                let velocity = self.velocity_from(&basis, &pressures);
                let exact = exact_solution(&basis.x);
                Ok(PointwiseError {
                    x: basis.x,
                    velocity_error: Vector2::new(exact.x - velocity.x, exact.y - velocity.y),
                    pressure_error: exact.z - basis.interpolate(&pressures),
                })
            })
            .collect()
    }

    /// Samples the solution on the evenly spaced lattice of
    /// [`ReferenceShape::sample_points`], which covers the whole reference domain with
    /// `points_per_edge` points along each edge.
    pub fn plot_points(&self, nodes: &NodeArena<T>, points_per_edge: usize) -> eyre::Result<Vec<PlotPoint<T>>> {
        let (positions, pressures) = self.gather_nodal_data(nodes)?;
        self.shape()
            .sample_points(points_per_edge)
            .iter()
            .map(|xi| {
                let basis = evaluate_mapped_basis(self.shape(), &positions, xi)?;
                let gap = self.gap().evaluate(0, &basis.x);
                Ok(PlotPoint {
                    x: basis.x,
                    velocity: self.velocity_from(&basis, &pressures),
                    pressure: basis.interpolate(&pressures),
                    gap_width: gap.h,
                    gap_width_gradient: self
                        .gap()
                        .evaluate_gradient(0, &basis.x)
                        .map(|gradient| gradient.dhdx),
                })
            })
            .collect()
    }
}

/// Reconstructs the velocity `-h^2 grad p` of a bulk element at the given reference
/// coordinates.
pub fn reconstruct_velocity<T, S, G>(
    element: &HeleShawElement<T, S, G>,
    nodes: &NodeArena<T>,
    xi: &Point2<T>,
) -> eyre::Result<Vector2<T>>
where
    T: Real,
    S: ReferenceShape,
    G: GapWidth<T>,
{
    element.velocity(nodes, xi)
}

/// Accumulates the squared error and squared norm of the element solution against an exact
/// solution `x -> (u, v, p)`.
pub fn compute_pointwise_error<T, S, G, F>(
    element: &HeleShawElement<T, S, G>,
    nodes: &NodeArena<T>,
    exact_solution: F,
) -> eyre::Result<ErrorNorms<T>>
where
    T: Real,
    S: ReferenceShape,
    G: GapWidth<T>,
    F: Fn(&Point2<T>) -> Vector3<T>,
{
    element.compute_error(nodes, exact_solution)
}
