//! Gap-width coefficients and prescribed boundary fluxes.
//!
//! Both are user-supplied callbacks evaluated at physical points. Spatial gradients are
//! optional and only required for mesh sensitivities.
use numeric_literals::replace_float_literals;

use crate::nalgebra::{Point2, Vector2};
use crate::Real;
use serde::{Deserialize, Serialize};

/// Gap width and its time derivative at a point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GapWidthValue<T> {
    pub h: T,
    pub dhdt: T,
}

/// Spatial derivatives of the gap width and of its time derivative.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GapWidthGradient<T: Real> {
    pub dhdx: Vector2<T>,
    pub d_dhdt_dx: Vector2<T>,
}

impl<T: Real> GapWidthGradient<T> {
    pub fn zeros() -> Self {
        Self {
            dhdx: Vector2::zeros(),
            d_dhdt_dx: Vector2::zeros(),
        }
    }
}

/// The gap width `h(x, t)` of the Hele-Shaw cell.
pub trait GapWidth<T: Real> {
    /// Evaluates `h` and `dh/dt` at the physical point `x`.
    ///
    /// `ipt` is the index of the integration point at which the coefficient is requested,
    /// which implementations may use to cache per-point data.
    fn evaluate(&self, ipt: usize, x: &Point2<T>) -> GapWidthValue<T>;

    /// Evaluates the spatial gradients of `h` and `dh/dt`, if available.
    fn evaluate_gradient(&self, _ipt: usize, _x: &Point2<T>) -> Option<GapWidthGradient<T>> {
        None
    }
}

impl<T: Real, G: GapWidth<T> + ?Sized> GapWidth<T> for &G {
    fn evaluate(&self, ipt: usize, x: &Point2<T>) -> GapWidthValue<T> {
        G::evaluate(self, ipt, x)
    }

    fn evaluate_gradient(&self, ipt: usize, x: &Point2<T>) -> Option<GapWidthGradient<T>> {
        G::evaluate_gradient(self, ipt, x)
    }
}

/// A gap width that is uniform in space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantGap<T> {
    pub h: T,
    pub dhdt: T,
}

impl<T: Real> ConstantGap<T> {
    pub fn new(h: T, dhdt: T) -> Self {
        Self { h, dhdt }
    }
}

impl<T: Real> Default for ConstantGap<T> {
    fn default() -> Self {
        Self::new(T::one(), T::zero())
    }
}

impl<T: Real> GapWidth<T> for ConstantGap<T> {
    fn evaluate(&self, _ipt: usize, _x: &Point2<T>) -> GapWidthValue<T> {
        GapWidthValue {
            h: self.h,
            dhdt: self.dhdt,
        }
    }

    fn evaluate_gradient(&self, _ipt: usize, _x: &Point2<T>) -> Option<GapWidthGradient<T>> {
        Some(GapWidthGradient::zeros())
    }
}

/// A smoothed step in the gap width,
///
/// `h(x, y) = base + amplitude * tanh(1 - alpha (tan_phi x - y))`,
///
/// squeezed uniformly in time so that `dh/dt = squeeze_rate * h`.
///
/// `alpha` controls the steepness of the step and `tan_phi` its orientation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TanhStepGap<T> {
    pub alpha: T,
    pub tan_phi: T,
    pub base: T,
    pub amplitude: T,
    pub squeeze_rate: T,
}

impl<T: Real> Default for TanhStepGap<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn default() -> Self {
        Self {
            alpha: 1.0,
            tan_phi: 1.0,
            base: 1.0,
            amplitude: 0.5,
            squeeze_rate: 0.0,
        }
    }
}

impl<T: Real> TanhStepGap<T> {
    /// Returns a copy with the given step steepness.
    pub fn with_steepness(self, alpha: T) -> Self {
        Self { alpha, ..self }
    }

    fn step_argument(&self, x: &Point2<T>) -> T {
        T::one() - self.alpha * (self.tan_phi * x.x - x.y)
    }
}

impl<T: Real> GapWidth<T> for TanhStepGap<T> {
    fn evaluate(&self, _ipt: usize, x: &Point2<T>) -> GapWidthValue<T> {
        let h = self.base + self.amplitude * self.step_argument(x).tanh();
        GapWidthValue {
            h,
            dhdt: self.squeeze_rate * h,
        }
    }

    fn evaluate_gradient(&self, _ipt: usize, x: &Point2<T>) -> Option<GapWidthGradient<T>> {
        let tanh = self.step_argument(x).tanh();
        // d/ds tanh(s) = 1 - tanh^2(s)
        let scale = self.amplitude * (T::one() - tanh * tanh);
        let dhdx = Vector2::new(-scale * self.alpha * self.tan_phi, scale * self.alpha);
        Some(GapWidthGradient {
            dhdx,
            d_dhdt_dx: dhdx * self.squeeze_rate,
        })
    }
}

/// Adapts a closure `(ipt, x) -> GapWidthValue` to [`GapWidth`].
///
/// Closures provide no spatial gradients, so elements using them cannot compute mesh
/// sensitivities.
#[derive(Debug, Copy, Clone)]
pub struct GapFn<F>(pub F);

impl<T, F> GapWidth<T> for GapFn<F>
where
    T: Real,
    F: Fn(usize, &Point2<T>) -> GapWidthValue<T>,
{
    fn evaluate(&self, ipt: usize, x: &Point2<T>) -> GapWidthValue<T> {
        (self.0)(ipt, x)
    }
}

/// A prescribed normal flux on the boundary.
pub trait FluxFunction<T: Real> {
    fn flux(&self, x: &Point2<T>) -> T;

    /// Spatial gradient of the flux, if available.
    fn flux_gradient(&self, _x: &Point2<T>) -> Option<Vector2<T>> {
        None
    }
}

impl<T: Real, F: FluxFunction<T> + ?Sized> FluxFunction<T> for &F {
    fn flux(&self, x: &Point2<T>) -> T {
        F::flux(self, x)
    }

    fn flux_gradient(&self, x: &Point2<T>) -> Option<Vector2<T>> {
        F::flux_gradient(self, x)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantFlux<T> {
    pub value: T,
}

impl<T: Real> ConstantFlux<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Real> FluxFunction<T> for ConstantFlux<T> {
    fn flux(&self, _x: &Point2<T>) -> T {
        self.value
    }

    fn flux_gradient(&self, _x: &Point2<T>) -> Option<Vector2<T>> {
        Some(Vector2::zeros())
    }
}

/// Adapts a closure `x -> flux` to [`FluxFunction`]. Provides no gradient.
#[derive(Debug, Copy, Clone)]
pub struct FluxFn<F>(pub F);

impl<T, F> FluxFunction<T> for FluxFn<F>
where
    T: Real,
    F: Fn(&Point2<T>) -> T,
{
    fn flux(&self, x: &Point2<T>) -> T {
        (self.0)(x)
    }
}
