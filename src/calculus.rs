//! Finite-difference approximations, for checking analytic derivatives.
use crate::nalgebra::{DMatrix, DVector};
use crate::Real;
use numeric_literals::replace_float_literals;

/// Approximates the Jacobian of `f: R^n -> R^m` at `x` using central finite differences
/// with step size `h`.
///
/// The vector `x` is mutable in order to hold the perturbed points, but upon returning its
/// content is unchanged.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn approximate_jacobian_fd<T>(mut f: impl FnMut(&DVector<T>) -> DVector<T>, x: &mut DVector<T>, h: T) -> DMatrix<T>
where
    T: Real,
{
    let f_x = f(x);
    let mut result = DMatrix::zeros(f_x.len(), x.len());

    for j in 0..x.len() {
        let x_j = x[j];
        x[j] = x_j + h;
        let f_plus = f(x);
        x[j] = x_j - h;
        let f_minus = f(x);
        x[j] = x_j;

        // result[.., j] := (f+ - f-) / 2h
        let mut column_j = result.column_mut(j);
        column_j += &f_plus;
        column_j -= &f_minus;
        column_j /= 2.0 * h;
    }

    result
}

/// Approximates the directional derivative `df/dx . direction` of `f: R^n -> R^m` at `x`
/// with a central finite difference of step size `h`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn approximate_directional_derivative_fd<T>(
    mut f: impl FnMut(&DVector<T>) -> DVector<T>,
    x: &DVector<T>,
    direction: &DVector<T>,
    h: T,
) -> DVector<T>
where
    T: Real,
{
    assert_eq!(x.len(), direction.len(), "Direction must have the same dimension as x");
    let f_plus = f(&(x + direction * h));
    let f_minus = f(&(x - direction * h));
    (f_plus - f_minus) / (2.0 * h)
}
