use hele_shaw_quadrature::simplex::triangle;
use hele_shaw_quadrature::Error;
use matrixcompare::assert_scalar_eq;

/// Exact integral of x^a y^b over the reference triangle (-1, -1), (1, -1), (-1, 1),
/// computed by mapping to the unit triangle: x = 2 xi - 1, y = 2 eta - 1.
fn exact_monomial_integral(a: u32, b: u32) -> f64 {
    // Expand (2 xi - 1)^a (2 eta - 1)^b and use int_unit xi^i eta^j = i! j! / (i + j + 2)!
    let factorial = |n: u32| (1..=n).map(f64::from).product::<f64>();
    let binomial = |n: u32, k: u32| factorial(n) / (factorial(k) * factorial(n - k));
    let mut sum = 0.0;
    for i in 0..=a {
        for j in 0..=b {
            let coeff = binomial(a, i)
                * binomial(b, j)
                * 2f64.powi((i + j) as i32)
                * (-1f64).powi((a - i + b - j) as i32);
            sum += coeff * factorial(i) * factorial(j) / factorial(i + j + 2);
        }
    }
    // Jacobian determinant of the map from the unit triangle is 4
    4.0 * sum
}

#[test]
fn triangle_rules_have_expected_area() {
    for strength in 0..=5 {
        let (weights, _) = triangle(strength).unwrap();
        assert_scalar_eq!(weights.iter().sum::<f64>(), 2.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn triangle_rules_integrate_monomials_up_to_strength() {
    for strength in 1..=5 {
        let (weights, points) = triangle(strength).unwrap();
        for a in 0..=strength as u32 {
            for b in 0..=(strength as u32 - a) {
                let computed: f64 = weights
                    .iter()
                    .zip(&points)
                    .map(|(w, [x, y])| w * x.powi(a as i32) * y.powi(b as i32))
                    .sum();
                let expected = exact_monomial_integral(a, b);
                assert_scalar_eq!(computed, expected, comp = abs, tol = 1e-10);
            }
        }
    }
}

#[test]
fn triangle_points_lie_inside_reference_triangle() {
    for strength in 0..=5 {
        let (_, points) = triangle(strength).unwrap();
        for [x, y] in points {
            assert!(x >= -1.0 && y >= -1.0 && x + y <= 0.0);
        }
    }
}

#[test]
fn unavailable_triangle_strength_is_an_error() {
    assert_eq!(triangle(6), Err(Error::NoRuleAvailable));
}
