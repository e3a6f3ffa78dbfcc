use hele_shaw_quadrature::univariate::gauss;
use hele_shaw_quadrature::Error;
use matrixcompare::assert_scalar_eq;

fn integrate(rule: &(Vec<f64>, Vec<[f64; 1]>), f: impl Fn(f64) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, [x])| w * f(*x)).sum()
}

#[test]
fn gauss_rejects_zero_points() {
    assert_eq!(gauss(0), Err(Error::NoRuleAvailable));
}

#[test]
fn gauss_weights_sum_to_interval_length() {
    for n in 1..=12 {
        let (weights, points) = gauss(n).unwrap();
        assert_eq!(weights.len(), n);
        assert_eq!(points.len(), n);
        assert_scalar_eq!(weights.iter().sum::<f64>(), 2.0, comp = abs, tol = 1e-13);
    }
}

#[test]
fn gauss_points_are_ascending_and_symmetric() {
    for n in 1..=9 {
        let (weights, points) = gauss(n).unwrap();
        for i in 0..n {
            let mirror = n - 1 - i;
            assert_scalar_eq!(points[i][0], -points[mirror][0], comp = abs, tol = 1e-14);
            assert_scalar_eq!(weights[i], weights[mirror], comp = abs, tol = 1e-14);
        }
        assert!(points.windows(2).all(|pair| pair[0][0] <= pair[1][0]));
    }
}

#[test]
fn gauss_integrates_polynomials_of_degree_2n_minus_1_exactly() {
    for n in 1..=8 {
        let rule = gauss(n).unwrap();
        for degree in 0..=(2 * n - 1) {
            let exact = if degree % 2 == 0 { 2.0 / (degree as f64 + 1.0) } else { 0.0 };
            let computed = integrate(&rule, |x| x.powi(degree as i32));
            assert_scalar_eq!(computed, exact, comp = abs, tol = 1e-13);
        }
    }
}

#[test]
fn two_point_rule_matches_tabulated_values() {
    let (weights, points) = gauss(2).unwrap();
    let x = 1.0 / 3.0f64.sqrt();
    assert_scalar_eq!(points[0][0], -x, comp = abs, tol = 1e-15);
    assert_scalar_eq!(points[1][0], x, comp = abs, tol = 1e-15);
    assert_scalar_eq!(weights[0], 1.0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(weights[1], 1.0, comp = abs, tol = 1e-15);
}
