use super::varying_gap;
use crate::unit_tests::{curved_element_arena, node_displacements, set_pressures, smooth_pressure, ALL_SHAPES};
use hele_shaw::assembly::{HeleShawElement, WeakFormElement};
use hele_shaw::calculus::{approximate_directional_derivative_fd, approximate_jacobian_fd};
use hele_shaw::coefficient::{ConstantGap, GapFn, GapWidth};
use hele_shaw::compute_residual_sensitivities;
use hele_shaw::element::{ElementShape, Quad4};
use hele_shaw::nalgebra::{DMatrix, DVector, Point2, Vector2};
use hele_shaw::nodes::NodeArena;
use hele_shaw::AssemblyError;
use matrixcompare::assert_matrix_eq;
use proptest::prelude::*;

/// Residual of `element` after displacing each of its nodes by `epsilon` times the given
/// displacement.
fn displaced_residual<E: WeakFormElement<f64>>(
    element: &E,
    nodes: &NodeArena<f64>,
    displacements: &[Vector2<f64>],
    epsilon: f64,
) -> DVector<f64> {
    let mut displaced = nodes.clone();
    for (&node, displacement) in element.node_indices().iter().zip(displacements) {
        displaced.set_position(node, nodes.position(node) + displacement * epsilon);
    }
    element.compute_residual(&displaced).unwrap()
}

fn check_directional_derivative<E: WeakFormElement<f64>>(element: &E, nodes: &NodeArena<f64>, tol: f64) {
    let sensitivities = element.compute_residual_sensitivities(nodes).unwrap();
    let displacements = node_displacements(element.node_indices().len());
    let predicted = sensitivities.contract(&displacements);

    let fd = approximate_directional_derivative_fd(
        |epsilon| displaced_residual(element, nodes, &displacements, epsilon[0]),
        &DVector::zeros(1),
        &DVector::from_element(1, 1.0),
        1e-6,
    );
    assert_matrix_eq!(predicted, fd, comp = abs, tol = tol);
}

#[test]
fn directional_derivative_matches_finite_differences() {
    for shape in ALL_SHAPES {
        let (nodes, indices) = curved_element_arena(shape);
        let element = HeleShawElement::new(shape, indices, varying_gap()).unwrap();
        check_directional_derivative(&element, &nodes, 1e-6);
    }
}

#[test]
fn full_tensor_matches_finite_differences() {
    let (mut nodes, indices) = curved_element_arena(ElementShape::Quad4);
    nodes.pin(indices[2]);
    let element = HeleShawElement::new(Quad4, indices.clone(), varying_gap()).unwrap();
    let sensitivities = element.compute_residual_sensitivities(&nodes).unwrap();
    assert_eq!(sensitivities.num_equations(), 3);
    assert_eq!(sensitivities.as_tensor().dims(), [3, 2, 4]);

    // Flattened coordinates (x_0, y_0, x_1, y_1, ...)
    let mut coords = DVector::from_iterator(8, indices.iter().flat_map(|&i| {
        let x = nodes.position(i);
        [x.x, x.y]
    }));
    let residual = |coords: &DVector<f64>| {
        let mut moved = nodes.clone();
        for (q, &node) in indices.iter().enumerate() {
            moved.set_position(node, Point2::new(coords[2 * q], coords[2 * q + 1]));
        }
        element.compute_residual(&moved).unwrap()
    };
    let fd = approximate_jacobian_fd(residual, &mut coords, 1e-6);
    let analytic = DMatrix::from_fn(3, 8, |eqn, col| sensitivities.get(eqn, col % 2, col / 2));
    assert_matrix_eq!(analytic, fd, comp = abs, tol = 1e-6);
}

#[test]
fn sensitivities_vanish_for_nodes_outside_element() {
    // Two triangles sharing the edge (1, 2)
    let mut nodes = NodeArena::from_positions([
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 1.0),
    ]);
    set_pressures(&mut nodes, smooth_pressure);
    let first = HeleShawElement::new(ElementShape::Tri3, vec![0, 1, 2], varying_gap()).unwrap();
    let second = HeleShawElement::new(ElementShape::Tri3, vec![1, 3, 2], varying_gap()).unwrap();

    let sensitivities = first.compute_residual_sensitivities(&nodes).unwrap();
    for eqn in 0..sensitivities.num_equations() {
        for p in 0..2 {
            assert_eq!(sensitivities.get_global(eqn, p, 3), 0.0);
            assert_eq!(sensitivities.get_global(eqn, p, 17), 0.0);
            assert_eq!(sensitivities.get_global(eqn, p, 1), sensitivities.get(eqn, p, 1));
        }
    }

    // Moving the node outside the element leaves its residual unchanged
    let before = first.compute_residual(&nodes).unwrap();
    nodes.set_position(3, Point2::new(1.5, 2.0));
    assert_eq!(first.compute_residual(&nodes).unwrap(), before);

    let sensitivities = second.compute_residual_sensitivities(&nodes).unwrap();
    assert_eq!(sensitivities.node_indices(), &[1, 3, 2]);
    for eqn in 0..sensitivities.num_equations() {
        for p in 0..2 {
            assert_eq!(sensitivities.get_global(eqn, p, 0), 0.0);
        }
    }
}

#[test]
fn uniform_translation_only_changes_residual_through_gap_width() {
    // With a spatially uniform gap width, translating the element leaves the residual unchanged
    let (nodes, indices) = curved_element_arena(ElementShape::Quad9);
    let element = HeleShawElement::new(ElementShape::Quad9, indices, ConstantGap::new(1.3, 0.4)).unwrap();
    let sensitivities = compute_residual_sensitivities(&element, &nodes).unwrap();
    let translation = vec![Vector2::new(0.3, -0.8); 9];
    let change = sensitivities.contract(&translation);
    assert_matrix_eq!(change, DVector::zeros(9), comp = abs, tol = 1e-12);
}

#[test]
fn gap_width_without_gradient_is_unsupported() {
    let (nodes, indices) = curved_element_arena(ElementShape::Tri3);
    let gap = GapFn(|ipt: usize, x: &Point2<f64>| varying_gap().evaluate(ipt, x));
    let element = HeleShawElement::new(ElementShape::Tri3, indices, gap).unwrap();
    assert!(element.compute_residual(&nodes).is_ok());
    let error = element.compute_residual_sensitivities(&nodes).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<AssemblyError>(),
        Some(AssemblyError::Unsupported(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn perturbed_quad_sensitivities_match_finite_differences(
        offsets in proptest::collection::vec((-0.15..0.15, -0.15..0.15), 4),
        pressures in proptest::collection::vec(-1.0..1.0, 4),
    ) {
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut nodes = NodeArena::from_positions(
            corners
                .iter()
                .zip(&offsets)
                .map(|(&(x, y), &(dx, dy))| Point2::new(x + dx, y + dy)),
        );
        for (i, &p) in pressures.iter().enumerate() {
            nodes.set_pressure(i, p);
        }
        let element = HeleShawElement::new(Quad4, vec![0, 1, 2, 3], varying_gap()).unwrap();
        check_directional_derivative(&element, &nodes, 1e-6);
    }
}
