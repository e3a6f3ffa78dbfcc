use super::varying_gap;
use crate::unit_tests::{curved_element_arena, node_displacements, unit_square_arena};
use hele_shaw::assembly::{FluxElement, HeleShawElement, WeakFormElement};
use hele_shaw::calculus::approximate_directional_derivative_fd;
use hele_shaw::coefficient::{ConstantFlux, ConstantGap, FluxFn, FluxFunction};
use hele_shaw::element::{ElementShape, Quad4, Quad9, SegmentShape, Tri6};
use hele_shaw::nalgebra::{DVector, Point2, Vector2};
use hele_shaw::nodes::NodeArena;
use hele_shaw::quadrature::gauss;
use hele_shaw::AssemblyError;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};

/// Flux varying linearly in space.
#[derive(Debug, Copy, Clone)]
struct LinearFlux;

impl FluxFunction<f64> for LinearFlux {
    fn flux(&self, x: &Point2<f64>) -> f64 {
        1.0 + 0.5 * x.x - 0.3 * x.y
    }

    fn flux_gradient(&self, _x: &Point2<f64>) -> Option<Vector2<f64>> {
        Some(Vector2::new(0.5, -0.3))
    }
}

fn unit_square_quad9_arena() -> NodeArena<f64> {
    NodeArena::from_positions(
        [
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.5, 0.0),
            (1.0, 0.5),
            (0.5, 1.0),
            (0.0, 0.5),
            (0.5, 0.5),
        ]
        .iter()
        .map(|&(x, y)| Point2::new(x, y)),
    )
}

#[test]
fn zero_flux_contributes_nothing() {
    let nodes = unit_square_arena();
    let bulk = HeleShawElement::new(Quad4, vec![0, 1, 2, 3], ConstantGap::<f64>::default()).unwrap();
    let flux = FluxElement::on_face(&bulk, 1, ConstantFlux::new(0.0)).unwrap();
    let (residual, jacobian) = flux.compute_residual_and_jacobian(&nodes).unwrap();
    assert_eq!(residual, DVector::zeros(2));
    assert_eq!(jacobian.shape(), (2, 2));
    assert!(jacobian.iter().all(|&entry| entry == 0.0));
}

#[test]
fn constant_flux_on_linear_face() {
    let nodes = unit_square_arena();
    let bulk = HeleShawElement::new(Quad4, vec![0, 1, 2, 3], ConstantGap::<f64>::default()).unwrap();
    let flux = FluxElement::on_face(&bulk, 1, ConstantFlux::new(3.0)).unwrap();
    assert_eq!(flux.node_indices(), &[1, 2]);
    assert_eq!(flux.segment(), SegmentShape::Linear);
    assert_eq!(flux.face(), 1);

    let residual = flux.compute_residual(&nodes).unwrap();
    assert_matrix_eq!(residual, DVector::from_column_slice(&[-1.5, -1.5]), comp = abs, tol = 1e-14);
}

#[test]
fn constant_flux_on_quadratic_face() {
    let nodes = unit_square_quad9_arena();
    let bulk = HeleShawElement::new(Quad9, (0..9).collect(), ConstantGap::<f64>::default()).unwrap();
    let flux = FluxElement::on_face(&bulk, 1, ConstantFlux::new(2.0)).unwrap();
    assert_eq!(flux.node_indices(), &[1, 5, 2]);
    assert_eq!(flux.segment(), SegmentShape::Quadratic);

    // Simpson weights on a face of unit length
    let residual = flux.compute_residual(&nodes).unwrap();
    let expected = DVector::from_column_slice(&[-1.0 / 3.0, -4.0 / 3.0, -1.0 / 3.0]);
    assert_matrix_eq!(residual, expected, comp = abs, tol = 1e-14);
}

#[test]
fn total_flux_integrates_over_curved_face() {
    // The sum of the residual is the integral of -f over the face, i.e. -f times its length
    let (nodes, indices) = curved_element_arena(ElementShape::Tri6);
    let bulk = HeleShawElement::new(Tri6, indices.clone(), varying_gap()).unwrap();
    let flux = FluxElement::on_face(&bulk, 0, ConstantFlux::new(1.0))
        .unwrap()
        .with_quadrature(gauss(8).unwrap());
    assert_eq!(flux.node_indices(), &[indices[0], indices[3], indices[1]]);

    // Face 0 is the image of the reference edge y = -1, x in [-1, 1]
    let n = 2000;
    let length: f64 = (0..n)
        .map(|i| {
            let a = crate::unit_tests::curved_map(&Point2::new(-1.0 + 2.0 * i as f64 / n as f64, -1.0));
            let b = crate::unit_tests::curved_map(&Point2::new(-1.0 + 2.0 * (i + 1) as f64 / n as f64, -1.0));
            (b - a).norm()
        })
        .sum();
    let residual = flux.compute_residual(&nodes).unwrap();
    assert_scalar_eq!(residual.sum(), -length, comp = abs, tol = 1e-6);
}

#[test]
fn invalid_face_is_rejected() {
    let bulk = HeleShawElement::new(Quad4, vec![0, 1, 2, 3], ConstantGap::<f64>::default()).unwrap();
    let error = FluxElement::on_face(&bulk, 4, ConstantFlux::new(1.0)).unwrap_err();
    assert_eq!(
        error.downcast_ref::<AssemblyError>(),
        Some(&AssemblyError::InvalidFace { face: 4, num_faces: 4 })
    );
}

#[test]
fn pinned_face_node_is_omitted() {
    let mut nodes = unit_square_arena();
    nodes.pin(2);
    let bulk = HeleShawElement::new(Quad4, vec![0, 1, 2, 3], ConstantGap::<f64>::default()).unwrap();
    let flux = FluxElement::on_face(&bulk, 1, ConstantFlux::new(3.0)).unwrap();
    let residual = flux.compute_residual(&nodes).unwrap();
    assert_matrix_eq!(residual, DVector::from_column_slice(&[-1.5]), comp = abs, tol = 1e-14);

    let sensitivities = flux.compute_residual_sensitivities(&nodes).unwrap();
    assert_eq!(sensitivities.num_equations(), 1);
    assert_eq!(sensitivities.num_nodes(), 2);
}

#[test]
fn sensitivities_match_finite_differences() {
    for face in 0..4 {
        let (nodes, indices) = curved_element_arena(ElementShape::Quad9);
        let bulk = HeleShawElement::new(Quad9, indices, varying_gap()).unwrap();
        let flux = FluxElement::on_face(&bulk, face, LinearFlux).unwrap();
        let sensitivities = flux.compute_residual_sensitivities(&nodes).unwrap();

        let displacements = node_displacements(flux.node_indices().len());
        let predicted = sensitivities.contract(&displacements);
        let fd = approximate_directional_derivative_fd(
            |epsilon| {
                let mut displaced = nodes.clone();
                for (&node, displacement) in flux.node_indices().iter().zip(&displacements) {
                    displaced.set_position(node, nodes.position(node) + displacement * epsilon[0]);
                }
                flux.compute_residual(&displaced).unwrap()
            },
            &DVector::zeros(1),
            &DVector::from_element(1, 1.0),
            1e-6,
        );
        assert_matrix_eq!(predicted, fd, comp = abs, tol = 1e-7);
    }
}

#[test]
fn flux_without_gradient_is_unsupported() {
    let (nodes, indices) = curved_element_arena(ElementShape::Quad4);
    let bulk = HeleShawElement::new(Quad4, indices, varying_gap()).unwrap();
    let flux = FluxElement::on_face(&bulk, 2, FluxFn(|x: &Point2<f64>| x.x)).unwrap();
    assert!(flux.compute_residual(&nodes).is_ok());
    let error = flux.compute_residual_sensitivities(&nodes).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<AssemblyError>(),
        Some(AssemblyError::Unsupported(_))
    ));
}
