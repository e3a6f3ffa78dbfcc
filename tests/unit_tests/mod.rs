use hele_shaw::element::{ElementShape, ReferenceShape};
use hele_shaw::nalgebra::{Point2, Vector2};
use hele_shaw::nodes::NodeArena;


/// Reference coordinates of the nodes of each shape, in local node order.
pub fn reference_nodes(shape: ElementShape) -> Vec<Point2<f64>> {
    let coords: &[(f64, f64)] = match shape {
        ElementShape::Quad4 => &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
        ElementShape::Quad9 => &[
            (-1.0, -1.0),
            (1.0, -1.0),
            (1.0, 1.0),
            (-1.0, 1.0),
            (0.0, -1.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (-1.0, 0.0),
            (0.0, 0.0),
        ],
        ElementShape::Tri3 => &[(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)],
        ElementShape::Tri6 => &[
            (-1.0, -1.0),
            (1.0, -1.0),
            (-1.0, 1.0),
            (0.0, -1.0),
            (0.0, 0.0),
            (-1.0, 0.0),
        ],
    };
    coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

pub const ALL_SHAPES: [ElementShape; 4] = [
    ElementShape::Quad4,
    ElementShape::Quad9,
    ElementShape::Tri3,
    ElementShape::Tri6,
];

/// A smooth, mildly nonlinear map of the reference domain with positive Jacobian determinant.
pub fn curved_map(xi: &Point2<f64>) -> Point2<f64> {
    Point2::new(
        1.0 + 0.6 * xi.x + 0.1 * xi.y + 0.05 * xi.x * xi.y,
        0.5 - 0.05 * xi.x + 0.5 * xi.y + 0.04 * xi.x * xi.x,
    )
}

/// A pressure field that is not representable by any of the element bases.
pub fn smooth_pressure(x: &Point2<f64>) -> f64 {
    x.x.sin() + 0.3 * x.y * x.y + 0.2 * x.x * x.y
}

/// Arena holding a single element of the given shape, placed by `curved_map` and with nodal
/// pressures sampled from `smooth_pressure`. Returns the arena and the element's node indices.
pub fn curved_element_arena(shape: ElementShape) -> (NodeArena<f64>, Vec<usize>) {
    let mut nodes = NodeArena::new();
    let indices = reference_nodes(shape)
        .iter()
        .map(|xi| {
            let x = curved_map(xi);
            let index = nodes.add_node(x);
            nodes.set_pressure(index, smooth_pressure(&x));
            index
        })
        .collect();
    assert_eq!(nodes.len(), shape.num_nodes());
    (nodes, indices)
}

/// The unit square `[0, 1]^2` as a single Quad4 with counter-clockwise nodes.
pub fn unit_square_arena() -> NodeArena<f64> {
    NodeArena::from_positions([
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ])
}

/// Sets the pressure of every node to `p(x)`.
pub fn set_pressures(nodes: &mut NodeArena<f64>, p: impl Fn(&Point2<f64>) -> f64) {
    for i in 0..nodes.len() {
        let x = nodes.position(i);
        nodes.set_pressure(i, p(&x));
    }
}

/// Deterministic, non-trivial displacement of each node, used as a perturbation direction.
pub fn node_displacements(num_nodes: usize) -> Vec<Vector2<f64>> {
    (0..num_nodes)
        .map(|i| {
            let i = i as f64;
            Vector2::new((1.3 * i + 0.4).sin(), (0.7 * i - 0.2).cos())
        })
        .collect()
}
