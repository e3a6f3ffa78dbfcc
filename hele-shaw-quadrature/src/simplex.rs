//! Symmetric rules on the reference triangle with corners `(-1, -1)`, `(1, -1)`, `(-1, 1)`.
//!
//! The rules are the classical low-order symmetric rules (Strang-Fix, Dunavant), tabulated
//! for the unit triangle with weights normalized to one and mapped to the reference triangle.

use crate::{Error, Point, Rule};

/// Area of the reference triangle.
const REFERENCE_AREA: f64 = 2.0;

fn unit_to_reference([xi, eta]: Point<2>) -> Point<2> {
    [2.0 * xi - 1.0, 2.0 * eta - 1.0]
}

#[derive(Debug, Default)]
struct RuleBuilder {
    weights: Vec<f64>,
    points: Vec<Point<2>>,
}

impl RuleBuilder {
    /// The centroid, with the given normalized weight.
    fn centroid(mut self, w: f64) -> Self {
        let third = 1.0 / 3.0;
        self.push(w, [third, third]);
        self
    }

    /// The three points with barycentric coordinates `(a, a, 1 - 2a)` and permutations.
    fn orbit(mut self, w: f64, a: f64) -> Self {
        let b = 1.0 - 2.0 * a;
        self.push(w, [a, a]);
        self.push(w, [b, a]);
        self.push(w, [a, b]);
        self
    }

    fn push(&mut self, w: f64, unit_point: Point<2>) {
        self.weights.push(REFERENCE_AREA * w);
        self.points.push(unit_to_reference(unit_point));
    }

    fn build(self) -> Rule<2> {
        (self.weights, self.points)
    }
}

/// A symmetric quadrature rule on the reference triangle integrating all polynomials of
/// total degree at most `strength` exactly.
///
/// Rules are available for strengths up to and including 5.
pub fn triangle(strength: usize) -> Result<Rule<2>, Error> {
    let rule = match strength {
        0 | 1 => RuleBuilder::default().centroid(1.0),
        2 => RuleBuilder::default().orbit(1.0 / 3.0, 1.0 / 6.0),
        3 | 4 => RuleBuilder::default()
            .orbit(0.223381589678011, 0.445948490915965)
            .orbit(0.109951743655322, 0.091576213509771),
        5 => RuleBuilder::default()
            .centroid(0.225)
            .orbit(0.132394152788506, 0.470142064105115)
            .orbit(0.125939180544827, 0.101286507323456),
        _ => return Err(Error::NoRuleAvailable),
    };
    Ok(rule.build())
}
