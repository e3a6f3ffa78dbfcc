use crate::assembly::{AssemblyMode, ElementContribution, HeleShawElement, SensitivityTensor, WeakFormElement};
use crate::coefficient::{FluxFunction, GapWidth};
use crate::element::{ReferenceShape, SegmentShape};
use crate::error::AssemblyError;
use crate::nalgebra::{try_convert, DMatrix, DVector, Point2, Vector2};
use crate::nodes::NodeArena;
use crate::quadrature::QuadraturePair1d;
use crate::Real;
use eyre::eyre;
use itertools::izip;
use log::trace;

/// Face element imposing a prescribed normal flux `f` on one face of a bulk element.
///
/// Contributes `R_l = -int_face f psi_l ds` to the equations of the face nodes. The flux does
/// not depend on the pressure, so the Jacobian contribution vanishes.
#[derive(Debug, Clone)]
pub struct FluxElement<T: Real, F> {
    face: usize,
    segment: SegmentShape,
    node_indices: Vec<usize>,
    flux: F,
    quadrature: QuadraturePair1d<T>,
}

/// Face geometry at one quadrature point.
struct FacePoint<T: Real> {
    psi: Vec<T>,
    dpsids: Vec<T>,
    x: Point2<T>,
    tangent: Vector2<T>,
    length_scale: T,
}

impl<T, F> FluxElement<T, F>
where
    T: Real,
    F: FluxFunction<T>,
{
    /// Attaches a flux element to the given face of a bulk element.
    ///
    /// Fails with [`AssemblyError::InvalidFace`] if the bulk element has no such face.
    pub fn on_face<S, G>(bulk: &HeleShawElement<T, S, G>, face: usize, flux: F) -> eyre::Result<Self>
    where
        S: ReferenceShape,
        G: GapWidth<T>,
    {
        let shape = bulk.shape();
        let face_nodes = shape.face_nodes(face).ok_or_else(|| {
            eyre!(AssemblyError::InvalidFace {
                face,
                num_faces: shape.num_faces(),
            })
        })?;
        let bulk_nodes = bulk.node_indices();
        let node_indices = face_nodes.iter().map(|&local| bulk_nodes[local]).collect();
        let segment = shape.face_segment();
        Ok(Self {
            face,
            segment,
            node_indices,
            flux,
            quadrature: segment.default_quadrature(),
        })
    }

    pub fn with_quadrature(self, quadrature: QuadraturePair1d<T>) -> Self {
        Self { quadrature, ..self }
    }

    pub fn face(&self) -> usize {
        self.face
    }

    pub fn segment(&self) -> SegmentShape {
        self.segment
    }

    pub fn flux(&self) -> &F {
        &self.flux
    }

    fn evaluate_face_point(&self, positions: &[Point2<T>], s: T) -> eyre::Result<FacePoint<T>> {
        let n = self.segment.num_nodes();
        let mut psi = vec![T::zero(); n];
        let mut dpsids = vec![T::zero(); n];
        self.segment.populate_basis(&mut psi, s);
        self.segment.populate_basis_derivatives(&mut dpsids, s);

        let mut x = Point2::origin();
        let mut tangent = Vector2::zeros();
        for (k, position) in positions.iter().enumerate() {
            x.coords += position.coords * psi[k];
            tangent += position.coords * dpsids[k];
        }
        let length_scale = tangent.norm();
        if length_scale <= T::zero() {
            return Err(eyre!(AssemblyError::DegenerateElement {
                jacobian_det: try_convert(length_scale).unwrap_or(f64::NAN),
            }));
        }
        Ok(FacePoint {
            psi,
            dpsids,
            x,
            tangent,
            length_scale,
        })
    }

    fn gather_positions(&self, nodes: &NodeArena<T>) -> eyre::Result<Vec<Point2<T>>> {
        nodes.check_indices(&self.node_indices)?;
        let mut positions = Vec::with_capacity(self.node_indices.len());
        nodes.gather_positions(&self.node_indices, &mut positions);
        Ok(positions)
    }
}

impl<T, F> WeakFormElement<T> for FluxElement<T, F>
where
    T: Real,
    F: FluxFunction<T>,
{
    fn node_indices(&self) -> &[usize] {
        &self.node_indices
    }

    fn assemble(&self, nodes: &NodeArena<T>, mode: AssemblyMode) -> eyre::Result<ElementContribution<T>> {
        let positions = self.gather_positions(nodes)?;
        let dofs = self.element_dofs(nodes);
        let num_equations = dofs.num_equations();
        let mut residual = DVector::zeros(num_equations);

        let (weights, points) = &self.quadrature;
        for (&weight, s) in izip!(weights, points) {
            let point = self.evaluate_face_point(&positions, s[0])?;
            let flux = self.flux.flux(&point.x);
            for (l, &psi_l) in point.psi.iter().enumerate() {
                if let Some(eqn) = dofs.local_equation(l) {
                    residual[eqn] -= flux * psi_l * weight * point.length_scale;
                }
            }
        }

        trace!("Assembled flux element on face {} with nodes {:?}", self.face, self.node_indices);

        let jacobian = match mode {
            AssemblyMode::Residual => None,
            AssemblyMode::ResidualAndJacobian => Some(DMatrix::zeros(num_equations, num_equations)),
        };
        Ok(ElementContribution { residual, jacobian })
    }

    fn assemble_sensitivities(&self, nodes: &NodeArena<T>) -> eyre::Result<SensitivityTensor<T>> {
        let positions = self.gather_positions(nodes)?;
        let dofs = self.element_dofs(nodes);
        let mut sensitivities = SensitivityTensor::zeros(dofs.clone(), self.node_indices.clone());

        let (weights, points) = &self.quadrature;
        for (&weight, s) in izip!(weights, points) {
            let point = self.evaluate_face_point(&positions, s[0])?;
            let flux = self.flux.flux(&point.x);
            let flux_gradient = self.flux.flux_gradient(&point.x).ok_or_else(|| {
                eyre!(AssemblyError::Unsupported(
                    "mesh sensitivities require the spatial gradient of the flux"
                ))
            })?;
            // d|t|/dX_pq = t_p / |t| dpsi_q/ds and dx/dX_pq = psi_q e_p
            for (l, &psi_l) in point.psi.iter().enumerate() {
                if let Some(eqn) = dofs.local_equation(l) {
                    for p in 0..2 {
                        for q in 0..point.psi.len() {
                            let d_length_scale = point.tangent[p] / point.length_scale * point.dpsids[q];
                            let value = flux_gradient[p] * point.psi[q] * point.length_scale + flux * d_length_scale;
                            sensitivities.add(eqn, p, q, -weight * psi_l * value);
                        }
                    }
                }
            }
        }
        Ok(sensitivities)
    }
}
