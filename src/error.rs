//! Errors reported by element assembly.
use std::fmt;
use std::fmt::{Display, Formatter};

/// Library-wide error type.
///
/// Fallible operations return [`eyre::Result`], whose reports wrap an `AssemblyError`.
/// Callers that need to react to a particular failure can recover it with
/// `report.downcast_ref::<AssemblyError>()`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssemblyError {
    /// The determinant of the reference-to-physical mapping is not positive, i.e. the element
    /// is degenerate or inverted.
    DegenerateElement { jacobian_det: f64 },
    /// An element was given the wrong number of nodes for its shape.
    NodeCountMismatch { expected: usize, actual: usize },
    /// An element refers to a node that does not exist in the node arena.
    NodeOutOfBounds { node: usize, num_nodes: usize },
    /// A free node has no global equation number.
    MissingEquationNumber { node: usize },
    /// A node carries an equation number outside the global system, typically because nodes
    /// were pinned after equation numbers were assigned.
    EquationOutOfBounds {
        node: usize,
        equation: usize,
        num_equations: usize,
    },
    /// A buffer or input does not have the expected length.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// The requested face does not exist on the bulk element.
    InvalidFace { face: usize, num_faces: usize },
    /// The operation is not defined for this element or callback.
    Unsupported(&'static str),
}

impl Display for AssemblyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateElement { jacobian_det } => {
                write!(f, "Non-positive element Jacobian determinant encountered: {jacobian_det}")
            }
            Self::NodeCountMismatch { expected, actual } => {
                write!(f, "Element expects {expected} nodes, but {actual} were given")
            }
            Self::NodeOutOfBounds { node, num_nodes } => {
                write!(f, "Node index {node} out of bounds for arena with {num_nodes} nodes")
            }
            Self::MissingEquationNumber { node } => {
                write!(f, "Free node {node} has not been assigned an equation number")
            }
            Self::EquationOutOfBounds {
                node,
                equation,
                num_equations,
            } => {
                write!(
                    f,
                    "Node {node} has equation number {equation}, but the system has {num_equations} equations"
                )
            }
            Self::BufferSizeMismatch { expected, actual } => {
                write!(f, "Buffer size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidFace { face, num_faces } => {
                write!(f, "Face index {face} out of bounds for element with {num_faces} faces")
            }
            Self::Unsupported(what) => write!(f, "Unsupported operation: {what}"),
        }
    }
}

impl std::error::Error for AssemblyError {}
