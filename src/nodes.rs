//! Nodes shared between elements and their degrees of freedom.
//!
//! Nodes live in a [`NodeArena`]; elements only hold indices into it. Every node carries a
//! single unknown, the pressure, which is either free or pinned by a boundary condition.
use crate::error::AssemblyError;
use crate::nalgebra::Point2;
use crate::Real;
use eyre::eyre;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Real + Serialize + for<'a> Deserialize<'a>")]
pub struct Node<T: Real> {
    pub position: Point2<T>,
    pub pressure: T,
    pub pinned: bool,
    /// Global equation number of the pressure, `None` if pinned or not yet numbered.
    pub equation: Option<usize>,
}

impl<T: Real> Node<T> {
    pub fn new(position: Point2<T>) -> Self {
        Self {
            position,
            pressure: T::zero(),
            pinned: false,
            equation: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Real + Serialize + for<'a> Deserialize<'a>")]
pub struct NodeArena<T: Real> {
    nodes: Vec<Node<T>>,
}

impl<T: Real> NodeArena<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn from_positions(positions: impl IntoIterator<Item = Point2<T>>) -> Self {
        Self {
            nodes: positions.into_iter().map(Node::new).collect(),
        }
    }

    /// Adds a node with zero pressure and returns its index.
    pub fn add_node(&mut self, position: Point2<T>) -> usize {
        self.nodes.push(Node::new(position));
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node<T>> {
        self.nodes.get(index)
    }

    pub fn position(&self, index: usize) -> Point2<T> {
        self.nodes[index].position
    }

    pub fn set_position(&mut self, index: usize, position: Point2<T>) {
        self.nodes[index].position = position;
    }

    pub fn pressure(&self, index: usize) -> T {
        self.nodes[index].pressure
    }

    pub fn set_pressure(&mut self, index: usize, pressure: T) {
        self.nodes[index].pressure = pressure;
    }

    /// Pins the pressure of the node, removing it from the set of unknowns.
    ///
    /// Equation numbers are invalidated and must be reassigned.
    pub fn pin(&mut self, index: usize) {
        self.nodes[index].pinned = true;
        self.nodes[index].equation = None;
    }

    pub fn unpin(&mut self, index: usize) {
        self.nodes[index].pinned = false;
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.nodes[index].pinned
    }

    /// Numbers the free nodes consecutively in arena order and returns the number of
    /// equations.
    pub fn assign_equation_numbers(&mut self) -> usize {
        let mut num_equations = 0;
        for node in &mut self.nodes {
            if node.pinned {
                node.equation = None;
            } else {
                node.equation = Some(num_equations);
                num_equations += 1;
            }
        }
        debug!(
            "Assigned {} equation numbers to {} nodes ({} pinned)",
            num_equations,
            self.nodes.len(),
            self.nodes.len() - num_equations
        );
        num_equations
    }

    pub fn equation(&self, index: usize) -> Option<usize> {
        self.nodes[index].equation
    }

    /// The number of nodes that currently carry an equation number.
    pub fn num_equations(&self) -> usize {
        self.nodes.iter().filter(|node| node.equation.is_some()).count()
    }

    /// Checks that all given node indices refer to nodes in the arena.
    pub fn check_indices(&self, indices: &[usize]) -> eyre::Result<()> {
        match indices.iter().find(|&&node| node >= self.nodes.len()) {
            Some(&node) => Err(eyre!(AssemblyError::NodeOutOfBounds {
                node,
                num_nodes: self.nodes.len(),
            })),
            None => Ok(()),
        }
    }

    /// Gathers the positions of the given nodes into `output`, replacing its contents.
    pub fn gather_positions(&self, indices: &[usize], output: &mut Vec<Point2<T>>) {
        output.clear();
        output.extend(indices.iter().map(|&i| self.nodes[i].position));
    }

    /// Gathers the pressures of the given nodes into `output`, replacing its contents.
    pub fn gather_pressures(&self, indices: &[usize], output: &mut Vec<T>) {
        output.clear();
        output.extend(indices.iter().map(|&i| self.nodes[i].pressure));
    }
}

/// Local equation numbers of the nodes of a single element.
///
/// Free nodes are numbered consecutively in element node order, pinned nodes have no local
/// equation and must be skipped during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDofs {
    local_equations: Vec<Option<usize>>,
    num_equations: usize,
}

impl ElementDofs {
    pub fn from_pinned(pinned: impl IntoIterator<Item = bool>) -> Self {
        let mut num_equations = 0;
        let local_equations = pinned
            .into_iter()
            .map(|is_pinned| {
                if is_pinned {
                    None
                } else {
                    num_equations += 1;
                    Some(num_equations - 1)
                }
            })
            .collect();
        Self {
            local_equations,
            num_equations,
        }
    }

    pub fn for_element<T: Real>(nodes: &NodeArena<T>, node_indices: &[usize]) -> Self {
        Self::from_pinned(node_indices.iter().map(|&i| nodes.is_pinned(i)))
    }

    pub fn local_equation(&self, local_node: usize) -> Option<usize> {
        self.local_equations[local_node]
    }

    pub fn local_equations(&self) -> &[Option<usize>] {
        &self.local_equations
    }

    pub fn num_equations(&self) -> usize {
        self.num_equations
    }

    pub fn num_nodes(&self) -> usize {
        self.local_equations.len()
    }
}
