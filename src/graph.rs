#![allow(non_snake_case)]

//! Deformation graph: an arena of control nodes plus their neighbor
//! adjacency, with residual assembly for the external solver.

pub mod node;
pub mod sample;

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use self::node::{Node, NodeId};

//------------------------------------------------------------------------------
// DeformationGraph
//------------------------------------------------------------------------------

/// Owns the nodes; neighbor links are arena handles, so symmetry and
/// no-self-loop are enforced here at construction time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeformationGraph {
    nodes: Vec<Node>,
}

impl DeformationGraph {
    pub fn new() -> Self {
        DeformationGraph { nodes: vec![] }
    }

    /// Build a graph with one node per column of rest positions.
    pub fn from_positions(positions: &Matrix3xX) -> Self {
        DeformationGraph {
            nodes: positions
                .column_iter()
                .map(|c| Node::new(Vector3::from(c)))
                .collect_vec(),
        }
    }

    pub fn add_node(&mut self, position: Vector3) -> NodeId {
        self.nodes.push(Node::new(position));
        self.nodes.len() - 1
    }

    /// Insert the edge `a <-> b` in both neighbor sets.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        assert!(
            a < self.nodes.len() && b < self.nodes.len(),
            "node id out of range"
        );
        assert_ne!(a, b, "a node cannot neighbor itself");
        self.nodes[a].add_neighbor(b);
        self.nodes[b].add_neighbor(a);
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    //--------------------------------------------------------------------------
    // Term extraction
    //--------------------------------------------------------------------------

    pub fn rot_term(&self, id: NodeId) -> Vector6 {
        self.nodes[id].rot_term()
    }

    pub fn rot_value(&self, id: NodeId) -> f64 {
        self.nodes[id].rot_value()
    }

    /// Stacked regularization residuals for one node, one row per neighbor
    /// in neighbor-set order (ascending id, stable across calls).
    pub fn reg_term(&self, id: NodeId) -> MatrixXx3 {
        let node = &self.nodes[id];
        let mut reg = MatrixXx3::zeros(node.neighbors().len());
        for (row, &j) in node.neighbors().iter().enumerate() {
            reg.set_row(row, &node.reg_term_with(&self.nodes[j]).transpose());
        }
        reg
    }

    /// Regularization residual for a single edge of this node.
    pub fn reg_term_with(&self, id: NodeId, neighbor: NodeId) -> Vector3 {
        self.nodes[id].reg_term_with(&self.nodes[neighbor])
    }

    /// Scalar regularization energy: sum of squared neighbor residual norms.
    pub fn reg_value(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id];
        node.neighbors()
            .iter()
            .map(|&j| node.reg_term_with(&self.nodes[j]).norm_squared())
            .sum()
    }

    //--------------------------------------------------------------------------
    // Residual assembly
    //--------------------------------------------------------------------------

    /// Rigidity block: 6 rows per node, in node order.
    pub fn rot_residual_vector(&self) -> VectorD {
        let mut R = VectorD::zeros(6 * self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            R.fixed_rows_mut::<6>(6 * i).copy_from(&node.rot_term());
        }
        R
    }

    /// Regularization block: 3 rows per directed edge, node order then
    /// neighbor order.
    pub fn reg_residual_vector(&self) -> VectorD {
        let num_edges: usize = self.nodes.iter().map(|n| n.neighbors().len()).sum();
        let mut R = VectorD::zeros(3 * num_edges);
        let mut row = 0;
        for node in self.nodes.iter() {
            for &j in node.neighbors().iter() {
                R.fixed_rows_mut::<3>(row)
                    .copy_from(&node.reg_term_with(&self.nodes[j]));
                row += 3;
            }
        }
        R
    }

    /// Full residual: rigidity block stacked over regularization block.
    pub fn residual_vector(&self) -> VectorD {
        let rot = self.rot_residual_vector();
        let reg = self.reg_residual_vector();
        let mut R = VectorD::zeros(rot.len() + reg.len());
        R.rows_mut(0, rot.len()).copy_from(&rot);
        R.rows_mut(rot.len(), reg.len()).copy_from(&reg);
        R
    }

    /// Total scalar energy over all nodes, for convergence checks.
    pub fn energy(&self) -> f64 {
        (0..self.nodes.len())
            .map(|i| self.rot_value(i) + self.reg_value(i))
            .sum()
    }

    //--------------------------------------------------------------------------
    // Snapshots
    //--------------------------------------------------------------------------

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
