use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Handle to a node in its owning graph's arena.
pub type NodeId = usize;

//------------------------------------------------------------------------------
// Node
//------------------------------------------------------------------------------

/// A deformation-graph control point: a rest position plus the local
/// rotation/translation the solver optimizes.
///
/// The rotation is a free 3x3 matrix accumulated by component-wise
/// addition. It is never re-orthonormalized here; the rigidity term
/// quantifies the drift and the solver pulls it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    position: Vector3,
    rotation: Matrix3,
    translation: Vector3,
    translation_frame: Vector3,
    velocity_frame: Vector3,
    neighbors: BTreeSet<NodeId>,
    transformed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Node::new(Vector3::zeros())
    }
}

impl Node {
    pub fn new(position: Vector3) -> Self {
        Node {
            position,
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
            translation_frame: Vector3::zeros(),
            velocity_frame: Vector3::zeros(),
            neighbors: BTreeSet::new(),
            transformed: false,
        }
    }

    /// Rest-frame anchor; immutable after construction.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn rotation(&self) -> Matrix3 {
        self.rotation
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn translation_frame(&self) -> Vector3 {
        self.translation_frame
    }

    pub fn velocity_frame(&self) -> Vector3 {
        self.velocity_frame
    }

    pub fn set_velocity_frame(&mut self, velocity: Vector3) {
        self.velocity_frame = velocity;
    }

    /// Whether the transform was last set by a full overwrite rather than
    /// delta accumulation.
    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }

    pub(crate) fn add_neighbor(&mut self, id: NodeId) {
        self.neighbors.insert(id);
    }

    /// Snapshot the live translation for later frame-to-frame comparison.
    pub fn update_translation_frame(&mut self) {
        self.translation_frame = self.translation;
    }

    pub fn add_delta_rotation(&mut self, delta: &Matrix3) {
        self.rotation += delta;
    }

    pub fn add_delta_translation(&mut self, delta: &Vector3) {
        self.translation += delta;
    }

    /// Overwrite the accumulated transform with an externally computed one.
    pub fn set_transformation(&mut self, rotation: Matrix3, translation: Vector3) {
        self.rotation = rotation;
        self.translation = translation;
        self.transformed = true;
    }

    /// Map a point through this node's transform: `R * (p - g) + g + t`.
    pub fn apply_mapping(&self, p: &Vector3) -> Vector3 {
        self.rotation * (p - self.position) + self.position + self.translation
    }

    /// Map a normal through the inverse of this node's rotation.
    pub fn transform_normal(&self, normal: &Vector3) -> Vector3 {
        self.rotation
            .try_inverse()
            .expect("rotation is not invertible")
            * normal
    }

    /// Rigidity residual [(c1*c2) (c1*c3) (c2*c3) (c1*c1-1) (c2*c2-1) (c3*c3-1)]
    pub fn rot_term(&self) -> Vector6 {
        let [c1, c2, c3] = self.rotation.columns3();
        Vector6::new(
            c1.dot(&c2),
            c1.dot(&c3),
            c2.dot(&c3),
            c1.dot(&c1) - 1.,
            c2.dot(&c2) - 1.,
            c3.dot(&c3) - 1.,
        )
    }

    /// Scalar rigidity energy: sum of squares of the rigidity residual.
    pub fn rot_value(&self) -> f64 {
        self.rot_term().norm_squared()
    }

    /// Regularization residual against one neighbor:
    /// `R * (gj - gk) + gk + tk - (gj + tj)`.
    pub fn reg_term_with(&self, neighbor: &Node) -> Vector3 {
        let gj = neighbor.position;
        let tj = neighbor.translation;
        self.rotation * (gj - self.position) + self.position + self.translation - (gj + tj)
    }
}
