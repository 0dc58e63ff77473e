//! Evaluation layer: apply the graph's piecewise transform field to
//! full-resolution geometry. Each point is mapped through a single bound
//! node; blended skinning can layer on top of the same binding.

use crate::graph::node::NodeId;
use crate::graph::DeformationGraph;
use crate::prelude::*;

/// Bind each point to the node with the nearest rest position.
pub fn bind_nearest(graph: &DeformationGraph, points: &Matrix3xX) -> Vec<NodeId> {
    assert!(!graph.is_empty(), "cannot bind points to an empty graph");
    points
        .column_iter()
        .map(|c| {
            let p = Vector3::from(c);
            (0..graph.num_nodes())
                .min_by(|&a, &b| {
                    let da = (graph.node(a).position() - p).norm_squared();
                    let db = (graph.node(b).position() - p).norm_squared();
                    da.total_cmp(&db)
                })
                .expect("graph has no nodes")
        })
        .collect_vec()
}

/// Deform positions through their bound nodes.
pub fn deform_positions(
    graph: &DeformationGraph,
    points: &Matrix3xX,
    binding: &[NodeId],
) -> Matrix3xX {
    let mut out = Matrix3xX::zeros(points.ncols());
    for (mut col, p, &id) in izip!(out.column_iter_mut(), points.column_iter(), binding) {
        col.copy_from(&graph.node(id).apply_mapping(&Vector3::from(p)));
    }
    out
}

/// Deform normals through their bound nodes' inverse rotations.
pub fn deform_normals(
    graph: &DeformationGraph,
    normals: &Matrix3xX,
    binding: &[NodeId],
) -> Matrix3xX {
    let mut out = Matrix3xX::zeros(normals.ncols());
    for (mut col, n, &id) in izip!(out.column_iter_mut(), normals.column_iter(), binding) {
        col.copy_from(&graph.node(id).transform_normal(&Vector3::from(n)));
    }
    out
}
