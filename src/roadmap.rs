//! Roadmap assembly ([`spec.md` §4.H]): the union of every layer's
//! intra-layer graph plus every adjacent pair's bridge edges, in a
//! single dense vertex space. [`RoadMap::layer_vertex_offsets`] records
//! where each layer's vertices landed after merging, mirroring the
//! per-layer vertex bookkeeping kept by the structure this module's
//! planner facades build on.

use crate::graph::Graph;

#[derive(Clone, Debug, Default)]
pub struct RoadMap {
    pub graph: Graph,
    /// `layer_vertex_offsets[i]` is the global index of layer `i`'s
    /// first vertex in `graph`; layer `i`'s vertex `j` lives at
    /// `layer_vertex_offsets[i] + j`.
    pub layer_vertex_offsets: Vec<u32>,
}

impl RoadMap {
    pub fn new() -> Self {
        RoadMap::default()
    }

    /// Merge a layer's local graph in, recording its offset, and
    /// return the global indices of its vertices (same order as the
    /// layer's own numbering).
    pub fn add_layer(&mut self, layer: &Graph) -> Vec<u32> {
        let offset = self.graph.vertices.len() as u32;
        self.layer_vertex_offsets.push(offset);
        self.graph.merge(layer)
    }

    /// Wire bridge edges found between two already-merged layers (as
    /// local-to-each-layer `(index_a, index_b, weight)` triples) using
    /// the global index maps `add_layer` returned for each.
    pub fn add_bridge_edges(&mut self, map_a: &[u32], map_b: &[u32], edges: &[(u32, u32, f64)]) {
        for &(ia, ib, w) in edges {
            let a = map_a[ia as usize];
            let b = map_b[ib as usize];
            self.graph.edges.push((a, b));
            self.graph.weights.push(w);
        }
    }
}
