//! Graph-shrinking preprocessing: GYÖ reduction and type collapse.
//!
//! Neither changes whether a width-k decomposition exists — they only remove structure a search
//! would have rediscovered was irrelevant on its own (pendant vertices, subsumed edges,
//! vertices indistinguishable by edge membership), so running one before an engine starts can
//! shrink the combination space for free.

use std::collections::HashMap;

use crate::edge::{Edge, EdgeSet};
use crate::graph::Graph;
use crate::vertex::VertexId;

/// One step taken by [`gyo_reduct`], kept so a caller can report what was removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReductionStep {
    /// A vertex that appeared in at most one edge was dropped from the graph.
    PrunedVertex(VertexId),
    /// An edge whose vertices were a subset of another edge's was absorbed into it.
    AbsorbedEdge { absorbed: u32, into: u32 },
}

/// Repeatedly prunes pendant vertices (vertices in at most one edge) and absorbs edges that are
/// subsets of another edge, until neither rule applies. An acyclic hypergraph collapses entirely
/// to a single edge (or empty graph) under this reduction; anything left over is the cyclic core
/// a search actually has to work on.
pub fn gyo_reduct(graph: &Graph) -> (Graph, Vec<ReductionStep>) {
    let (edges, ops) = gyo_reduct_edges(&graph.edges);
    (Graph::new(edges, graph.specials.clone()), ops)
}

fn gyo_reduct_edges(edges: &EdgeSet) -> (EdgeSet, Vec<ReductionStep>) {
    let mut current: Vec<Edge> = edges.edges().to_vec();
    let mut ops = Vec::new();

    loop {
        let mut changed = false;

        // Prune vertices that occur in at most one remaining edge.
        let mut membership: HashMap<VertexId, usize> = HashMap::new();
        for e in &current {
            for &v in &e.vertices {
                *membership.entry(v).or_insert(0) += 1;
            }
        }
        let pendants: Vec<VertexId> = membership
            .into_iter()
            .filter(|&(_, count)| count <= 1)
            .map(|(v, _)| v)
            .collect();
        if !pendants.is_empty() {
            for e in current.iter_mut() {
                e.vertices.retain(|v| !pendants.contains(v));
            }
            for v in pendants {
                ops.push(ReductionStep::PrunedVertex(v));
            }
            changed = true;
        }

        // Absorb any edge that is now a subset of another.
        let mut absorbed_names = Vec::new();
        'outer: for (i, e) in current.iter().enumerate() {
            for (j, other) in current.iter().enumerate() {
                if i == j || absorbed_names.contains(&e.name) {
                    continue;
                }
                let is_subset = e
                    .vertices
                    .iter()
                    .all(|v| other.vertices.contains(v));
                if is_subset && (e.vertices.len() < other.vertices.len()
                    || (e.vertices.len() == other.vertices.len() && e.name > other.name))
                {
                    ops.push(ReductionStep::AbsorbedEdge {
                        absorbed: e.name,
                        into: other.name,
                    });
                    absorbed_names.push(e.name);
                    changed = true;
                    continue 'outer;
                }
            }
        }
        if !absorbed_names.is_empty() {
            current.retain(|e| !absorbed_names.contains(&e.name));
        }

        if !changed {
            break;
        }
    }

    (EdgeSet::new(current), ops)
}

/// Merges vertices that belong to exactly the same set of edges into a single representative
/// (the smallest vertex id in the group), since no separator or cover can ever distinguish them.
/// Returns the collapsed graph, a map from each representative to the vertices it absorbed, and
/// how many vertices were merged away in total.
pub fn type_collapse(graph: &Graph) -> (Graph, HashMap<VertexId, Vec<VertexId>>, usize) {
    let (edges, groups, count) = type_collapse_edges(&graph.edges);
    (Graph::new(edges, graph.specials.clone()), groups, count)
}

fn type_collapse_edges(
    edges: &EdgeSet,
) -> (EdgeSet, HashMap<VertexId, Vec<VertexId>>, usize) {
    let mut signature: HashMap<VertexId, Vec<u32>> = HashMap::new();
    for e in edges.edges() {
        for &v in &e.vertices {
            signature.entry(v).or_default().push(e.name);
        }
    }
    for names in signature.values_mut() {
        names.sort_unstable();
    }

    let mut groups: HashMap<Vec<u32>, Vec<VertexId>> = HashMap::new();
    for (v, sig) in signature {
        groups.entry(sig).or_default().push(v);
    }

    let mut representative: HashMap<VertexId, VertexId> = HashMap::new();
    let mut absorbed: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    let mut collapsed_count = 0;
    for members in groups.values() {
        let rep = *members.iter().min().expect("group is non-empty");
        for &v in members {
            representative.insert(v, rep);
            if v != rep {
                collapsed_count += 1;
                absorbed.entry(rep).or_default().push(v);
            }
        }
    }

    let remapped: Vec<Edge> = edges
        .edges()
        .iter()
        .map(|e| {
            let vertices: Vec<VertexId> = e
                .vertices
                .iter()
                .map(|v| representative[v])
                .collect();
            Edge::new(e.name, vertices)
        })
        .collect();

    (EdgeSet::new(remapped), absorbed, collapsed_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_gyo_reduct_collapses_acyclic_chain() {
        // A chain 1-2-3-4 is acyclic, so GYO reduction should leave no edges behind.
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[3, 4])]);
        let graph = Graph::new(edges, Vec::new());
        let (reduced, ops) = gyo_reduct(&graph);
        assert!(reduced.edges.is_empty());
        assert!(!ops.is_empty());
    }

    #[test]
    fn test_gyo_reduct_preserves_a_cycle() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[1, 3])]);
        let graph = Graph::new(edges, Vec::new());
        let (reduced, _) = gyo_reduct(&graph);
        assert_eq!(reduced.edges.len(), 3);
    }

    #[test]
    fn test_gyo_reduct_absorbs_subset_edge() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2, 3]), e(2, &[1, 2])]);
        let graph = Graph::new(edges, Vec::new());
        let (reduced, ops) = gyo_reduct(&graph);
        assert_eq!(reduced.edges.len(), 1);
        assert!(ops
            .iter()
            .any(|op| matches!(op, ReductionStep::AbsorbedEdge { absorbed: 2, into: 1 })));
    }

    #[test]
    fn test_type_collapse_merges_twins() {
        // Vertices 1 and 2 appear in exactly the same edges and should collapse to one.
        let edges = EdgeSet::new(vec![e(1, &[1, 2, 3]), e(2, &[1, 2, 4])]);
        let graph = Graph::new(edges.clone(), Vec::new());
        let (collapsed, groups, count) = type_collapse(&graph);
        assert_eq!(count, 1);
        assert!(collapsed.vertices().len() < edges.vertices().len());
        assert!(!groups.is_empty());
    }

    #[test]
    fn test_type_collapse_no_op_on_distinct_vertices() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3])]);
        let graph = Graph::new(edges, Vec::new());
        let (_, groups, count) = type_collapse(&graph);
        assert_eq!(count, 0);
        assert!(groups.is_empty());
    }
}
