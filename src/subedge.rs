//! Subedge computation: augments a graph's edge pool with every vertex subset that could serve
//! as part of a width-K separator but isn't itself a full edge.
//!
//! For each edge `e` and each combination of up to `K` other edges, the union of those edges'
//! vertices is intersected with `e`; every non-empty subset of that intersection becomes a
//! candidate anonymous edge. This is what lets DetK's `SubEdge` mode offer separators that use
//! only part of an edge where the whole edge wouldn't fit in a width-K cover.

use crate::combin::CombinationIterator;
use crate::edge::{Edge, EdgeSet};
use crate::setops::inter;
use crate::vertex::VertexId;

fn power_set(vertices: &[VertexId]) -> Vec<Vec<VertexId>> {
    let mut subsets = Vec::with_capacity(1 << vertices.len());
    for mask in 1u32..(1 << vertices.len()) {
        let mut subset = Vec::new();
        for (i, &v) in vertices.iter().enumerate() {
            if mask & (1 << i) != 0 {
                subset.push(v);
            }
        }
        subsets.push(subset);
    }
    subsets
}

/// Computes all relevant subedges of `edges` up to width `k`, returning the original edges plus
/// every subedge, deduplicated by vertex content.
pub fn compute_subedges(edges: &EdgeSet, k: usize) -> EdgeSet {
    let mut output: Vec<Edge> = edges.edges().to_vec();

    for (idx, e) in edges.edges().iter().enumerate() {
        let others: Vec<Edge> = edges
            .edges()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, ed)| ed.clone())
            .collect();
        let others_set = EdgeSet::new(others);
        if others_set.is_empty() {
            continue;
        }

        let width = k.min(others_set.len());
        let mut gen = CombinationIterator::new(others_set.len(), width);
        while gen.has_next() {
            let combo = gen.combination().to_vec();
            gen.confirm();
            let tuple_vertices = others_set.subset(&combo).vertices().to_vec();
            let candidate = inter(&e.vertices, &tuple_vertices);
            if candidate.is_empty() || candidate.len() == e.vertices.len() {
                continue;
            }
            for subset in power_set(&candidate) {
                output.push(Edge::anonymous(subset));
            }
        }
    }

    output.sort_by(|a, b| a.vertices.cmp(&b.vertices));
    output.dedup_by(|a, b| a.vertices == b.vertices);
    EdgeSet::new(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_subedges_include_original_edges() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2, 3]), e(2, &[3, 4])]);
        let result = compute_subedges(&edges, 1);
        assert!(result.edges().iter().any(|x| x.vertices == vec![1, 2, 3]));
        assert!(result.edges().iter().any(|x| x.vertices == vec![3, 4]));
    }

    #[test]
    fn test_subedges_contain_partial_overlaps() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2, 3]), e(2, &[2, 3, 4])]);
        let result = compute_subedges(&edges, 1);
        // {2,3} is the overlap between the two edges and should appear as a subedge of edge 1.
        assert!(result.edges().iter().any(|x| x.vertices == vec![2, 3]));
    }

    #[test]
    fn test_no_subedges_for_disjoint_edges() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[3, 4])]);
        let result = compute_subedges(&edges, 1);
        assert_eq!(result.len(), 2);
    }
}
