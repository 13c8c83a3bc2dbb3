//! Edge-ordering heuristics. None of these affect correctness — every engine works on whatever
//! order its edge set arrives in — but a good order before a search starts can shrink the
//! combination space it has to walk before finding a balanced separator.

use rand::Rng;

use crate::edge::{Edge, EdgeSet};
use crate::setops::intersects;
use crate::vertex::VertexId;

fn degree_of(edges: &[Edge], v: VertexId) -> usize {
    edges.iter().filter(|e| e.vertices.contains(&v)).count()
}

fn edge_degree(edges: &[Edge], edge: &Edge) -> usize {
    let sum: usize = edge.vertices.iter().map(|&v| degree_of(edges, v)).sum();
    sum.saturating_sub(edge.vertices.len())
}

/// Orders edges by descending "edge degree": the sum of each member vertex's degree, minus the
/// edge's own size (so an edge doesn't count itself). Cheap, and a reasonable proxy for which
/// edges are most entangled with the rest of the graph.
pub fn degree_order(edges: &EdgeSet) -> EdgeSet {
    let mut sorted: Vec<Edge> = edges.edges().to_vec();
    sorted.sort_by_key(|e| std::cmp::Reverse(edge_degree(edges.edges(), e)));
    EdgeSet::new(sorted)
}

fn num_neighbours_order(edge: &Edge, edges: &[Edge], chosen: &[bool]) -> usize {
    edges
        .iter()
        .enumerate()
        .filter(|(i, other)| chosen[*i] && intersects(&edge.vertices, &other.vertices))
        .count()
}

/// Greedy maximum-cardinality-search order over edges: starts from a random edge, then
/// repeatedly picks (breaking ties randomly) whichever unchosen edge shares the most vertices
/// with edges already selected.
pub fn msco_order(edges: &EdgeSet) -> EdgeSet {
    let all = edges.edges();
    if all.len() <= 1 {
        return edges.clone();
    }

    let mut rng = rand::rng();
    let mut chosen = vec![false; all.len()];
    let mut selected = Vec::with_capacity(all.len());

    let start = rng.random_range(0..all.len());
    chosen[start] = true;
    selected.push(all[start].clone());

    while selected.len() < all.len() {
        let mut candidates = Vec::new();
        let mut max_card = 0usize;
        for (i, e) in all.iter().enumerate() {
            if chosen[i] {
                continue;
            }
            let card = num_neighbours_order(e, all, &chosen);
            if card >= max_card {
                if card > max_card {
                    candidates.clear();
                    max_card = card;
                }
                candidates.push(i);
            }
        }
        let pick = candidates[rng.random_range(0..candidates.len())];
        chosen[pick] = true;
        selected.push(all[pick].clone());
    }

    EdgeSet::new(selected)
}

const INF: i64 = i64::MAX;

fn min_distances(vertices: &[VertexId], edges: &[Edge]) -> Vec<Vec<i64>> {
    let n = vertices.len();
    let index: std::collections::HashMap<VertexId, usize> = vertices
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    let mut dist = vec![vec![INF; n]; n];
    for i in 0..n {
        dist[i][i] = 0;
    }
    for e in edges {
        for &a in &e.vertices {
            for &b in &e.vertices {
                let (ia, ib) = (index[&a], index[&b]);
                if ia != ib {
                    dist[ia][ib] = 1;
                }
            }
        }
    }

    for _ in 0..edges.len().max(1) {
        let mut changed = false;
        for k in 0..n {
            for i in 0..n {
                if dist[i][k] == INF {
                    continue;
                }
                for j in 0..n {
                    if dist[k][j] == INF {
                        continue;
                    }
                    let candidate = dist[i][k] + dist[k][j];
                    if candidate < dist[i][j] {
                        dist[i][j] = candidate;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    dist
}

fn diff_distances(old: &[Vec<i64>], new: &[Vec<i64>]) -> i64 {
    let sep_weight = (old.len() * old.len()) as i64;
    let mut total = 0i64;
    for j in 0..old.len() {
        for i in 0..old[j].len() {
            if old[j][i] == INF && new[j][i] != INF {
                total += sep_weight;
            } else if old[j][i] != INF && new[j][i] != INF {
                total += old[j][i] - new[j][i];
            }
        }
    }
    total
}

/// Orders edges by how much removing each one would disrupt shortest paths in the primal graph
/// (all-pairs distance via Floyd-Warshall): the edges whose removal disconnects or lengthens the
/// most paths sort first, on the theory that those are the edges worth using as separators early.
pub fn max_separator_order(edges: &EdgeSet) -> EdgeSet {
    let all = edges.edges();
    if all.len() <= 1 {
        return edges.clone();
    }

    let vertices = edges.vertices().to_vec();
    let baseline = min_distances(&vertices, all);

    let mut weights = Vec::with_capacity(all.len());
    for e in all {
        let without: Vec<Edge> = all.iter().filter(|o| o.name != e.name).cloned().collect();
        let without_dist = min_distances(&vertices, &without);
        weights.push(diff_distances(&baseline, &without_dist));
    }

    let mut ordered: Vec<(Edge, i64)> = all.iter().cloned().zip(weights).collect();
    ordered.sort_by_key(|(_, w)| std::cmp::Reverse(*w));
    EdgeSet::new(ordered.into_iter().map(|(e, _)| e).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::VertexId;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_degree_order_ranks_hub_edge_first() {
        let edges = EdgeSet::new(vec![
            e(1, &[1, 2]),
            e(2, &[2, 3]),
            e(3, &[2, 4]),
            e(4, &[5, 6]),
        ]);
        let ordered = degree_order(&edges);
        // Edges touching the hub vertex 2 should outrank the isolated pair {5,6}.
        let last = ordered.edges().last().unwrap();
        assert_eq!(last.name, 4);
    }

    #[test]
    fn test_msco_order_preserves_all_edges() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[3, 4])]);
        let ordered = msco_order(&edges);
        assert_eq!(ordered.len(), edges.len());
        let mut names: Vec<u32> = ordered.edges().iter().map(|e| e.name).collect();
        names.sort();
        assert_eq!(names, vec![1, 2, 3]);
    }

    #[test]
    fn test_max_separator_order_preserves_all_edges() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[1, 3])]);
        let ordered = max_separator_order(&edges);
        assert_eq!(ordered.len(), edges.len());
    }
}
