//! DetK: a "deterministic K-decomp" frame that carries an explicit `old_sep`, the separator
//! already chosen by the parent. At each level the candidate separator is built in two stages:
//! first a minimal cover of `Conn = old_sep ∩ V(H)` drawn from edges of the *whole graph* (not the
//! current subgraph) that touch `Conn`, then — only when that cover alone makes no progress into
//! the remaining subgraph — an extension of up to `K - |cover|` more edges drawn from `H.edges`.
//!
//! In `SubEdge` mode, the whole-graph pool feeding the cover stage is widened with computed
//! subedges (see [`crate::subedge`]) before being filtered down to `Conn` — this lets a separator
//! use a vertex subset of an existing edge where the plain edge itself wouldn't fit.

use rayon::prelude::*;

use crate::config::{DetKMode, Parallelism, SearchConfig};
use crate::combin::CombinationIterator;
use crate::decomp::{base_case, Decomposition, Node};
use crate::edge::EdgeSet;
use crate::graph::{components, filter_vertices, Graph};
use crate::search::{parallel_search, sequential_search};
use crate::setops::{diff, inter, intersects, is_subset, merge};
use crate::subedge::compute_subedges;
use crate::vertex::VertexId;

use super::DecompEngine;

pub struct DetKEngine {
    graph: Graph,
    mode: DetKMode,
}

impl DetKEngine {
    pub fn new(graph: Graph, mode: DetKMode) -> Self {
        DetKEngine { graph, mode }
    }

    fn candidate_pool(&self, config: &SearchConfig) -> EdgeSet {
        match self.mode {
            DetKMode::Plain => self.graph.edges.clone(),
            DetKMode::SubEdge => compute_subedges(&self.graph.edges, config.width),
        }
    }

    /// Every way to cover `conn` with at most `max_k` edges of `bound`, grouped by increasing
    /// size. `conn` being empty is covered trivially by the empty edge set — this is what lets the
    /// top-level call (where `old_sep` is still empty) fall straight through to the extension
    /// stage instead of finding no candidates at all.
    fn cover_candidates(bound: &EdgeSet, conn: &[VertexId], max_k: usize) -> Vec<EdgeSet> {
        if conn.is_empty() {
            return vec![EdgeSet::empty()];
        }

        let mut out = Vec::new();
        for k in 1..=max_k.min(bound.len()) {
            let mut gen = CombinationIterator::new_unextended(bound.len(), k);
            while gen.has_next() {
                let combo = gen.combination().to_vec();
                gen.confirm();
                let candidate = bound.subset(&combo);
                if is_subset(conn, candidate.vertices()) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    fn find_decomp_rec(
        &self,
        h: &Graph,
        specials: &[EdgeSet],
        old_sep: &[VertexId],
        pool: &EdgeSet,
        config: &SearchConfig,
    ) -> Option<Decomposition> {
        if h.edges.len() + specials.len() <= 2 {
            return base_case(h, specials);
        }

        let mut current_vertices = h.vertices().to_vec();
        for sp in specials {
            current_vertices = merge(&current_vertices, sp.vertices());
        }
        let extended_vertices = merge(&current_vertices, old_sep);
        let conn = inter(old_sep, &current_vertices);
        let comp_vertices = diff(&current_vertices, old_sep);
        let bound = filter_vertices(pool, &conn);

        log::trace!(
            "detk: {} edges, {} specials, |conn|={}",
            h.edges.len(),
            specials.len(),
            conn.len()
        );

        let with_specials = Graph::new(h.edges.clone(), specials.to_vec());

        let attempt_sep = |sep_actual: &EdgeSet| -> Option<Decomposition> {
            let split = components(&with_specials, sep_actual);
            if config.cache.check_negative(sep_actual, &split.parts) {
                log::trace!("detk: rejected by negative cache");
                return None;
            }

            let bag = inter(sep_actual.vertices(), &extended_vertices);
            let subtree_roots =
                self.decompose_children(&split.parts, sep_actual, &bag, pool, config)?;
            let root = Node::with_children(bag, sep_actual.clone(), subtree_roots);
            Some(Decomposition::new(root))
        };

        for cover in Self::cover_candidates(&bound, &conn, config.width) {
            let makes_progress = intersects(cover.vertices(), &comp_vertices);
            if makes_progress {
                if let Some(result) = attempt_sep(&cover) {
                    return Some(result);
                }
                continue;
            }

            // The cover alone doesn't reach into H's body: extend it with edges of H itself, up
            // to the width budget still left, until one extension makes progress.
            let remaining = config.width.saturating_sub(cover.len());
            if remaining == 0 {
                continue;
            }

            let try_extension = |combo: &[usize]| -> Option<Decomposition> {
                let sep_actual = cover.union_edges(&h.edges.subset(combo));
                attempt_sep(&sep_actual)
            };

            let found = match config.parallelism {
                Parallelism::Sequential | Parallelism::Comp => {
                    sequential_search(h.edges.len(), remaining, false, try_extension)
                }
                Parallelism::Full | Parallelism::Search => parallel_search(
                    h.edges.len(),
                    remaining,
                    config.num_threads,
                    false,
                    try_extension,
                ),
            };
            if found.is_some() {
                return found;
            }
        }

        None
    }

    fn decompose_children(
        &self,
        comps: &[Graph],
        sep_actual: &EdgeSet,
        bag: &[VertexId],
        pool: &EdgeSet,
        config: &SearchConfig,
    ) -> Option<Vec<Node>> {
        let build_one = |comp: &Graph| -> Option<Decomposition> {
            let h = Graph::new(comp.edges.clone(), Vec::new());
            self.find_decomp_rec(&h, &comp.specials, bag, pool, config)
        };

        let results: Vec<Option<Decomposition>> = match config.parallelism {
            Parallelism::Full | Parallelism::Comp => comps.par_iter().map(build_one).collect(),
            Parallelism::Search | Parallelism::Sequential => {
                comps.iter().map(build_one).collect()
            }
        };

        let mut roots = Vec::with_capacity(results.len());
        for (comp, result) in comps.iter().zip(results) {
            match result {
                Some(decomp) => roots.push(decomp.root),
                None => {
                    config.cache.add_negative(sep_actual, comp);
                    return None;
                }
            }
        }
        Some(roots)
    }
}

impl DecompEngine for DetKEngine {
    fn name(&self) -> &'static str {
        "detk"
    }

    fn find_decomp(&self, config: &SearchConfig) -> Option<Decomposition> {
        let pool = self.candidate_pool(config);
        self.find_decomp_rec(&self.graph, &[], &[], &pool, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Algorithm;
    use crate::edge::Edge;
    use crate::vertex::VertexId;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_triangle_width_two_decomposes() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[1, 3])]);
        let graph = Graph::new(edges, Vec::new());
        let engine = DetKEngine::new(graph, DetKMode::Plain);
        let config = SearchConfig::new(2, Algorithm::DetK);
        let decomp = engine.find_decomp(&config).expect("width 2 triangle decomposes");
        assert!(decomp.width() <= 2);
    }

    #[test]
    fn test_triangle_width_one_rejected() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[1, 3])]);
        let graph = Graph::new(edges, Vec::new());
        let engine = DetKEngine::new(graph, DetKMode::Plain);
        let config = SearchConfig::new(1, Algorithm::DetK);
        assert!(engine.find_decomp(&config).is_none());
    }

    #[test]
    fn test_subedge_mode_still_decomposes_a_path() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[3, 4])]);
        let graph = Graph::new(edges, Vec::new());
        let engine = DetKEngine::new(graph, DetKMode::SubEdge);
        let config = SearchConfig::new(1, Algorithm::DetK);
        assert!(engine.find_decomp(&config).is_some());
    }

    #[test]
    fn test_star_five_leaves_decomposes_at_width_one() {
        let edges = EdgeSet::new((1..=5).map(|i| e(i as u32, &[0, i])).collect());
        let graph = Graph::new(edges, Vec::new());
        let engine = DetKEngine::new(graph, DetKMode::Plain);
        let config = SearchConfig::new(1, Algorithm::DetK);
        let decomp = engine.find_decomp(&config).expect("a star has width 1");
        assert!(decomp.width() <= 1);
    }
}
