//! LogK: aims for `O(log|E|)` recursion depth instead of the linear depth a plain balanced
//! separator search gives you.
//!
//! At each level it first looks for a genuinely balanced "child" separator `χ` (every component
//! of `H \ χ` keeps at most half of `H`). If `χ` already covers every connector vertex inherited
//! from the level above, each of `H \ χ`'s components recurses independently under `χ` — the
//! "child-as-root" shortcut, and the cheap case.
//!
//! Otherwise a "parent" separator `λ` is searched for among the edges touching `Conn ∪ V(χ)`,
//! admissible only when [`parent_admissible`] holds between `λ`, `χ` and the connector. `λ`
//! splits `H` into a `low` component (the one still touching `χ`) and everything else
//! ("upper"). `low`'s own pieces, cut further by `χ`, are small enough (by `λ`'s balance) to
//! recurse on directly; `upper` recurses as one subproblem with `λ` and `χ` both pinned in as
//! forced specials, so its own recursive search eventually builds a node for each, and `χ`'s node
//! is exactly the splice point `attach_at_connector` needs to hang the low pieces back on.
//!
//! Recursion depth is bounded by `⌈log₂|E|⌉ + K`, tracked with an explicit counter — the same
//! guard the original keeps against a search that finds neither a usable child nor a usable
//! parent at some level.

use crate::config::{Parallelism, SearchConfig};
use crate::decomp::{base_case, Decomposition, Node};
use crate::edge::EdgeSet;
use crate::graph::{components, exclude_forced, filter_vertices, Graph};
use crate::predicates::{is_balanced, parent_admissible};
use crate::search::{parallel_search, sequential_search};
use crate::setops::{inter, intersects, is_subset, merge};
use crate::vertex::VertexId;

use super::DecompEngine;

pub struct LogKEngine {
    graph: Graph,
}

impl LogKEngine {
    pub fn new(graph: Graph) -> Self {
        LogKEngine { graph }
    }

    fn depth_bound(num_edges: usize, width: usize) -> usize {
        let log_term = if num_edges <= 1 {
            0
        } else {
            (num_edges as f64).log2().ceil() as usize
        };
        log_term + width
    }

    fn find_decomp_rec(
        &self,
        h: &Graph,
        specials: &[EdgeSet],
        conn: &[VertexId],
        allowed: &EdgeSet,
        depth: usize,
        max_depth: usize,
        config: &SearchConfig,
    ) -> Option<Decomposition> {
        if depth > max_depth {
            log::trace!("logk: depth bound {} exceeded", max_depth);
            return None;
        }
        if h.edges.len() + specials.len() <= 2 {
            return base_case(h, specials);
        }

        log::trace!(
            "logk: {} edges, {} specials, |conn|={}, depth={}",
            h.edges.len(),
            specials.len(),
            conn.len(),
            depth
        );

        let h_ws = Graph::new(h.edges.clone(), specials.to_vec());
        let child_pool = exclude_forced(&filter_vertices(allowed, h.vertices()), specials);

        let try_child = |combo: &[usize]| -> Option<Decomposition> {
            let chi = child_pool.subset(combo);
            if !is_balanced(&h_ws, &chi, config.balance_factor) {
                return None;
            }
            log::debug!("logk: accepted child candidate {:?}", chi.vertices());

            if is_subset(conn, chi.vertices()) {
                if let Some(result) =
                    self.child_as_root(h, &h_ws, &chi, allowed, depth, max_depth, config)
                {
                    return Some(result);
                }
            }

            self.with_parent(h, &h_ws, conn, &chi, allowed, depth, max_depth, config)
        };

        match config.parallelism {
            Parallelism::Sequential | Parallelism::Comp => {
                sequential_search(child_pool.len(), config.width, false, try_child)
            }
            Parallelism::Full | Parallelism::Search => parallel_search(
                child_pool.len(),
                config.width,
                config.num_threads,
                false,
                try_child,
            ),
        }
    }

    /// `Conn ⊆ V(χ)`: every component of `H \ χ` can recurse with no further knowledge of
    /// anything above this level, since `χ` alone already accounts for the whole connector.
    fn child_as_root(
        &self,
        h: &Graph,
        h_ws: &Graph,
        chi: &EdgeSet,
        allowed: &EdgeSet,
        depth: usize,
        max_depth: usize,
        config: &SearchConfig,
    ) -> Option<Decomposition> {
        let split = components(h_ws, chi);
        let mut children = Vec::with_capacity(split.parts.len());
        for part in &split.parts {
            let conn_prime = inter(part.vertices(), chi.vertices());
            let sub_h = Graph::new(part.edges.clone(), Vec::new());
            match self.find_decomp_rec(
                &sub_h,
                &part.specials,
                &conn_prime,
                allowed,
                depth + 1,
                max_depth,
                config,
            ) {
                Some(d) => children.push(d.root),
                None => {
                    config.cache.add_negative(chi, part);
                    return None;
                }
            }
        }
        let bag = inter(chi.vertices(), h.vertices());
        Some(Decomposition::new(Node::with_children(
            bag,
            chi.clone(),
            children,
        )))
    }

    /// `Conn ⊄ V(χ)`: a parent separator `λ` must be found to carry the remaining connector
    /// vertices. Splits `H \ λ` into the `low` component (still touching `χ`) and an `upper`
    /// subproblem that absorbs everything else, recurses on both, and splices `low`'s pieces back
    /// into `upper`'s tree at the node covering `χ`.
    #[allow(clippy::too_many_arguments)]
    fn with_parent(
        &self,
        h: &Graph,
        h_ws: &Graph,
        conn: &[VertexId],
        chi: &EdgeSet,
        allowed: &EdgeSet,
        depth: usize,
        max_depth: usize,
        config: &SearchConfig,
    ) -> Option<Decomposition> {
        let parent_touch = merge(conn, chi.vertices());
        let already_spent: Vec<EdgeSet> = h_ws
            .specials
            .iter()
            .cloned()
            .chain(std::iter::once(chi.clone()))
            .collect();
        let parent_pool = exclude_forced(&filter_vertices(allowed, &parent_touch), &already_spent);

        let try_parent = |combo: &[usize]| -> Option<Decomposition> {
            let lambda = parent_pool.subset(combo);
            let split = components(h_ws, &lambda);
            let low_idx = split
                .parts
                .iter()
                .position(|c| intersects(c.vertices(), chi.vertices()))?;
            let low = &split.parts[low_idx];

            if !parent_admissible(h_ws, &lambda, conn, low, chi, &lambda, config.balance_factor) {
                return None;
            }
            log::debug!("logk: accepted parent candidate {:?}", lambda.vertices());

            if config.cache.check_negative(&lambda, &split.parts) {
                log::trace!("logk: rejected by negative cache");
                return None;
            }

            let low_split = components(low, chi);
            let mut low_children = Vec::with_capacity(low_split.parts.len());
            for part in &low_split.parts {
                let conn_prime = inter(part.vertices(), chi.vertices());
                let sub_h = Graph::new(part.edges.clone(), Vec::new());
                match self.find_decomp_rec(
                    &sub_h,
                    &part.specials,
                    &conn_prime,
                    allowed,
                    depth + 1,
                    max_depth,
                    config,
                ) {
                    Some(d) => low_children.push(d.root),
                    None => {
                        config.cache.add_negative(&lambda, part);
                        return None;
                    }
                }
            }

            let mut upper_edges = split.isolated_edges.clone();
            let mut upper_specials = Vec::new();
            for (idx, part) in split.parts.iter().enumerate() {
                if idx == low_idx {
                    continue;
                }
                upper_edges.extend(part.edges.edges().iter().cloned());
                upper_specials.extend(part.specials.iter().cloned());
            }
            upper_specials.push(lambda.clone());
            upper_specials.push(chi.clone());

            let upper_h = Graph::new(EdgeSet::new(upper_edges), Vec::new());
            let remaining_allowed = EdgeSet::new(
                allowed
                    .edges()
                    .iter()
                    .filter(|e| !low.edges.edges().iter().any(|le| le.name == e.name))
                    .cloned()
                    .collect(),
            );

            let upper_decomp = self.find_decomp_rec(
                &upper_h,
                &upper_specials,
                conn,
                &remaining_allowed,
                depth + 1,
                max_depth,
                config,
            )?;

            let chi_vertices = chi.vertices().to_vec();
            let mut upper_root = upper_decomp.root;
            for low_child in low_children {
                if !upper_root.attach_at_connector(&chi_vertices, low_child) {
                    panic!(
                        "logk: upper decomposition has no node spanning the child connector {:?}",
                        chi_vertices
                    );
                }
            }
            Some(Decomposition::new(upper_root))
        };

        match config.parallelism {
            Parallelism::Sequential | Parallelism::Comp => {
                sequential_search(parent_pool.len(), config.width, false, try_parent)
            }
            Parallelism::Full | Parallelism::Search => parallel_search(
                parent_pool.len(),
                config.width,
                config.num_threads,
                false,
                try_parent,
            ),
        }
    }
}

impl DecompEngine for LogKEngine {
    fn name(&self) -> &'static str {
        "logk"
    }

    fn find_decomp(&self, config: &SearchConfig) -> Option<Decomposition> {
        let max_depth = Self::depth_bound(self.graph.edges.len(), config.width);
        let h = Graph::new(self.graph.edges.clone(), Vec::new());
        self.find_decomp_rec(
            &h,
            &self.graph.specials,
            &[],
            &self.graph.edges,
            0,
            max_depth,
            config,
        )
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
        let engine = LogKEngine::new(graph);
        let config = SearchConfig::new(2, Algorithm::LogK);
        let decomp = engine
            .find_decomp(&config)
            .expect("width 2 triangle decomposes");
        assert!(decomp.width() <= 2);
    }

    #[test]
    fn test_chain_path_decomposes_at_width_one() {
        let edges = EdgeSet::new(vec![
            e(1, &[1, 2]),
            e(2, &[2, 3]),
            e(3, &[3, 4]),
            e(4, &[4, 5]),
        ]);
        let graph = Graph::new(edges, Vec::new());
        let engine = LogKEngine::new(graph);
        let config = SearchConfig::new(1, Algorithm::LogK);
        let decomp = engine.find_decomp(&config).expect("a path has width 1");
        assert!(decomp.width() <= 1);
    }

    #[test]
    fn test_star_five_leaves_decomposes_at_width_one() {
        let edges = EdgeSet::new((1..=5).map(|i| e(i as u32, &[0, i])).collect());
        let graph = Graph::new(edges, Vec::new());
        let engine = LogKEngine::new(graph);
        let config = SearchConfig::new(1, Algorithm::LogK);
        let decomp = engine.find_decomp(&config).expect("a star has width 1");
        assert!(decomp.width() <= 1);
    }

    #[test]
    fn test_disconnected_triangles_decompose_independently() {
        let edges = EdgeSet::new(vec![
            e(1, &[1, 2]),
            e(2, &[2, 3]),
            e(3, &[1, 3]),
            e(4, &[4, 5]),
            e(5, &[5, 6]),
            e(6, &[4, 6]),
        ]);
        let graph = Graph::new(edges, Vec::new());
        let engine = LogKEngine::new(graph);
        let config = SearchConfig::new(2, Algorithm::LogK);
        assert!(engine.find_decomp(&config).is_some());
    }

    #[test]
    fn test_grid_three_by_three_decomposes_at_width_two() {
        // 3x3 grid graph edges, encoded as a hypergraph of its adjacency pairs.
        let coords = |r: i32, c: i32| -> VertexId { (r * 3 + c) as VertexId };
        let mut edges = Vec::new();
        let mut name = 1;
        for r in 0..3 {
            for c in 0..3 {
                if c + 1 < 3 {
                    edges.push(e(name, &[coords(r, c), coords(r, c + 1)]));
                    name += 1;
                }
                if r + 1 < 3 {
                    edges.push(e(name, &[coords(r, c), coords(r + 1, c)]));
                    name += 1;
                }
            }
        }
        let graph = Graph::new(EdgeSet::new(edges), Vec::new());
        let engine = LogKEngine::new(graph);
        let config = SearchConfig::new(2, Algorithm::LogK);
        assert!(engine.find_decomp(&config).is_some());
    }
}
