//! Hypergraphs (plain edges plus special edge groups) and component decomposition.

use std::collections::{BTreeMap, HashMap, HashSet};

use union_find::{QuickUnionUf, UnionByRank, UnionFind};

use crate::edge::{Edge, EdgeSet};
use crate::setops::{inter, is_subset};
use crate::vertex::{VertexId, VertexSet};

/// A hypergraph: ordinary edges plus zero or more "special" edge groups.
///
/// A special edge group stands in for a pre-decomposed subtree attached at a connector — it is
/// never split further and never offered as a separator candidate, but its vertices still count
/// toward coverage and connectivity.
#[derive(Clone, Debug)]
pub struct Graph {
    pub edges: EdgeSet,
    pub specials: Vec<EdgeSet>,
    vertices: VertexSet,
}

impl Graph {
    pub fn new(edges: EdgeSet, specials: Vec<EdgeSet>) -> Self {
        let mut vertices = edges.vertices().to_vec();
        for s in &specials {
            vertices = crate::setops::merge(&vertices, s.vertices());
        }
        Graph {
            edges,
            specials,
            vertices,
        }
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of ordinary edges plus special edge groups.
    pub fn len(&self) -> usize {
        self.edges.len() + self.specials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new(EdgeSet::empty(), Vec::new())
    }
}

/// The result of splitting a graph into components after removing a separator's vertices.
pub struct Components {
    pub parts: Vec<Graph>,
    /// Maps an ordinary edge's name to the index of the component it landed in. Only populated
    /// for edges that landed in some component (not isolated ones).
    pub edge_to_comp: HashMap<u32, usize>,
    /// Ordinary edges with no vertex outside the separator — they belong to every component and
    /// none, so the caller must decide how to route them.
    pub isolated_edges: Vec<Edge>,
}

/// Splits `graph` into its connected components once `sep`'s vertices are removed, via
/// disjoint-set union over the remaining vertices.
pub fn components(graph: &Graph, sep: &EdgeSet) -> Components {
    let sep_vertices: HashSet<VertexId> = sep.vertices().iter().copied().collect();

    let vertex_index: HashMap<VertexId, usize> = graph
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();

    let mut uf: QuickUnionUf<UnionByRank> = QuickUnionUf::new(graph.vertices().len());

    let mut union_free = |vs: &[VertexId], uf: &mut QuickUnionUf<UnionByRank>| {
        let mut first: Option<usize> = None;
        for &v in vs {
            if sep_vertices.contains(&v) {
                continue;
            }
            let idx = vertex_index[&v];
            match first {
                None => first = Some(idx),
                Some(f) => {
                    uf.union(f, idx);
                }
            }
        }
    };

    for e in graph.edges.iter() {
        union_free(&e.vertices, &mut uf);
    }
    for s in &graph.specials {
        union_free(s.vertices(), &mut uf);
    }

    let first_free_vertex = |vs: &[VertexId]| -> Option<VertexId> {
        vs.iter().copied().find(|v| !sep_vertices.contains(v))
    };

    let mut comps: BTreeMap<usize, Vec<Edge>> = BTreeMap::new();
    let mut isolated_edges = Vec::new();

    for e in graph.edges.iter() {
        match first_free_vertex(&e.vertices) {
            Some(v) => {
                let root = uf.find(vertex_index[&v]);
                comps.entry(root).or_default().push(e.clone());
            }
            None => isolated_edges.push(e.clone()),
        }
    }

    let mut comps_sp: BTreeMap<usize, Vec<EdgeSet>> = BTreeMap::new();
    let mut isolated_specials = Vec::new();

    for s in &graph.specials {
        match first_free_vertex(s.vertices()) {
            Some(v) => {
                let root = uf.find(vertex_index[&v]);
                comps_sp.entry(root).or_default().push(s.clone());
            }
            None => isolated_specials.push(s.clone()),
        }
    }

    let mut parts = Vec::new();
    let mut edge_to_comp = HashMap::new();

    for (root, edges) in comps.iter() {
        for e in edges {
            edge_to_comp.insert(e.name, parts.len());
        }
        let specials = comps_sp.remove(root).unwrap_or_default();
        parts.push(Graph::new(EdgeSet::new(edges.clone()), specials));
    }

    for (_, specials) in comps_sp.into_iter() {
        parts.push(Graph::new(EdgeSet::empty(), specials));
    }

    for s in isolated_specials {
        parts.push(Graph::new(EdgeSet::empty(), vec![s]));
    }

    Components {
        parts,
        edge_to_comp,
        isolated_edges,
    }
}

/// Keeps edges that intersect `vertices` at all.
pub fn filter_vertices(edges: &EdgeSet, vertices: &[VertexId]) -> EdgeSet {
    EdgeSet::new(
        edges
            .iter()
            .filter(|e| !inter(&e.vertices, vertices).is_empty())
            .cloned()
            .collect(),
    )
}

/// Keeps edges that are fully contained in `vertices`.
pub fn filter_strict(edges: &EdgeSet, vertices: &[VertexId]) -> EdgeSet {
    EdgeSet::new(
        edges
            .iter()
            .filter(|e| is_subset(&e.vertices, vertices))
            .cloned()
            .collect(),
    )
}

/// Drops edges already folded into one of `specials` by name: an edge an ancestor already spent
/// as part of its own separator can never make further progress if offered again as a fresh one,
/// since nothing about the current subproblem excludes vertices a separator already covered
/// higher up the tree — without this, a search over `is_balanced` candidates (which only checks
/// that a candidate shares *some* vertex with the current subgraph, not a vertex not already
/// spent) can re-accept the very same separator at every level and recurse on an unchanged
/// subproblem forever.
pub fn exclude_forced(pool: &EdgeSet, specials: &[EdgeSet]) -> EdgeSet {
    let forced: HashSet<u32> = specials
        .iter()
        .flat_map(|s| s.edges().iter().map(|e| e.name))
        .collect();
    EdgeSet::new(
        pool.edges()
            .iter()
            .filter(|e| !forced.contains(&e.name))
            .cloned()
            .collect(),
    )
}

/// Projects every edge onto its intersection with `vertices`, dropping any edge that becomes
/// empty. Names are preserved, producing the induced subgraph on `vertices`.
pub fn cut(edges: &EdgeSet, vertices: &[VertexId]) -> EdgeSet {
    EdgeSet::new(
        edges
            .iter()
            .filter_map(|e| {
                let projected = inter(&e.vertices, vertices);
                if projected.is_empty() {
                    None
                } else {
                    Some(Edge::new(e.name, projected))
                }
            })
            .collect(),
    )
}

/// The largest pairwise vertex-intersection among ordinary edges — an intrinsic lower bound on
/// achievable width for algorithms that reason about binary edge intersections.
pub fn bip(graph: &Graph) -> usize {
    let edges = graph.edges.edges();
    let mut best = 0;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let overlap = inter(&edges[i].vertices, &edges[j].vertices).len();
            if overlap > best {
                best = overlap;
            }
        }
    }
    best
}
