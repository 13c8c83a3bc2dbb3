//! Post-hoc validation of a decomposition against the graph it claims to decompose.
//!
//! Engines are trusted to build correct trees, but a decomposition loaded from disk (or produced
//! by a new engine while it's still being trusted) is worth checking against the three GHD
//! conditions directly: every edge covered somewhere, every vertex's occurrences connected, and
//! every bag contained in its own cover's vertices.

use std::collections::HashSet;
use std::fmt;

use crate::decomp::{Decomposition, Node};
use crate::edge::EdgeSet;
use crate::setops::is_subset;
use crate::vertex::VertexId;

/// One way a decomposition can fail to be a valid GHD of its graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationFailure {
    /// An edge of the original graph is covered by no node.
    UncoveredEdge(u32),
    /// A vertex's occurrences across the tree don't form a connected subtree.
    Disconnected(VertexId),
    /// A node's bag contains a vertex not in its own cover.
    BagExceedsCover(VertexId),
    /// A node's cover names or uses vertices that don't trace back to the input graph.
    InvalidCoverEdge(u32),
    /// The decomposition's width exceeds the requested bound.
    WidthExceeded { found: usize, bound: usize },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::UncoveredEdge(name) => {
                write!(f, "edge {name} is not covered by any node")
            }
            ValidationFailure::Disconnected(v) => {
                write!(f, "vertex {v}'s occurrences are not connected")
            }
            ValidationFailure::BagExceedsCover(v) => {
                write!(f, "vertex {v} appears in a bag but not in that node's cover")
            }
            ValidationFailure::InvalidCoverEdge(name) => {
                write!(f, "cover edge {name} is not an edge of the input graph (or a subedge of one)")
            }
            ValidationFailure::WidthExceeded { found, bound } => {
                write!(f, "width {found} exceeds requested bound {bound}")
            }
        }
    }
}

fn walk<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    for child in &node.children {
        walk(child, out);
    }
}

fn covers_edge(cover: &EdgeSet, edge_name: u32) -> bool {
    cover.edges().iter().any(|e| e.name == edge_name)
}

/// Checks that every node's bag vertices are all present in that node's own cover.
fn check_bag_subset_of_cover(nodes: &[&Node]) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    for node in nodes {
        let cover_vertices: HashSet<VertexId> =
            node.cover.edges().iter().flat_map(|e| e.vertices.iter().copied()).collect();
        for &v in &node.bag {
            if !cover_vertices.contains(&v) {
                failures.push(ValidationFailure::BagExceedsCover(v));
            }
        }
    }
    failures
}

/// Checks that every edge of `graph_edges` is covered by at least one node.
fn check_edge_coverage(nodes: &[&Node], graph_edges: &EdgeSet) -> Vec<ValidationFailure> {
    graph_edges
        .edges()
        .iter()
        .filter(|e| !nodes.iter().any(|n| covers_edge(&n.cover, e.name)))
        .map(|e| ValidationFailure::UncoveredEdge(e.name))
        .collect()
}

/// Checks that every node's cover edge genuinely comes from `graph_edges`: either a verbatim edge
/// (same name, same vertices) or — the only other thing an engine's `cover` ever holds — an
/// anonymous (name 0) subedge whose vertices are a non-empty subset of some edge of
/// `graph_edges`, the shape [`crate::subedge::compute_subedges`] produces for `-sub` mode.
fn check_cover_validity(nodes: &[&Node], graph_edges: &EdgeSet) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    for node in nodes {
        for ce in node.cover.edges() {
            let valid = if ce.name == 0 {
                !ce.vertices.is_empty()
                    && graph_edges
                        .edges()
                        .iter()
                        .any(|e| is_subset(&ce.vertices, &e.vertices))
            } else {
                graph_edges
                    .edges()
                    .iter()
                    .any(|e| e.name == ce.name && e.vertices == ce.vertices)
            };
            if !valid {
                failures.push(ValidationFailure::InvalidCoverEdge(ce.name));
            }
        }
    }
    failures
}

/// Checks the GHD connectedness condition: for every vertex, the set of nodes whose bag contains
/// it must induce a connected subtree, not a scattered set.
fn check_connectedness(root: &Node) -> Vec<ValidationFailure> {
    let mut all_vertices: HashSet<VertexId> = HashSet::new();
    let mut nodes = Vec::new();
    walk(root, &mut nodes);
    for node in &nodes {
        all_vertices.extend(node.bag.iter().copied());
    }

    let mut failures = Vec::new();
    for v in all_vertices {
        if !subtree_containing_v_is_connected(root, v) {
            failures.push(ValidationFailure::Disconnected(v));
        }
    }
    failures
}

/// Returns whether the nodes containing `v` form a connected subtree, via a single post-order
/// pass: a subtree is connected in `v` iff at most one of its children has any node containing
/// `v` in its own induced (possibly empty) connected piece, unless this node itself contains `v`
/// (in which case any number of v-containing children attach directly to it).
fn subtree_containing_v_is_connected(node: &Node, v: VertexId) -> bool {
    collect_and_check(node, v).is_some()
}

/// Returns `Some(true)` if this subtree contains at least one v-node and they're connected
/// through this node (i.e. this node is on the path), `Some(false)` if it contains none, and
/// bubbles up `None` the moment a violation is found below.
fn collect_and_check(node: &Node, v: VertexId) -> Option<bool> {
    let here = node.bag.contains(&v);
    let mut children_with_v = 0;
    for child in &node.children {
        match collect_and_check(child, v)? {
            true => children_with_v += 1,
            false => {}
        }
    }
    if !here && children_with_v > 1 {
        // Two disjoint v-containing branches meet only above a node that doesn't itself
        // contain v: the occurrences of v are split across disconnected pieces.
        return None;
    }
    Some(here || children_with_v > 0)
}

/// Runs every structural check against a decomposition, returning all violations found (an
/// empty vector means the decomposition is a valid GHD of `graph_edges` within `width_bound`).
pub fn validate(
    decomp: &Decomposition,
    graph_edges: &EdgeSet,
    width_bound: usize,
) -> Vec<ValidationFailure> {
    let mut nodes = Vec::new();
    walk(&decomp.root, &mut nodes);

    let mut failures = Vec::new();
    failures.extend(check_edge_coverage(&nodes, graph_edges));
    failures.extend(check_bag_subset_of_cover(&nodes));
    failures.extend(check_cover_validity(&nodes, graph_edges));
    failures.extend(check_connectedness(&decomp.root));

    let width = decomp.width();
    if width > width_bound {
        failures.push(ValidationFailure::WidthExceeded {
            found: width,
            bound: width_bound,
        });
    }

    failures
}

fn fmt_node(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let names: Vec<String> = node.cover.edges().iter().map(|e| e.name.to_string()).collect();
    writeln!(
        f,
        "{indent}bag={:?} cover={{{}}}",
        node.bag,
        names.join(",")
    )?;
    for child in &node.children {
        fmt_node(child, depth + 1, f)?;
    }
    Ok(())
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(&self.root, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomp::Node;
    use crate::edge::Edge;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_valid_triangle_decomposition() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3]), e(3, &[1, 3])]);
        let root = Node::new(vec![1, 2, 3], edges.clone());
        let decomp = Decomposition::new(root);
        assert!(validate(&decomp, &edges, 3).is_empty());
    }

    #[test]
    fn test_detects_uncovered_edge() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3])]);
        let root = Node::new(vec![1, 2], EdgeSet::new(vec![e(1, &[1, 2])]));
        let decomp = Decomposition::new(root);
        let failures = validate(&decomp, &edges, 3);
        assert!(failures.contains(&ValidationFailure::UncoveredEdge(2)));
    }

    #[test]
    fn test_detects_bag_exceeding_cover() {
        let cover = EdgeSet::new(vec![e(1, &[1, 2])]);
        let root = Node::new(vec![1, 2, 99], cover.clone());
        let decomp = Decomposition::new(root);
        let failures = validate(&decomp, &cover, 3);
        assert!(failures.contains(&ValidationFailure::BagExceedsCover(99)));
    }

    #[test]
    fn test_detects_disconnected_vertex_occurrence() {
        // Vertex 1 appears in two leaves under a root that doesn't itself contain it.
        let leaf_a = Node::new(vec![1, 2], EdgeSet::new(vec![e(1, &[1, 2])]));
        let leaf_b = Node::new(vec![1, 3], EdgeSet::new(vec![e(2, &[1, 3])]));
        let root = Node::with_children(vec![2, 3], EdgeSet::new(vec![e(3, &[2, 3])]), vec![leaf_a, leaf_b]);
        let decomp = Decomposition::new(root);
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[1, 3]), e(3, &[2, 3])]);
        let failures = validate(&decomp, &edges, 3);
        assert!(failures.contains(&ValidationFailure::Disconnected(1)));
    }

    #[test]
    fn test_detects_cover_edge_foreign_to_graph() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2])]);
        let root = Node::new(vec![1, 2, 3], EdgeSet::new(vec![e(1, &[1, 2]), e(9, &[1, 3])]));
        let decomp = Decomposition::new(root);
        let failures = validate(&decomp, &edges, 3);
        assert!(failures.contains(&ValidationFailure::InvalidCoverEdge(9)));
    }

    #[test]
    fn test_accepts_subedge_of_original_edge() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2, 3])]);
        let cover = EdgeSet::new(vec![Edge::anonymous(vec![1, 2])]);
        let root = Node::new(vec![1, 2], cover);
        let decomp = Decomposition::new(root);
        let failures = validate(&decomp, &edges, 3);
        assert!(!failures
            .iter()
            .any(|f| matches!(f, ValidationFailure::InvalidCoverEdge(_))));
    }

    #[test]
    fn test_detects_width_exceeded() {
        let edges = EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[2, 3])]);
        let root = Node::new(vec![1, 2, 3], edges.clone());
        let decomp = Decomposition::new(root);
        let failures = validate(&decomp, &edges, 1);
        assert!(failures
            .iter()
            .any(|f| matches!(f, ValidationFailure::WidthExceeded { .. })));
    }
}
