//! The decomposition tree itself: nodes (bag + cover) and whole-tree assembly.

use crate::edge::EdgeSet;
use crate::graph::Graph;
use crate::setops::is_subset;
use crate::vertex::{VertexId, VertexSet};

/// One node of a generalized hypertree decomposition: a bag of vertices, and the edges ("cover")
/// chosen to cover it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub bag: VertexSet,
    pub cover: EdgeSet,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(bag: VertexSet, cover: EdgeSet) -> Self {
        Node {
            bag,
            cover,
            children: Vec::new(),
        }
    }

    pub fn with_children(bag: VertexSet, cover: EdgeSet, children: Vec<Node>) -> Self {
        Node {
            bag,
            cover,
            children,
        }
    }

    /// The widest cover in this node's subtree (the GHD-width contribution of this subtree).
    pub fn max_cover_size(&self) -> usize {
        self.children
            .iter()
            .map(Node::max_cover_size)
            .max()
            .unwrap_or(0)
            .max(self.cover.len())
    }

    /// Reattaches `self` beneath `new_root`, collapsing the two into one node when they already
    /// describe the same separator — this is what lets [`reroot_combine`] merge several
    /// subtrees' worth of children under a single new root without leaving redundant
    /// single-child nodes behind.
    pub fn reroot(self, new_root: &Node) -> Node {
        if self.cover == new_root.cover && self.bag == new_root.bag {
            self
        } else {
            Node::with_children(new_root.bag.clone(), new_root.cover.clone(), vec![self])
        }
    }

    /// Attaches `child` as a direct child of the first node (searched depth-first) whose bag is a
    /// superset of the *entire* connector vertex set `connector`, not merely one shared vertex —
    /// a connector with more than one vertex needs every one of them already present in the
    /// attaching node's bag, or the resulting tree fails the GHD connectedness condition for
    /// whichever connector vertex landed outside it. Returns `false` if no such node exists.
    pub fn attach_at_connector(&mut self, connector: &[VertexId], child: Node) -> bool {
        match self.try_attach(connector, child) {
            Ok(()) => true,
            Err(_) => false,
        }
    }

    fn try_attach(&mut self, connector: &[VertexId], child: Node) -> Result<(), Node> {
        if is_subset(connector, &self.bag) {
            self.children.push(child);
            return Ok(());
        }
        let mut child = child;
        for c in &mut self.children {
            match c.try_attach(connector, child) {
                Ok(()) => return Ok(()),
                Err(returned) => child = returned,
            }
        }
        Err(child)
    }
}

/// A complete GHD for some graph. Engines return `Option<Decomposition>`, not a sentinel empty
/// value — `None` is the idiomatic stand-in for the original's zero-value "reject" `Decomp{}`.
#[derive(Clone, Debug)]
pub struct Decomposition {
    pub root: Node,
}

impl Decomposition {
    pub fn new(root: Node) -> Self {
        Decomposition { root }
    }

    /// The GHD-width of this decomposition: the largest cover among all its nodes.
    pub fn width(&self) -> usize {
        self.root.max_cover_size()
    }
}

/// BalSep-global's tree assembly: builds one root labeled by `balsep`, and for every subtree
/// found for a component under it, hangs that subtree's children directly off the new root
/// (skipping a subtree's own root node when it's redundant with `balsep`).
pub fn reroot_combine(balsep_bag: VertexSet, balsep_cover: EdgeSet, subtrees: Vec<Node>) -> Node {
    let new_root = Node::new(balsep_bag, balsep_cover);
    let mut output = new_root.clone();
    for subtree in subtrees {
        let rerooted = subtree.reroot(&new_root);
        output.children.extend(rerooted.children);
    }
    output
}

/// The base case for a subgraph left with at most two components (ordinary edges plus special
/// edge groups combined): wires whatever's left directly into a tiny tree instead of recursing.
///
/// Every combination of 0..=2 ordinary edges and 0..=2 special groups (summing to at most two)
/// gets a genuine cover node here. This differs from the decompose-or-reject shortcut the
/// original takes when it sees two plain edges and no specials — that path hands back a
/// "successful" placeholder whose root covers nothing, relying on a sentinel-equality quirk
/// elsewhere to keep it from reading as a reject. With `Option<Decomposition>` there's no
/// equivalent trick to exploit, so this builds an actual two-edge cover node instead.
pub fn base_case(h: &Graph, specials: &[EdgeSet]) -> Option<Decomposition> {
    match specials.len() {
        0 => Some(Decomposition::new(Node::new(
            h.vertices().to_vec(),
            h.edges.clone(),
        ))),
        1 if h.edges.is_empty() => {
            let sp = &specials[0];
            Some(Decomposition::new(Node::new(
                sp.vertices().to_vec(),
                sp.clone(),
            )))
        }
        1 => {
            let sp = &specials[0];
            Some(Decomposition::new(Node::with_children(
                h.vertices().to_vec(),
                h.edges.clone(),
                vec![Node::new(sp.vertices().to_vec(), sp.clone())],
            )))
        }
        2 => {
            let (sp1, sp2) = (&specials[0], &specials[1]);
            Some(Decomposition::new(Node::with_children(
                sp1.vertices().to_vec(),
                sp1.clone(),
                vec![Node::new(sp2.vertices().to_vec(), sp2.clone())],
            )))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    fn e(name: u32, vs: &[VertexId]) -> Edge {
        Edge::new(name, vs.to_vec())
    }

    #[test]
    fn test_max_cover_size_takes_deepest_widest_node() {
        let leaf = Node::new(vec![1, 2], EdgeSet::new(vec![e(1, &[1, 2]), e(2, &[1, 2])]));
        let root = Node::with_children(vec![1], EdgeSet::new(vec![e(3, &[1])]), vec![leaf]);
        assert_eq!(root.max_cover_size(), 2);
    }

    #[test]
    fn test_reroot_collapses_identical_separator() {
        let cover = EdgeSet::new(vec![e(1, &[1, 2])]);
        let node = Node::new(vec![1, 2], cover.clone());
        let new_root = Node::new(vec![1, 2], cover);
        let rerooted = node.clone().reroot(&new_root);
        assert_eq!(rerooted, node);
    }

    #[test]
    fn test_reroot_wraps_when_different() {
        let child = Node::new(vec![3], EdgeSet::new(vec![e(1, &[3])]));
        let new_root = Node::new(vec![1, 2], EdgeSet::new(vec![e(2, &[1, 2])]));
        let rerooted = child.clone().reroot(&new_root);
        assert_eq!(rerooted.bag, new_root.bag);
        assert_eq!(rerooted.children, vec![child]);
    }

    #[test]
    fn test_attach_at_connector_finds_nested_bag() {
        let mut root = Node::with_children(
            vec![1, 2],
            EdgeSet::new(vec![e(1, &[1, 2])]),
            vec![Node::new(vec![2, 3], EdgeSet::new(vec![e(2, &[2, 3])]))],
        );
        let new_child = Node::new(vec![3, 4], EdgeSet::new(vec![e(3, &[3, 4])]));
        assert!(root.attach_at_connector(&[3], new_child.clone()));
        assert_eq!(root.children[0].children, vec![new_child]);
    }

    #[test]
    fn test_attach_at_connector_requires_every_connector_vertex() {
        // The nested node's bag {2,3} contains 3 but not 9, so a two-vertex connector {3,9}
        // must not attach there even though it attaches for the single-vertex connector {3}.
        let mut root = Node::with_children(
            vec![1, 2],
            EdgeSet::new(vec![e(1, &[1, 2])]),
            vec![Node::new(vec![2, 3], EdgeSet::new(vec![e(2, &[2, 3])]))],
        );
        let child = Node::new(vec![9], EdgeSet::new(vec![e(2, &[9])]));
        assert!(!root.attach_at_connector(&[3, 9], child));
    }

    #[test]
    fn test_attach_at_connector_missing_vertex_fails() {
        let mut root = Node::new(vec![1, 2], EdgeSet::new(vec![e(1, &[1, 2])]));
        let child = Node::new(vec![9], EdgeSet::new(vec![e(2, &[9])]));
        assert!(!root.attach_at_connector(&[99], child));
    }
}
