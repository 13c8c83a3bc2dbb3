//! Vertex identifiers and the sorted-vertex-set representation used throughout the crate.

/// A densely-assigned vertex identifier, recoverable to a textual name via [`crate::names::NameTable`].
pub type VertexId = u32;

/// A sorted, duplicate-free list of vertex ids.
///
/// Kept as a thin `Vec` wrapper (rather than a bitset) because real hypergraphs routinely exceed
/// the vertex counts a fixed-width bitset can hold.
pub type VertexSet = Vec<VertexId>;

/// Builds a [`VertexSet`] from an unsorted, possibly-duplicated slice.
pub fn vertex_set_from_unsorted(mut vertices: Vec<VertexId>) -> VertexSet {
    vertices.sort_unstable();
    vertices.dedup();
    vertices
}
