//! PACE 2019 format: a `p htd <n> <m>` header line followed by `<edgeName> <v1> <v2> …` lines.
//!
//! Unlike HyperBench this grammar is purely numeric and line-oriented, so it's parsed directly
//! off split lines rather than through the shared token-based [`super::Tokenizer`].

use crate::edge::{Edge, EdgeSet};
use crate::error::GhdError;
use crate::graph::Graph;
use crate::names::NameTable;

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('c') || trimmed.starts_with("//") || trimmed.is_empty()
}

/// Parses a PACE 2019 hypergraph. Vertex ids are namespaced above edge ids in the sense that
/// each is interned independently into the returned [`NameTable`] the first time it's seen,
/// regardless of what numeral it was written as — so edge 3 and vertex 3 never collide.
pub fn parse_pace(input: &str) -> Result<(Graph, NameTable), GhdError> {
    let mut lines = input.lines().enumerate().filter(|(_, l)| !is_comment(l));

    let (header_no, header) = lines.next().ok_or_else(|| GhdError::Parse {
        line: 1,
        message: "empty input, expected a \"p htd\" header line".to_string(),
    })?;
    let mut header_fields = header.split_whitespace();
    match (header_fields.next(), header_fields.next()) {
        (Some("p"), Some("htd")) => {}
        _ => {
            return Err(GhdError::Parse {
                line: header_no + 1,
                message: format!("expected \"p htd <n> <m>\", got {header:?}"),
            })
        }
    }
    let _n_vertices: usize = header_fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| GhdError::Parse {
            line: header_no + 1,
            message: "missing or invalid vertex count in header".to_string(),
        })?;
    let n_edges: usize = header_fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| GhdError::Parse {
            line: header_no + 1,
            message: "missing or invalid edge count in header".to_string(),
        })?;

    let mut names = NameTable::new();
    let mut edges = Vec::with_capacity(n_edges);
    let mut next_edge_id = 1u32;

    for (line_no, line) in lines.take(n_edges) {
        let mut fields = line.split_whitespace();
        fields.next().ok_or_else(|| GhdError::Parse {
            line: line_no + 1,
            message: "edge line missing its name field".to_string(),
        })?;
        let vertices: Vec<u32> = fields
            .map(|s| {
                s.parse::<u64>()
                    .map_err(|_| GhdError::Parse {
                        line: line_no + 1,
                        message: format!("invalid vertex number {s:?}"),
                    })
                    .map(|raw| names.intern(&raw.to_string()))
            })
            .collect::<Result<_, _>>()?;
        edges.push(Edge::new(next_edge_id, vertices));
        next_edge_id += 1;
    }

    if edges.len() != n_edges {
        return Err(GhdError::Parse {
            line: header_no + 1,
            message: format!(
                "header declared {n_edges} edges, found {}",
                edges.len()
            ),
        });
    }

    let graph = Graph::new(EdgeSet::new(edges), Vec::new());
    Ok((graph, names))
}
