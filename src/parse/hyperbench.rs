//! HyperBench format: a comma-separated list of `name(v1,v2,...)` edges.

use std::collections::HashMap;

use crate::edge::{Edge, EdgeSet};
use crate::error::GhdError;
use crate::graph::Graph;
use crate::names::NameTable;

use super::{Token, Tokenizer};

/// Parses a HyperBench-format hypergraph: comma-separated `name(v1,v2,…)` edges, an optional
/// trailing `.`, `%`/`//` line comments. Edge and vertex namespaces are independent — a vertex
/// and an edge may share a textual name without colliding, since only vertex names are interned
/// into the returned [`NameTable`].
pub fn parse_hyperbench(input: &str) -> Result<(Graph, NameTable), GhdError> {
    let mut tok = Tokenizer::new(input);
    let mut names = NameTable::new();
    let mut edge_names: HashMap<String, u32> = HashMap::new();
    let mut next_edge_id = 1u32;
    let mut edges = Vec::new();

    loop {
        match tok.peek_token() {
            None => break,
            Some(Token::Punct('.')) => {
                tok.next_token();
                break;
            }
            _ => {}
        }

        let (name, vertex_names) = super::parse_edge_body(&mut tok)?;
        if edge_names.contains_key(&name) {
            return Err(GhdError::Parse {
                line: tok.line(),
                message: format!("edge names not unique, not a valid hypergraph: {name:?}"),
            });
        }
        let edge_id = next_edge_id;
        edge_names.insert(name, edge_id);
        next_edge_id += 1;

        let vertices = vertex_names.iter().map(|v| names.intern(v)).collect();
        edges.push(Edge::new(edge_id, vertices));

        match tok.peek_token() {
            Some(Token::Punct(',')) => {
                tok.next_token();
            }
            Some(Token::Punct('.')) => {
                tok.next_token();
                break;
            }
            _ => {}
        }
    }

    let graph = Graph::new(EdgeSet::new(edges), Vec::new());
    Ok((graph, names))
}
