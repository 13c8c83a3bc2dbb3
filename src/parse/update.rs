//! Update format: the base HyperBench grammar terminated by `.`, an optional `👻` ghost-edge
//! section, and an optional `✨` special-edge section.
//!
//! Ghost edges are additional constraints folded directly into the returned graph's ordinary
//! edges — the original keeps a separate "ghost graph" alongside the plain one, but since only
//! one `Graph` comes back here the distinction collapses to just always including them. Special
//! edges become single-edge [`EdgeSet`]s the caller can use to seed `find_decomp` with an
//! initial forced bag.

use crate::edge::{Edge, EdgeSet};
use crate::error::GhdError;
use crate::graph::Graph;
use crate::names::NameTable;

use super::{Token, Tokenizer};

fn parse_edge_list(
    tok: &mut Tokenizer<'_>,
    names: &mut NameTable,
    next_id: &mut u32,
    stop_at: &[char],
) -> Result<Vec<Edge>, GhdError> {
    let mut edges = Vec::new();
    loop {
        match tok.peek_token() {
            None => break,
            Some(Token::Punct(c)) if stop_at.contains(&c) => break,
            Some(Token::Punct(',')) => {
                tok.next_token();
                continue;
            }
            _ => {}
        }
        let (_name, vertex_names) = super::parse_edge_body(tok)?;
        let vertices = vertex_names.iter().map(|v| names.intern(v)).collect();
        edges.push(Edge::new(*next_id, vertices));
        *next_id += 1;
    }
    Ok(edges)
}

/// Parses an Update-format hypergraph, returning the combined graph (ordinary edges plus any
/// ghost edges), the parsed specials, and the vertex name table.
pub fn parse_update(input: &str) -> Result<(Graph, Vec<EdgeSet>, NameTable), GhdError> {
    let mut tok = Tokenizer::new(input);
    let mut names = NameTable::new();
    let mut next_id = 1u32;

    let mut edges = parse_edge_list(&mut tok, &mut names, &mut next_id, &['.', '👻', '✨'])?;
    if let Some(Token::Punct('.')) = tok.peek_token() {
        tok.next_token();
    }

    if let Some(Token::Punct('👻')) = tok.peek_token() {
        tok.next_token();
        let ghost = parse_edge_list(&mut tok, &mut names, &mut next_id, &['✨'])?;
        edges.extend(ghost);
    }

    let mut specials = Vec::new();
    if let Some(Token::Punct('✨')) = tok.peek_token() {
        tok.next_token();
        let special_edges = parse_edge_list(&mut tok, &mut names, &mut next_id, &[])?;
        for e in special_edges {
            specials.push(EdgeSet::new(vec![e]));
        }
    }

    let graph = Graph::new(EdgeSet::new(edges), Vec::new());
    Ok((graph, specials, names))
}
