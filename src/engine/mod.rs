//! Search engines: the three algorithm variants that turn a hypergraph into a GHD.
//!
//! All three share the same building blocks (combination search, balance/admissibility
//! predicates, component splitting, the cache) and differ only in how they pick separator
//! candidates and how they assemble the resulting tree.

pub mod balsep;
pub mod detk;
pub mod logk;

use crate::config::{Algorithm, SearchConfig};
use crate::decomp::Decomposition;
use crate::graph::Graph;

/// Common interface implemented by each algorithm variant.
pub trait DecompEngine {
    fn name(&self) -> &'static str;

    /// Searches for a width-`config.width` GHD of the engine's graph, or `None` if none exists.
    fn find_decomp(&self, config: &SearchConfig) -> Option<Decomposition>;
}

/// Builds the engine named by `config.algorithm` over `graph`.
pub fn build(graph: Graph, config: &SearchConfig) -> Box<dyn DecompEngine> {
    match config.algorithm {
        Algorithm::BalSep => Box::new(balsep::BalSepEngine::new(graph, config.balsep_mode)),
        Algorithm::DetK => Box::new(detk::DetKEngine::new(graph, config.detk_mode)),
        Algorithm::LogK => Box::new(logk::LogKEngine::new(graph)),
    }
}
