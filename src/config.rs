//! Plain-data search configuration, built once per invocation and threaded read-only from there.

use std::sync::Arc;

use crate::cache::Cache;
use crate::predicates::DEFAULT_BALANCE_FACTOR;

/// Which of the three search strategies to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    BalSep,
    DetK,
    LogK,
}

impl std::str::FromStr for Algorithm {
    type Err = crate::error::GhdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "balsep" | "bal" => Ok(Algorithm::BalSep),
            "detk" | "det" => Ok(Algorithm::DetK),
            "logk" | "log" => Ok(Algorithm::LogK),
            other => Err(crate::error::GhdError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// How the separator search fans out across threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// Parallel separator search and parallel children recursion.
    Full,
    /// Parallel separator search only; children are searched one at a time.
    Search,
    /// Sequential separator search; children recurse in parallel.
    Comp,
    /// No parallelism anywhere.
    Sequential,
}

/// BalSep's separator-construction strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalSepMode {
    /// Reroot the whole running decomposition under each new separator.
    Global,
    /// Attach each subtree directly at its connector instead of rerooting.
    Local,
}

/// Whether DetK additionally restricts candidate separators to the graph's subedges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetKMode {
    Plain,
    SubEdge,
}

/// Configuration shared read-only by every worker in a single search invocation.
#[derive(Clone)]
pub struct SearchConfig {
    pub width: usize,
    pub algorithm: Algorithm,
    pub parallelism: Parallelism,
    pub balsep_mode: BalSepMode,
    pub detk_mode: DetKMode,
    pub balance_factor: usize,
    pub num_threads: usize,
    pub cache: Arc<Cache>,
}

impl SearchConfig {
    pub fn new(width: usize, algorithm: Algorithm) -> Self {
        SearchConfig {
            width,
            algorithm,
            parallelism: Parallelism::Sequential,
            balsep_mode: BalSepMode::Global,
            detk_mode: DetKMode::Plain,
            balance_factor: DEFAULT_BALANCE_FACTOR,
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            cache: Arc::new(Cache::new()),
        }
    }

    pub fn with_parallelism(mut self, p: Parallelism) -> Self {
        self.parallelism = p;
        self
    }

    pub fn with_balsep_mode(mut self, m: BalSepMode) -> Self {
        self.balsep_mode = m;
        self
    }

    pub fn with_detk_mode(mut self, m: DetKMode) -> Self {
        self.detk_mode = m;
        self
    }

    pub fn with_balance_factor(mut self, f: usize) -> Self {
        self.balance_factor = f;
        self
    }

    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("balsep".parse::<Algorithm>().unwrap(), Algorithm::BalSep);
        assert_eq!("DetK".parse::<Algorithm>().unwrap(), Algorithm::DetK);
        assert!("nonsense".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let cfg = SearchConfig::new(3, Algorithm::LogK);
        assert_eq!(cfg.width, 3);
        assert_eq!(cfg.parallelism, Parallelism::Sequential);
        assert_eq!(cfg.balance_factor, crate::predicates::DEFAULT_BALANCE_FACTOR);
    }
}
