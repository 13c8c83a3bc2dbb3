//! Cooperative-cancellation parallel combination search.
//!
//! Shards the `(n,k)` combination space across `shards` worker threads, each advancing its own
//! slice of the space and attempting `try_candidate` against every combination in turn. The first
//! thread whose attempt succeeds flips a shared flag; every other thread notices on its next
//! check and stops early instead of running its shard to completion.
//!
//! `try_candidate` returns `Option<T>` rather than `bool`: testing whether a separator is
//! balanced is cheap, but turning a balanced separator into a full decomposition (recursing into
//! its components) is not, and the two can fail independently — a balanced separator can still
//! lead nowhere if one of its components has no decomposition of its own. Folding both steps into
//! one "attempt" closure means a rejected candidate is simply skipped, with no separate
//! retry-coordination between a balance pass and a construction pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::combin::CombinationIterator;

/// Runs `try_candidate` against every size-`k` (or, if `unextended` is false, every 1..=k-sized)
/// combination of `0..n`, sharded across `shards` threads, stopping as soon as one shard succeeds.
/// Returns that shard's result, or `None` if the whole space was exhausted with no success.
pub fn parallel_search<F, T>(
    n: usize,
    k: usize,
    shards: usize,
    unextended: bool,
    try_candidate: F,
) -> Option<T>
where
    F: Fn(&[usize]) -> Option<T> + Sync,
    T: Send,
{
    if shards <= 1 {
        return sequential_search(n, k, unextended, try_candidate);
    }

    let found = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<T>();
    let iterators = CombinationIterator::split(n, k, shards, unextended);
    let try_candidate = &try_candidate;

    std::thread::scope(|scope| {
        for mut it in iterators {
            let found = &found;
            let tx = tx.clone();
            scope.spawn(move || {
                while !found.load(Ordering::Relaxed) && it.has_next() {
                    let combo = it.combination().to_vec();
                    if let Some(result) = try_candidate(&combo) {
                        if !found.swap(true, Ordering::SeqCst) {
                            let _ = tx.send(result);
                        }
                        return;
                    }
                    it.confirm();
                }
            });
        }
    });

    drop(tx);
    rx.try_iter().next()
}

/// Single-threaded fallback, also used directly by the `Sequential` parallelism mode.
pub fn sequential_search<F, T>(n: usize, k: usize, unextended: bool, try_candidate: F) -> Option<T>
where
    F: Fn(&[usize]) -> Option<T>,
{
    let mut it = if unextended {
        CombinationIterator::new_unextended(n, k)
    } else {
        CombinationIterator::new(n, k)
    };
    while it.has_next() {
        let combo = it.combination().to_vec();
        if let Some(result) = try_candidate(&combo) {
            return Some(result);
        }
        it.confirm();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_finds_match() {
        let result = sequential_search(5, 2, true, |c| (c == [1, 3]).then(|| c.to_vec()));
        assert_eq!(result, Some(vec![1, 3]));
    }

    #[test]
    fn test_sequential_exhausts_without_match() {
        let result: Option<()> = sequential_search(4, 2, true, |_| None);
        assert_eq!(result, None);
    }

    #[test]
    fn test_parallel_finds_match_regardless_of_shard_count() {
        for shards in [1, 2, 4, 8] {
            let result =
                parallel_search(6, 3, shards, true, |c| (c == [0, 1, 2]).then(|| c.to_vec()));
            assert_eq!(result, Some(vec![0, 1, 2]), "shards = {shards}");
        }
    }

    #[test]
    fn test_parallel_returns_none_when_nothing_matches() {
        let result: Option<()> = parallel_search(5, 2, 4, true, |_| None);
        assert_eq!(result, None);
    }
}
