use tracing::debug;

use crate::model::{KnowledgeEntry, MatchResult};
use crate::normalize::TokenSet;
use crate::similarity::{score, MatchParams};

/// Every non-degenerate candidate with its score, best first. Candidates whose
/// question tokenizes to nothing are left out; equal scores keep input order.
pub fn rank<'a>(
    query: &str,
    entries: &'a [KnowledgeEntry],
    params: &MatchParams,
) -> Vec<(&'a KnowledgeEntry, f64)> {
    let query_tokens = TokenSet::from_text(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&KnowledgeEntry, f64)> = entries
        .iter()
        .filter_map(|entry| {
            let candidate = TokenSet::from_text(&entry.question);
            if candidate.is_empty() {
                return None;
            }
            Some((entry, score(&query_tokens, &candidate, params)))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

pub fn top_k<'a>(
    query: &str,
    entries: &'a [KnowledgeEntry],
    params: &MatchParams,
    k: usize,
) -> Vec<(&'a KnowledgeEntry, f64)> {
    rank(query, entries, params).into_iter().take(k).collect()
}

/// Single pass over `entries` keeping the best-scoring candidate; the first
/// one seen wins a tie. A hit needs `accept_threshold` or better.
pub fn find_best_match<'a>(
    query: &str,
    entries: &'a [KnowledgeEntry],
    params: &MatchParams,
) -> MatchResult<'a> {
    let query_tokens = TokenSet::from_text(query);
    if query_tokens.is_empty() {
        debug!(query, "query has no usable tokens");
        return MatchResult::no_match(0.0);
    }

    let mut best: Option<(&KnowledgeEntry, f64)> = None;

    for entry in entries {
        let candidate = TokenSet::from_text(&entry.question);
        if candidate.is_empty() {
            continue;
        }

        let s = score(&query_tokens, &candidate, params);
        let better = match best {
            Some((_, best_score)) => s > best_score,
            None => true,
        };
        if better {
            best = Some((entry, s));
        }
    }

    match best {
        Some((entry, s)) if s >= params.accept_threshold => {
            debug!(entry_id = %entry.id, score = s, "knowledge match");
            MatchResult {
                matched: true,
                entry: Some(entry),
                score: s,
            }
        }
        Some((entry, s)) => {
            debug!(entry_id = %entry.id, score = s, "best candidate below threshold");
            MatchResult::no_match(s)
        }
        None => MatchResult::no_match(0.0),
    }
}
