use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};
use crate::fuzzy::fuzzy_equal;
use crate::normalize::TokenSet;

pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_STRONG_CONTENT_BONUS: f64 = 0.5;
pub const DEFAULT_WEAK_CONTENT_BONUS: f64 = 0.2;

/// The content pass only runs when the query has at least this many content
/// tokens.
pub const MIN_QUERY_CONTENT_TOKENS: usize = 2;

/// Tunable knobs of the scorer. The defaults were picked by hand and should
/// only move with evaluation results behind them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    pub accept_threshold: f64,
    pub strong_content_bonus: f64,
    pub weak_content_bonus: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            strong_content_bonus: DEFAULT_STRONG_CONTENT_BONUS,
            weak_content_bonus: DEFAULT_WEAK_CONTENT_BONUS,
        }
    }
}

impl MatchParams {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.accept_threshold = threshold;
        self
    }

    /// Every knob must be a finite, non-negative number.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("accept_threshold", self.accept_threshold),
            ("strong_content_bonus", self.strong_content_bonus),
            ("weak_content_bonus", self.weak_content_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HelpdeskError::InvalidArg(format!(
                    "matching.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn content_bonus(&self, content_matches: usize) -> f64 {
        match content_matches {
            0 => 0.0,
            1 => self.weak_content_bonus,
            _ => self.strong_content_bonus,
        }
    }
}

/// How a score was put together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub intersection: usize,
    pub union: usize,
    pub jaccard: f64,
    pub content_matches: usize,
    pub bonus: f64,
    pub total: f64,
}

/// Greedy one-to-one matching: each query token takes the first unconsumed
/// candidate token it fuzzily equals. Not an optimal assignment.
pub fn greedy_overlap(query: &[String], candidate: &[String]) -> usize {
    let mut consumed = vec![false; candidate.len()];
    let mut matches = 0;

    for q in query {
        let hit = candidate
            .iter()
            .enumerate()
            .find(|(i, c)| !consumed[*i] && fuzzy_equal(q, c))
            .map(|(i, _)| i);

        if let Some(i) = hit {
            consumed[i] = true;
            matches += 1;
        }
    }

    matches
}

/// Size of the exact-string set union; never less than 1.
pub fn union_size(query: &[String], candidate: &[String]) -> usize {
    let union: HashSet<&str> = query
        .iter()
        .chain(candidate.iter())
        .map(String::as_str)
        .collect();
    union.len().max(1)
}

pub fn score_breakdown(
    query: &TokenSet,
    candidate: &TokenSet,
    params: &MatchParams,
) -> ScoreBreakdown {
    let intersection = greedy_overlap(&query.tokens, &candidate.tokens);
    let union = union_size(&query.tokens, &candidate.tokens);
    let jaccard = intersection as f64 / union as f64;

    let content_matches = if query.content.len() >= MIN_QUERY_CONTENT_TOKENS {
        greedy_overlap(&query.content, &candidate.content)
    } else {
        0
    };
    let bonus = params.content_bonus(content_matches);

    ScoreBreakdown {
        intersection,
        union,
        jaccard,
        content_matches,
        bonus,
        total: jaccard + bonus,
    }
}

pub fn score(query: &TokenSet, candidate: &TokenSet, params: &MatchParams) -> f64 {
    score_breakdown(query, candidate, params).total
}
