use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::model::{Decision, KnowledgeEntry, MatchResult};
use crate::retrieval::find_best_match;
use crate::similarity::MatchParams;

/// A labelled question used to check threshold and bonus changes against
/// known-good behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    pub expected_decision: Decision,
    #[serde(default)]
    pub expected_entry_id: Option<String>,
    #[serde(default)]
    pub min_similarity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_decision: Decision,
    pub actual_entry_id: Option<String>,
    pub score: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f64) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

/// A case passes when the decision agrees and, where given, the entry id and
/// minimum score do too.
pub fn case_passes(case: &EvalCase, result: &MatchResult<'_>) -> bool {
    if case.expected_decision != result.decision() {
        return false;
    }

    if let Some(expected) = case.expected_entry_id.as_deref() {
        if result.entry.map(|e| e.id.as_str()) != Some(expected) {
            return false;
        }
    }

    match case.min_similarity {
        Some(min) => result.score >= min,
        None => true,
    }
}

pub fn evaluate_cases(
    entries: &[KnowledgeEntry],
    cases: &[EvalCase],
    params: &MatchParams,
) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let result = find_best_match(&case.question, entries, params);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let passed = case_passes(case, &result);
        let actual_decision = result.decision();
        let actual_entry_id = result.entry.map(|e| e.id.clone());

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed,
            actual_decision,
            actual_entry_id,
            score: result.score,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}
