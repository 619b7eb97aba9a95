pub mod config;
pub mod error;
pub mod eval;
pub mod fuzzy;
pub mod knowledge;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod responder;
pub mod retrieval;
pub mod rules;
pub mod similarity;
pub mod storage;
pub mod tickets;

pub use config::{EscalationConfig, HelpdeskConfig, DEFAULT_TIMEOUT_MINUTES};
pub use error::{HelpdeskError, Result};
pub use eval::{case_passes, evaluate_cases, EvalCase, EvalOutcome, EvalSummary};
pub use fuzzy::{fuzzy_equal, levenshtein};
pub use knowledge::KnowledgeBase;
pub use model::{
    Decision, HelpRequest, KnowledgeEntry, MatchResult, Page, RequestStatus, DEFAULT_CATEGORY,
    LEARNED_CATEGORY,
};
pub use normalize::{content_tokens, filter_tokens, is_content_token, normalize, tokenize, TokenSet};
pub use notify::{EventKind, LogNotifier, NotificationEvent, Notifier, OutboxNotifier};
pub use responder::{AnswerSource, CallOutcome, Responder, TicketResolution, ESCALATION_REPLY};
pub use retrieval::{find_best_match, rank, top_k};
pub use rules::{default_answer, default_rules, AnswerRule, BusinessFacts};
pub use similarity::{
    score, score_breakdown, MatchParams, ScoreBreakdown, DEFAULT_ACCEPT_THRESHOLD,
    DEFAULT_STRONG_CONTENT_BONUS, DEFAULT_WEAK_CONTENT_BONUS,
};
pub use storage::{append_jsonl, load_jsonl, load_jsonl_or_default, save_jsonl};
pub use tickets::{StatusFilter, TicketBook};
