use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";
pub const LEARNED_CATEGORY: &str = "Learned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub help_request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Resolved,
    Unresolved,
}

/// A question the responder could not answer, waiting on a supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub customer_name: String,
    pub question: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub supervisor_id: Option<String>,
    #[serde(default)]
    pub is_timeout_resolved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
}

/// Outcome of scanning the knowledge base for one question. `entry` is the
/// best-scoring candidate only when `matched` is true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub matched: bool,
    pub entry: Option<&'a KnowledgeEntry>,
    pub score: f64,
}

impl<'a> MatchResult<'a> {
    pub fn no_match(score: f64) -> Self {
        Self {
            matched: false,
            entry: None,
            score,
        }
    }

    pub fn decision(&self) -> Decision {
        if self.matched {
            Decision::Hit
        } else {
            Decision::Miss
        }
    }
}

/// One page of a listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T: Clone> Page<T> {
    /// `page` is 1-based; zero values fall back to page 1 / limit 10. A page
    /// offset past `usize::MAX` yields an empty page.
    pub fn slice(all: &[T], page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = if limit == 0 { 10 } else { limit };
        let total_items = all.len();
        let total_pages = total_items.div_ceil(limit);
        let items = match (page - 1).checked_mul(limit) {
            Some(offset) => all.iter().skip(offset).take(limit).cloned().collect(),
            None => Vec::new(),
        };

        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}
