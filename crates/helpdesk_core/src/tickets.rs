use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{HelpdeskError, Result};
use crate::model::{HelpRequest, Page, RequestStatus};
use crate::storage::{load_jsonl_or_default, save_jsonl};

const KIND: &str = "help request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    All,
    Pending,
    Resolved,
    Unresolved,
}

impl StatusFilter {
    fn accepts(self, status: RequestStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == RequestStatus::Pending,
            StatusFilter::Resolved => status == RequestStatus::Resolved,
            StatusFilter::Unresolved => status == RequestStatus::Unresolved,
        }
    }
}

/// Escalated questions and their lifecycle:
/// `Pending -> Resolved` by a supervisor, `Pending -> Unresolved` on timeout.
#[derive(Debug, Clone, Default)]
pub struct TicketBook {
    requests: Vec<HelpRequest>,
}

impl TicketBook {
    pub fn new(requests: Vec<HelpRequest>) -> Self {
        Self { requests }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_jsonl_or_default(path)?))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_jsonl(path, &self.requests)
    }

    pub fn requests(&self) -> &[HelpRequest] {
        &self.requests
    }

    pub fn get(&self, id: &str) -> Option<&HelpRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn create(&mut self, customer_name: &str, question: &str) -> Result<&HelpRequest> {
        self.create_at(customer_name, question, Utc::now())
    }

    pub fn create_at(
        &mut self,
        customer_name: &str,
        question: &str,
        now: DateTime<Utc>,
    ) -> Result<&HelpRequest> {
        if customer_name.trim().is_empty() || question.trim().is_empty() {
            return Err(HelpdeskError::InvalidArg(
                "customer name and question are required".to_string(),
            ));
        }

        self.requests.push(HelpRequest {
            id: Uuid::new_v4().to_string(),
            customer_name: customer_name.to_string(),
            question: question.to_string(),
            status: RequestStatus::Pending,
            answer: None,
            created_at: now,
            resolved_at: None,
            supervisor_id: None,
            is_timeout_resolved: false,
        });

        let request = &self.requests[self.requests.len() - 1];
        info!(request_id = %request.id, customer = customer_name, "help request created");
        Ok(request)
    }

    pub fn resolve(&mut self, id: &str, answer: &str, supervisor_id: &str) -> Result<&HelpRequest> {
        if answer.trim().is_empty() {
            return Err(HelpdeskError::InvalidArg("answer is required".to_string()));
        }
        if supervisor_id.trim().is_empty() {
            return Err(HelpdeskError::InvalidArg(
                "supervisor id is required".to_string(),
            ));
        }

        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| HelpdeskError::not_found(KIND, id))?;

        request.status = RequestStatus::Resolved;
        request.answer = Some(answer.to_string());
        request.supervisor_id = Some(supervisor_id.to_string());
        request.resolved_at = Some(Utc::now());
        info!(request_id = id, supervisor_id, "help request resolved");
        Ok(request)
    }

    pub fn delete(&mut self, id: &str) -> Result<HelpRequest> {
        let idx = self
            .requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| HelpdeskError::not_found(KIND, id))?;
        info!(request_id = id, "help request deleted");
        Ok(self.requests.remove(idx))
    }

    /// Pending and unfiltered listings are ordered by creation time, resolved
    /// and unresolved ones by resolution time; newest first in both cases.
    pub fn list(&self, filter: StatusFilter, page: usize, limit: usize) -> Page<HelpRequest> {
        let mut matching: Vec<HelpRequest> = self
            .requests
            .iter()
            .filter(|r| filter.accepts(r.status))
            .cloned()
            .collect();

        match filter {
            StatusFilter::All | StatusFilter::Pending => {
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            StatusFilter::Resolved | StatusFilter::Unresolved => {
                matching.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at))
            }
        }

        Page::slice(&matching, page, limit)
    }

    /// Marks every pending request older than `timeout` as unresolved. A
    /// timeout reaching past the earliest representable time expires nothing.
    pub fn expire_stale(&mut self, now: DateTime<Utc>, timeout: Duration) -> usize {
        let Some(cutoff) = now.checked_sub_signed(timeout) else {
            return 0;
        };
        let mut expired = 0;

        for request in self.requests.iter_mut().filter(|r| {
            r.status == RequestStatus::Pending && !r.is_timeout_resolved && r.created_at < cutoff
        }) {
            request.status = RequestStatus::Unresolved;
            request.is_timeout_resolved = true;
            request.resolved_at = Some(now);
            expired += 1;
        }

        if expired > 0 {
            warn!(expired, "pending help requests timed out and were marked unresolved");
        }
        expired
    }
}
