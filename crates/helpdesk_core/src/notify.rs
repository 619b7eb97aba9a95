use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::Result;
use crate::model::HelpRequest;
use crate::storage::append_jsonl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "supervisor.help_needed")]
    SupervisorHelpNeeded,
    #[serde(rename = "customer.follow_up")]
    CustomerFollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn help_needed(request: &HelpRequest) -> Self {
        Self {
            kind: EventKind::SupervisorHelpNeeded,
            message: format!("Hey, I need help answering: \"{}\"", request.question),
            payload: json!({
                "help_request_id": request.id,
                "customer_name": request.customer_name,
                "question": request.question,
                "status": request.status,
            }),
            timestamp: Utc::now(),
        }
    }

    pub fn follow_up(request: &HelpRequest, answer: &str) -> Self {
        Self {
            kind: EventKind::CustomerFollowUp,
            message: format!(
                "{}: Your question has been answered - {}",
                request.customer_name, answer
            ),
            payload: json!({
                "help_request_id": request.id,
                "customer_name": request.customer_name,
                "answer": answer,
            }),
            timestamp: Utc::now(),
        }
    }
}

/// Delivers supervisor alerts and customer follow-ups.
pub trait Notifier {
    fn notify(&self, event: &NotificationEvent) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, event: &NotificationEvent) -> Result<()> {
        (**self).notify(event)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<()> {
        info!(kind = ?event.kind, "{}", event.message);
        Ok(())
    }
}

/// Appends every event to a JSONL outbox for another process to deliver.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for OutboxNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<()> {
        info!(kind = ?event.kind, outbox = %self.path.display(), "{}", event.message);
        append_jsonl(&self.path, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequestStatus;
    use crate::storage::load_jsonl;

    fn request() -> HelpRequest {
        HelpRequest {
            id: "req-9".to_string(),
            customer_name: "Priya".to_string(),
            question: "Do you do bridal makeup?".to_string(),
            status: RequestStatus::Pending,
            answer: None,
            created_at: Utc::now(),
            resolved_at: None,
            supervisor_id: None,
            is_timeout_resolved: false,
        }
    }

    #[test]
    fn help_needed_event_quotes_the_question() {
        let event = NotificationEvent::help_needed(&request());
        assert_eq!(
            event.message,
            "Hey, I need help answering: \"Do you do bridal makeup?\""
        );
        assert_eq!(event.payload["status"], "pending");
        assert_eq!(event.payload["help_request_id"], "req-9");
    }

    #[test]
    fn follow_up_event_names_the_customer() {
        let event = NotificationEvent::follow_up(&request(), "Yes, book a trial.");
        assert_eq!(
            event.message,
            "Priya: Your question has been answered - Yes, book a trial."
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "customer.follow_up");
    }

    #[test]
    fn outbox_appends_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        let notifier = OutboxNotifier::new(&path);

        notifier
            .notify(&NotificationEvent::help_needed(&request()))
            .unwrap();
        notifier
            .notify(&NotificationEvent::follow_up(&request(), "Yes"))
            .unwrap();

        let events: Vec<NotificationEvent> = load_jsonl(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::SupervisorHelpNeeded);
        assert_eq!(events[1].kind, EventKind::CustomerFollowUp);
    }
}
