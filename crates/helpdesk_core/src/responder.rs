use serde::Serialize;
use tracing::{info, warn};

use crate::config::HelpdeskConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::model::HelpRequest;
use crate::notify::{NotificationEvent, Notifier};
use crate::rules::default_answer;
use crate::tickets::TicketBook;

pub const ESCALATION_REPLY: &str = "Let me check with my supervisor and get back to you.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSource {
    Knowledge { entry_id: String, score: f64 },
    DefaultRule,
    Escalated { ticket_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOutcome {
    pub response: String,
    pub source: AnswerSource,
}

impl CallOutcome {
    pub fn escalated(&self) -> bool {
        matches!(self.source, AnswerSource::Escalated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketResolution {
    pub request: HelpRequest,
    pub learned_entry_id: Option<String>,
}

/// Answers incoming questions: knowledge base first, then the configured
/// canned answers, and a supervisor ticket when neither applies.
pub struct Responder<'a, N> {
    config: &'a HelpdeskConfig,
    notifier: N,
}

impl<'a, N: Notifier> Responder<'a, N> {
    pub fn new(config: &'a HelpdeskConfig, notifier: N) -> Self {
        Self { config, notifier }
    }

    pub fn handle_call(
        &self,
        customer_name: &str,
        question: &str,
        kb: &mut KnowledgeBase,
        tickets: &mut TicketBook,
    ) -> Result<CallOutcome> {
        info!(customer = customer_name, question, "processing call");

        let hit = kb.find_match(question, &self.config.matching);
        let known = match (hit.matched, hit.entry) {
            (true, Some(entry)) => Some((entry.id.clone(), entry.answer.clone(), hit.score)),
            _ => None,
        };

        if let Some((entry_id, answer, score)) = known {
            let uses = kb.record_usage(&entry_id)?;
            info!(entry_id = %entry_id, score, uses, "answered from knowledge base");
            return Ok(CallOutcome {
                response: format!("Thank you for your question! Here's what I found: {answer}"),
                source: AnswerSource::Knowledge { entry_id, score },
            });
        }

        if let Some(facts) = &self.config.business {
            if let Some(response) = default_answer(&self.config.rules, facts, question) {
                info!("answered from business facts");
                return Ok(CallOutcome {
                    response,
                    source: AnswerSource::DefaultRule,
                });
            }
        }

        let request = tickets.create(customer_name, question)?.clone();
        info!(request_id = %request.id, "escalating to supervisor");
        self.send(&NotificationEvent::help_needed(&request));

        Ok(CallOutcome {
            response: ESCALATION_REPLY.to_string(),
            source: AnswerSource::Escalated {
                ticket_id: request.id,
            },
        })
    }

    /// Records the supervisor's answer, optionally keeps it for reuse, and
    /// follows up with the customer.
    pub fn resolve_ticket(
        &self,
        ticket_id: &str,
        answer: &str,
        supervisor_id: &str,
        save_to_knowledge: bool,
        kb: &mut KnowledgeBase,
        tickets: &mut TicketBook,
    ) -> Result<TicketResolution> {
        let request = tickets.resolve(ticket_id, answer, supervisor_id)?.clone();

        let learned_entry_id = if save_to_knowledge {
            kb.promote(&request.question, answer, &request.id)
                .map(|entry| entry.id.clone())
        } else {
            None
        };

        self.send(&NotificationEvent::follow_up(&request, answer));

        Ok(TicketResolution {
            request,
            learned_entry_id,
        })
    }

    fn send(&self, event: &NotificationEvent) {
        if let Err(err) = self.notifier.notify(event) {
            warn!(kind = ?event.kind, error = %err, "notification not delivered");
        }
    }
}
