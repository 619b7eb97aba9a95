//! Canned answers built from configured business facts.
//!
//! Rules are evaluated in order and the first one whose keywords appear in the
//! question wins. Templates may reference `{name}`, `{hours}`, `{address}`,
//! `{phone}` and `{services}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFacts {
    pub name: String,
    pub hours: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRule {
    pub keywords: Vec<String>,
    pub template: String,
}

impl AnswerRule {
    pub fn new(keywords: &[&str], template: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            template: template.to_string(),
        }
    }

    /// Plain substring check on the lower-cased question, so "hour" also
    /// fires for "hours".
    pub fn applies_to(&self, question: &str) -> bool {
        let lower = question.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| !k.is_empty())
            .any(|k| lower.contains(&k.to_lowercase()))
    }

    pub fn render(&self, facts: &BusinessFacts) -> String {
        self.template
            .replace("{name}", &facts.name)
            .replace("{hours}", &facts.hours)
            .replace("{address}", &facts.address)
            .replace("{phone}", &facts.phone)
            .replace("{services}", &facts.services.join(", "))
    }
}

pub fn default_rules() -> Vec<AnswerRule> {
    vec![
        AnswerRule::new(&["hour", "open"], "{name} is open {hours}"),
        AnswerRule::new(&["address", "location"], "We're located at {address}"),
        AnswerRule::new(&["phone", "call"], "You can reach us at {phone}"),
        AnswerRule::new(
            &["service"],
            "We offer the following services: {services}",
        ),
        AnswerRule::new(&["name"], "Welcome to {name}!"),
    ]
}

/// First matching rule rendered against `facts`.
pub fn default_answer(rules: &[AnswerRule], facts: &BusinessFacts, question: &str) -> Option<String> {
    rules
        .iter()
        .find(|rule| rule.applies_to(question))
        .map(|rule| rule.render(facts))
}
