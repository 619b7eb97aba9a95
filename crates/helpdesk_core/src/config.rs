use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};
use crate::rules::{default_rules, AnswerRule, BusinessFacts};
use crate::similarity::MatchParams;

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub timeout_minutes: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }
}

impl EscalationConfig {
    pub fn timeout(&self) -> Duration {
        let max_minutes = i64::MAX / 60_000 - 1;
        let minutes = i64::try_from(self.timeout_minutes)
            .unwrap_or(max_minutes)
            .min(max_minutes);
        Duration::minutes(minutes)
    }
}

/// Everything the responder needs besides its stores.
///
/// ```toml
/// [matching]
/// accept_threshold = 0.6
///
/// [business]
/// name = "Bella's Hair Salon"
/// hours = "9 AM - 6 PM"
/// address = "123 Main Street"
/// phone = "(555) 123-4567"
/// services = ["Hair Cut", "Styling"]
///
/// [[rules]]
/// keywords = ["park"]
/// template = "Free parking behind {name}."
///
/// [escalation]
/// timeout_minutes = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpdeskConfig {
    pub matching: MatchParams,
    pub business: Option<BusinessFacts>,
    pub rules: Vec<AnswerRule>,
    pub escalation: EscalationConfig,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            matching: MatchParams::default(),
            business: None,
            rules: default_rules(),
            escalation: EscalationConfig::default(),
        }
    }
}

impl HelpdeskConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Defaults when no path is given; an explicit path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;

        if self.rules.iter().any(|r| r.keywords.is_empty()) {
            return Err(HelpdeskError::InvalidArg(
                "every rule needs at least one keyword".to_string(),
            ));
        }

        Ok(())
    }
}
