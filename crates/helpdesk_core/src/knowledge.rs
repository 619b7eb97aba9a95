use std::path::Path;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{HelpdeskError, Result};
use crate::model::{KnowledgeEntry, MatchResult, Page, DEFAULT_CATEGORY, LEARNED_CATEGORY};
use crate::retrieval::find_best_match;
use crate::similarity::MatchParams;
use crate::storage::{load_jsonl_or_default, save_jsonl};

const KIND: &str = "knowledge entry";

/// In-memory knowledge base. Question texts are unique (exact comparison).
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_jsonl_or_default(path)?))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_jsonl(path, &self.entries)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_by_question(&self, question: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.question == question)
    }

    pub fn add(
        &mut self,
        question: &str,
        answer: &str,
        category: Option<&str>,
    ) -> Result<&KnowledgeEntry> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return Err(HelpdeskError::InvalidArg(
                "question and answer are required".to_string(),
            ));
        }
        if self.find_by_question(question).is_some() {
            return Err(HelpdeskError::Duplicate(format!(
                "question already in knowledge base: {question}"
            )));
        }

        let category = category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let entry = self.insert(question, answer, category, None);
        info!(entry_id = %entry.id, "knowledge entry created");
        Ok(entry)
    }

    /// Folds a supervisor answer back in as a "Learned" entry. Returns `None`
    /// when the exact question is already known.
    pub fn promote(
        &mut self,
        question: &str,
        answer: &str,
        help_request_id: &str,
    ) -> Option<&KnowledgeEntry> {
        if self.find_by_question(question).is_some() {
            return None;
        }

        let entry = self.insert(
            question,
            answer,
            LEARNED_CATEGORY,
            Some(help_request_id.to_string()),
        );
        info!(entry_id = %entry.id, help_request_id, "learned answer promoted");
        Some(entry)
    }

    fn insert(
        &mut self,
        question: &str,
        answer: &str,
        category: &str,
        help_request_id: Option<String>,
    ) -> &KnowledgeEntry {
        let now = Utc::now();
        self.entries.push(KnowledgeEntry {
            id: Uuid::new_v4().to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            usage_count: 0,
            help_request_id,
            created_at: now,
            updated_at: now,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn update(
        &mut self,
        id: &str,
        answer: Option<&str>,
        category: Option<&str>,
    ) -> Result<&KnowledgeEntry> {
        let answer = answer.filter(|a| !a.trim().is_empty());
        let category = category.filter(|c| !c.trim().is_empty());
        if answer.is_none() && category.is_none() {
            return Err(HelpdeskError::InvalidArg(
                "at least one field to update is required".to_string(),
            ));
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| HelpdeskError::not_found(KIND, id))?;

        if let Some(answer) = answer {
            entry.answer = answer.to_string();
        }
        if let Some(category) = category {
            entry.category = category.to_string();
        }
        entry.updated_at = Utc::now();
        info!(entry_id = id, "knowledge entry updated");
        Ok(entry)
    }

    pub fn delete(&mut self, id: &str) -> Result<KnowledgeEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| HelpdeskError::not_found(KIND, id))?;
        info!(entry_id = id, "knowledge entry deleted");
        Ok(self.entries.remove(idx))
    }

    pub fn record_usage(&mut self, id: &str) -> Result<u64> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| HelpdeskError::not_found(KIND, id))?;
        entry.usage_count += 1;
        Ok(entry.usage_count)
    }

    pub fn list(&self, page: usize, limit: usize) -> Page<KnowledgeEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Page::slice(&sorted, page, limit)
    }

    /// Case-insensitive substring search over question, answer and category.
    pub fn search(&self, query: &str) -> Result<Vec<&KnowledgeEntry>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(HelpdeskError::InvalidArg(
                "search query is required".to_string(),
            ));
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| {
                e.question.to_lowercase().contains(&needle)
                    || e.answer.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub fn find_match(&self, query: &str, params: &MatchParams) -> MatchResult<'_> {
        find_best_match(query, &self.entries, params)
    }
}
