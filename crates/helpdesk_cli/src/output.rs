use std::io::{self, Write};

use anyhow::Result;
use helpdesk_core::{
    AnswerSource, CallOutcome, EvalSummary, HelpRequest, KnowledgeEntry, MatchResult, Page,
    TicketResolution,
};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Prints `value` as pretty JSON, or runs the text renderer.
fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Text => text(&mut out)?,
    }
    Ok(())
}

pub fn print_call_outcome(format: OutputFormat, outcome: &CallOutcome) -> Result<()> {
    emit(format, outcome, |out| {
        match &outcome.source {
            AnswerSource::Knowledge { entry_id, score } => {
                writeln!(out, "source=knowledge entry_id={entry_id} score={score:.4}")?
            }
            AnswerSource::DefaultRule => writeln!(out, "source=default_rule")?,
            AnswerSource::Escalated { ticket_id } => {
                writeln!(out, "source=escalated ticket_id={ticket_id}")?
            }
        }
        writeln!(out, "response={}", outcome.response)
    })
}

#[derive(Serialize)]
struct JsonCandidate<'a> {
    entry_id: &'a str,
    question: &'a str,
    score: f64,
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    #[serde(flatten)]
    result: &'a MatchResult<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    candidates: Vec<JsonCandidate<'a>>,
}

pub fn print_match(
    format: OutputFormat,
    result: &MatchResult<'_>,
    ranked: &[(&KnowledgeEntry, f64)],
) -> Result<()> {
    let json = JsonMatch {
        result,
        candidates: ranked
            .iter()
            .map(|(entry, score)| JsonCandidate {
                entry_id: &entry.id,
                question: &entry.question,
                score: *score,
            })
            .collect(),
    };

    emit(format, &json, |out| {
        writeln!(
            out,
            "decision={:?} score={:.4} entry_id={}",
            result.decision(),
            result.score,
            result.entry.map(|e| e.id.as_str()).unwrap_or("null")
        )?;
        if let Some(entry) = result.entry {
            writeln!(out, "answer={}", entry.answer)?;
        }
        for (entry, score) in ranked {
            writeln!(out, "  {score:.4}  {}  {}", entry.id, entry.question)?;
        }
        Ok(())
    })
}

fn write_entry(out: &mut dyn Write, entry: &KnowledgeEntry) -> io::Result<()> {
    writeln!(
        out,
        "{}  [{}] uses={}  Q: {}",
        entry.id, entry.category, entry.usage_count, entry.question
    )?;
    writeln!(out, "    A: {}", entry.answer)
}

pub fn print_entry(format: OutputFormat, entry: &KnowledgeEntry) -> Result<()> {
    emit(format, entry, |out| write_entry(out, entry))
}

pub fn print_entries(format: OutputFormat, entries: &[&KnowledgeEntry]) -> Result<()> {
    emit(format, entries, |out| {
        for entry in entries {
            write_entry(out, entry)?;
        }
        writeln!(out, "found={}", entries.len())
    })
}

pub fn print_entry_page(format: OutputFormat, page: &Page<KnowledgeEntry>) -> Result<()> {
    emit(format, page, |out| {
        for entry in &page.items {
            write_entry(out, entry)?;
        }
        writeln!(
            out,
            "page={}/{} total={}",
            page.page, page.total_pages, page.total_items
        )
    })
}

fn write_request(out: &mut dyn Write, request: &HelpRequest) -> io::Result<()> {
    writeln!(
        out,
        "{}  {:?}  {}  created={}  Q: {}",
        request.id,
        request.status,
        request.customer_name,
        request.created_at.to_rfc3339(),
        request.question
    )?;
    if let Some(answer) = &request.answer {
        writeln!(out, "    A: {answer}")?;
    }
    Ok(())
}

pub fn print_request(format: OutputFormat, request: &HelpRequest) -> Result<()> {
    emit(format, request, |out| write_request(out, request))
}

pub fn print_request_page(format: OutputFormat, page: &Page<HelpRequest>) -> Result<()> {
    emit(format, page, |out| {
        for request in &page.items {
            write_request(out, request)?;
        }
        writeln!(
            out,
            "page={}/{} total={}",
            page.page, page.total_pages, page.total_items
        )
    })
}

pub fn print_resolution(format: OutputFormat, resolution: &TicketResolution) -> Result<()> {
    emit(format, resolution, |out| {
        write_request(out, &resolution.request)?;
        writeln!(
            out,
            "learned_entry_id={}",
            resolution.learned_entry_id.as_deref().unwrap_or("null")
        )
    })
}

#[derive(Serialize)]
struct JsonDeleted<'a> {
    deleted: &'a str,
}

pub fn print_deleted(format: OutputFormat, id: &str) -> Result<()> {
    emit(format, &JsonDeleted { deleted: id }, |out| {
        writeln!(out, "deleted={id}")
    })
}

#[derive(Serialize)]
struct JsonExpired {
    expired: usize,
    timeout_minutes: u64,
}

pub fn print_expired(format: OutputFormat, expired: usize, timeout_minutes: u64) -> Result<()> {
    let json = JsonExpired {
        expired,
        timeout_minutes,
    };
    emit(format, &json, |out| {
        writeln!(out, "expired={expired} timeout_minutes={timeout_minutes}")
    })
}

#[derive(Serialize)]
struct JsonEval<'a> {
    #[serde(flatten)]
    summary: &'a EvalSummary,
    required_pass_rate: f64,
    meets_threshold: bool,
}

pub fn print_eval(format: OutputFormat, summary: &EvalSummary, required: f64) -> Result<()> {
    let json = JsonEval {
        summary,
        required_pass_rate: required,
        meets_threshold: summary.meets(required),
    };

    emit(format, &json, |out| {
        writeln!(
            out,
            "total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
            summary.total,
            summary.passed,
            summary.failed,
            summary.pass_rate,
            required,
            summary.meets(required)
        )?;
        for o in &summary.outcomes {
            writeln!(
                out,
                "case={} passed={} decision={:?} entry_id={} score={:.4} latency={:.1}ms",
                o.case_id,
                o.passed,
                o.actual_decision,
                o.actual_entry_id.as_deref().unwrap_or("null"),
                o.score,
                o.latency_ms
            )?;
        }
        Ok(())
    })
}
