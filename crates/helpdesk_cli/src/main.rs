mod cli;
mod output;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use helpdesk_core::{
    evaluate_cases, find_best_match, top_k, EscalationConfig, EvalCase, HelpdeskConfig,
    KnowledgeBase, MatchParams, OutboxNotifier, Responder, TicketBook,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, KbCommand, TicketCommand};

/// File layout of the `--data-dir` directory.
struct DataDir {
    root: PathBuf,
}

impl DataDir {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn knowledge(&self) -> PathBuf {
        self.root.join("knowledge.jsonl")
    }

    fn tickets(&self) -> PathBuf {
        self.root.join("tickets.jsonl")
    }

    fn outbox(&self) -> PathBuf {
        self.root.join("outbox.jsonl")
    }

    fn load_knowledge(&self) -> Result<KnowledgeBase> {
        let path = self.knowledge();
        KnowledgeBase::load(&path).with_context(|| format!("load {}", path.display()))
    }

    fn save_knowledge(&self, kb: &KnowledgeBase) -> Result<()> {
        let path = self.knowledge();
        kb.save(&path)
            .with_context(|| format!("save {}", path.display()))
    }

    fn load_tickets(&self) -> Result<TicketBook> {
        let path = self.tickets();
        TicketBook::load(&path).with_context(|| format!("load {}", path.display()))
    }

    fn save_tickets(&self, tickets: &TicketBook) -> Result<()> {
        let path = self.tickets();
        tickets
            .save(&path)
            .with_context(|| format!("save {}", path.display()))
    }
}

fn read_eval_cases_json(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

/// Config matching params, with an optional `--threshold` override checked
/// the same way the config file is.
fn match_params(config: &HelpdeskConfig, threshold: Option<f64>) -> Result<MatchParams> {
    let params = match threshold {
        Some(t) => config.matching.with_threshold(t),
        None => config.matching,
    };
    params.validate().context("invalid --threshold")?;
    Ok(params)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn run_kb(cli: &Cli, data: &DataDir, command: &KbCommand) -> Result<()> {
    let mut kb = data.load_knowledge()?;

    match command {
        KbCommand::Add {
            question,
            answer,
            category,
        } => {
            let entry = kb.add(question, answer, category.as_deref())?.clone();
            data.save_knowledge(&kb)?;
            output::print_entry(cli.output, &entry)?;
        }
        KbCommand::List { page, limit } => {
            output::print_entry_page(cli.output, &kb.list(*page, *limit))?;
        }
        KbCommand::Search { query } => {
            output::print_entries(cli.output, &kb.search(query)?)?;
        }
        KbCommand::Show { id } => {
            let entry = kb
                .get(id)
                .with_context(|| format!("knowledge entry not found: {id}"))?;
            output::print_entry(cli.output, entry)?;
        }
        KbCommand::Update {
            id,
            answer,
            category,
        } => {
            let entry = kb
                .update(id, answer.as_deref(), category.as_deref())?
                .clone();
            data.save_knowledge(&kb)?;
            output::print_entry(cli.output, &entry)?;
        }
        KbCommand::Delete { id } => {
            kb.delete(id)?;
            data.save_knowledge(&kb)?;
            output::print_deleted(cli.output, id)?;
        }
    }

    Ok(())
}

fn run_tickets(
    cli: &Cli,
    config: &HelpdeskConfig,
    data: &DataDir,
    command: &TicketCommand,
) -> Result<()> {
    let mut tickets = data.load_tickets()?;

    match command {
        TicketCommand::List {
            status,
            page,
            limit,
        } => {
            output::print_request_page(cli.output, &tickets.list((*status).into(), *page, *limit))?;
        }
        TicketCommand::Show { id } => {
            let request = tickets
                .get(id)
                .with_context(|| format!("help request not found: {id}"))?;
            output::print_request(cli.output, request)?;
        }
        TicketCommand::Resolve {
            id,
            answer,
            supervisor,
            save_to_kb,
        } => {
            let mut kb = data.load_knowledge()?;
            let responder = Responder::new(config, OutboxNotifier::new(data.outbox()));
            let resolution =
                responder.resolve_ticket(id, answer, supervisor, *save_to_kb, &mut kb, &mut tickets)?;
            data.save_tickets(&tickets)?;
            if resolution.learned_entry_id.is_some() {
                data.save_knowledge(&kb)?;
            }
            output::print_resolution(cli.output, &resolution)?;
        }
        TicketCommand::Delete { id } => {
            tickets.delete(id)?;
            data.save_tickets(&tickets)?;
            output::print_deleted(cli.output, id)?;
        }
        TicketCommand::Expire { timeout_minutes } => {
            let minutes = timeout_minutes.unwrap_or(config.escalation.timeout_minutes);
            let timeout = EscalationConfig {
                timeout_minutes: minutes,
            }
            .timeout();
            let expired = tickets.expire_stale(Utc::now(), timeout);
            if expired > 0 {
                data.save_tickets(&tickets)?;
            }
            output::print_expired(cli.output, expired, minutes)?;
        }
    }

    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = HelpdeskConfig::load_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "load config {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<defaults>".to_string())
        )
    })?;
    let data = DataDir::new(&cli.data_dir);
    debug!(
        data_dir = %cli.data_dir.display(),
        accept_threshold = config.matching.accept_threshold,
        "configuration loaded"
    );

    match &cli.command {
        Commands::Ask { customer, question } => {
            let mut kb = data.load_knowledge()?;
            let mut tickets = data.load_tickets()?;
            let responder = Responder::new(&config, OutboxNotifier::new(data.outbox()));

            let outcome = responder.handle_call(customer, question, &mut kb, &mut tickets)?;
            data.save_knowledge(&kb)?;
            data.save_tickets(&tickets)?;
            output::print_call_outcome(cli.output, &outcome)?;
        }
        Commands::Match {
            question,
            threshold,
            top,
        } => {
            let kb = data.load_knowledge()?;
            let params = match_params(&config, *threshold)?;
            let result = find_best_match(question, kb.entries(), &params);
            let ranked = top_k(question, kb.entries(), &params, *top);
            output::print_match(cli.output, &result, &ranked)?;
        }
        Commands::Kb { command } => run_kb(&cli, &data, command)?,
        Commands::Tickets { command } => run_tickets(&cli, &config, &data, command)?,
        Commands::Eval {
            cases,
            threshold,
            min_pass_rate,
        } => {
            let kb = data.load_knowledge()?;
            let cases = read_eval_cases_json(cases)?;
            let params = match_params(&config, *threshold)?;

            let summary = evaluate_cases(kb.entries(), &cases, &params);
            output::print_eval(cli.output, &summary, *min_pass_rate)?;

            if !summary.meets(*min_pass_rate) {
                anyhow::bail!(
                    "pass rate {:.4} is below the required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
