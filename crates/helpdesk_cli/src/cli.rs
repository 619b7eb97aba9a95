use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use helpdesk_core::StatusFilter;

#[derive(Debug, Parser)]
#[command(
    name = "helpdesk",
    version,
    about = "Answer customer questions from a knowledge base and escalate the rest"
)]
pub struct Cli {
    /// TOML file with matching parameters, business facts and answer rules.
    #[arg(long, global = true, env = "HELPDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding knowledge.jsonl, tickets.jsonl and outbox.jsonl.
    #[arg(
        long,
        global = true,
        env = "HELPDESK_DATA_DIR",
        default_value = "helpdesk-data"
    )]
    pub data_dir: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Handle a customer question end to end.
    Ask {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        question: String,
    },
    /// Score a question against the knowledge base without side effects.
    Match {
        #[arg(long)]
        question: String,
        #[arg(long)]
        threshold: Option<f64>,
        /// Also list the N best candidates with their scores.
        #[arg(long, default_value_t = 0)]
        top: usize,
    },
    Kb {
        #[command(subcommand)]
        command: KbCommand,
    },
    Tickets {
        #[command(subcommand)]
        command: TicketCommand,
    },
    /// Replay labelled questions and report the pass rate.
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long, default_value_t = 0.85)]
        min_pass_rate: f64,
    },
}

#[derive(Debug, Subcommand)]
pub enum KbCommand {
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: Option<String>,
    },
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Search {
        #[arg(long)]
        query: String,
    },
    Show {
        #[arg(long)]
        id: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Pending,
    Resolved,
    Unresolved,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Pending => StatusFilter::Pending,
            StatusArg::Resolved => StatusFilter::Resolved,
            StatusArg::Unresolved => StatusFilter::Unresolved,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    List {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Show {
        #[arg(long)]
        id: String,
    },
    /// Answer a pending ticket as a supervisor.
    Resolve {
        #[arg(long)]
        id: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        supervisor: String,
        /// Keep the answer in the knowledge base for future questions.
        #[arg(long)]
        save_to_kb: bool,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Mark pending tickets older than the timeout as unresolved.
    Expire {
        #[arg(long, env = "TIMEOUT_MINUTES")]
        timeout_minutes: Option<u64>,
    },
}
