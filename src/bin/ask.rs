//! Route a single query locally and print the result
//!
//! Runs the same router and request handling as the HTTP endpoint without
//! starting a server. Handy for checking keyword tables before deploying.
//!
//! ## Usage
//!
//! ```bash
//! # Default role and scope from configuration
//! ask "show me parking"
//!
//! # Developer view of a specific city
//! ask --role developer --scope city42 "traffic status"
//!
//! # One-line JSON, e.g. for piping into jq
//! ask --compact go to networks
//! ```
//!
//! Exits with status 2 when the query is rejected.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::error;
use urban_assistant::config::AssistantConfig;
use urban_assistant::observability::logging::{init_logging, level_for_verbosity, LogFormat};
use urban_assistant::routing::{CityCatalog, IntentRouter};
use urban_assistant::service::{ChatRequest, ChatService};

#[derive(Parser)]
#[command(
    name = "ask",
    about = "Route one query through the urban assistant and print the JSON result"
)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Caller role (developer or user)
    #[arg(long)]
    role: Option<String>,

    /// City instance used in navigation paths
    #[arg(long)]
    scope: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Verbose logging on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Query text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

fn main() {
    let args = Args::parse();

    init_logging(
        level_for_verbosity(args.verbose, tracing::Level::WARN),
        LogFormat::Compact,
        false,
    );

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            error!("ask failed: {}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the query was answered
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let (config, _) = AssistantConfig::discover(args.config.as_deref())?;
    let router = Arc::new(IntentRouter::new(&config, &CityCatalog::default()));
    let service = ChatService::new(router, config.defaults.clone());

    let mut request = ChatRequest::new(args.query.join(" "));
    request.role = args.role;
    request.scope = args.scope;

    let reply = service.route_request(&request);

    let rendered = if args.compact {
        serde_json::to_string(&reply.body)?
    } else {
        serde_json::to_string_pretty(&reply.body)?
    };
    println!("{rendered}");

    Ok(reply.is_success())
}
