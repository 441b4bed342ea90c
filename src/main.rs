//! notes-search CLI
//!
//! Command-line front end over the notes_search library. Every command
//! prints JSON on stdout; logs go to stderr.
//!
//! Commands:
//! - `parse <QUERY>` - structure of a raw query
//! - `highlight --text --query` - matches, snippets and segments for one text
//! - `suggest --query --history` - typo corrections from past queries
//! - `batch --notes --query` - search a JSON array of notes under a deadline

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{BatchArgs, Cli, Commands, HighlightArgs, ParseArgs, SuggestArgs};
use notes_search::search::batch::BODY_FIELDS;
use notes_search::search::matcher::tag_query_terms;
use notes_search::{
    worker, FuzzyCorrector, HighlightMatch, HighlightRenderer, MatchFinder, MatchKind, Note,
    QueryParser, SearchError, Segment, Snippet, SnippetBuilder,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let result = match cli.command {
        Some(Commands::Parse(args)) => execute_parse(args),
        Some(Commands::Highlight(args)) => execute_highlight(args),
        Some(Commands::Suggest(args)) => execute_suggest(args),
        Some(Commands::Batch(args)) => execute_batch(args).await,
        None => {
            eprintln!("Error: No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

/// Highlight command output
#[derive(Serialize)]
struct HighlightOutput {
    terms: Vec<String>,
    matches: Vec<HighlightMatch>,
    snippets: Vec<Snippet>,
    /// Full text split into plain and highlighted runs
    segments: Vec<Segment>,
}

fn execute_parse(args: ParseArgs) -> Result<String> {
    let parsed = QueryParser::parse(&args.query);
    Ok(serde_json::to_string_pretty(&parsed)?)
}

fn execute_highlight(args: HighlightArgs) -> Result<String> {
    let options = args.options.resolve()?;
    let parsed = QueryParser::parse(&args.query);
    let terms = parsed.search_terms();
    let field_values = parsed.field_values(BODY_FIELDS);

    let mut finder = MatchFinder::new();
    let compiled = finder.compile_tagged(
        tag_query_terms(&terms).chain(field_values.iter().map(|v| (v.as_str(), MatchKind::Field))),
        &options,
    );
    let matches = compiled.find(&args.text);
    debug!("{} matches for {} terms", matches.len(), compiled.len());

    let output = HighlightOutput {
        snippets: SnippetBuilder::build(&args.text, &matches, &options),
        segments: HighlightRenderer::render(&args.text, &matches),
        terms,
        matches,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn execute_suggest(args: SuggestArgs) -> Result<String> {
    let history: Vec<String> = cli::read_json(&args.history)?;
    let corrections = FuzzyCorrector::suggest(&args.query, &history, &args.fuzzy_options());
    debug!(
        "{} suggestions from {} past queries",
        corrections.len(),
        history.len()
    );
    Ok(serde_json::to_string_pretty(&corrections)?)
}

async fn execute_batch(args: BatchArgs) -> Result<String> {
    let options = args.options.resolve()?;
    let notes: Vec<Note> = cli::read_json(&args.notes)?;
    info!("Searching {} notes", notes.len());

    let result = worker::process_with_deadline(
        Arc::from(notes),
        args.query,
        options,
        Duration::from_millis(args.timeout_ms),
    )
    .await?;

    Ok(serde_json::to_string_pretty(&result)?)
}

/// Map errors to exit codes
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SearchError>() {
        Some(SearchError::InvalidOptions(_)) => 1, // Invalid arguments or usage error
        Some(SearchError::Timeout(_)) => 4,
        Some(SearchError::Worker(_)) => 5,
        // File and JSON input problems
        None => 2,
    }
}
