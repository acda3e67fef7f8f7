//! `hostal` CLI — analyze guest messages, verify availability, and produce
//! validated replies from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Extract dates and intents from a message
//! hostal analyze "esta disponible del 2/2 al 5/2? hay wifi?" --today 2026-01-05
//!
//! # Verify the requested range against a property calendar feed
//! hostal check "del 10 al 15 de enero" --property RECOLETA-PATIO \
//!     --calendar feed.json --today 2026-01-05
//!
//! # Full pipeline: retrieval, draft, consistency validation
//! hostal respond -i message.txt --property RECOLETA-PATIO \
//!     --calendar feed.json --kb kb.json --today 2026-01-05
//! ```
//!
//! All subcommands take the message as a positional argument, via
//! `-i/--input`, or on stdin, and print JSON to stdout. Logging goes to
//! stderr, filtered by `RUST_LOG`.

mod collab;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use booking_engine::{evaluate, respond, CalendarSource, JsonFeed, VerifiedFact};
use guest_intake::{classify_intents, parse_date_ranges};

use crate::collab::{FileKb, TemplateGenerator};

#[derive(Parser)]
#[command(
    name = "hostal",
    version,
    about = "Guest-message assistant: Spanish date/intent analysis and verified availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract date ranges and intent labels from a message
    Analyze {
        /// Message text (falls back to --input, then stdin)
        message: Option<String>,
        /// Read the message from a file
        #[arg(short, long)]
        input: Option<String>,
        /// Reference date (YYYY-MM-DD, defaults to the current date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Verify the message's requested range against a calendar feed
    Check {
        /// Message text (falls back to --input, then stdin)
        message: Option<String>,
        /// Read the message from a file
        #[arg(short, long)]
        input: Option<String>,
        /// Reference date (YYYY-MM-DD, defaults to the current date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Property identifier
        #[arg(short, long)]
        property: Option<String>,
        /// Path to the property's JSON calendar feed
        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Run the full pipeline and print the validated reply
    Respond {
        /// Message text (falls back to --input, then stdin)
        message: Option<String>,
        /// Read the message from a file
        #[arg(short, long)]
        input: Option<String>,
        /// Reference date (YYYY-MM-DD, defaults to the current date)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Property identifier
        #[arg(short, long)]
        property: Option<String>,
        /// Path to the property's JSON calendar feed
        #[arg(short, long)]
        calendar: Option<String>,
        /// Path to a JSON knowledge-base snippet file
        #[arg(long)]
        kb: Option<String>,
        /// Signature closing every reply
        #[arg(long, default_value = "Equipo de Atencion")]
        signature: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            message,
            input,
            today,
        } => {
            let text = read_message(message, input.as_deref())?;
            let today = reference_date(today);
            let dates = parse_date_ranges(&text, today);
            let has_dates = !dates.is_empty();
            let intents = classify_intents(&text, has_dates);
            print_json(&json!({
                "dates": dates,
                "has_dates": has_dates,
                "intents": intents,
            }))
        }
        Commands::Check {
            message,
            input,
            today,
            property,
            calendar,
        } => {
            let text = read_message(message, input.as_deref())?;
            let today = reference_date(today);
            let feed = calendar.map(JsonFeed::new);
            let source = feed.as_ref().map(|f| f as &dyn CalendarSource);
            match evaluate(&text, property.as_deref(), source, today) {
                Ok(verdict) => {
                    let fact = VerifiedFact::from_verdict(&verdict);
                    print_json(&json!({
                        "verdict": verdict,
                        "fact": fact.map(|f| f.to_string()),
                    }))
                }
                Err(rejection) => print_json(&json!({
                    "rejected": rejection,
                    "message": rejection.to_string(),
                })),
            }
        }
        Commands::Respond {
            message,
            input,
            today,
            property,
            calendar,
            kb,
            signature,
        } => {
            let text = read_message(message, input.as_deref())?;
            let today = reference_date(today);
            let feed = calendar.map(JsonFeed::new);
            let source = feed.as_ref().map(|f| f as &dyn CalendarSource);
            let retriever = match kb {
                Some(path) => FileKb::load(&path)?,
                None => FileKb::empty(),
            };
            let reply = respond(
                &text,
                property.as_deref(),
                source,
                &retriever,
                &TemplateGenerator,
                today,
                &signature,
            );
            print_json(&reply)
        }
    }
}

/// Message from the positional argument, a file, or stdin — in that order.
fn read_message(message: Option<String>, input: Option<&str>) -> Result<String> {
    if let Some(text) = message {
        return Ok(text);
    }
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {path}")),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn reference_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{pretty}");
    Ok(())
}
