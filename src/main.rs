use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use landi::{AnswerFetcher, FetchError, GeminiClientBuilder};

/// landi - ask LandiAI questions about the Landify product
#[derive(Parser)]
#[command(name = "landi")]
#[command(about = "Answers questions about Landify via a grounded language model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a question and print the answer with any web sources
    Ask(AskCommand),
}

/// Ask a question
#[derive(Parser)]
struct AskCommand {
    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Print the answer as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    // Load GEMINI_API_KEY and friends from a local .env when present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd).await,
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are ones the user can fix by changing their input.
fn is_user_error(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<FetchError>(),
        Some(FetchError::EmptyInput)
    )
}

/// Handles the ask command by fetching and rendering an answer.
async fn handle_ask(cmd: &AskCommand) -> Result<()> {
    let client = GeminiClientBuilder::new()
        .build()
        .context("Failed to configure the Gemini client")?;
    let fetcher = AnswerFetcher::new(Arc::new(client));

    match fetcher.fetch_answer(&cmd.question).await {
        Ok(answer) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.text());
                if answer.has_sources() {
                    let rendered: Vec<String> = answer
                        .sources()
                        .iter()
                        .map(|s| format!("{} ({})", s.title, s.uri))
                        .collect();
                    println!();
                    println!("Source(s): {}", rendered.join(", "));
                }
            }
            Ok(())
        }
        Err(e) => {
            let message = user_message(&e);
            Err(anyhow::Error::new(e).context(message))
        }
    }
}

/// Maps each failure category to its user-facing message.
fn user_message(error: &FetchError) -> &'static str {
    match error {
        FetchError::EmptyInput => "Please enter a question to ask.",
        FetchError::EmptyGeneration => {
            "Sorry, I couldn't generate a response for that. Please try another question."
        }
        FetchError::Network(_) => {
            "An error occurred. Please check your network connection and try again."
        }
        FetchError::Http { .. } | FetchError::RateLimited | FetchError::Unknown => {
            "An error occurred. Please try again later."
        }
    }
}
