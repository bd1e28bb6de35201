//! Summa URL CLI - summarise web pages and YouTube videos
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use summa_url::{logging, ui, Config, Outcome, Secrets, Summarizer, SummaryRequest};

#[derive(Parser)]
#[command(name = "summa-url")]
#[command(author, version, about = "Summarise web pages and YouTube videos with an LLM", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a web page or YouTube video by URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Write a default configuration file
    Init,
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Summarise { url, raw }) => {
            if !logging::init_stderr(cli.verbose) {
                eprintln!("{}", "warning: logging was already initialised".yellow());
            }
            let config = Config::load()?;
            let summarizer = Summarizer::from_config(&config)?;

            if raw {
                // Just show raw extracted text
                let documents = summarizer.extract(&url).await?;
                for doc in &documents {
                    let heading = doc.title.as_deref().or(doc.source.as_deref()).unwrap_or(&url);
                    println!("\n=== {} ===\n", heading.bold());
                    println!("{}", doc.text);
                    println!("\n--- Extracted {} characters ---", doc.text.len());
                }
                return Ok(());
            }

            let secrets = Secrets::load()?;
            let request = SummaryRequest::new(secrets.credential(), url);
            let result = summarizer
                .run(&request, |stage| eprintln!("{}", stage.to_string().dimmed()))
                .await;

            let outcome = Outcome::from(result);
            print_outcome(&outcome);
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Some(Commands::Init) => {
            let path = Config::default_path();
            Config::default().write_to(&path)?;
            println!("Wrote {}", path.display().to_string().green());
            println!(
                "Put your API key in GROQ_API_KEY or in secrets.toml next to it; it is never stored in the config file."
            );
        }
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
        None => {
            // Default: Launch the TUI
            let log_file = logging::init_file(cli.verbose);
            let config = Config::load()?;
            let secrets = Secrets::load()?;
            ui::run(&config, &secrets).await?;
            if let Some(path) = log_file.filter(|_| cli.verbose) {
                eprintln!("Log written to {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Rejected(message) => {
            eprintln!("{} {}", "✗".red(), message.red());
        }
        Outcome::Success(summary) => {
            println!("=== {} ===\n", summary.heading().bold());
            println!("{}\n", summary.text);
            println!(
                "{}",
                format!(
                    "{} via {} | {} | {} words",
                    summary.url,
                    summary.strategy,
                    summary.model,
                    summary.word_count()
                )
                .dimmed()
            );
        }
        Outcome::Failed {
            message, detail, ..
        } => {
            eprintln!("{} {}", "✗".red(), message.red());
            eprintln!("\n{}", detail.dimmed());
        }
    }
}
