// src/main.rs
// =============================================================================
// This is the entry point of the pi-digits CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout only ever carries the answer)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use pi_digits::{build_cache, DigitRange, DigitRangeFetcher, DigitString};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins over -v when it is set
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pi_digits={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let fetcher_config = cli.fetcher_config();
    let cache_config = cli.cache_config();

    match cli.command {
        Commands::Digits {
            count,
            start,
            list,
            json,
        } => {
            let fetcher = DigitRangeFetcher::from_config(&fetcher_config, &cache_config)
                .context("failed to set up the fetcher")?;
            let digits = fetcher
                .fetch_digits(count, start)
                .await
                .context("failed to fetch digits")?;

            let stats = fetcher.cache().stats().await;
            tracing::info!(cache = %stats, "done");
            print_digits(&digits, count, start, list, json)
        }
        Commands::Url { count, start } => {
            let fetcher = DigitRangeFetcher::from_config(&fetcher_config, &cache_config)
                .context("failed to set up the fetcher")?;
            println!("{}", fetcher.request_url(count, start));
            Ok(())
        }
        Commands::Pages { count, start, json } => {
            let fetcher = DigitRangeFetcher::from_config(&fetcher_config, &cache_config)
                .context("failed to set up the fetcher")?;
            let pages = fetcher
                .partition(DigitRange::new(start, count))
                .context("failed to split the range into pages")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
            } else {
                for page in &pages {
                    println!("{}", page);
                }
            }
            Ok(())
        }
        Commands::ClearCache => {
            build_cache(&cache_config)
                .clear()
                .await
                .context("failed to clear the cache")?;
            println!("Cache cleared");
            Ok(())
        }
    }
}

// Prints digits as a string, one integer per line, or a JSON object
fn print_digits(
    digits: &DigitString,
    count: Option<u64>,
    start: Option<u64>,
    list: bool,
    json: bool,
) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "start": start.unwrap_or(pi_digits::config::DEFAULT_START),
            "count": count.unwrap_or(pi_digits::config::DEFAULT_COUNT),
            "digits": digits,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if list {
        let integers = digits
            .to_integer_list()
            .context("API returned a non-digit character")?;
        for digit in integers {
            println!("{}", digit);
        }
    } else {
        println!("{}", digits);
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is logging sent to stderr?
//    - `pi-digits digits --count 5000 > pi.txt` should write only digits
//    - Logs, warnings and errors still show up in the terminal
//
// 2. What does .context() do?
//    - It comes from anyhow's Context trait
//    - Wraps the library error with a human-readable sentence
//    - The original error is kept and printed after it with {:#}
// -----------------------------------------------------------------------------
