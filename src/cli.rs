// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Global flags (base URL, cache, partition scheme, ...) work with every
// subcommand, so `pi-digits --cache none digits --count 10` and
// `pi-digits digits --count 10 --cache none` mean the same thing.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use pi_digits::config::{
    CacheBackend, CacheConfig, FetcherConfig, PartitionScheme, DEFAULT_BASE_URL,
    DEFAULT_CACHE_PATH, DEFAULT_CACHE_TTL, PAGE_LIMIT,
};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "pi-digits",
    version,
    about = "Fetch decimal digits of pi from the pi.delivery API",
    long_about = "pi-digits fetches any range of pi's decimal digits. Requests bigger than the \
                  API's 1000-digit limit are split into pages, and responses are cached for a \
                  few minutes so repeated runs don't hit the network."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API endpoint to fetch digits from
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How requests bigger than one page are split
    #[arg(long, global = true, value_enum, default_value_t = PartitionScheme::Reference)]
    pub partition: PartitionScheme,

    /// Number of pages fetched at the same time
    #[arg(long, global = true, default_value_t = 1)]
    pub concurrency: usize,

    /// Where responses are cached
    #[arg(long, global = true, value_enum, default_value_t = CacheBackend::Disk)]
    pub cache: CacheBackend,

    /// Cache file used by `--cache disk`
    #[arg(long, global = true, default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    /// Seconds a cached response stays fresh
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_TTL.as_secs())]
    pub cache_ttl: u64,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// More log output on stderr (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch digits of pi
    ///
    /// Example: pi-digits digits --count 10 --start 0
    Digits {
        /// Number of digits to fetch (default: 100)
        #[arg(long)]
        count: Option<u64>,

        /// Offset of the first digit, 0 being the leading 3 (default: 0)
        #[arg(long)]
        start: Option<u64>,

        /// Print one integer per digit instead of a single string
        #[arg(long, conflicts_with = "json")]
        list: bool,

        /// Output a JSON object instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Print the API URL a single request would use
    ///
    /// Example: pi-digits url --count 500 --start 2001
    Url {
        #[arg(long)]
        count: Option<u64>,

        #[arg(long)]
        start: Option<u64>,
    },

    /// Show how a range would be split into pages
    ///
    /// Example: pi-digits pages --count 2500
    Pages {
        #[arg(long)]
        count: u64,

        #[arg(long, default_value_t = 0)]
        start: u64,

        /// Output the pages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached response
    ClearCache,
}

impl Cli {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            base_url: self.base_url.clone(),
            page_limit: PAGE_LIMIT,
            partition: self.partition,
            concurrency: self.concurrency,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            backend: self.cache,
            path: self.cache_path.clone(),
            ttl: Duration::from_secs(self.cache_ttl),
        }
    }

    /// Log filter implied by the -v count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_defaults_are_unset() {
        let cli = Cli::parse_from(["pi-digits", "digits"]);
        assert_eq!(cli.cache_config().ttl, DEFAULT_CACHE_TTL);
        match cli.command {
            Commands::Digits { count, start, list, json } => {
                assert_eq!(count, None);
                assert_eq!(start, None);
                assert!(!list);
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.partition, PartitionScheme::Reference);
        assert_eq!(cli.cache, CacheBackend::Disk);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pi-digits",
            "digits",
            "--count",
            "2500",
            "--start",
            "0",
            "--cache",
            "memory",
            "--partition",
            "contiguous",
            "--cache-ttl",
            "60",
            "-vv",
        ]);

        let fetcher = cli.fetcher_config();
        assert_eq!(fetcher.partition, PartitionScheme::Contiguous);
        assert_eq!(fetcher.timeout, None);

        let cache = cli.cache_config();
        assert_eq!(cache.backend, CacheBackend::Memory);
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(cli.log_level(), "debug");

        match cli.command {
            Commands::Digits { count, start, .. } => {
                assert_eq!(count, Some(2500));
                assert_eq!(start, Some(0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_list_and_json_conflict() {
        let result = Cli::try_parse_from(["pi-digits", "digits", "--list", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pages_requires_count() {
        assert!(Cli::try_parse_from(["pi-digits", "pages"]).is_err());
    }
}
