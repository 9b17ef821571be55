//! Getter main entry point
//!
//! This is the command-line interface for the Getter chained fetcher.

use anyhow::Context;
use clap::{Parser, Subcommand};
use getter::config::{load_config_with_hash, Config, CrawlConfig, StepDescriptor};
use getter::crawler::{DelayPolicy, HtmlExtractor, HttpFetcher, Sequencer};
use getter::url::ensure_scheme;
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Getter: fetch a chain of pages, following one extracted value per step
///
/// Each step downloads a URL, optionally saves it, and optionally extracts an
/// attribute from the HTML. The selected value is appended to the next step's
/// URL.
#[derive(Parser, Debug)]
#[command(name = "getter")]
#[command(version)]
#[command(about = "Chained HTTP fetcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Write log records to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Discard all log records
    #[arg(long, global = true, conflicts_with = "log_file")]
    no_log: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured chain, or a single URL
    ///
    /// Without --url and without a config file, the URL is read from stdin.
    Get {
        /// Path to TOML configuration file
        #[arg(short, long, value_name = "CONFIG", default_value = "getter.toml")]
        config: PathBuf,

        /// Fetch this URL as a one-step chain instead of reading the config
        #[arg(long)]
        url: Option<String>,

        /// Output file for --url
        #[arg(long, requires = "url")]
        out: Option<String>,

        /// Do not sleep between steps
        #[arg(long)]
        no_delay: bool,
    },

    /// Fetch one page and print the extracted values
    Getvalues {
        #[arg(long)]
        url: String,

        /// Element (tag) name
        #[arg(long)]
        elem: String,

        /// Attribute name
        #[arg(long)]
        attr: String,

        /// Only print values containing this substring
        #[arg(long, default_value = "")]
        grep: String,
    },

    /// Print the configured steps
    List {
        /// Path to TOML configuration file
        #[arg(short, long, value_name = "CONFIG", default_value = "getter.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    match cli.command {
        Command::Get {
            ref config,
            ref url,
            ref out,
            no_delay,
        } => {
            let mut config = match url {
                Some(url) => single_step_config(url, out.as_deref()),
                None if !config.exists() => {
                    tracing::info!("No config at {}, asking for a URL", config.display());
                    let url = prompt_url(&mut std::io::stdin().lock(), &mut std::io::stdout())?;
                    single_step_config(&url, None)
                }
                None => load(config)?,
            };
            if let Some(timeout) = cli.timeout {
                config.crawl.timeout = timeout;
            }
            if no_delay {
                config.crawl.delay = false;
            }
            handle_get(&config).await
        }
        Command::Getvalues {
            ref url,
            ref elem,
            ref attr,
            ref grep,
        } => {
            let step = StepDescriptor {
                elem: elem.clone(),
                attr: attr.clone(),
                grep: grep.clone(),
                ..StepDescriptor::new(ensure_scheme(url))
            };
            let timeout = cli.timeout.unwrap_or(CrawlConfig::default().timeout);
            handle_getvalues(&step, timeout).await
        }
        Command::List { ref config } => handle_list(&load(config)?),
    }
}

/// Sets up the logging/tracing subscriber based on the global flags
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    if cli.no_log {
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::new("getter=info,warn"),
            1 => EnvFilter::new("getter=debug,info"),
            2 => EnvFilter::new("getter=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!("Configuration loaded (hash: {})", hash);
    Ok(config)
}

/// Asks for a URL on `output` and reads one line from `input`
fn prompt_url(input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<String> {
    write!(output, "url:>")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let url = line.trim();
    if url.is_empty() {
        anyhow::bail!("no URL given");
    }
    Ok(url.to_string())
}

/// Builds a one-step chain from `--url` / `--out`
fn single_step_config(url: &str, out: Option<&str>) -> Config {
    Config {
        crawl: CrawlConfig::default(),
        steps: vec![StepDescriptor {
            out: out.unwrap_or_default().to_string(),
            ..StepDescriptor::new(ensure_scheme(url))
        }],
    }
}

/// Handles `get`: runs the chain and prints the final written path
async fn handle_get(config: &Config) -> anyhow::Result<()> {
    match getter::crawler::crawl(config).await {
        Ok(Some(path)) => {
            println!("{}", path.display());
            Ok(())
        }
        Ok(None) => {
            tracing::info!("Chain finished without writing output");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Chain failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `getvalues`: prints one extracted value per line
async fn handle_getvalues(step: &StepDescriptor, timeout: u64) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(Duration::from_secs(timeout))?;
    let sequencer = Sequencer::new(fetcher, HtmlExtractor, DelayPolicy::disabled());

    for value in sequencer.fetch_values(step).await? {
        println!("{}", value);
    }

    Ok(())
}

/// Handles `list`: prints the chain and pacing settings
fn handle_list(config: &Config) -> anyhow::Result<()> {
    println!("timeout: {}s", config.crawl.timeout);
    if config.crawl.delay {
        println!(
            "delay: {}-{}s between steps",
            config.crawl.delay_min, config.crawl.delay_max
        );
    } else {
        println!("delay: off");
    }

    for (index, step) in config.steps.iter().enumerate() {
        println!("{:>3}. {}", index + 1, step);
    }

    Ok(())
}
