use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_search::{
    CatalogResolver, FileStore, MemoryStore, Product, SearchSession, SnapshotStore,
    StorefrontConfig,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront CLI - cached product search with recent history", long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Search state file (overrides config)
    #[arg(short = 's', long)]
    state: Option<PathBuf>,

    /// Cache capacity (overrides config)
    #[arg(long)]
    capacity: Option<usize>,

    /// Simulated network delay in milliseconds (overrides config)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Keep search state in memory only
    #[arg(long)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Show recent searches
    Recent,
    /// Clear recent searches
    ClearRecent,
    /// Print the cached search state as JSON
    Cache,
    /// Show cache statistics and per-query frequencies
    Stats,
    /// Drop cached results and recent searches, and delete the state file
    Reset,
    /// Interactive mode (default)
    Repl,
}

struct StorefrontClient {
    session: SearchSession<CatalogResolver>,
}

impl StorefrontClient {
    fn open(config: &StorefrontConfig) -> Result<Self> {
        let resolver = match &config.resolver.catalog_path {
            Some(path) => CatalogResolver::from_file(path)
                .with_context(|| format!("Failed to load catalog {:?}", path))?,
            None => CatalogResolver::builtin().context("Failed to load built-in catalog")?,
        }
        .with_network_delay(config.network_delay());

        let store: Arc<dyn SnapshotStore> = if config.persistence.enabled {
            Arc::new(FileStore::new(&config.persistence.state_path))
        } else {
            Arc::new(MemoryStore::new())
        };

        let session = SearchSession::open(config.to_session_config(), resolver, store)
            .with_context(|| {
                format!(
                    "Failed to restore search state from {:?}",
                    config.persistence.state_path
                )
            })?;

        Ok(Self { session })
    }

    /// Run one command; `rest` is the unsplit text after the command word
    async fn execute_command(&self, command: &str, rest: &str) -> Result<String> {
        let start = Instant::now();

        let response = match command.to_uppercase().as_str() {
            "SEARCH" | "S" => self.cmd_search(rest).await?,
            "RECENT" => self.cmd_recent(),
            "CLEAR" | "CLEAR-RECENT" => self.cmd_clear_recent(),
            "CACHE" => self.cmd_cache()?,
            "STATS" | "INFO" => self.cmd_stats()?,
            "RESET" => self.cmd_reset(),
            "HELP" => self.help_text(),
            _ => return Err(anyhow::anyhow!("Unknown command: {}", command)),
        };

        Ok(format!("{}\n{}", response, elapsed_suffix(start.elapsed())))
    }

    async fn cmd_search(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(anyhow::anyhow!("Usage: SEARCH query"));
        }

        let results = self.session.search(query).await?;
        if results.is_empty() {
            return Ok(format!("No products found for \"{}\"", query.trim()).yellow().to_string());
        }

        let freq = self.session.cache_frequency(query).unwrap_or_default();
        let header = format!("Search Results ({})", results.len()).bold().to_string();
        let lines = results
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}) {}", i + 1, format_product(p)))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "{}\n{}\n{}",
            header,
            lines,
            format!("(cache freq: {})", freq).dimmed()
        ))
    }

    fn cmd_recent(&self) -> String {
        let recent = self.session.recent_searches();
        if recent.is_empty() {
            return "(empty list)".dimmed().to_string();
        }

        recent
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}) \"{}\"", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cmd_clear_recent(&self) -> String {
        self.session.clear_recent_searches();
        "OK".green().to_string()
    }

    fn cmd_reset(&self) -> String {
        self.session.reset();
        "OK".green().to_string()
    }

    fn cmd_cache(&self) -> Result<String> {
        let snapshot = self.session.snapshot();
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn cmd_stats(&self) -> Result<String> {
        let stats = self.session.cache_stats();
        let mut output = serde_json::to_string_pretty(&stats)?;
        output.push_str(&format!("\nhit rate: {:.1}%", stats.hit_rate() * 100.0));

        let snapshot = self.session.snapshot();
        if !snapshot.cache.is_empty() {
            output.push_str(&format!("\n{}", "Cached queries:".bold()));
            for entry in snapshot.cache.entries() {
                output.push_str(&format!(
                    "\n  {:<24} freq {:>3}  ({} results)",
                    entry.key,
                    entry.freq,
                    entry.value.len()
                ));
            }
        }

        Ok(output)
    }

    fn help_text(&self) -> String {
        format!(
            r#"{}

{}
  SEARCH query               Search products (cached by normalized query)
  S query                    Alias for SEARCH

{}
  RECENT                     List recent searches, most recent first
  CLEAR                      Clear recent searches (cache is kept)

{}
  CACHE                      Print cached search state as JSON
  STATS                      Show cache statistics and frequencies
  RESET                      Drop cache and history, delete saved state
  HELP                       Show this help message
  QUIT                       Exit the CLI
"#,
            "Storefront CLI - Available Commands".bold().cyan(),
            "Search:".bold(),
            "History:".bold(),
            "Inspection:".bold(),
        )
    }
}

/// Split a REPL line into the command word and the raw remainder
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    }
}

fn elapsed_suffix(elapsed: Duration) -> String {
    format!("({:.2?})", elapsed).dimmed().to_string()
}

fn format_product(product: &Product) -> String {
    let mut line = format!(
        "{}  {}  ⭐ {:.1}",
        product.name.bold(),
        format_rupees(product.price),
        product.rating
    );

    if let Some(tags) = &product.tags {
        if !tags.is_empty() {
            line.push_str(&format!("  [{}]", tags.join(", ")).dimmed().to_string());
        }
    }

    line
}

/// Indian digit grouping: last three digits, then pairs (₹1,23,456)
fn format_rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}

fn init_tracing(config: &StorefrontConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);

    if config.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Result<StorefrontConfig> {
    let mut config = match &args.config {
        Some(path) => StorefrontConfig::from_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => StorefrontConfig::default(),
    };

    if let Some(state) = &args.state {
        config.persistence.state_path = state.clone();
    }
    if let Some(capacity) = args.capacity {
        config.cache.capacity = capacity;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.resolver.network_delay_ms = delay_ms;
    }
    if args.no_persist {
        config.persistence.enabled = false;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config);

    info!("Starting Storefront CLI v{}", env!("CARGO_PKG_VERSION"));
    let client = StorefrontClient::open(&config)?;

    let (command, rest) = match args.command {
        None | Some(Command::Repl) => return run_interactive(client).await,
        Some(Command::Search { query }) => ("SEARCH", query.join(" ")),
        Some(Command::Recent) => ("RECENT", String::new()),
        Some(Command::ClearRecent) => ("CLEAR", String::new()),
        Some(Command::Cache) => ("CACHE", String::new()),
        Some(Command::Stats) => ("STATS", String::new()),
        Some(Command::Reset) => ("RESET", String::new()),
    };

    match client.execute_command(command, &rest).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}

async fn run_interactive(client: StorefrontClient) -> Result<()> {
    println!(
        "{}",
        format!("Storefront CLI v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!("Type {} for available commands\n", "HELP".bold());

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format!("{}> ", "storefront".green());
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(&line)?;

                let (cmd, rest) = split_command(&line);

                if cmd.eq_ignore_ascii_case("QUIT") || cmd.eq_ignore_ascii_case("EXIT") {
                    println!("Goodbye!");
                    break;
                }

                match client.execute_command(cmd, rest).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        error!(error = %e, "Command failed");
                        println!("{}", format!("Error: {}", e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!(error = ?err, "Readline error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
