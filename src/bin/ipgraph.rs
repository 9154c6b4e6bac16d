//! Command-line front end for the connection-log summary engine.
#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ipgraph::engine::{CapacityChoice, EngineConfig, SummaryEngine, SummaryError};
use ipgraph::primes::close_primes;

#[derive(Parser)]
#[command(name = "ipgraph")]
#[command(about = "Index a connection log and summarize per-address activity", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct BuildArgs {
    /// Connection log to read
    #[arg(value_name = "LOG")]
    log: PathBuf,

    /// Which of the five prime candidates to use as hash capacity (1-5).
    /// Choices 1 and 2 fill the table densely and can fail to place a node
    /// even on small logs; 5 is the safest
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    choice: Option<u8>,

    /// Skip edges naming unknown addresses instead of failing
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// JSON engine configuration; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the five prime capacity candidates above N
    Primes {
        /// Node count
        n: usize,
    },
    /// Build the index and report its collisions and load
    Index(BuildArgs),
    /// Build the index and summarize one or more addresses
    Summarize {
        #[command(flatten)]
        build: BuildArgs,

        /// Address to summarize (repeatable)
        #[arg(long = "ip", required = true, num_args = 1..)]
        ips: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Primes { n } => {
            let primes = close_primes(n);
            match cli.format {
                OutputFormat::Text => {
                    for (i, p) in primes.iter().enumerate() {
                        println!("{}. {p}", i + 1);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string(&primes)?),
            }
        }
        Commands::Index(args) => {
            let engine = build_engine(&args)?;
            let stats = engine.index_stats();
            match cli.format {
                OutputFormat::Text => println!("{stats}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
            }
        }
        Commands::Summarize { build, ips } => {
            let engine = build_engine(&build)?;
            let mut failures = 0usize;
            let mut reports = Vec::with_capacity(ips.len());
            for ip in &ips {
                match engine.summarize(ip) {
                    Ok(report) => reports.push(report),
                    Err(err @ (SummaryError::NotFoundInGraph(_) | SummaryError::InvalidIp(_))) => {
                        eprintln!("{err}");
                        failures += 1;
                    }
                    Err(err) => return Err(err).context(format!("summarizing {ip}")),
                }
            }
            match cli.format {
                OutputFormat::Text => {
                    for report in &reports {
                        println!("{report}\n");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} addresses could not be summarized", ips.len());
            }
        }
    }

    Ok(())
}

fn build_engine(args: &BuildArgs) -> Result<SummaryEngine> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(choice) = args.choice {
        config.capacity_choice = CapacityChoice::new(choice)?;
    }
    if args.lenient {
        config.graph.strict_edges = false;
    }
    SummaryEngine::from_path(&args.log, config)
        .with_context(|| format!("building index from {}", args.log.display()))
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}
