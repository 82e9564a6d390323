use clap::{Parser, ValueEnum};
use futures::StreamExt;
use libtld_sweep::{
    expand_tlds, fetch_tlds, load_tld_file, report, DomainStatus, ProbeConfig, ProbeResult,
    Prober, IANA_TLD_LIST_URL,
};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const QUOTES_URL: &str = "https://gist.githubusercontent.com/JakubPetriska/060958fd744ca34f099e947cd080b540/raw/963b5a9355f04741239407320ac973a6096cd7b6/quotes.csv";

const QUOTE_INTERVAL: Duration = Duration::from_secs(120);

#[derive(Parser, Debug)]
#[command(name = "dsweep")]
#[command(about = "Sweep a base name across all known TLDs and report registration status", long_about = None)]
struct Args {
    /// Base name to sweep, without a TLD (e.g. example)
    domain_name: Option<String>,

    /// RapidAPI key for the status API (not needed with --whois)
    api_key: Option<String>,

    /// Probe over WHOIS instead of the status API
    #[arg(long, short = 'w')]
    whois: bool,

    /// Path to output file
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Output file format
    #[arg(long, value_enum, default_value_t = OutputFormat::Txt)]
    output_format: OutputFormat,

    /// Read the TLD list from a local file instead of fetching it
    #[arg(long)]
    tld_file: Option<PathBuf>,

    /// Comma-separated list of specific TLDs to check (e.g., dev,ai,com,net,org,io)
    #[arg(long, value_delimiter = ',')]
    tlds: Option<Vec<String>>,

    /// Number of concurrent WHOIS workers
    #[arg(long, default_value_t = 10)]
    workers: usize,

    /// Output results as NDJSON stream (one JSON object per line)
    #[arg(long, short = 'j')]
    ndjson: bool,

    /// Print the default config to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Write the default config to the config path and exit
    #[arg(long)]
    write_default_config: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Txt,
    Csv,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Config {
    #[serde(default)]
    tlds: TldConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TldConfig {
    #[serde(default)]
    always: Vec<String>,
    #[serde(default)]
    never: Vec<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dsweep").join("config.toml"))
}

fn load_config() -> Config {
    config_path()
        .and_then(|path| std::fs::read_to_string(&path).ok())
        .and_then(|content| toml::from_str(&content).ok())
        .unwrap_or_default()
}

fn apply_config_to_tlds(mut tlds: Vec<String>, config: &Config) -> Vec<String> {
    let never_set: std::collections::HashSet<_> = config.tlds.never.iter()
        .map(|s| s.to_lowercase())
        .collect();

    tlds.retain(|tld| !never_set.contains(&tld.to_lowercase()));

    for always_tld in config.tlds.always.iter().rev() {
        let lower = always_tld.to_lowercase();
        if !tlds.iter().any(|t| t.to_lowercase() == lower) {
            tlds.insert(0, lower);
        }
    }

    tlds
}

fn get_default_config_toml() -> String {
    r#"# Domain Sweep (dsweep) Configuration

[tlds]
# TLDs to always include in the sweep, regardless of the fetched list
# always = ["com", "net", "org", "io", "dev", "rs"]
always = []

# TLDs to never include in the sweep
# never = ["adult", "xxx", "reklame"]
never = []
"#.to_string()
}

/// One result row in `--ndjson` mode.
#[derive(Debug, Serialize)]
struct SweepRecord {
    domain: String,
    tld: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registered: Option<bool>,
    duration_ms: u128,
}

impl From<ProbeResult> for SweepRecord {
    fn from(result: ProbeResult) -> Self {
        let tld = result.domain.rsplit('.').next().unwrap_or("").to_string();
        let registered = match &result.status {
            DomainStatus::Registered => Some(true),
            DomainStatus::Unregistered => Some(false),
            DomainStatus::Provider(_) => None,
        };
        Self {
            domain: result.domain,
            tld,
            status: result.status.to_string(),
            registered,
            duration_ms: result.duration.as_millis(),
        }
    }
}

fn parse_quotes(body: &str) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    reader
        .records()
        .filter_map(|record| {
            let record = record.ok()?;
            let quote = record.get(0)?.trim();
            let author = record.get(1)?.trim();
            if quote.is_empty() {
                return None;
            }
            Some((quote.to_string(), author.to_string()))
        })
        .collect()
}

async fn fetch_quotes(client: &Client) -> Vec<(String, String)> {
    let body = match client.get(QUOTES_URL).send().await {
        Ok(response) => match response.text().await {
            Ok(body) => body,
            Err(_) => return Vec::new(),
        },
        Err(e) => {
            tracing::debug!(error = %e, "quote fetch failed, spinner only");
            return Vec::new();
        }
    };
    parse_quotes(&body)
}

/// Background waiting-feedback task. Purely cosmetic; must be stopped and
/// joined before results are printed so output never interleaves.
struct Feedback {
    stop: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

impl Feedback {
    fn spawn(client: Client) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_feedback(stop_rx, client));
        Self { stop, handle }
    }

    async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

async fn run_feedback(mut stop: watch::Receiver<bool>, client: Client) {
    let term = console::Term::stderr();
    let quotes = fetch_quotes(&client).await;
    if !quotes.is_empty() {
        let _ = term.write_line("\nPlease enjoy these inspirational quotes while you wait:");
    }

    let mut interval = tokio::time::interval(Duration::from_millis(120));
    let mut tick = 0usize;
    let mut next_quote = Instant::now();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if Instant::now() >= next_quote {
                    if let Some((quote, author)) = quotes.choose(&mut rand::thread_rng()) {
                        let _ = term.clear_line();
                        let _ = term.write_line(&format!("\"{}\" - {}", quote, author));
                    }
                    next_quote = Instant::now() + QUOTE_INTERVAL;
                }
                let frame = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
                tick = tick.wrapping_add(1);
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} probing...", frame));
            }
            _ = stop.changed() => break,
        }
    }

    let _ = term.clear_line();
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.print_default_config {
        println!("{}", get_default_config_toml());
        return Ok(());
    }

    if args.write_default_config {
        if let Some(path) = config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, get_default_config_toml())?;
            println!("Default config written to: {}", path.display());
        } else {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
        return Ok(());
    }

    let Some(domain_name) = args.domain_name.as_deref() else {
        eprintln!("Error: a base domain name is required (e.g. `dsweep example <api_key>`)");
        std::process::exit(1);
    };
    let domain_name = domain_name.to_lowercase();

    if !args.whois && args.api_key.is_none() {
        eprintln!("Error: an API key is required unless --whois is given");
        std::process::exit(1);
    }

    let config = load_config();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args, config, domain_name))
}

async fn run(args: Args, config: Config, domain_name: String) -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let tlds = if let Some(custom_tlds) = &args.tlds {
        custom_tlds.iter().map(|t| t.to_lowercase()).collect()
    } else if let Some(path) = &args.tld_file {
        match load_tld_file(path) {
            Ok(tlds) => tlds,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match fetch_tlds(&client, IANA_TLD_LIST_URL).await {
            Ok(tlds) => tlds,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    let tlds = apply_config_to_tlds(tlds, &config);
    let candidates: Vec<String> = expand_tlds(&domain_name, &tlds).collect();

    let prober = Prober::with_config(ProbeConfig {
        workers: args.workers,
        ..ProbeConfig::default()
    });

    if args.ndjson {
        return run_ndjson(&args, &prober, candidates).await;
    }

    println!("Sweeping {} across {} TLDs.", domain_name, tlds.len());
    println!("This will take some time. Feel free to grab a drink or move on to other tasks.");

    let feedback = if console::user_attended_stderr() {
        Some(Feedback::spawn(client))
    } else {
        None
    };

    let results = if args.whois {
        prober.probe_whois_stream(candidates).collect::<Vec<_>>().await
    } else {
        // api_key presence was checked before the runtime started
        let api_key = args.api_key.as_deref().unwrap_or_default();
        prober.probe_api_all(api_key, candidates).await
    };

    if let Some(feedback) = feedback {
        feedback.stop().await;
    }

    print!("{}", report::render_txt(&results));

    if let Some(path) = &args.output_file {
        let file = File::create(path)?;
        match args.output_format {
            OutputFormat::Txt => report::write_txt(file, &results)?,
            OutputFormat::Csv => report::write_csv(file, &results)?,
        }
        println!("Results saved to {}", path.display());
    }

    Ok(())
}

async fn run_ndjson(
    args: &Args,
    prober: &Prober,
    candidates: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut results = Vec::new();

    if args.whois {
        let mut stream = prober.probe_whois_stream(candidates);
        while let Some(result) = stream.next().await {
            emit_record(&result)?;
            results.push(result);
        }
    } else {
        let api_key = args.api_key.as_deref().unwrap_or_default();
        for domain in candidates {
            if let Some(result) = prober.probe_api(api_key, &domain).await {
                emit_record(&result)?;
                results.push(result);
            }
        }
    }

    if let Some(path) = &args.output_file {
        let file = File::create(path)?;
        match args.output_format {
            OutputFormat::Txt => report::write_txt(file, &results)?,
            OutputFormat::Csv => report::write_csv(file, &results)?,
        }
    }

    Ok(())
}

fn emit_record(result: &ProbeResult) -> io::Result<()> {
    let record = SweepRecord::from(result.clone());
    if let Ok(json) = serde_json::to_string(&record) {
        println!("{}", json);
        io::stdout().flush()?;
    }
    Ok(())
}
