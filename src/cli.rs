use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{PriceSource, TiingoClient};
use crate::errors::{Result, ReturnError};
use crate::observability::init_tracing;
use crate::portfolio::{load_holdings, read_api_token, report, PortfolioAnalyzer, PriceFetcher};
use crate::utils::{Config, ReportFormat};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

/// Positional arguments of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub holdings_path: PathBuf,
    pub api_key_path: PathBuf,
}

impl Args {
    /// Parse `argv`, program name first; extra arguments are ignored
    pub fn parse<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().skip(1).map(Into::<String>::into);
        match (argv.next(), argv.next()) {
            (Some(holdings), Some(api_key)) => Ok(Self {
                holdings_path: PathBuf::from(holdings),
                api_key_path: PathBuf::from(api_key),
            }),
            _ => Err(ReturnError::Usage),
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Correct usage: {} <path_to_holdings_file> <path_to_api_key_file>

Program expects <path_to_holdings_file> to be a JSON file with the following structure:
  [
    {{
      \"Ticker\": <ticker_symbol> (string),
      \"NumShares\": <number_of_shares> (int),
      \"AvgPricePerShare\": <average_price_paid_per_share> (number)
    }},
    ...
  ]

Program expects <path_to_api_key_file> to be a single line file containing a valid Tiingo API key
",
        program
    )
}

/// Entry point shared by the binary: parse arguments, run, map the outcome to an exit code
pub async fn run(argv: Vec<String>) -> ExitCode {
    let code = run_with(argv, &mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}

/// Run against explicit output streams and return the process status.
///
/// The report or usage block goes to `out`. A failure writes exactly one
/// `error: <kind>: <detail>` line to `err` and returns 1.
pub async fn run_with<O: Write, E: Write>(argv: Vec<String>, out: &mut O, err: &mut E) -> u8 {
    let program = argv
        .first()
        .map(|p| {
            Path::new(p)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.clone())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let args = match Args::parse(argv) {
        Ok(args) => args,
        Err(_) => {
            let _ = write!(out, "{}", usage(&program)).and_then(|_| out.flush());
            return EXIT_FAILURE;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return report_failure(&e, err),
    };

    // Fails only when a subscriber is already installed, which is harmless
    if let Err(e) = init_tracing(config.log_format) {
        debug!("{}", e);
    }

    let client = match TiingoClient::new(&config) {
        Ok(client) => client,
        Err(e) => return report_failure(&e, err),
    };

    match execute(&args, &config, Arc::new(client), out).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_failure(&e, err),
    }
}

/// Load, fetch, compute and write the report.
///
/// Holdings are parsed before the token is read and before any request is made,
/// so a malformed holdings file never reaches the network.
pub async fn execute<W: Write>(
    args: &Args,
    config: &Config,
    source: Arc<dyn PriceSource>,
    out: &mut W,
) -> Result<()> {
    let holdings = load_holdings(&args.holdings_path)?;
    let token = read_api_token(&args.api_key_path)?;

    let fetcher = PriceFetcher::new(source, config.max_concurrent_requests);
    let prices = fetcher.fetch_prices(&holdings, &token).await?;

    let report = PortfolioAnalyzer::compute(&holdings, &prices)?;
    info!(
        holdings = report.holdings.len(),
        total_return = %report.totals.total_return,
        "Report computed"
    );

    match config.report_format {
        ReportFormat::Table => report::write_table(&report, out),
        ReportFormat::Json => report::write_json(&report, out),
    }
}

/// Single-line diagnostic for a failed run
pub fn diagnostic(err: &ReturnError) -> String {
    let message = err.to_string().replace(['\n', '\r'], " ");
    format!("error: {}: {}", err.kind(), message)
}

fn report_failure<E: Write>(error: &ReturnError, err: &mut E) -> u8 {
    let _ = writeln!(err, "{}", diagnostic(error)).and_then(|_| err.flush());
    EXIT_FAILURE
}
