//! market-coach: analyze local price/fundamentals files and print a seeded
//! quiz and flashcards for each ticker.
//!
//! Usage:
//!   cargo run -p market-coach -- --ticker AAPL --ticker MSFT
//!   cargo run -p market-coach -- --data-dir exports --header-rows 2 -t NVDA --level Advanced --pretty
//!
//! Each ticker needs `<data-dir>/<TICKER>.csv`; `<TICKER>.json` with the
//! fundamentals record is optional.

mod reader;
mod sources;

use analysis_core::{AnalysisRequest, DEFAULT_INTERVAL, DEFAULT_PERIOD, DEFAULT_USER_LEVEL};
use analysis_orchestrator::{CoachConfig, CoachResponse, MarketCoach};
use anyhow::Context;
use clap::Parser;
use sources::{CsvPriceSource, JsonFundamentalsSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Max tickers analyzed at once
const DEFAULT_CONCURRENCY: usize = 4;

/// Market Coach - price statistics with a reproducible quiz
#[derive(Debug, Parser)]
#[command(name = "market-coach")]
#[command(about = "Analyze local market data and generate a deterministic quiz and flashcards")]
#[command(version)]
struct Cli {
    /// Directory holding <TICKER>.csv and optional <TICKER>.json files
    #[arg(long, env = "COACH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Ticker to analyze (repeatable)
    #[arg(short, long = "ticker", required = true)]
    tickers: Vec<String>,

    #[arg(long, default_value = DEFAULT_PERIOD)]
    period: String,

    #[arg(long, default_value = DEFAULT_INTERVAL)]
    interval: String,

    /// Learner level; part of the quiz seed
    #[arg(long, default_value = DEFAULT_USER_LEVEL)]
    level: String,

    /// Questions per quiz (overrides COACH_NUM_QUESTIONS)
    #[arg(long)]
    questions: Option<usize>,

    /// Header rows in the CSV files: 1 for flat labels, 2 for multi-level labels
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    header_rows: u8,

    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_coach=info,analysis_orchestrator=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.questions {
        Some(n) => CoachConfig::new(n),
        None => CoachConfig::from_env(),
    };
    let concurrency = cli.concurrency.max(1);
    let total = cli.tickers.len();
    tracing::info!(
        "market-coach: {} tickers, data_dir={}, questions={}, concurrency={}",
        total,
        cli.data_dir.display(),
        config.num_questions,
        concurrency
    );

    let coach = Arc::new(MarketCoach::new(config));
    let prices = Arc::new(CsvPriceSource::new(&cli.data_dir, cli.header_rows as usize));
    let fundamentals = Arc::new(JsonFundamentalsSource::new(&cli.data_dir));
    let semaphore = Arc::new(Semaphore::new(concurrency));

    let mut handles = Vec::with_capacity(total);

    for ticker in &cli.tickers {
        let request = AnalysisRequest::new(ticker.as_str())
            .with_period(cli.period.as_str())
            .with_interval(cli.interval.as_str())
            .with_user_level(cli.level.as_str());
        let coach = Arc::clone(&coach);
        let prices = Arc::clone(&prices);
        let fundamentals = Arc::clone(&fundamentals);
        let semaphore = Arc::clone(&semaphore);

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let label = request.ticker.clone();

            tokio::task::spawn_blocking(move || {
                coach.run(&request, &*prices, &*fundamentals)
            })
            .await
            .with_context(|| format!("analysis task for {} did not complete", label))?
            .with_context(|| format!("analysis failed for {}", label))
        });

        handles.push((ticker.clone(), handle));
    }

    // Await in submission order so output follows the command line
    let mut failed = 0usize;
    for (ticker, handle) in handles {
        let outcome: anyhow::Result<CoachResponse> = handle
            .await
            .with_context(|| format!("task for {} panicked", ticker))
            .and_then(|result| result);

        match outcome {
            Ok(response) => {
                if let Some(e) = &response.quiz_error {
                    tracing::warn!("{}: analysis returned without a quiz ({})", response.ticker, e);
                }
                println!("{}", render(&response, cli.pretty)?);
            }
            Err(e) => {
                failed += 1;
                tracing::error!("{:#}", e);
            }
        }
    }

    tracing::info!("Done: {} of {} tickers analyzed", total - failed, total);
    if failed > 0 {
        anyhow::bail!("{} of {} tickers failed", failed, total);
    }
    Ok(())
}

fn render(response: &CoachResponse, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    json.with_context(|| format!("failed to serialize response for {}", response.ticker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["market-coach", "--ticker", "AAPL", "-t", "MSFT"]).unwrap();
        assert_eq!(cli.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(cli.period, "1y");
        assert_eq!(cli.interval, "1d");
        assert_eq!(cli.level, "Beginner");
        assert_eq!(cli.header_rows, 1);
        assert!(cli.questions.is_none());
        assert!(!cli.pretty);
    }

    #[test]
    fn test_cli_rejects_bad_header_rows() {
        assert!(Cli::try_parse_from(["market-coach", "-t", "AAPL", "--header-rows", "3"]).is_err());
        assert!(Cli::try_parse_from(["market-coach"]).is_err());
    }

    #[test]
    fn test_end_to_end_from_csv() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-02,99.0,101.0,98.0,100.0,1000\n\
                   2024-01-03,100.0,111.0,99.0,110.0,1200\n\
                   2024-01-04,110.0,112.0,97.0,99.0,900\n\
                   2024-01-05,99.0,122.0,98.0,121.0,1500\n";
        let table = reader::read_price_table(csv.as_bytes(), 1).unwrap();
        let coordinator = analysis_orchestrator::AnalysisCoordinator::new();
        let record = coordinator
            .analyze(&AnalysisRequest::new("AAPL"), &table, &serde_json::Value::Null)
            .unwrap();

        assert_relative_eq!(record.metrics.max_price, 121.0);
        assert_relative_eq!(record.metrics.min_price, 99.0);
        assert_relative_eq!(record.metrics.period_return_pct.unwrap(), 21.0, epsilon = 1e-9);
        assert_relative_eq!(record.metrics.max_drawdown_pct.unwrap(), -10.0, epsilon = 1e-9);
    }
}
