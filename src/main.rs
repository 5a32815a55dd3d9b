use anyhow::{Context, Result};
use log::{info, warn};

use marketdata::{ClientConfig, MarketDataClient, SymbolReport};

const KEY_FILE: &str = "key";
const OPTIONS: [&str; 3] = [
    "TSLA250117C00360000",
    "PLTR250117C00050000",
    "MSTR241220C00190000",
];

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            info!("{err}; falling back to ./{KEY_FILE}");
            ClientConfig::from_key_file(KEY_FILE)
                .with_context(|| format!("No API token in the environment or ./{KEY_FILE}"))?
        }
    };
    let client = MarketDataClient::new(config).context("Failed to build market data client")?;

    let bars = client
        .get_stock_historical("AAPL", "2021-01-01", "2021-01-31", "D")
        .await;
    println!("{}\n", bars.table);

    let quote = client.get_stock_quote("TSLA", true, false).await;
    println!("{}\n", quote.table);

    let batch = client
        .get_stock_historicals(&["AAPL", "TSLA", "MSTR"], "2021-01-01", "2021-01-31", "D")
        .await;
    report_failures(&batch.reports);
    println!("{}\n", batch.table);

    let batch = client
        .get_stock_quotes(&["AAPL", "AMC", "AMD", "AMZN", "COIN"], true, false)
        .await;
    report_failures(&batch.reports);
    println!("{}\n", batch.table);

    let option_history = client
        .get_option_historical(OPTIONS[0], "2024-11-01", "2024-11-10")
        .await;
    println!("{}\n", option_history.table);

    let option_quote = client.get_option_quote(OPTIONS[0], true).await;
    println!("{}\n", option_quote.table);

    let batch = client
        .get_option_historicals(&OPTIONS, "2024-11-01", "2024-11-10")
        .await;
    report_failures(&batch.reports);
    println!("{}\n", batch.table);

    let batch = client.get_option_quotes(&OPTIONS, true).await;
    report_failures(&batch.reports);
    println!("{}\n", batch.table);

    let mixed: Vec<&str> = ["AAPL", "TSLA"].into_iter().chain(OPTIONS).collect();
    let quotes = client.get_quotes(&mixed, true, false).await;
    report_failures(&quotes.reports);
    println!("{}\n", quotes.merged);

    let history = client
        .get_historicals(&mixed, "2024-11-01", "2024-11-10")
        .await;
    report_failures(&history.reports);
    println!("{}", history.merged);

    Ok(())
}

fn report_failures(reports: &[SymbolReport]) {
    for report in reports.iter().filter(|r| r.status.is_failure()) {
        warn!("{}: {:?}", report.symbol, report.status);
    }
}
