use std::fmt;

use crate::client::MarketDataClient;
use crate::records::{Bar, OptionHistoryRow};

use super::decode::{count, number, text};
use super::{normalize_response, Fetched};

/// Candle size for stock history, sent to the service verbatim.
///
/// Bare units (`minutely`, `H`, `D`, `daily`, `W`, `M`, `Y`, ...) and
/// count-prefixed forms (`1D`, `2H`, `3`, `15`, ...) are both accepted; the
/// service rejects anything it does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolution(String);

impl Resolution {
    pub fn daily() -> Self {
        Self("D".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::daily()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Resolution {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Resolution {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A bare number means that many minutes.
impl From<u32> for Resolution {
    fn from(minutes: u32) -> Self {
        Self(minutes.to_string())
    }
}

fn date_range(start_date: &str, end_date: &str) -> [(&'static str, String); 2] {
    [("from", start_date.to_string()), ("to", end_date.to_string())]
}

impl MarketDataClient {
    /// OHLCV candles for one stock between two `YYYY-MM-DD` dates.
    ///
    /// Candle payloads carry no symbol, so every row is stamped with `symbol`
    /// exactly as passed in.
    pub async fn get_stock_historical(
        &self,
        symbol: &str,
        start_date: &str,
        end_date: &str,
        resolution: impl Into<Resolution>,
    ) -> Fetched<Bar> {
        let resolution = resolution.into();
        let url = self.config().endpoint(&format!(
            "/v1/stocks/candles/{}/{}/",
            resolution,
            symbol.to_uppercase()
        ));

        let outcome = self
            .transport()
            .get(&url, &date_range(start_date, end_date))
            .await;
        normalize_response(symbol, outcome, "t", |row, date| Bar {
            date,
            symbol: symbol.to_string(),
            open: number(row, "o"),
            high: number(row, "h"),
            low: number(row, "l"),
            close: number(row, "c"),
            volume: count(row, "v"),
        })
    }

    /// End-of-day quotes for one option contract between two `YYYY-MM-DD` dates.
    pub async fn get_option_historical(
        &self,
        symbol: &str,
        start_date: &str,
        end_date: &str,
    ) -> Fetched<OptionHistoryRow> {
        let url = self
            .config()
            .endpoint(&format!("/v1/options/quotes/{}/", symbol.to_uppercase()));

        let outcome = self
            .transport()
            .get(&url, &date_range(start_date, end_date))
            .await;
        normalize_response(symbol, outcome, "updated", |row, date| OptionHistoryRow {
            date,
            symbol: text(row, "optionSymbol").unwrap_or_else(|| symbol.to_string()),
            underlying: text(row, "underlying"),
            strike: number(row, "strike"),
            bid: number(row, "bid"),
            bid_size: count(row, "bidSize"),
            mid: number(row, "mid"),
            ask: number(row, "ask"),
            ask_size: count(row, "askSize"),
            last: number(row, "last"),
            open_interest: count(row, "openInterest"),
            volume: count(row, "volume"),
            extrinsic_value: number(row, "extrinsicValue"),
            underlying_price: number(row, "underlyingPrice"),
        })
    }
}
