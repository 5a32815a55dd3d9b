use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of a [`super::Table`]. `COLUMNS` and `cells` must line up one to one.
pub trait Row: Clone + Send + 'static {
    const COLUMNS: &'static [&'static str];

    fn date(&self) -> DateTime<Utc>;
    fn symbol(&self) -> &str;
    fn cells(&self) -> Vec<String>;
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Columns every quote has regardless of asset class; the merged quote table uses these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRow {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub bid: Option<f64>,
    pub bid_size: Option<u64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<u64>,
    pub last: Option<f64>,
    pub volume: Option<u64>,
}

impl Row for QuoteRow {
    const COLUMNS: &'static [&'static str] = &[
        "date", "symbol", "bid", "bid_size", "mid", "ask", "ask_size", "last", "volume",
    ];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.bid),
            cell(&self.bid_size),
            cell(&self.mid),
            cell(&self.ask),
            cell(&self.ask_size),
            cell(&self.last),
            cell(&self.volume),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockQuote {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub bid: Option<f64>,
    pub bid_size: Option<u64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<u64>,
    pub last: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub volume: Option<u64>,
}

impl Row for StockQuote {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "symbol",
        "bid",
        "bid_size",
        "mid",
        "ask",
        "ask_size",
        "last",
        "change",
        "change_pct",
        "volume",
    ];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.bid),
            cell(&self.bid_size),
            cell(&self.mid),
            cell(&self.ask),
            cell(&self.ask_size),
            cell(&self.last),
            cell(&self.change),
            cell(&self.change_pct),
            cell(&self.volume),
        ]
    }
}

impl From<&StockQuote> for QuoteRow {
    fn from(quote: &StockQuote) -> Self {
        Self {
            date: quote.date,
            symbol: quote.symbol.clone(),
            bid: quote.bid,
            bid_size: quote.bid_size,
            mid: quote.mid,
            ask: quote.ask,
            ask_size: quote.ask_size,
            last: quote.last,
            volume: quote.volume,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Greeks {
    pub iv: Option<f64>,
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
    pub rho: Option<f64>,
}

/// Option contract snapshot as returned by the quotes endpoint, greeks included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionQuote {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub underlying: Option<String>,
    pub strike: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<u64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<u64>,
    pub last: Option<f64>,
    pub open_interest: Option<u64>,
    pub volume: Option<u64>,
    pub extrinsic_value: Option<f64>,
    pub underlying_price: Option<f64>,
    pub greeks: Greeks,
}

impl Row for OptionQuote {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "symbol",
        "underlying",
        "strike",
        "bid",
        "bid_size",
        "mid",
        "ask",
        "ask_size",
        "last",
        "open_interest",
        "volume",
        "extrinsic_value",
        "underlying_price",
        "iv",
        "delta",
        "gamma",
        "theta",
        "vega",
        "rho",
    ];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.underlying),
            cell(&self.strike),
            cell(&self.bid),
            cell(&self.bid_size),
            cell(&self.mid),
            cell(&self.ask),
            cell(&self.ask_size),
            cell(&self.last),
            cell(&self.open_interest),
            cell(&self.volume),
            cell(&self.extrinsic_value),
            cell(&self.underlying_price),
            cell(&self.greeks.iv),
            cell(&self.greeks.delta),
            cell(&self.greeks.gamma),
            cell(&self.greeks.theta),
            cell(&self.greeks.vega),
            cell(&self.greeks.rho),
        ]
    }
}

impl From<&OptionQuote> for QuoteRow {
    fn from(quote: &OptionQuote) -> Self {
        Self {
            date: quote.date,
            symbol: quote.symbol.clone(),
            bid: quote.bid,
            bid_size: quote.bid_size,
            mid: quote.mid,
            ask: quote.ask,
            ask_size: quote.ask_size,
            last: quote.last,
            volume: quote.volume,
        }
    }
}

/// Daily option quote from the historical quotes endpoint; no greeks, no intraday range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionHistoryRow {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub underlying: Option<String>,
    pub strike: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<u64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<u64>,
    pub last: Option<f64>,
    pub open_interest: Option<u64>,
    pub volume: Option<u64>,
    pub extrinsic_value: Option<f64>,
    pub underlying_price: Option<f64>,
}

impl Row for OptionHistoryRow {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "symbol",
        "underlying",
        "strike",
        "bid",
        "bid_size",
        "mid",
        "ask",
        "ask_size",
        "last",
        "open_interest",
        "volume",
        "extrinsic_value",
        "underlying_price",
    ];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.underlying),
            cell(&self.strike),
            cell(&self.bid),
            cell(&self.bid_size),
            cell(&self.mid),
            cell(&self.ask),
            cell(&self.ask_size),
            cell(&self.last),
            cell(&self.open_interest),
            cell(&self.volume),
            cell(&self.extrinsic_value),
            cell(&self.underlying_price),
        ]
    }
}

/// OHLCV bar. Stock candles map onto it directly; option bars are projected into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl Row for Bar {
    const COLUMNS: &'static [&'static str] =
        &["date", "symbol", "open", "high", "low", "close", "volume"];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.open),
            cell(&self.high),
            cell(&self.low),
            cell(&self.close),
            cell(&self.volume),
        ]
    }
}

/// Option history row with `last` renamed to `close` and a flat open/high/low
/// synthesized from it, so it can sit next to stock candles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionBar {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub underlying: Option<String>,
    pub strike: Option<f64>,
    pub bid: Option<f64>,
    pub bid_size: Option<u64>,
    pub mid: Option<f64>,
    pub ask: Option<f64>,
    pub ask_size: Option<u64>,
    pub close: Option<f64>,
    pub open_interest: Option<u64>,
    pub volume: Option<u64>,
    pub extrinsic_value: Option<f64>,
    pub underlying_price: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl Row for OptionBar {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "symbol",
        "underlying",
        "strike",
        "bid",
        "bid_size",
        "mid",
        "ask",
        "ask_size",
        "close",
        "open_interest",
        "volume",
        "extrinsic_value",
        "underlying_price",
        "open",
        "high",
        "low",
    ];

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_date(&self.date),
            self.symbol.clone(),
            cell(&self.underlying),
            cell(&self.strike),
            cell(&self.bid),
            cell(&self.bid_size),
            cell(&self.mid),
            cell(&self.ask),
            cell(&self.ask_size),
            cell(&self.close),
            cell(&self.open_interest),
            cell(&self.volume),
            cell(&self.extrinsic_value),
            cell(&self.underlying_price),
            cell(&self.open),
            cell(&self.high),
            cell(&self.low),
        ]
    }
}

impl From<OptionHistoryRow> for OptionBar {
    fn from(row: OptionHistoryRow) -> Self {
        let close = row.last;
        Self {
            date: row.date,
            symbol: row.symbol,
            underlying: row.underlying,
            strike: row.strike,
            bid: row.bid,
            bid_size: row.bid_size,
            mid: row.mid,
            ask: row.ask,
            ask_size: row.ask_size,
            close,
            open_interest: row.open_interest,
            volume: row.volume,
            extrinsic_value: row.extrinsic_value,
            underlying_price: row.underlying_price,
            open: close,
            high: close,
            low: close,
        }
    }
}

impl From<&OptionBar> for Bar {
    fn from(bar: &OptionBar) -> Self {
        Self {
            date: bar.date,
            symbol: bar.symbol.clone(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}
