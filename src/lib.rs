pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod records;
pub mod services;
pub mod symbols;

#[cfg(test)]
mod test_support;

pub use client::MarketDataClient;
pub use config::{ClientConfig, SymbolMode};
pub use error::{AppError, Result};
pub use fetch::{FetchStatus, Fetched, Resolution, SymbolReport};
pub use records::{
    Bar, Greeks, OptionBar, OptionHistoryRow, OptionQuote, QuoteRow, Row, StockQuote, Table,
};
pub use services::{FanOut, MixedHistory, MixedQuotes, MixedTables};
pub use symbols::{asset_class, classify, AssetClass};
