use crate::client::MarketDataClient;
use crate::fetch::Resolution;
use crate::records::{Bar, OptionHistoryRow, OptionQuote, StockQuote};

use super::fanout::{fan_out, FanOut};

fn owned<S: AsRef<str>>(symbols: &[S]) -> Vec<String> {
    symbols.iter().map(|s| s.as_ref().to_string()).collect()
}

impl MarketDataClient {
    pub async fn get_stock_quotes<S: AsRef<str>>(
        &self,
        symbols: &[S],
        cached: bool,
        extended_hours: bool,
    ) -> FanOut<StockQuote> {
        let client = self.clone();
        fan_out(&owned(symbols), self.config().pool_size, move |symbol| {
            let client = client.clone();
            async move {
                client
                    .get_stock_quote(&symbol, cached, extended_hours)
                    .await
            }
        })
        .await
    }

    pub async fn get_stock_historicals<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start_date: &str,
        end_date: &str,
        resolution: impl Into<Resolution>,
    ) -> FanOut<Bar> {
        let client = self.clone();
        let resolution = resolution.into();
        let (start_date, end_date) = (start_date.to_string(), end_date.to_string());
        fan_out(&owned(symbols), self.config().pool_size, move |symbol| {
            let client = client.clone();
            let resolution = resolution.clone();
            let (start_date, end_date) = (start_date.clone(), end_date.clone());
            async move {
                client
                    .get_stock_historical(&symbol, &start_date, &end_date, resolution)
                    .await
            }
        })
        .await
    }

    pub async fn get_option_quotes<S: AsRef<str>>(
        &self,
        symbols: &[S],
        cached: bool,
    ) -> FanOut<OptionQuote> {
        let client = self.clone();
        fan_out(&owned(symbols), self.config().pool_size, move |symbol| {
            let client = client.clone();
            async move { client.get_option_quote(&symbol, cached).await }
        })
        .await
    }

    pub async fn get_option_historicals<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start_date: &str,
        end_date: &str,
    ) -> FanOut<OptionHistoryRow> {
        let client = self.clone();
        let (start_date, end_date) = (start_date.to_string(), end_date.to_string());
        fan_out(&owned(symbols), self.config().pool_size, move |symbol| {
            let client = client.clone();
            let (start_date, end_date) = (start_date.clone(), end_date.clone());
            async move {
                client
                    .get_option_historical(&symbol, &start_date, &end_date)
                    .await
            }
        })
        .await
    }
}
