use log::info;

use crate::client::MarketDataClient;
use crate::fetch::{Resolution, SymbolReport};
use crate::records::{Bar, OptionBar, OptionQuote, QuoteRow, Row, StockQuote, Table};
use crate::symbols::classify;

/// Result of a call over a mixed equity/option symbol list.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedTables<M, E, O> {
    /// Both classes reduced to shared columns and sorted.
    pub merged: Table<M>,
    pub equities: Table<E>,
    pub options: Table<O>,
    /// Equity reports first, then option reports, each in input order.
    pub reports: Vec<SymbolReport>,
}

pub type MixedQuotes = MixedTables<QuoteRow, StockQuote, OptionQuote>;
pub type MixedHistory = MixedTables<Bar, Bar, OptionBar>;

impl<M: Row, E: Row, O: Row> MixedTables<M, E, O> {
    pub fn into_parts(self) -> (Table<M>, Table<E>, Table<O>) {
        (self.merged, self.equities, self.options)
    }
}

impl MarketDataClient {
    /// Latest quotes for a mix of stocks and options.
    ///
    /// `merged` keeps the quote columns both classes share and is sorted by
    /// `(date, symbol)`. `extended_hours` only applies to stocks.
    pub async fn get_quotes<S: AsRef<str>>(
        &self,
        symbols: &[S],
        cached: bool,
        extended_hours: bool,
    ) -> MixedQuotes {
        let (stock_symbols, option_symbols) = classify(symbols, self.config().symbol_mode);
        info!(
            "fetching quotes for {} stock(s) and {} option(s)",
            stock_symbols.len(),
            option_symbols.len()
        );

        let stocks = self
            .get_stock_quotes(&stock_symbols, cached, extended_hours)
            .await;
        let options = self.get_option_quotes(&option_symbols, cached).await;

        let merged = Table::concat([
            stocks.table.project(|quote| QuoteRow::from(quote)),
            options.table.project(|quote| QuoteRow::from(quote)),
        ])
        .sorted_by_date_then_symbol();

        let mut reports = stocks.reports;
        reports.extend(options.reports);

        MixedTables {
            merged,
            equities: stocks.table,
            options: options.table,
            reports,
        }
    }

    /// Daily history for a mix of stocks and options between two `YYYY-MM-DD` dates.
    ///
    /// Options have no intraday range, so their bars are flat at the last
    /// price. `merged` is sorted by `(symbol, date)`.
    pub async fn get_historicals<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start_date: &str,
        end_date: &str,
    ) -> MixedHistory {
        let (stock_symbols, option_symbols) = classify(symbols, self.config().symbol_mode);
        info!(
            "fetching history for {} stock(s) and {} option(s) from {start_date} to {end_date}",
            stock_symbols.len(),
            option_symbols.len()
        );

        let stocks = self
            .get_stock_historicals(&stock_symbols, start_date, end_date, Resolution::daily())
            .await;
        let options = self
            .get_option_historicals(&option_symbols, start_date, end_date)
            .await;

        let option_bars: Table<OptionBar> =
            options.table.into_iter().map(OptionBar::from).collect();

        let merged = Table::concat([
            stocks.table.clone(),
            option_bars.project(|bar| Bar::from(bar)),
        ])
        .sorted_by_symbol_then_date();

        let mut reports = stocks.reports;
        reports.extend(options.reports);

        MixedTables {
            merged,
            equities: stocks.table,
            options: option_bars,
            reports,
        }
    }
}
