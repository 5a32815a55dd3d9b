use crate::client::MarketDataClient;
use crate::records::{Greeks, OptionQuote, StockQuote};

use super::decode::{count, number, text};
use super::{normalize_response, Fetched};

fn feed(cached: bool) -> String {
    let feed = if cached { "cached" } else { "live" };
    feed.to_string()
}

impl MarketDataClient {
    /// Latest quote for one stock.
    ///
    /// `cached` selects the cheaper cached feed over live data; `extended_hours`
    /// asks for pre/post-market prices.
    pub async fn get_stock_quote(
        &self,
        symbol: &str,
        cached: bool,
        extended_hours: bool,
    ) -> Fetched<StockQuote> {
        let url = self
            .config()
            .endpoint(&format!("/v1/stocks/quotes/{}", symbol.to_uppercase()));
        let query = [
            ("feed", feed(cached)),
            ("extended", extended_hours.to_string()),
        ];

        let outcome = self.transport().get(&url, &query).await;
        normalize_response(symbol, outcome, "updated", |row, date| StockQuote {
            date,
            symbol: text(row, "symbol").unwrap_or_else(|| symbol.to_string()),
            bid: number(row, "bid"),
            bid_size: count(row, "bidSize"),
            mid: number(row, "mid"),
            ask: number(row, "ask"),
            ask_size: count(row, "askSize"),
            last: number(row, "last"),
            change: number(row, "change"),
            change_pct: number(row, "changepct"),
            volume: count(row, "volume"),
        })
    }

    /// Latest quote for one option contract, greeks included.
    pub async fn get_option_quote(&self, symbol: &str, cached: bool) -> Fetched<OptionQuote> {
        let url = self
            .config()
            .endpoint(&format!("/v1/options/quotes/{}/", symbol.to_uppercase()));
        let query = [("feed", feed(cached))];

        let outcome = self.transport().get(&url, &query).await;
        normalize_response(symbol, outcome, "updated", |row, date| OptionQuote {
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
            greeks: Greeks {
                iv: number(row, "iv"),
                delta: number(row, "delta"),
                gamma: number(row, "gamma"),
                theta: number(row, "theta"),
                vega: number(row, "vega"),
                rho: number(row, "rho"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::fetch::FetchStatus;
    use crate::records::{OptionQuote, Row, StockQuote};
    use crate::test_support::{client_for, option_quote_body, stock_quote_body};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn stock_quote_is_renamed_and_projected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stocks/quotes/TSLA"))
            .and(query_param("feed", "live"))
            .and(query_param("extended", "true"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(stock_quote_body("TSLA", 1_700_000_000)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetched = client_for(&server).get_stock_quote("tsla", false, true).await;

        assert_eq!(fetched.status, FetchStatus::Ok { rows: 1 });
        assert_eq!(fetched.table.columns(), StockQuote::COLUMNS);
        let quote = &fetched.table.rows()[0];
        assert_eq!(quote.symbol, "TSLA");
        assert_eq!(quote.bid_size, Some(3));
        assert_eq!(quote.ask_size, Some(5));
        assert_eq!(quote.change_pct, Some(0.0125));
        assert_eq!(quote.date.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn option_quote_takes_upstream_option_symbol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/options/quotes/TSLA250117C00360000/"))
            .and(query_param("feed", "cached"))
            .respond_with(ResponseTemplate::new(203).set_body_string(option_quote_body(
                "TSLA250117C00360000",
                1_700_000_000,
                12.5,
            )))
            .mount(&server)
            .await;

        let fetched = client_for(&server)
            .get_option_quote("tsla250117c00360000", true)
            .await;

        assert_eq!(fetched.status, FetchStatus::Ok { rows: 1 });
        assert_eq!(fetched.table.columns(), OptionQuote::COLUMNS);
        let quote = &fetched.table.rows()[0];
        assert_eq!(quote.symbol, "TSLA250117C00360000");
        assert_eq!(quote.underlying.as_deref(), Some("TSLA"));
        assert_eq!(quote.open_interest, Some(1520));
        assert_eq!(quote.greeks.delta, Some(0.41));
    }

    #[tokio::test]
    async fn error_status_gives_empty_typed_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(202).set_body_string(r#"{"s":"error","errmsg":"queued"}"#),
            )
            .mount(&server)
            .await;

        let fetched = client_for(&server).get_stock_quote("AAPL", true, false).await;

        assert!(fetched.table.is_empty());
        assert_eq!(fetched.table.columns().len(), 11);
        assert!(matches!(
            fetched.status,
            FetchStatus::Rejected { status: 202, .. }
        ));
    }
}
