use std::future::Future;

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::fetch::{ensure_concurrency_limit, FetchStatus, Fetched, SymbolReport};
use crate::records::{Row, Table};

/// Concatenated rows of a multi-symbol fetch plus one report per symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOut<R> {
    pub table: Table<R>,
    pub reports: Vec<SymbolReport>,
}

impl<R: Row> FanOut<R> {
    pub fn empty() -> Self {
        Self {
            table: Table::empty(),
            reports: Vec::new(),
        }
    }

    /// Symbols whose request went wrong (empty-but-successful answers excluded).
    pub fn failed_symbols(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter(|report| report.status.is_failure())
            .map(|report| report.symbol.as_str())
            .collect()
    }
}

/// Run `per_symbol` for every symbol, at most `pool_size` at a time, each on
/// its own tokio task.
///
/// Rows come back in input order no matter which request finishes first. A
/// symbol that fails contributes no rows and never stops the others; the
/// call returns once every symbol has reported.
pub async fn fan_out<R, F, Fut>(symbols: &[String], pool_size: usize, per_symbol: F) -> FanOut<R>
where
    R: Row,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Fetched<R>> + Send + 'static,
{
    if symbols.is_empty() {
        return FanOut::empty();
    }

    let limit = ensure_concurrency_limit(pool_size);
    debug!("fanning out {} symbol(s) over {limit} worker(s)", symbols.len());

    // `buffered` polls at most `limit` tasks and yields them in submission order.
    let outcomes: Vec<(String, Fetched<R>)> = stream::iter(symbols.iter().cloned())
        .map(|symbol| {
            let task = tokio::spawn(per_symbol(symbol.clone()));
            async move {
                let fetched = match task.await {
                    Ok(fetched) => fetched,
                    Err(err) => {
                        warn!("worker for {symbol} did not finish: {err}");
                        Fetched::without_data(FetchStatus::Aborted {
                            reason: err.to_string(),
                        })
                    }
                };
                (symbol, fetched)
            }
        })
        .buffered(limit)
        .collect()
        .await;

    let mut tables = Vec::with_capacity(outcomes.len());
    let mut reports = Vec::with_capacity(outcomes.len());
    for (symbol, fetched) in outcomes {
        tables.push(fetched.table);
        reports.push(SymbolReport {
            symbol,
            status: fetched.status,
        });
    }

    FanOut {
        table: Table::concat(tables),
        reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Bar;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn one_bar(symbol: &str) -> Fetched<Bar> {
        Fetched::ok(Table::new(vec![Bar {
            date: Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap(),
            symbol: symbol.to_string(),
            open: Some(1.0),
            high: Some(1.0),
            low: Some(1.0),
            close: Some(1.0),
            volume: Some(1),
        }]))
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn output_follows_input_order_not_completion_order() {
        let input = symbols(&["SLOW", "MEDIUM", "FAST"]);
        let result = fan_out(&input, 3, |symbol| async move {
            let delay = match symbol.as_str() {
                "SLOW" => 60,
                "MEDIUM" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            one_bar(&symbol)
        })
        .await;

        let order: Vec<&str> = result.table.iter().map(|bar| bar.symbol.as_str()).collect();
        assert_eq!(order, vec!["SLOW", "MEDIUM", "FAST"]);
        let reported: Vec<&str> = result.reports.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(reported, vec!["SLOW", "MEDIUM", "FAST"]);
    }

    #[tokio::test]
    async fn failed_symbols_contribute_no_rows() {
        let input = symbols(&["AAPL", "BAD", "TSLA"]);
        let result = fan_out(&input, 2, |symbol| async move {
            if symbol == "BAD" {
                Fetched::without_data(FetchStatus::Rejected {
                    status: 404,
                    body: "unknown symbol".to_string(),
                })
            } else {
                one_bar(&symbol)
            }
        })
        .await;

        let order: Vec<&str> = result.table.iter().map(|bar| bar.symbol.as_str()).collect();
        assert_eq!(order, vec!["AAPL", "TSLA"]);
        assert_eq!(result.failed_symbols(), vec!["BAD"]);
    }

    #[tokio::test]
    async fn empty_symbol_list_gives_empty_table() {
        let result = fan_out::<Bar, _, _>(&[], 4, |symbol| async move { one_bar(&symbol) }).await;
        assert!(result.table.is_empty());
        assert_eq!(result.table.columns().len(), 7);
        assert!(result.reports.is_empty());
    }

    #[tokio::test]
    async fn in_flight_work_never_exceeds_pool_size() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let input: Vec<String> = (0..12).map(|i| format!("SYM{i}")).collect();

        let result = fan_out(&input, 3, |symbol| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                one_bar(&symbol)
            }
        })
        .await;

        assert_eq!(result.table.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn panicking_worker_is_reported_as_aborted() {
        let input = symbols(&["AAPL", "BOOM"]);
        let result = fan_out(&input, 2, |symbol| async move {
            if symbol == "BOOM" {
                panic!("worker exploded");
            }
            one_bar(&symbol)
        })
        .await;

        assert_eq!(result.table.len(), 1);
        assert!(matches!(
            result.reports[1].status,
            FetchStatus::Aborted { .. }
        ));
    }
}
