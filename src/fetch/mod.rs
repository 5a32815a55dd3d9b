use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::records::{Row, Table};

pub mod decode;
pub mod history;
pub mod quotes;
pub mod transport;

pub use decode::RowMap;
pub use history::Resolution;
pub use transport::{fetch_url, RawResponse, RetryPolicy, Transport, TransportFailure};

/// Status codes the service uses for a usable answer (203 marks cached data).
pub const ACCEPTED_STATUSES: [u16; 2] = [200, 203];

/// Clamp a configured worker count to something a pool can actually run with.
#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}

/// What happened to one symbol's request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Ok { rows: usize },
    /// The service answered successfully but had no rows for the symbol.
    Empty,
    /// Every attempt failed before a usable response arrived.
    NoResponse { attempts: u32, reason: String },
    /// A response arrived with a status outside [`ACCEPTED_STATUSES`].
    Rejected { status: u16, body: String },
    /// The body could not be read as a row set.
    Malformed { reason: String },
    /// The worker running the request died before reporting back.
    Aborted { reason: String },
}

impl FetchStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchStatus::Ok { .. })
    }

    /// True when the request itself went wrong, as opposed to there being no data.
    pub fn is_failure(&self) -> bool {
        !matches!(self, FetchStatus::Ok { .. } | FetchStatus::Empty)
    }
}

/// A single-symbol table together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<R> {
    pub table: Table<R>,
    pub status: FetchStatus,
}

impl<R: Row> Fetched<R> {
    pub fn ok(table: Table<R>) -> Self {
        let status = if table.is_empty() {
            FetchStatus::Empty
        } else {
            FetchStatus::Ok { rows: table.len() }
        };
        Self { table, status }
    }

    /// An empty, correctly typed table carrying the reason there is no data.
    pub fn without_data(status: FetchStatus) -> Self {
        Self {
            table: Table::empty(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolReport {
    pub symbol: String,
    pub status: FetchStatus,
}

/// Turn a transport outcome into a typed table.
///
/// Only 200/203 bodies are decoded. Everything else becomes an empty table with
/// the cause logged and recorded in the returned status.
pub(crate) fn normalize_response<R, F>(
    symbol: &str,
    outcome: Result<RawResponse, TransportFailure>,
    time_field: &str,
    mut build: F,
) -> Fetched<R>
where
    R: Row,
    F: FnMut(&RowMap, DateTime<Utc>) -> R,
{
    let response = match outcome {
        Ok(response) => response,
        Err(failure) => {
            warn!(
                "no data found for {symbol}: no response after {} attempt(s): {}",
                failure.attempts, failure.reason
            );
            return Fetched::without_data(FetchStatus::NoResponse {
                attempts: failure.attempts,
                reason: failure.reason,
            });
        }
    };

    if !ACCEPTED_STATUSES.contains(&response.status) {
        warn!(
            "request for {symbol} returned status {}: {}",
            response.status, response.body
        );
        return Fetched::without_data(FetchStatus::Rejected {
            status: response.status,
            body: response.body,
        });
    }

    let rows = match decode::parse_row_set(&response.body) {
        Ok(rows) => rows,
        Err(reason) => {
            warn!("unreadable payload for {symbol}: {reason}");
            return Fetched::without_data(FetchStatus::Malformed { reason });
        }
    };

    if rows.is_empty() {
        warn!("no data found for {symbol}");
        return Fetched::without_data(FetchStatus::Empty);
    }

    if !rows.has_field(time_field) {
        let reason = format!("payload is missing the `{time_field}` column");
        warn!("unreadable payload for {symbol}: {reason}");
        return Fetched::without_data(FetchStatus::Malformed { reason });
    }

    let mut table_rows = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let Some(date) = decode::epoch_seconds(row, time_field) else {
            debug!("skipping row for {symbol} without a usable `{time_field}` value");
            continue;
        };
        table_rows.push(build(row, date));
    }

    debug!("decoded {} row(s) for {symbol}", table_rows.len());
    Fetched::ok(Table::new(table_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Bar;

    fn bar_from(symbol: &str) -> impl FnMut(&RowMap, DateTime<Utc>) -> Bar + '_ {
        move |row: &RowMap, date: DateTime<Utc>| Bar {
            date,
            symbol: symbol.to_string(),
            open: decode::number(row, "o"),
            high: decode::number(row, "h"),
            low: decode::number(row, "l"),
            close: decode::number(row, "c"),
            volume: decode::count(row, "v"),
        }
    }

    fn response(status: u16, body: &str) -> Result<RawResponse, TransportFailure> {
        Ok(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn accepted_status_decodes_rows() {
        let fetched = normalize_response(
            "AAPL",
            response(203, r#"{"s":"ok","t":[1609718400],"o":[133.52],"h":[133.61],"l":[126.76],"c":[129.41],"v":[143301887]}"#),
            "t",
            bar_from("AAPL"),
        );
        assert_eq!(fetched.status, FetchStatus::Ok { rows: 1 });
        assert_eq!(fetched.table.rows()[0].close, Some(129.41));
    }

    #[test]
    fn other_status_is_rejected_with_body() {
        let fetched = normalize_response(
            "AAPL",
            response(204, "nothing here"),
            "t",
            bar_from("AAPL"),
        );
        assert!(fetched.table.is_empty());
        assert_eq!(
            fetched.status,
            FetchStatus::Rejected {
                status: 204,
                body: "nothing here".to_string()
            }
        );
        assert!(fetched.status.is_failure());
    }

    #[test]
    fn no_data_payload_is_empty_not_failure() {
        let fetched = normalize_response("AAPL", response(200, r#"{"s":"no_data"}"#), "t", bar_from("AAPL"));
        assert_eq!(fetched.status, FetchStatus::Empty);
        assert!(!fetched.status.is_failure());
    }

    #[test]
    fn missing_time_column_is_malformed() {
        let fetched = normalize_response("AAPL", response(200, r#"{"c":[1.0, 2.0]}"#), "t", bar_from("AAPL"));
        assert!(matches!(fetched.status, FetchStatus::Malformed { .. }));
    }

    #[test]
    fn transport_failure_becomes_no_response() {
        let fetched = normalize_response(
            "AAPL",
            Err(TransportFailure {
                attempts: 3,
                reason: "connection refused".to_string(),
            }),
            "t",
            bar_from("AAPL"),
        );
        assert!(fetched.table.is_empty());
        assert_eq!(fetched.table.columns().len(), 7);
        assert_eq!(
            fetched.status,
            FetchStatus::NoResponse {
                attempts: 3,
                reason: "connection refused".to_string()
            }
        );
    }

    #[test]
    fn rows_without_timestamp_are_skipped() {
        let fetched = normalize_response(
            "AAPL",
            response(200, r#"{"t":[1609718400, null],"c":[1.0, 2.0]}"#),
            "t",
            bar_from("AAPL"),
        );
        assert_eq!(fetched.status, FetchStatus::Ok { rows: 1 });
    }
}
