use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One decoded record, keyed by the service's own field names.
pub type RowMap = Map<String, Value>;

/// Records decoded from a response body, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<RowMap>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowMap> {
        self.rows.iter()
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(key))
    }
}

/// Parse a response body into records.
///
/// The service answers column-wise: every array field is a column and scalar
/// fields such as `"s": "ok"` repeat on every row. A top-level array of
/// objects is taken as already row-wise. An object without array fields
/// (`{"s": "no_data"}`) has no rows.
pub fn parse_row_set(body: &str) -> Result<RowSet, String> {
    let root: Value =
        serde_json::from_str(body).map_err(|err| format!("body is not valid JSON: {err}"))?;

    match root {
        Value::Object(object) => columns_to_rows(object),
        Value::Array(items) => {
            let mut rows = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(row) => rows.push(row),
                    other => {
                        return Err(format!("expected an object per row, found `{other}`"));
                    }
                }
            }
            Ok(RowSet { rows })
        }
        Value::Null => Ok(RowSet::default()),
        other => Err(format!("expected a JSON object or array, found `{other}`")),
    }
}

fn columns_to_rows(object: Map<String, Value>) -> Result<RowSet, String> {
    let mut length: Option<usize> = None;
    for (key, value) in &object {
        if let Value::Array(column) = value {
            match length {
                None => length = Some(column.len()),
                Some(expected) if expected != column.len() => {
                    return Err(format!(
                        "column `{key}` has {} values, expected {expected}",
                        column.len()
                    ));
                }
                Some(_) => {}
            }
        }
    }

    let Some(length) = length else {
        return Ok(RowSet::default());
    };

    let mut rows = vec![Map::new(); length];
    for (key, value) in object {
        match value {
            Value::Array(column) => {
                for (row, cell) in rows.iter_mut().zip(column) {
                    row.insert(key.clone(), cell);
                }
            }
            scalar => {
                for row in rows.iter_mut() {
                    row.insert(key.clone(), scalar.clone());
                }
            }
        }
    }

    Ok(RowSet { rows })
}

/// Float cell; accepts JSON numbers and numeric strings.
pub fn number(row: &RowMap, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Non-negative integer cell such as a size or volume. Fractional values are rounded.
pub fn count(row: &RowMap, key: &str) -> Option<u64> {
    match row.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u64)
        }),
        Value::String(raw) => {
            let trimmed = raw.trim();
            trimmed.parse::<u64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v.round() as u64)
            })
        }
        _ => None,
    }
}

pub fn text(row: &RowMap, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Cell holding Unix epoch seconds, as used by `t` and `updated`.
pub fn epoch_seconds(row: &RowMap, key: &str) -> Option<DateTime<Utc>> {
    match row.get(key)? {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => {
                let secs = n.as_f64().filter(|v| v.is_finite())?;
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round() as u32;
                DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            }
        },
        Value::String(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}
