// src/repositories/row_mapping.rs
//
// Column decoders shared by the SQLite repositories.
// They return rusqlite::Error so they compose inside query_map closures.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use crate::domain::{parse_clock, DayOfWeek, SyncStatus};

fn conversion_error<E>(row: &Row, column: &str, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let idx = row.as_ref().column_index(column).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(row, column, e))
}

pub(crate) fn date(row: &Row, column: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(column)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_error(row, column, e))
}

pub(crate) fn clock(row: &Row, column: &str) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(column)?;
    parse_clock(&raw).map_err(|e| conversion_error(row, column, e))
}

pub(crate) fn sync_status(row: &Row, column: &str) -> rusqlite::Result<SyncStatus> {
    let raw: String = row.get(column)?;
    raw.parse().map_err(|e| conversion_error(row, column, e))
}

pub(crate) fn day_of_week(row: &Row, column: &str) -> rusqlite::Result<DayOfWeek> {
    let raw: i64 = row.get(column)?;
    let n = u8::try_from(raw).unwrap_or(0);
    DayOfWeek::from_number(n).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
    })
}

pub(crate) fn credits(row: &Row, column: &str) -> rusqlite::Result<u8> {
    let raw: i64 = row.get(column)?;
    u8::try_from(raw).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
    })
}

/// Current time in the format every repository writes
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
