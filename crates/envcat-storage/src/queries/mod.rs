//! SQL for records and embedding bookkeeping, plus the column codecs they
//! share.

pub mod embedding_ops;
pub mod record_crud;
pub mod record_query;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::FromSql;
use rusqlite::Row;

use envcat_core::errors::{EnvcatError, EnvcatResult, StorageError};

use crate::to_storage_err;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub(crate) fn decode_err(reason: impl Into<String>) -> EnvcatError {
    StorageError::Decode {
        reason: reason.into(),
    }
    .into()
}

/// Read one column, mapping rusqlite errors into the workspace error.
pub(crate) fn col<T: FromSql>(row: &Row<'_>, idx: usize) -> EnvcatResult<T> {
    row.get(idx).map_err(|e| to_storage_err(e.to_string()))
}

pub(crate) fn encode_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

pub(crate) fn decode_date(value: Option<String>) -> EnvcatResult<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| decode_err(format!("date {s:?}: {e}")))
        })
        .transpose()
}

pub(crate) fn encode_datetime(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|d| d.format(DATETIME_FORMAT).to_string())
}

pub(crate) fn decode_datetime(value: Option<String>) -> EnvcatResult<Option<NaiveDateTime>> {
    value
        .map(|s| {
            NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
                .map_err(|e| decode_err(format!("datetime {s:?}: {e}")))
        })
        .transpose()
}

pub(crate) fn decode_timestamp(value: &str) -> EnvcatResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| decode_err(format!("timestamp {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetimes_survive_encoding() {
        let dt = NaiveDate::from_ymd_opt(2021, 3, 2)
            .unwrap()
            .and_hms_milli_opt(11, 4, 17, 250)
            .unwrap();
        let encoded = encode_datetime(Some(dt));
        assert_eq!(encoded.as_deref(), Some("2021-03-02T11:04:17.250"));
        assert_eq!(decode_datetime(encoded).unwrap(), Some(dt));
    }

    #[test]
    fn garbage_dates_are_decode_errors() {
        let err = decode_date(Some("25/11/2020".into())).unwrap_err();
        assert!(matches!(
            err,
            EnvcatError::Storage(StorageError::Decode { .. })
        ));
    }
}
