//! Keyset cursor codec.
//!
//! A cursor is the pair `[sort_value, id]` of the last row of a page, both in
//! string form. Decoding is lenient: anything that does not fit the active sort
//! field yields `None` and the listing restarts from the first page.

use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::Value;

use crate::models::ProductSummary;
use crate::options::SortField;

/// Sort-column half of a cursor, typed by the field it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorValue {
    Price(f64),
    CreatedAt(DateTime<Utc>),
}

impl CursorValue {
    fn parse(raw: &str, field: SortField) -> Option<Self> {
        let raw = raw.trim();
        match field {
            SortField::Price => raw
                .parse::<f64>()
                .ok()
                .filter(|price| price.is_finite())
                .map(CursorValue::Price),
            SortField::CreatedAt => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| CursorValue::CreatedAt(ts.with_timezone(&Utc))),
        }
    }

    fn encode(&self) -> String {
        match self {
            CursorValue::Price(price) => price.to_string(),
            CursorValue::CreatedAt(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }

    /// Bound value compared against the sort column
    pub fn to_value(&self) -> Value {
        match *self {
            CursorValue::Price(price) => price.into(),
            CursorValue::CreatedAt(ts) => ts.into(),
        }
    }
}

/// Decoded keyset position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub sort_value: CursorValue,
    pub id: i64,
}

impl Cursor {
    /// Cursor pointing just past `record` when ordering by `field`
    pub fn after(record: &ProductSummary, field: SortField) -> Self {
        let sort_value = match field {
            SortField::Price => CursorValue::Price(record.price),
            SortField::CreatedAt => CursorValue::CreatedAt(record.created_at),
        };
        Self {
            sort_value,
            id: record.id,
        }
    }

    pub fn encode(&self) -> [String; 2] {
        [self.sort_value.encode(), self.id.to_string()]
    }

    /// Decode raw cursor components for the given sort field.
    ///
    /// Returns `None` (first page) on wrong arity or unparsable components.
    pub fn decode<S: AsRef<str>>(parts: &[S], field: SortField) -> Option<Self> {
        let [raw_value, raw_id] = parts else {
            tracing::warn!(
                parts = parts.len(),
                "ignoring cursor with wrong number of components"
            );
            return None;
        };

        let Some(sort_value) = CursorValue::parse(raw_value.as_ref(), field) else {
            tracing::warn!(%field, value = raw_value.as_ref(), "ignoring cursor with unparsable sort value");
            return None;
        };

        let Ok(id) = raw_id.as_ref().trim().parse::<i64>() else {
            tracing::warn!(id = raw_id.as_ref(), "ignoring cursor with unparsable id");
            return None;
        };

        Some(Self { sort_value, id })
    }
}
