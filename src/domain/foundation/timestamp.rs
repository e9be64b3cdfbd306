//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format used in rendered documents (`dd/mm/yyyy HH:MM:SS`).
const DOCUMENT_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const DOCUMENT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Human-readable form printed on generated documents.
    pub fn to_document_display(&self) -> String {
        self.0.format(DOCUMENT_DISPLAY_FORMAT).to_string()
    }

    /// Date only, as printed next to the signature line.
    pub fn to_document_date(&self) -> String {
        self.0.format(DOCUMENT_DATE_FORMAT).to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
