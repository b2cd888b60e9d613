//! Types shared by every service.
//!
//! Response models use `#[serde(default)]` so fields absent from a payload
//! become `None` or empty, and unknown fields are ignored.

mod dynamic;
mod file;

use chrono::{DateTime, NaiveDateTime, Utc};

pub use dynamic::{DynamicModel, lenient, lenient_default, lenient_vec};
pub(crate) use dynamic::dynamic_model;
pub use file::FileWithMetadata;

/// Parse a service timestamp.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` form,
/// which is read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Add `created_at`/`updated_at` parsers for `created`/`updated` string fields.
macro_rules! timestamps {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Creation time, if the server sent a parseable one.
                #[must_use]
                pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.created.as_deref().and_then($crate::models::parse_timestamp)
                }

                /// Last modification time, if the server sent a parseable one.
                #[must_use]
                pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.updated.as_deref().and_then($crate::models::parse_timestamp)
                }
            }
        )+
    };
}

pub(crate) use timestamps;

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let ts = parse_timestamp("2019-01-01T12:00:00").unwrap();
        assert_eq!((ts.year(), ts.hour()), (2019, 12));

        let ts = parse_timestamp("2017-05-26T08:30:00.123Z").unwrap();
        assert_eq!(ts.minute(), 30);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
