use chrono::{DateTime, Utc};

pub type DateTimeUtc = DateTime<Utc>;

/// Returns the current time as DateTime
pub fn now() -> DateTimeUtc {
    Utc::now()
}
