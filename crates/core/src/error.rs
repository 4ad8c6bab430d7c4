use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Missing field in event record: {0}")]
    MissingField(&'static str),

    #[error("Malformed timestamp in field {field}: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    #[error("Reference time has no timezone")]
    MissingTimezone,

    #[error("Found {count} {category} events on {date}")]
    DuplicateEvent {
        category: &'static str,
        date: NaiveDate,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
