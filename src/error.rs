use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("file name '{0}' does not match appLog-YYYY-MM-DD-hh-mm-ss.log")]
    FileName(String),

    #[error("invalid time of day at line {line_no}: '{line}'")]
    InvalidTime {
        line_no: usize,
        line: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("local time {0} does not exist in the current timezone")]
    NonexistentLocalTime(chrono::NaiveDateTime),

    #[error("can't parse, time not after header or receive at line {line_no}: '{line}'")]
    TimeOutOfOrder { line_no: usize, line: String },

    #[error("can't parse, send not after time at line {line_no}: '{line}'")]
    SendOutOfOrder { line_no: usize, line: String },

    #[error("can't parse, receive not after send at line {line_no}: '{line}'")]
    ReceiveOutOfOrder { line_no: usize, line: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("strange, but file '{}' exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SplitError>;
