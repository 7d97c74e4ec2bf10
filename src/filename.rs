//! Naming convention shared by the source logs and the split outputs:
//! `appLog-YYYY-MM-DD-hh-mm-ss.log`, interpreted in local time.

use crate::config::{LOG_EXTENSION, NAME_FORMAT, NAME_TEMPLATE};
use crate::error::{Result, SplitError};
use crate::types::local_datetime;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;

/// Whether a directory entry should be handed to [`date_from_file_name`].
pub fn is_candidate(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == LOG_EXTENSION)
}

/// Assumes the device that wrote the log shares the timezone of the machine
/// running this tool.
pub fn date_from_file_name(name: &str) -> Result<DateTime<Local>> {
    if !matches_template(name) {
        return Err(SplitError::FileName(name.to_string()));
    }

    let naive = NaiveDateTime::parse_from_str(name, NAME_FORMAT)
        .map_err(|_| SplitError::FileName(name.to_string()))?;

    local_datetime(naive)
}

pub fn file_name_for(date: &DateTime<Local>) -> String {
    date.format(NAME_FORMAT).to_string()
}

// chrono accepts unpadded numbers, the naming convention does not.
fn matches_template(name: &str) -> bool {
    name.len() == NAME_TEMPLATE.len()
        && name
            .bytes()
            .zip(NAME_TEMPLATE.bytes())
            .all(|(c, t)| if t == b'#' { c.is_ascii_digit() } else { c == t })
}
