//! Line-oriented decoder for OpenDiag session logs.
//!
//! A log is a free-text header followed by exchanges of the form
//!
//! ```text
//! Time:	16:25:16,934
//! Send:	AT@1
//! Receive: OBDII TO RS232 INTERPRETER
//! 123
//! ```
//!
//! where untagged lines continue whichever section is open.

use crate::config::{RECEIVE_TAG, SEND_TAG, TIME_FORMAT, TIME_TAG};
use crate::error::{Result, SplitError};
use crate::types::{resolve_forward, Entry, Log};
use chrono::{DateTime, Local, NaiveTime, Timelike};
use log::{debug, warn};

/// Parser position, carrying the exchange built so far.
enum State {
    Header,
    Time(DateTime<Local>),
    Send { time: DateTime<Local>, send: String },
    Receive(Entry),
}

enum Line<'a> {
    /// Time tag with the text following it.
    Time(&'a str),
    Send,
    Receive,
    Continuation,
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Self {
        if let Some(value) = raw.strip_prefix(TIME_TAG) {
            Line::Time(value)
        } else if raw.starts_with(SEND_TAG) {
            Line::Send
        } else if raw.starts_with(RECEIVE_TAG) {
            Line::Receive
        } else {
            Line::Continuation
        }
    }
}

pub fn decode(file_created_at: DateTime<Local>, data: &str) -> Result<Log> {
    let mut header = Vec::new();
    let mut entries = Vec::new();
    let mut state = State::Header;

    for (idx, raw) in lines(data).enumerate() {
        let line_no = idx + 1;

        state = match (state, Line::classify(raw)) {
            (State::Header, Line::Time(value)) => {
                State::Time(entry_time(&file_created_at, value, line_no, raw)?)
            }
            (State::Receive(entry), Line::Time(value)) => {
                entries.push(entry);
                State::Time(entry_time(&file_created_at, value, line_no, raw)?)
            }
            (State::Time(time), Line::Send) => State::Send {
                time,
                send: raw.to_string(),
            },
            (State::Send { time, send }, Line::Receive) => State::Receive(Entry {
                time,
                send,
                receive: raw.to_string(),
            }),

            (State::Header, Line::Continuation) => {
                header.push(raw);
                State::Header
            }
            (State::Time(time), Line::Continuation) => {
                // Suspect, but tolerated for compatibility with existing logs.
                debug!("Discarding line {} between time and send: {:?}", line_no, raw);
                State::Time(time)
            }
            (State::Send { time, mut send }, Line::Continuation) => {
                send.push('\n');
                send.push_str(raw);
                State::Send { time, send }
            }
            (State::Receive(mut entry), Line::Continuation) => {
                entry.receive.push('\n');
                entry.receive.push_str(raw);
                State::Receive(entry)
            }

            (_, Line::Time(_)) => {
                return Err(SplitError::TimeOutOfOrder {
                    line_no,
                    line: raw.to_string(),
                })
            }
            (_, Line::Send) => {
                return Err(SplitError::SendOutOfOrder {
                    line_no,
                    line: raw.to_string(),
                })
            }
            (_, Line::Receive) => {
                return Err(SplitError::ReceiveOutOfOrder {
                    line_no,
                    line: raw.to_string(),
                })
            }
        };
    }

    match state {
        State::Receive(entry) => entries.push(entry),
        State::Time(time) | State::Send { time, .. } => {
            warn!("Dropping incomplete exchange started at {}", time);
        }
        State::Header => {}
    }

    Ok(Log {
        header: header.join("\n"),
        entries,
        file_created_at,
    })
}

// A single trailing newline terminates the last line rather than opening an
// empty continuation line.
fn lines(data: &str) -> impl Iterator<Item = &str> {
    data.strip_suffix('\n').unwrap_or(data).split('\n')
}

/// Places the time of day on the file's creation date. Exchanges past
/// midnight therefore keep the creation date; times inside a DST gap are
/// moved forward rather than rejected.
fn entry_time(
    file_created_at: &DateTime<Local>,
    value: &str,
    line_no: usize,
    raw: &str,
) -> Result<DateTime<Local>> {
    let time_of_day =
        NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|source| SplitError::InvalidTime {
            line_no,
            line: raw.to_string(),
            source: Some(source),
        })?;

    // chrono encodes a leap second as nanoseconds past 1e9.
    if time_of_day.nanosecond() >= 1_000_000_000 {
        return Err(SplitError::InvalidTime {
            line_no,
            line: raw.to_string(),
            source: None,
        });
    }

    resolve_forward(&Local, file_created_at.date_naive().and_time(time_of_day))
}
