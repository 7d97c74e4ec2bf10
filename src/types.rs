use crate::error::{Result, SplitError};
use chrono::{DateTime, Duration, Local, NaiveDateTime, Offset, TimeZone};

/// One request/response exchange of a diagnostic session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: DateTime<Local>,
    /// Raw send text including its `Send:\t` tag, possibly multi-line.
    pub send: String,
    /// Raw receive text including its `Receive: ` tag, possibly multi-line.
    pub receive: String,
}

/// A decoded `appLog-*.log` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    /// Lines preceding the first exchange, joined with `\n`.
    pub header: String,
    /// Exchanges in file order.
    pub entries: Vec<Entry>,
    pub file_created_at: DateTime<Local>,
}

impl Log {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Timestamp used when naming this log on disk.
    pub fn name_date(&self) -> DateTime<Local> {
        self.entries
            .first()
            .map(|entry| entry.time)
            .unwrap_or(self.file_created_at)
    }
}

/// Resolves a wall-clock time in the local timezone, preferring the earlier
/// instant when a DST fall-back makes it ambiguous.
pub fn local_datetime(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or(SplitError::NonexistentLocalTime(naive))
}

/// Resolves a wall-clock time that may fall inside a DST gap by reading it
/// with the offset in effect before the gap, which moves it forward by the
/// length of the gap (02:30 becomes 03:30 on a one-hour spring-forward).
pub fn resolve_forward<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
    if let Some(time) = tz.from_local_datetime(&naive).earliest() {
        return Ok(time);
    }

    let before = tz
        .from_local_datetime(&(naive - Duration::days(1)))
        .earliest()
        .ok_or(SplitError::NonexistentLocalTime(naive))?;
    let offset = before.offset().fix().local_minus_utc();

    Ok(tz.from_utc_datetime(&(naive - Duration::seconds(i64::from(offset)))))
}
