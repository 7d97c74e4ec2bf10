use crate::config::{TIME_FORMAT, TIME_TAG};
use crate::filename::file_name_for;
use crate::types::Log;

/// A log rendered back into its on-disk form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLog {
    pub file_name: String,
    pub data: String,
}

impl Log {
    /// Named after the first exchange, or the creation time of an empty log.
    pub fn encode(&self) -> EncodedLog {
        let mut data = String::with_capacity(self.header.len() + 1);
        data.push_str(&self.header);
        data.push('\n');

        for entry in &self.entries {
            data.push_str(&format!(
                "{}{}\n{}\n{}\n",
                TIME_TAG,
                entry.time.format(TIME_FORMAT),
                entry.send,
                entry.receive
            ));
        }

        EncodedLog {
            file_name: file_name_for(&self.name_date()),
            data,
        }
    }
}
