use crate::types::Log;
use std::num::NonZeroUsize;

impl Log {
    pub fn needs_split(&self, max_entries: NonZeroUsize) -> bool {
        self.entries.len() > max_entries.get()
    }

    /// Partitions the entries into consecutive batches of `max_entries`, the
    /// last one holding the remainder. Every batch keeps the header and
    /// creation time. A log within the limit comes back as the only batch.
    pub fn split(self, max_entries: NonZeroUsize) -> Vec<Log> {
        if !self.needs_split(max_entries) {
            return vec![self];
        }

        let Log {
            header,
            entries,
            file_created_at,
        } = self;

        entries
            .chunks(max_entries.get())
            .map(|batch| Log {
                header: header.clone(),
                entries: batch.to_vec(),
                file_created_at,
            })
            .collect()
    }
}
