use std::collections::HashSet;

use crate::bs::TrackId;

/// The chronological list of played tracks.
///
/// Only the most recent [`HistoryLog::PERSISTED_LEN`] entries are saved or shown.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<TrackId>,
}
impl HistoryLog {
    pub const PERSISTED_LEN: usize = 50;

    pub fn new(entries: Vec<TrackId>) -> Self {
        Self { entries }
    }

    /// Appends `id` unless it is already the most recent entry.
    ///
    /// Once the log grows past twice the persisted length it is cut back
    /// to the persisted tail.
    pub fn record(&mut self, id: &TrackId) -> bool {
        if self.entries.last() == Some(id) {
            return false;
        }
        self.entries.push(id.clone());
        if self.entries.len() > 2 * Self::PERSISTED_LEN {
            let excess = self.entries.len() - Self::PERSISTED_LEN;
            self.entries.drain(..excess);
        }
        true
    }

    pub fn entries(&self) -> &[TrackId] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TrackId> {
        self.entries.last()
    }

    /// The tail of the log that gets written to disk.
    pub fn persisted(&self) -> &[TrackId] {
        let start = self.entries.len().saturating_sub(Self::PERSISTED_LEN);
        &self.entries[start..]
    }

    /// The persisted tail, most recent first, keeping only the first
    /// occurrence of each track.
    pub fn recent_unique(&self) -> Vec<&TrackId> {
        let mut seen = HashSet::new();
        self.persisted()
            .iter()
            .rev()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
