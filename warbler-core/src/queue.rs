use std::collections::VecDeque;

use crate::bs::TrackId;

/// Tracks to play before resuming the active list. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    items: VecDeque<TrackId>,
}
impl PlayQueue {
    /// Appends `id`, or puts it at the head when `play_next` is set.
    pub fn enqueue(&mut self, id: TrackId, play_next: bool) {
        if play_next {
            self.items.push_front(id);
        } else {
            self.items.push_back(id);
        }
    }

    pub fn dequeue_head(&mut self) -> Option<TrackId> {
        self.items.pop_front()
    }

    pub fn remove_at(&mut self, index: usize) -> Option<TrackId> {
        self.items.remove(index)
    }

    /// Removes the first occurrence of `id`.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let Some(index) = self.items.iter().position(|item| item == id) else {
            return false;
        };
        self.items.remove(index);
        true
    }

    /// Moves the item at `from` so that it ends up at `to` (clamped to the end).
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }
        let to = to.min(self.items.len() - 1);
        if from == to {
            return false;
        }
        let Some(item) = self.items.remove(from) else {
            return false;
        };
        self.items.insert(to, item);
        true
    }

    pub fn get(&self, index: usize) -> Option<&TrackId> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
