use crate::shared::definitions::*;
use std::collections::VecDeque;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TlbEntry {
    pub page: PageId,
    pub frame: FrameIndex,
}

/// Bounded translation cache with its own first-in-first-out eviction.
///
/// Entries are hints. The page table stays authoritative, so whoever reassigns
/// a frame must purge it here first with `remove_by_frame`.
#[derive(Clone, Debug)]
pub struct Tlb {
    entries: VecDeque<TlbEntry>,
    capacity: usize,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TlbEntry> + '_ {
        self.entries.iter()
    }

    pub fn lookup(&self, page: PageId) -> Option<FrameIndex> {
        self.entries
            .iter()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }

    /// Inserts `page -> frame` at the freshest position, evicting the oldest
    /// entry when full. A zero-capacity cache stays empty.
    pub fn insert_or_refresh(&mut self, page: PageId, frame: FrameIndex) -> Option<TlbEntry> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(position) = self.entries.iter().position(|entry| entry.page == page) {
            self.entries.remove(position);
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(TlbEntry { page, frame });
        evicted
    }

    /// Evicts any entry that translates to `frame`.
    pub fn remove_by_frame(&mut self, frame: FrameIndex) -> Option<TlbEntry> {
        let position = self.entries.iter().position(|entry| entry.frame == frame)?;
        self.entries.remove(position)
    }

    pub fn page_for_frame(&self, frame: FrameIndex) -> Option<PageId> {
        self.entries
            .iter()
            .find(|entry| entry.frame == frame)
            .map(|entry| entry.page)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
