use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use std::collections::BTreeMap;

#[derive(Debug)]
/* private */
struct LruEntry {
    frame: FrameIndex,
    last_use: u64,
}

/// Least-recently-used over a logical tick that advances on every access and
/// load. Equal ticks cannot occur, so no secondary key is needed.
#[derive(Default, Debug)]
pub struct Lru {
    tick: u64,
    table: BTreeMap<VirtualPage, LruEntry>,
}

impl Lru {
    pub fn new() -> Self {
        Self::default()
    }

    /* private */
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

impl ReplacementPolicy for Lru {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn on_access(&mut self, page: VirtualPage) {
        let tick = self.next_tick();
        if let Some(entry) = self.table.get_mut(&page) {
            entry.last_use = tick;
        }
    }

    fn select_victim(&mut self) -> FrameIndex {
        let victim = self
            .table
            .iter()
            .min_by_key(|(page, entry)| (entry.last_use, **page))
            .map(|(page, entry)| (*page, entry.frame));
        let Some((page, frame)) = victim else {
            panic!("LRU: victim requested with no resident pages")
        };

        log::trace!("LRU: evicting page {} from frame {}", page, frame);
        self.table.remove(&page);
        frame
    }

    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex) {
        let last_use = self.next_tick();
        self.table.insert(page, LruEntry { frame, last_use });
    }

    fn resident_count(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(page: usize) -> VirtualPage {
        VirtualPage::new(ProcessId(1), PageId(page))
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut lru = Lru::new();
        lru.on_load(vp(0), FrameIndex(0));
        lru.on_load(vp(1), FrameIndex(1));
        lru.on_load(vp(2), FrameIndex(2));
        lru.on_access(vp(0));

        assert_eq!(lru.select_victim(), FrameIndex(1));
        assert_eq!(lru.select_victim(), FrameIndex(2));
        assert_eq!(lru.select_victim(), FrameIndex(0));
    }

    #[test]
    fn access_to_unknown_page_is_ignored() {
        let mut lru = Lru::new();
        lru.on_access(vp(9));
        assert_eq!(lru.resident_count(), 0);

        lru.on_load(vp(1), FrameIndex(0));
        assert_eq!(lru.resident_count(), 1);
    }

    #[test]
    fn reload_replaces_bookkeeping() {
        let mut lru = Lru::new();
        lru.on_load(vp(0), FrameIndex(0));
        lru.on_load(vp(1), FrameIndex(1));
        lru.on_load(vp(0), FrameIndex(2));

        assert_eq!(lru.resident_count(), 2);
        assert_eq!(lru.select_victim(), FrameIndex(1));
        assert_eq!(lru.select_victim(), FrameIndex(2));
    }

    #[test]
    #[should_panic(expected = "no resident pages")]
    fn empty_victim_selection_panics() {
        Lru::new().select_victim();
    }
}
