use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use std::collections::BTreeMap;

#[derive(Debug)]
/* private */
struct NfuEntry {
    frame: FrameIndex,
    counter: u64,
}

/// Not-frequently-used without aging: evicts the page with the fewest
/// accesses since it was loaded. Ties go to the lowest page.
#[derive(Default, Debug)]
pub struct Nfu {
    table: BTreeMap<VirtualPage, NfuEntry>,
}

impl Nfu {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for Nfu {
    fn name(&self) -> &'static str {
        "NFU"
    }

    fn on_access(&mut self, page: VirtualPage) {
        if let Some(entry) = self.table.get_mut(&page) {
            entry.counter += 1;
        }
    }

    fn select_victim(&mut self) -> FrameIndex {
        let victim = self
            .table
            .iter()
            .min_by_key(|(page, entry)| (entry.counter, **page))
            .map(|(page, entry)| (*page, entry.frame));
        let Some((page, frame)) = victim else {
            panic!("NFU: victim requested with no resident pages")
        };

        log::trace!("NFU: evicting page {} from frame {}", page, frame);
        self.table.remove(&page);
        frame
    }

    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex) {
        self.table.insert(page, NfuEntry { frame, counter: 0 });
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
    fn evicts_least_frequently_used() {
        let mut nfu = Nfu::new();
        nfu.on_load(vp(0), FrameIndex(0));
        nfu.on_load(vp(1), FrameIndex(1));
        nfu.on_load(vp(2), FrameIndex(2));
        for _ in 0..3 {
            nfu.on_access(vp(0));
        }
        nfu.on_access(vp(1));
        nfu.on_access(vp(2));
        nfu.on_access(vp(2));

        assert_eq!(nfu.select_victim(), FrameIndex(1));
        assert_eq!(nfu.select_victim(), FrameIndex(2));
        assert_eq!(nfu.select_victim(), FrameIndex(0));
    }

    #[test]
    fn ties_go_to_lowest_page() {
        let mut nfu = Nfu::new();
        nfu.on_load(vp(5), FrameIndex(0));
        nfu.on_load(vp(3), FrameIndex(1));
        nfu.on_load(vp(4), FrameIndex(2));

        assert_eq!(nfu.select_victim(), FrameIndex(1));
        assert_eq!(nfu.select_victim(), FrameIndex(2));
    }

    #[test]
    fn counts_never_decay() {
        let mut nfu = Nfu::new();
        nfu.on_load(vp(0), FrameIndex(0));
        for _ in 0..10 {
            nfu.on_access(vp(0));
        }
        nfu.on_load(vp(1), FrameIndex(1));
        nfu.on_access(vp(1));

        // Page 0 was hot long ago and still wins.
        assert_eq!(nfu.select_victim(), FrameIndex(1));
    }

    #[test]
    #[should_panic(expected = "no resident pages")]
    fn empty_victim_selection_panics() {
        Nfu::new().select_victim();
    }
}
