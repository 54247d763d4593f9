use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;

/// When NRU forgets which pages were referenced.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum NruResetCadence {
    /// Clear every referenced bit right after a victim is chosen.
    #[default]
    OnEviction,
    /// Clear every referenced bit once per `n` accesses.
    EveryAccesses(u64),
    /// Clear once per `n` accesses and after every victim selection.
    Both(u64),
}

impl NruResetCadence {
    /// Access period of the periodic reset, if any.
    pub const fn period(&self) -> Option<u64> {
        match self {
            Self::OnEviction => None,
            Self::EveryAccesses(period) | Self::Both(period) => Some(*period),
        }
    }

    pub const fn resets_on_eviction(&self) -> bool {
        matches!(self, Self::OnEviction | Self::Both(_))
    }
}

#[derive(Debug)]
/* private */
struct NruEntry {
    frame: FrameIndex,
    referenced: bool,
    dirty: bool,
}

impl NruEntry {
    /// (R=0,D=0) < (R=0,D=1) < (R=1,D=0) < (R=1,D=1)
    const fn class(&self) -> u8 {
        ((self.referenced as u8) << 1) | (self.dirty as u8)
    }
}

/// Not-recently-used: evicts a random page from the lowest non-empty
/// (referenced, dirty) class.
#[derive(Debug)]
pub struct Nru {
    table: BTreeMap<VirtualPage, NruEntry>,
    rng: StdRng,
    cadence: NruResetCadence,
    access_count: u64,
}

impl Nru {
    pub fn new(seed: u64) -> Self {
        Self::with_cadence(seed, NruResetCadence::default())
    }

    /// # Safety
    /// A periodic cadence needs a positive period. A zero period panics;
    /// `SimulationConfig::validate` reports it as an error instead.
    pub fn with_cadence(seed: u64, cadence: NruResetCadence) -> Self {
        assert!(
            cadence.period() != Some(0),
            "NRU: reset period must be positive"
        );
        Self {
            table: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
            cadence,
            access_count: 0,
        }
    }

    pub fn cadence(&self) -> NruResetCadence {
        self.cadence
    }

    /* private */
    fn reset_referenced(&mut self) {
        for entry in self.table.values_mut() {
            entry.referenced = false;
        }
    }
}

impl ReplacementPolicy for Nru {
    fn name(&self) -> &'static str {
        "NRU"
    }

    fn on_access(&mut self, page: VirtualPage) {
        self.access_count += 1;
        if let Some(entry) = self.table.get_mut(&page) {
            entry.referenced = true;
        }

        if let Some(period) = self.cadence.period() {
            if self.access_count % period == 0 {
                log::trace!("NRU: periodic reset after {} accesses", self.access_count);
                self.reset_referenced();
            }
        }
    }

    fn select_victim(&mut self) -> FrameIndex {
        let Some(lowest) = self.table.values().map(NruEntry::class).min() else {
            panic!("NRU: victim requested with no resident pages")
        };

        let candidates: Vec<VirtualPage> = self
            .table
            .iter()
            .filter(|(_, entry)| entry.class() == lowest)
            .map(|(page, _)| *page)
            .collect();
        let page = candidates[self.rng.gen_range(0..candidates.len())];

        log::trace!(
            "NRU: evicting page {} from class {} ({} candidates)",
            page,
            lowest,
            candidates.len()
        );
        let frame = match self.table.remove(&page) {
            Some(entry) => entry.frame,
            None => unreachable!("candidate taken from the table"),
        };

        if self.cadence.resets_on_eviction() {
            self.reset_referenced();
        }
        frame
    }

    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex) {
        self.table.insert(
            page,
            NruEntry {
                frame,
                referenced: true,
                dirty: false,
            },
        );
    }

    fn on_write(&mut self, page: VirtualPage) {
        if let Some(entry) = self.table.get_mut(&page) {
            entry.dirty = true;
        }
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

    fn loaded(seed: u64, pages: usize) -> Nru {
        let mut nru = Nru::new(seed);
        for page in 0..pages {
            nru.on_load(vp(page), FrameIndex(page));
        }
        nru
    }

    #[test]
    fn prefers_clean_over_dirty_once_references_reset() {
        let mut nru = loaded(1, 3);
        // All referenced after loading; the first eviction clears that.
        nru.on_write(vp(0));
        nru.on_write(vp(1));
        nru.on_write(vp(2));
        nru.select_victim();

        nru.on_load(vp(3), FrameIndex(9));
        nru.on_access(vp(3));
        let remaining: Vec<_> = (0..3).filter(|p| nru.table.contains_key(&vp(*p))).collect();
        assert_eq!(remaining.len(), 2);

        // Remaining old pages are (R=0, D=1); the new page is (R=1, D=0).
        let victim = nru.select_victim();
        assert_ne!(victim, FrameIndex(9));
    }

    #[test]
    fn single_page_in_lowest_class_is_always_chosen() {
        for seed in 0..16 {
            let mut nru = loaded(seed, 2);
            nru.select_victim();
            // After the reset, the survivor is (0,0); a fresh load is (1,0).
            let survivor = *nru.table.keys().next().unwrap();
            nru.on_load(vp(7), FrameIndex(7));
            let expected = nru.table[&survivor].frame;
            assert_eq!(nru.select_victim(), expected);
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let mut first = loaded(42, 8);
        let mut second = loaded(42, 8);
        for _ in 0..8 {
            assert_eq!(first.select_victim(), second.select_victim());
        }
    }

    #[test]
    fn periodic_reset_clears_referenced_bits() {
        let mut nru = Nru::with_cadence(3, NruResetCadence::EveryAccesses(2));
        nru.on_load(vp(0), FrameIndex(0));
        nru.on_load(vp(1), FrameIndex(1));
        nru.on_access(vp(0));
        assert!(nru.table[&vp(1)].referenced);

        nru.on_access(vp(0));
        assert!(nru.table.values().all(|entry| !entry.referenced));

        // Without an eviction reset, page 1 stays unreferenced until touched.
        nru.on_access(vp(0));
        assert_eq!(nru.select_victim(), FrameIndex(1));
        assert!(nru.table[&vp(0)].referenced);
    }

    #[test]
    fn combined_cadence_resets_periodically_and_on_eviction() {
        let mut nru = Nru::with_cadence(5, NruResetCadence::Both(3));
        nru.on_load(vp(0), FrameIndex(0));
        nru.on_load(vp(1), FrameIndex(1));
        nru.on_load(vp(2), FrameIndex(2));
        nru.on_access(vp(0));
        nru.on_access(vp(1));
        nru.on_access(vp(2));
        assert!(nru.table.values().all(|entry| !entry.referenced));

        nru.on_access(vp(2));
        nru.select_victim();
        assert!(nru.table.values().all(|entry| !entry.referenced));
    }

    #[test]
    #[should_panic(expected = "reset period must be positive")]
    fn zero_period_panics() {
        Nru::with_cadence(0, NruResetCadence::Both(0));
    }

    #[test]
    #[should_panic(expected = "no resident pages")]
    fn empty_victim_selection_panics() {
        Nru::new(0).select_victim();
    }
}
