use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
/* private */
struct ClockSlot {
    frame: FrameIndex,
    referenced: bool,
}

/// Second-chance (clock). The front of `ring` is the hand. A referenced page
/// under the hand loses its flag and moves to the back; the first
/// unreferenced page is the victim. Freshly loaded pages start referenced.
#[derive(Default, Debug)]
pub struct SecondChance {
    ring: VecDeque<VirtualPage>,
    slots: HashMap<VirtualPage, ClockSlot>,
}

impl SecondChance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for SecondChance {
    fn name(&self) -> &'static str {
        "Second Chance"
    }

    fn on_access(&mut self, page: VirtualPage) {
        if let Some(slot) = self.slots.get_mut(&page) {
            slot.referenced = true;
        }
    }

    fn select_victim(&mut self) -> FrameIndex {
        // Terminates within one full pass plus one step: each pass clears
        // every flag it skips.
        while let Some(page) = self.ring.pop_front() {
            let Some(slot) = self.slots.get_mut(&page) else {
                continue;
            };
            if slot.referenced {
                slot.referenced = false;
                self.ring.push_back(page);
            } else {
                let frame = slot.frame;
                self.slots.remove(&page);
                log::trace!("Second Chance: evicting page {} from frame {}", page, frame);
                return frame;
            }
        }
        panic!("Second Chance: victim requested with no resident pages")
    }

    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex) {
        let slot = ClockSlot {
            frame,
            referenced: true,
        };
        if self.slots.insert(page, slot).is_none() {
            self.ring.push_back(page);
        }
    }

    fn resident_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(page: usize) -> VirtualPage {
        VirtualPage::new(ProcessId(1), PageId(page))
    }

    fn loaded(pages: usize) -> SecondChance {
        let mut clock = SecondChance::new();
        for page in 0..pages {
            clock.on_load(vp(page), FrameIndex(page));
        }
        clock
    }

    #[test]
    fn all_referenced_degrades_to_fifo() {
        let mut clock = loaded(3);
        assert_eq!(clock.select_victim(), FrameIndex(0));
        assert_eq!(clock.resident_count(), 2);
    }

    #[test]
    fn referenced_page_gets_exactly_one_more_chance() {
        let mut clock = loaded(3);
        // Sweep once: clears all flags, evicts page 0.
        assert_eq!(clock.select_victim(), FrameIndex(0));

        // Ring is now [1, 2]; page 1 is referenced again.
        clock.on_access(vp(1));
        assert_eq!(clock.select_victim(), FrameIndex(2));

        // Page 1 used its chance and was not touched since.
        clock.on_load(vp(5), FrameIndex(0));
        assert_eq!(clock.select_victim(), FrameIndex(1));
    }

    #[test]
    fn unreferenced_page_under_hand_goes_first() {
        let mut clock = loaded(2);
        clock.select_victim();
        clock.on_load(vp(2), FrameIndex(0));
        // Ring [1 (clear), 2 (referenced)]
        assert_eq!(clock.select_victim(), FrameIndex(1));
    }

    #[test]
    #[should_panic(expected = "no resident pages")]
    fn empty_victim_selection_panics() {
        SecondChance::new().select_victim();
    }
}
