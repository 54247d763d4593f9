use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use std::collections::BTreeMap;

#[derive(Debug)]
/* private */
struct AgingEntry {
    frame: FrameIndex,
    age: u8,
    referenced: bool,
}

impl AgingEntry {
    const MSB: u8 = 0b1000_0000;

    fn age(&mut self) {
        self.age = (self.age >> 1) | if self.referenced { Self::MSB } else { 0 };
        self.referenced = false;
    }
}

/// NFU with aging. Accesses only set a referenced flag; every victim selection
/// first shifts each 8-bit age register right and injects that flag into the
/// top bit, then evicts the smallest age. Ties go to the lowest page.
#[derive(Default, Debug)]
pub struct NfuAging {
    table: BTreeMap<VirtualPage, AgingEntry>,
}

impl NfuAging {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for NfuAging {
    fn name(&self) -> &'static str {
        "NFU (aging)"
    }

    fn on_access(&mut self, page: VirtualPage) {
        if let Some(entry) = self.table.get_mut(&page) {
            entry.referenced = true;
        }
    }

    fn select_victim(&mut self) -> FrameIndex {
        self.table.values_mut().for_each(AgingEntry::age);

        let victim = self
            .table
            .iter()
            .min_by_key(|(page, entry)| (entry.age, **page))
            .map(|(page, entry)| (*page, entry.frame));
        let Some((page, frame)) = victim else {
            panic!("NFU (aging): victim requested with no resident pages")
        };

        log::trace!("NFU (aging): evicting page {} from frame {}", page, frame);
        self.table.remove(&page);
        frame
    }

    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex) {
        // Starts cold; the faulting access counts as the first reference.
        self.table.insert(
            page,
            AgingEntry {
                frame,
                age: 0,
                referenced: true,
            },
        );
    }

    fn resident_count(&self) -> usize {
        self.table.len()
    }
}
