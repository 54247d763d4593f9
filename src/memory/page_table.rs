use crate::shared::definitions::*;

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PageTableEntry {
    #[default]
    NotPresent,
    Present {
        frame: FrameIndex,
    },
}

impl PageTableEntry {
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub const fn frame(&self) -> Option<FrameIndex> {
        match self {
            Self::Present { frame } => Some(*frame),
            Self::NotPresent => None,
        }
    }
}

/// Authoritative page -> frame mapping of one address space.
#[derive(Debug)]
pub struct PageTable {
    table: Vec<PageTableEntry>,
}

impl PageTable {
    pub fn new(entries_count: usize) -> Self {
        Self {
            table: vec![PageTableEntry::NotPresent; entries_count],
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, page_id: PageId) -> bool {
        page_id.0 < self.table.len()
    }

    pub fn get_entry(&self, page_id: PageId) -> Option<&PageTableEntry> {
        self.table.get(page_id.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (PageId, &PageTableEntry)> + '_ {
        self.table
            .iter()
            .enumerate()
            .map(|(index, entry)| (PageId(index), entry))
    }

    /// # Safety
    /// `page_id` must be inside the table.
    pub fn map(&mut self, page_id: PageId, frame: FrameIndex) {
        self.table[page_id.0] = PageTableEntry::Present { frame };
    }

    /// Marks `page_id` not present. Out-of-range pages are ignored.
    pub fn invalidate(&mut self, page_id: PageId) {
        if let Some(entry) = self.table.get_mut(page_id.0) {
            *entry = PageTableEntry::NotPresent;
        }
    }

    pub fn present_count(&self) -> usize {
        self.table.iter().filter(|entry| entry.is_present()).count()
    }
}
