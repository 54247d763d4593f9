use super::{page_table::PageTable, tlb::Tlb};
use crate::shared::definitions::*;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

#[derive(Debug)]
pub struct Process {
    pub id: ProcessId,
    pub page_table: PageTable,
}

impl Process {
    pub fn new(id: ProcessId, virtual_pages: usize) -> Self {
        Self {
            id,
            page_table: PageTable::new(virtual_pages),
        }
    }

    /// Wraps the process in the shared handle the simulation binds to.
    pub fn into_handle(self) -> ProcessHandle {
        Arc::new(RwLock::new(self))
    }
}

pub type ProcessHandle = Arc<RwLock<Process>>;

/// Address-translation unit: the TLB plus a non-owning link to the process
/// whose address space is currently active.
#[derive(Debug)]
pub struct Mmu {
    pub(crate) tlb: Tlb,
    current_process: Option<Weak<RwLock<Process>>>,
}

impl Mmu {
    pub fn new(tlb_capacity: usize) -> Self {
        Self {
            tlb: Tlb::new(tlb_capacity),
            current_process: None,
        }
    }

    pub fn tlb(&self) -> &Tlb {
        &self.tlb
    }

    /// Binds `process` (or unbinds with `None`). Always flushes the TLB.
    pub fn set_current_process(&mut self, process: Option<&ProcessHandle>) {
        self.current_process = process.map(Arc::downgrade);
        self.tlb.clear();
    }

    /// `None` when nothing is bound or the bound process was dropped.
    pub fn current_process(&self) -> Option<ProcessHandle> {
        self.current_process.as_ref().and_then(Weak::upgrade)
    }
}
