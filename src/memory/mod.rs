pub mod frame_table;
pub mod mmu;
pub mod page_table;
pub mod tlb;

pub use frame_table::{Frame, FrameFlags, FrameTable};
pub use mmu::{Mmu, Process, ProcessHandle};
pub use page_table::{PageTable, PageTableEntry};
pub use tlb::{Tlb, TlbEntry};
