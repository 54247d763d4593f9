//! Page-replacement policies.
//!
//! Every policy implements [`ReplacementPolicy`](crate::shared::contracts::ReplacementPolicy)
//! and keeps its own bookkeeping keyed by [`VirtualPage`](crate::shared::definitions::VirtualPage).
//! Minimum scans iterate pages in ascending order and keep the first minimum,
//! so ties resolve to the lowest page.

pub mod fifo;
pub mod lru;
pub mod nfu;
pub mod nfu_aging;
pub mod nru;
pub mod second_chance;

pub use fifo::Fifo;
pub use lru::Lru;
pub use nfu::Nfu;
pub use nfu_aging::NfuAging;
pub use nru::{Nru, NruResetCadence};
pub use second_chance::SecondChance;
