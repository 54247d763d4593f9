use super::definitions::*;

/// Page-replacement strategy driven by the simulation's notifications.
///
/// A policy owns no frames. It mirrors the resident set through `on_load` and
/// the victims it hands out, so after every fault the pages it tracks are
/// exactly the pages occupying frames.
pub trait ReplacementPolicy: Send + 'static {
    /// Short human-readable name, used in reports.
    fn name(&self) -> &'static str;

    /// A resident page was accessed. The faulting access counts as well and is
    /// reported right after `on_load`.
    fn on_access(&mut self, page: VirtualPage);

    /// # Safety
    /// At least one page must be resident. Calling this on an empty resident
    /// set is a bookkeeping defect and panics.
    ///
    /// The returned frame's page is dropped from the policy's resident set.
    fn select_victim(&mut self) -> FrameIndex;

    /// `page` now occupies `frame`.
    fn on_load(&mut self, page: VirtualPage, frame: FrameIndex);

    /// A resident page was written.
    fn on_write(&mut self, _page: VirtualPage) {}

    /// Number of pages the policy currently considers resident.
    fn resident_count(&self) -> usize;
}

/// Receives one human-readable line per simulation step transition.
pub type LogSink = Box<dyn Fn(&str) + Send + 'static>;
