use crate::shared::{contracts::ReplacementPolicy, definitions::*};
use std::collections::VecDeque;

/// Evicts frames strictly in the order they were filled. Accesses are ignored.
#[derive(Default, Debug)]
pub struct Fifo {
    queue: VecDeque<FrameIndex>,
}

impl Fifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn on_access(&mut self, _page: VirtualPage) {}

    fn select_victim(&mut self) -> FrameIndex {
        match self.queue.pop_front() {
            Some(frame) => frame,
            None => panic!("FIFO: victim requested with no resident pages"),
        }
    }

    fn on_load(&mut self, _page: VirtualPage, frame: FrameIndex) {
        self.queue.push_back(frame);
    }

    fn resident_count(&self) -> usize {
        self.queue.len()
    }
}
