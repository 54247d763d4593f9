//! Memory-access orchestrator.
//!
//! `Simulation` owns physical memory, the MMU and the replacement policy, and
//! is the only thing that mutates them. Every accepted access ends in exactly
//! one of three outcomes (TLB hit, page hit after a TLB miss, page fault), and
//! the fault path keeps frames, page tables and the TLB consistent: an old
//! mapping is always torn down before its frame is handed to a new page.

mod stats;

pub use stats::Stats;

use crate::{
    memory::{Frame, FrameTable, Mmu, Process, ProcessHandle},
    shared::{
        config::{AccessTimings, SimulationConfig},
        contracts::{LogSink, ReplacementPolicy},
        definitions::*,
        error::{Result, SimError},
    },
};
use parking_lot::{Mutex, RwLock};
use stats::Counters;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Weak},
};

/// Simulation shared with the events that drive it.
pub type SharedSimulation = Arc<Mutex<Simulation>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AccessPath {
    TlbHit,
    PageHit,
    PageFault,
}

/// What one accepted access did.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AccessOutcome {
    pub path: AccessPath,
    pub frame: FrameIndex,
    /// Page pushed out of `frame` to make room, if any.
    pub evicted: Option<VirtualPage>,
    /// Simulated time charged for the access, in microseconds.
    pub cost: f64,
}

pub struct Simulation {
    frames: FrameTable,
    policy: Box<dyn ReplacementPolicy>,
    mmu: Mmu,
    timings: AccessTimings,
    processes: HashMap<ProcessId, Weak<RwLock<Process>>>,
    counters: Counters,
    step: u64,
    logger: Option<LogSink>,
}

impl Simulation {
    pub fn new(frames_count: usize, policy: Box<dyn ReplacementPolicy>, tlb_capacity: usize) -> Self {
        Self::with_timings(frames_count, policy, tlb_capacity, AccessTimings::default())
    }

    pub fn with_timings(
        frames_count: usize,
        policy: Box<dyn ReplacementPolicy>,
        tlb_capacity: usize,
        timings: AccessTimings,
    ) -> Self {
        assert!(frames_count > 0);
        log::debug!(
            "simulation: {} frames, TLB capacity {}, policy {}",
            frames_count,
            tlb_capacity,
            policy.name()
        );
        Self {
            frames: FrameTable::new(frames_count),
            policy,
            mmu: Mmu::new(tlb_capacity),
            timings,
            processes: HashMap::new(),
            counters: Counters::default(),
            step: 0,
            logger: None,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.policy.build(config.seed, config.nru_reset);
        Ok(Self::with_timings(
            config.frames,
            policy,
            config.tlb_capacity,
            config.timings,
        ))
    }

    pub fn into_shared(self) -> SharedSimulation {
        Arc::new(Mutex::new(self))
    }

    /// Installs the line sink. Replaces any previous one.
    pub fn set_logger(&mut self, sink: impl Fn(&str) + Send + 'static) {
        self.logger = Some(Box::new(sink));
    }

    pub fn clear_logger(&mut self) {
        self.logger = None;
    }

    /// Binds `process` as the active address space and flushes the TLB.
    ///
    /// Fails without changing the binding if `id` belongs to another live
    /// process, or to a dropped one whose pages are still resident.
    pub fn set_current_process(&mut self, process: &ProcessHandle) -> Result<()> {
        let id = process.read().id;
        self.processes.retain(|_, registered| registered.strong_count() > 0);

        let taken = match self.processes.get(&id).and_then(Weak::upgrade) {
            Some(registered) => !Arc::ptr_eq(&registered, process),
            None => self
                .frames
                .frames()
                .iter()
                .any(|frame| frame.resident.is_some_and(|page| page.process == id)),
        };
        if taken {
            log::warn!("refusing to bind process {}: id already in use", id);
            self.emit(format_args!("Cannot switch to process {id}: id already in use"));
            return Err(SimError::ProcessIdInUse(id));
        }

        self.processes.insert(id, Arc::downgrade(process));
        self.mmu.set_current_process(Some(process));
        log::debug!("simulation: switched to process {}", id);
        self.emit(format_args!("Switched to process {id}; TLB flushed"));
        Ok(())
    }

    pub fn clear_current_process(&mut self) {
        self.mmu.set_current_process(None);
        self.emit(format_args!("No process bound; TLB flushed"));
    }

    /// Translates one access of the current process, faulting the page in if
    /// needed.
    ///
    /// Accesses with no bound process or a page outside the address space are
    /// reported and rejected without touching any state.
    pub fn handle_access(&mut self, access: MemoryAccess) -> Result<AccessOutcome> {
        let Some(handle) = self.mmu.current_process() else {
            return Err(self.reject(access, SimError::NoCurrentProcess));
        };
        let mut process = handle.write();
        if !process.page_table.contains(access.page) {
            let pages = process.page_table.len();
            drop(process);
            return Err(self.reject(
                access,
                SimError::PageOutOfBounds {
                    page: access.page,
                    pages,
                },
            ));
        }

        self.step += 1;
        self.counters.accesses += 1;
        let page = VirtualPage::new(process.id, access.page);
        self.emit(format_args!(
            "Step {}: process {} {} page {}",
            self.step,
            process.id,
            if access.is_write() { "writes" } else { "reads" },
            access.page
        ));

        let outcome = if let Some(frame) = self.mmu.tlb.lookup(access.page) {
            self.counters.tlb_hits += 1;
            debug_assert_eq!(self.frames.resident(frame), Some(page));
            log::debug!("{}: TLB hit in frame {}", page, frame);
            self.emit(format_args!("  -> TLB hit: page {} in frame {frame}", access.page));

            self.record_access(page, frame, access.is_write());
            AccessOutcome {
                path: AccessPath::TlbHit,
                frame,
                evicted: None,
                cost: self.timings.tlb_probe,
            }
        } else {
            self.counters.tlb_misses += 1;
            let entry = process.page_table.get_entry(access.page).copied();
            match entry.and_then(|entry| entry.frame()) {
                Some(frame) => {
                    log::debug!("{}: TLB miss, page hit in frame {}", page, frame);
                    self.emit(format_args!(
                        "  -> TLB miss, page hit: page {} in frame {frame}",
                        access.page
                    ));

                    self.record_access(page, frame, access.is_write());
                    self.mmu.tlb.insert_or_refresh(access.page, frame);
                    AccessOutcome {
                        path: AccessPath::PageHit,
                        frame,
                        evicted: None,
                        cost: self.timings.tlb_probe + self.timings.memory_access,
                    }
                }
                None => {
                    self.counters.page_faults += 1;
                    log::debug!("{}: page fault", page);
                    self.emit(format_args!(
                        "  -> TLB miss, page fault: page {} not in memory",
                        access.page
                    ));

                    let (frame, evicted) = self.handle_fault(&mut process, page, access.is_write());
                    AccessOutcome {
                        path: AccessPath::PageFault,
                        frame,
                        evicted,
                        cost: self.timings.tlb_probe + self.timings.fault_service,
                    }
                }
            }
        };

        self.counters.total_access_time += outcome.cost;
        Ok(outcome)
    }

    /// Loads `page` into a free frame, or into a victim chosen by the policy.
    /// Returns the frame used and the page evicted from it, if any.
    fn handle_fault(
        &mut self,
        process: &mut Process,
        page: VirtualPage,
        is_write: bool,
    ) -> (FrameIndex, Option<VirtualPage>) {
        let (frame, evicted) = match self.frames.find_first_free_index() {
            Some(frame) => {
                self.emit(format_args!("  -> Using free frame {frame}"));
                (frame, None)
            }
            None => {
                let frame = self.policy.select_victim();
                self.emit(format_args!(
                    "  -> {} chose frame {frame} as victim",
                    self.policy.name()
                ));
                let evicted = self.evict(process, frame);
                (frame, Some(evicted))
            }
        };

        self.frames.load_page(frame, page, self.step);
        process.page_table.map(page.page, frame);
        self.mmu.tlb.insert_or_refresh(page.page, frame);
        self.policy.on_load(page, frame);
        // Write hook after the load so the policy already tracks the page.
        if is_write {
            self.frames.mark_dirty(frame);
            self.policy.on_write(page);
        }
        self.policy.on_access(page);

        self.emit(format_args!("  -> Loaded page {} into frame {frame}", page.page));
        (frame, evicted)
    }

    /// Tears down every mapping of the page in `frame` and frees the frame.
    fn evict(&mut self, process: &mut Process, frame: FrameIndex) -> VirtualPage {
        assert!(
            frame.0 < self.frames.len(),
            "{} returned frame {} but memory has {} frames",
            self.policy.name(),
            frame,
            self.frames.len()
        );
        let Some(victim) = self.frames.resident(frame) else {
            panic!(
                "{} returned frame {} which holds no page",
                self.policy.name(),
                frame
            )
        };

        if victim.process == process.id {
            debug_assert!(self
                .mmu
                .tlb
                .page_for_frame(frame)
                .map_or(true, |cached| cached == victim.page));
            process.page_table.invalidate(victim.page);
        } else if let Some(owner) = self.processes.get(&victim.process).and_then(Weak::upgrade) {
            owner.write().page_table.invalidate(victim.page);
        }
        self.mmu.tlb.remove_by_frame(frame);

        let dirty = self.frames.get(frame).is_some_and(Frame::is_dirty);
        self.counters.evictions += 1;
        if dirty {
            self.counters.dirty_evictions += 1;
        }
        self.frames.clear_frame(frame);

        log::debug!(
            "evicted page {} from frame {}{}",
            victim,
            frame,
            if dirty { " (dirty, written back)" } else { "" }
        );
        self.emit(format_args!(
            "  -> Evicted page {} of process {} from frame {frame}{}",
            victim.page,
            victim.process,
            if dirty { " (dirty)" } else { "" }
        ));
        victim
    }

    /* private */
    fn record_access(&mut self, page: VirtualPage, frame: FrameIndex, is_write: bool) {
        self.frames.touch(frame, self.step);
        if is_write {
            self.frames.mark_dirty(frame);
            self.policy.on_write(page);
        }
        self.policy.on_access(page);
    }

    /* private */
    fn reject(&self, access: MemoryAccess, error: SimError) -> SimError {
        log::warn!("rejected {} access to page {}: {}", access.kind.as_char(), access.page, error);
        self.emit(format_args!("Rejected access to page {}: {error}", access.page));
        error
    }

    /* private */
    fn emit(&self, line: fmt::Arguments<'_>) {
        if let Some(sink) = &self.logger {
            sink(&line.to_string());
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::from(&self.counters)
    }

    /// Sends the statistics report to the sink and the `log` facade.
    pub fn print_statistics(&self) {
        let stats = self.stats();
        log::info!("{}", stats);
        for line in stats.to_string().lines() {
            self.emit(format_args!("{line}"));
        }
    }

    pub fn frames(&self) -> &[Frame] {
        self.frames.frames()
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn policy(&self) -> &dyn ReplacementPolicy {
        self.policy.as_ref()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Number of accepted accesses so far.
    pub fn step(&self) -> u64 {
        self.step
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("frames", &self.frames)
            .field("policy", &self.policy.name())
            .field("mmu", &self.mmu)
            .field("counters", &self.counters)
            .field("step", &self.step)
            .finish()
    }
}
