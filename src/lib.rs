//! Virtual-memory simulator: TLB, per-process page tables, a fixed pool of
//! physical frames and pluggable page-replacement policies, driven by a
//! discrete-event scheduler.

pub mod memory;
pub mod policy;
pub mod scheduler;
pub mod shared;
pub mod simulation;
pub mod trace;

pub use memory::{Process, ProcessHandle};
pub use scheduler::{Event, Scheduler};
pub use shared::{
    config::{AccessTimings, PolicyKind, SimulationConfig},
    contracts::ReplacementPolicy,
    definitions::*,
    error::{Result, SimError},
};
pub use simulation::{AccessOutcome, AccessPath, SharedSimulation, Simulation, Stats};
