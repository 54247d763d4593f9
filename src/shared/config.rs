use super::{
    contracts::ReplacementPolicy,
    error::{Result, SimError},
};
use crate::policy::{
    fifo::Fifo, lru::Lru, nfu::Nfu, nfu_aging::NfuAging, nru::Nru, nru::NruResetCadence,
    second_chance::SecondChance,
};
use std::{fmt, str::FromStr};

/// Fixed cost of each step of an access, in microseconds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AccessTimings {
    pub tlb_probe: f64,
    pub memory_access: f64,
    pub fault_service: f64,
}

impl AccessTimings {
    pub const DEFAULT_TLB_PROBE: f64 = 1.0;
    pub const DEFAULT_MEMORY_ACCESS: f64 = 100.0;
    pub const DEFAULT_FAULT_SERVICE: f64 = 10_000.0;
}

impl Default for AccessTimings {
    fn default() -> Self {
        Self {
            tlb_probe: Self::DEFAULT_TLB_PROBE,
            memory_access: Self::DEFAULT_MEMORY_ACCESS,
            fault_service: Self::DEFAULT_FAULT_SERVICE,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PolicyKind {
    Fifo,
    Lru,
    Nru,
    Nfu,
    NfuAging,
    SecondChance,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 6] = [
        Self::Fifo,
        Self::Lru,
        Self::Nru,
        Self::Nfu,
        Self::NfuAging,
        Self::SecondChance,
    ];

    /// `seed` and `nru_reset` only matter for NRU.
    ///
    /// # Safety
    /// A periodic `nru_reset` must have a positive period when building NRU,
    /// otherwise this panics. Run `SimulationConfig::validate` first to get an
    /// error instead.
    pub fn build(self, seed: u64, nru_reset: NruResetCadence) -> Box<dyn ReplacementPolicy> {
        match self {
            Self::Fifo => Box::new(Fifo::new()),
            Self::Lru => Box::new(Lru::new()),
            Self::Nru => Box::new(Nru::with_cadence(seed, nru_reset)),
            Self::Nfu => Box::new(Nfu::new()),
            Self::NfuAging => Box::new(NfuAging::new()),
            Self::SecondChance => Box::new(SecondChance::new()),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Lru => "lru",
            Self::Nru => "nru",
            Self::Nfu => "nfu",
            Self::NfuAging => "nfu-aging",
            Self::SecondChance => "second-chance",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            "nru" => Ok(Self::Nru),
            "nfu" => Ok(Self::Nfu),
            "nfu-aging" | "aging" => Ok(Self::NfuAging),
            "second-chance" | "clock" => Ok(Self::SecondChance),
            _ => Err(SimError::UnknownPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction parameters of one simulation, fixed for its lifetime.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub frames: usize,
    pub tlb_capacity: usize,
    pub policy: PolicyKind,
    pub seed: u64,
    pub nru_reset: NruResetCadence,
    pub timings: AccessTimings,
}

impl SimulationConfig {
    pub const DEFAULT_FRAMES: usize = 4;
    pub const DEFAULT_TLB_CAPACITY: usize = 2;
    pub const DEFAULT_SEED: u64 = 0xC0FFEE;

    pub fn validate(&self) -> Result<()> {
        if self.frames == 0 {
            return Err(SimError::InvalidConfig(String::from(
                "physical memory needs at least one frame",
            )));
        }
        if self.nru_reset.period() == Some(0) {
            return Err(SimError::InvalidConfig(String::from(
                "NRU reset period must be positive",
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: Self::DEFAULT_FRAMES,
            tlb_capacity: Self::DEFAULT_TLB_CAPACITY,
            policy: PolicyKind::Fifo,
            seed: Self::DEFAULT_SEED,
            nru_reset: NruResetCadence::default(),
            timings: AccessTimings::default(),
        }
    }
}
