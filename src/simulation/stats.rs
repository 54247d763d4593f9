use std::fmt;

#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub(super) struct Counters {
    pub accesses: u64,
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub page_faults: u64,
    pub evictions: u64,
    pub dirty_evictions: u64,
    pub total_access_time: f64,
}

/// Read-only snapshot of the running totals.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct Stats {
    pub accesses: u64,
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub page_faults: u64,
    pub evictions: u64,
    pub dirty_evictions: u64,
    /// Microseconds per access.
    pub avg_access_time: f64,
    /// In `[0, 1]`.
    pub tlb_hit_rate: f64,
    /// In `[0, 1]`.
    pub page_fault_rate: f64,
}

/* private */
fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

impl From<&Counters> for Stats {
    fn from(counters: &Counters) -> Self {
        Self {
            accesses: counters.accesses,
            tlb_hits: counters.tlb_hits,
            tlb_misses: counters.tlb_misses,
            page_faults: counters.page_faults,
            evictions: counters.evictions,
            dirty_evictions: counters.dirty_evictions,
            avg_access_time: ratio(counters.total_access_time, counters.accesses),
            tlb_hit_rate: ratio(
                counters.tlb_hits as f64,
                counters.tlb_hits + counters.tlb_misses,
            ),
            page_fault_rate: ratio(counters.page_faults as f64, counters.accesses),
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation statistics ---")?;
        writeln!(f, "Total accesses:      {}", self.accesses)?;
        writeln!(f, "TLB hits:            {}", self.tlb_hits)?;
        writeln!(f, "TLB misses:          {}", self.tlb_misses)?;
        writeln!(f, "Page faults:         {}", self.page_faults)?;
        writeln!(
            f,
            "Evictions:           {} ({} dirty)",
            self.evictions, self.dirty_evictions
        )?;
        writeln!(f, "TLB hit rate:        {:.2}%", self.tlb_hit_rate * 100.0)?;
        writeln!(f, "Page fault rate:     {:.2}%", self.page_fault_rate * 100.0)?;
        write!(f, "Average access time: {:.2} us", self.avg_access_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counters_report_zero_rates() {
        let stats = Stats::from(&Counters::default());
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.avg_access_time, 0.0);
        assert_eq!(stats.tlb_hit_rate, 0.0);
        assert_eq!(stats.page_fault_rate, 0.0);
    }

    #[test]
    fn derives_rates() {
        let counters = Counters {
            accesses: 4,
            tlb_hits: 1,
            tlb_misses: 3,
            page_faults: 2,
            total_access_time: 20_104.0,
            ..Default::default()
        };
        let stats = Stats::from(&counters);
        assert_eq!(stats.tlb_hit_rate, 0.25);
        assert_eq!(stats.page_fault_rate, 0.5);
        assert_eq!(stats.avg_access_time, 5_026.0);
    }

    #[test]
    fn report_mentions_every_counter() {
        let report = Stats::default().to_string();
        for label in ["Total accesses", "TLB hits", "Page faults", "Average access time"] {
            assert!(report.contains(label), "missing {label}");
        }
    }
}
