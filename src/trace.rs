//! Trace files: one access per line, `<page> [R|W]`.
//!
//! Blank lines and lines starting with `#` are ignored. A missing access
//! letter means a read.

use crate::{
    scheduler::{Scheduler, Timestamp},
    shared::{
        definitions::*,
        error::{Result, SimError},
    },
    simulation::SharedSimulation,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

pub const DEFAULT_START: Timestamp = 1.0;
pub const DEFAULT_DELTA: Timestamp = 1.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TraceRecord {
    pub page: PageId,
    pub kind: AccessKind,
}

impl From<TraceRecord> for MemoryAccess {
    fn from(record: TraceRecord) -> Self {
        MemoryAccess {
            page: record.page,
            kind: record.kind,
        }
    }
}

/// Parses one line. `line_no` is only used in the error.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let invalid = |reason: String| SimError::InvalidTraceRecord {
        line: line_no,
        reason,
    };
    let mut tokens = line.split_whitespace();
    let page = match tokens.next().map(str::parse::<usize>) {
        Some(Ok(page)) => PageId(page),
        Some(Err(err)) => return Err(invalid(format!("bad page id: {err}"))),
        None => return Ok(None),
    };
    let kind = match tokens.next() {
        None => AccessKind::Read,
        Some(token) if token.eq_ignore_ascii_case("r") => AccessKind::Read,
        Some(token) if token.eq_ignore_ascii_case("w") => AccessKind::Write,
        Some(token) => return Err(invalid(format!("bad access type '{token}'"))),
    };
    if let Some(extra) = tokens.next() {
        return Err(invalid(format!("unexpected trailing '{extra}'")));
    }

    Ok(Some(TraceRecord { page, kind }))
}

/// Reads every well-formed record. Malformed or unreadable lines are skipped
/// with a warning.
pub fn read_trace(reader: impl BufRead) -> Vec<TraceRecord> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let parsed = line
            .map_err(SimError::from)
            .and_then(|line| parse_line(&line, line_no));
        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => log::warn!("trace: skipping line {}: {}", line_no, err),
        }
    }
    records
}

/// Schedules one access event per record at `start + i * delta`.
/// Returns how many events were scheduled.
///
/// Rejected accesses are already reported by the simulation, so the events
/// drop the error.
pub fn schedule_records(
    records: impl IntoIterator<Item = TraceRecord>,
    scheduler: &mut Scheduler,
    simulation: &SharedSimulation,
    start: Timestamp,
    delta: Timestamp,
) -> usize {
    let mut scheduled = 0;
    for record in records {
        let simulation = Arc::clone(simulation);
        let timestamp = start + scheduled as Timestamp * delta;
        scheduler.schedule(timestamp, move |_: &mut Scheduler| {
            let _ = simulation.lock().handle_access(record.into());
        });
        scheduled += 1;
    }
    log::debug!("trace: scheduled {} accesses from t={}", scheduled, start);
    scheduled
}

/// Opens `path` and schedules its records. Fails only if the file cannot be
/// opened.
pub fn load_trace(
    path: impl AsRef<Path>,
    scheduler: &mut Scheduler,
    simulation: &SharedSimulation,
    start: Timestamp,
    delta: Timestamp,
) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        log::warn!("trace: cannot open {}: {}", path.display(), err);
        err
    })?;
    let records = read_trace(BufReader::new(file));
    Ok(schedule_records(records, scheduler, simulation, start, delta))
}
