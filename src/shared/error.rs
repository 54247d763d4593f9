use super::definitions::{PageId, ProcessId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// No process is bound, or the bound process has been dropped
    #[error("no current process is bound")]
    NoCurrentProcess,

    /// Page lies outside the current address space
    #[error("page {page} is outside the address space ({pages} pages)")]
    PageOutOfBounds { page: PageId, pages: usize },

    /// Another process with the same id is bound, or a dropped one still
    /// owns resident pages
    #[error("process id {0} is already in use")]
    ProcessIdInUse(ProcessId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid trace record on line {line}: {reason}")]
    InvalidTraceRecord { line: usize, reason: String },

    #[error("unknown replacement policy: {0}")]
    UnknownPolicy(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
