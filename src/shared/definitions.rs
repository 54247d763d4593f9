use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PageId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FrameIndex(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ProcessId(pub u32);

/// A virtual page qualified by the address space it belongs to.
///
/// Replacement policies key their bookkeeping by this type. Ordering is by
/// process, then page, and is the tie-break for every minimum scan.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VirtualPage {
    pub process: ProcessId,
    pub page: PageId,
}

impl VirtualPage {
    pub const fn new(process: ProcessId, page: PageId) -> Self {
        Self { process, page }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write)
    }

    pub const fn as_char(&self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

/// One request to touch a virtual page of the current process.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MemoryAccess {
    pub page: PageId,
    pub kind: AccessKind,
}

impl MemoryAccess {
    pub const fn read(page: PageId) -> Self {
        Self {
            page,
            kind: AccessKind::Read,
        }
    }

    pub const fn write(page: PageId) -> Self {
        Self {
            page,
            kind: AccessKind::Write,
        }
    }

    pub const fn is_write(&self) -> bool {
        self.kind.is_write()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VirtualPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.process, self.page)
    }
}
