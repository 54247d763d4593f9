use crate::shared::definitions::*;

#[derive(Debug)]
#[repr(u8)]
/* private */
enum FrameFlagsMasks {
    IsDirty = 0b00000001,
    IsReferenced = 0b00000010,
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct FrameFlags(u8);

macro_rules! create_frame_flags_get_set {
    ($mask: expr, $get_name: ident, $set_name: ident) => {
        pub const fn $get_name(&self) -> bool {
            (self.0 & ($mask as u8)) != 0
        }

        pub fn $set_name(&mut self, value: bool) {
            self.0 = if value {
                self.0 | ($mask as u8)
            } else {
                self.0 & !($mask as u8)
            };
        }
    };
}

impl FrameFlags {
    create_frame_flags_get_set!(FrameFlagsMasks::IsDirty, is_dirty, set_dirty);
    create_frame_flags_get_set!(FrameFlagsMasks::IsReferenced, is_referenced, set_referenced);
}

/// One physical frame. `resident == None` means the frame is free.
#[derive(Default, Clone, Debug)]
pub struct Frame {
    pub resident: Option<VirtualPage>,
    pub flags: FrameFlags,
    pub load_time: u64,
    pub last_access_time: u64,
    pub access_count: u64,
}

impl Frame {
    pub fn is_free(&self) -> bool {
        self.resident.is_none()
    }

    pub fn page(&self) -> Option<PageId> {
        self.resident.map(|resident| resident.page)
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.is_dirty()
    }

    pub fn is_referenced(&self) -> bool {
        self.flags.is_referenced()
    }

    /* private */
    fn touch(&mut self, now: u64) {
        self.flags.set_referenced(true);
        self.last_access_time = now;
        self.access_count += 1;
    }
}

/// Physical memory: a fixed array of frames. A frame's index is its identity.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
}

impl FrameTable {
    pub fn new(frames_count: usize) -> Self {
        assert!(frames_count > 0);
        Self {
            frames: vec![Frame::default(); frames_count],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn get(&self, index: FrameIndex) -> Option<&Frame> {
        self.frames.get(index.0)
    }

    /// First free frame by index.
    pub fn find_first_free_index(&self) -> Option<FrameIndex> {
        self.frames
            .iter()
            .position(Frame::is_free)
            .map(FrameIndex)
    }

    pub fn resident_count(&self) -> usize {
        self.frames.iter().filter(|frame| !frame.is_free()).count()
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    pub fn resident(&self, index: FrameIndex) -> Option<VirtualPage> {
        self.frames[index.0].resident
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    ///
    /// Overwrites the frame with `page`: clean and referenced. The loading
    /// access is the frame's first.
    pub fn load_page(&mut self, index: FrameIndex, page: VirtualPage, now: u64) {
        let frame = &mut self.frames[index.0];
        frame.resident = Some(page);
        frame.flags = FrameFlags::default();
        frame.flags.set_referenced(true);
        frame.load_time = now;
        frame.last_access_time = now;
        frame.access_count = 1;
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    pub fn touch(&mut self, index: FrameIndex, now: u64) {
        self.frames[index.0].touch(now);
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    pub fn mark_dirty(&mut self, index: FrameIndex) {
        self.frames[index.0].flags.set_dirty(true);
    }

    /// # Safety
    /// `index` must be less than `self.len()`.
    pub fn clear_frame(&mut self, index: FrameIndex) {
        self.frames[index.0] = Frame::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(page: usize) -> VirtualPage {
        VirtualPage::new(ProcessId(1), PageId(page))
    }

    #[test]
    fn flags_set_and_clear_independently() {
        let mut flags = FrameFlags::default();
        flags.set_dirty(true);
        flags.set_referenced(true);
        assert!(flags.is_dirty() && flags.is_referenced());

        flags.set_dirty(false);
        assert!(!flags.is_dirty());
        assert!(flags.is_referenced());

        flags.set_referenced(false);
        assert_eq!(flags, FrameFlags::default());
    }

    #[test]
    fn first_free_is_lowest_index() {
        let mut table = FrameTable::new(3);
        assert_eq!(table.find_first_free_index(), Some(FrameIndex(0)));

        table.load_page(FrameIndex(0), vp(4), 1);
        table.load_page(FrameIndex(2), vp(5), 2);
        assert_eq!(table.find_first_free_index(), Some(FrameIndex(1)));

        table.load_page(FrameIndex(1), vp(6), 3);
        assert_eq!(table.find_first_free_index(), None);
        assert_eq!(table.resident_count(), 3);

        table.clear_frame(FrameIndex(2));
        assert_eq!(table.find_first_free_index(), Some(FrameIndex(2)));
    }

    #[test]
    fn load_resets_metadata() {
        let mut table = FrameTable::new(1);
        table.load_page(FrameIndex(0), vp(1), 1);
        table.mark_dirty(FrameIndex(0));
        table.touch(FrameIndex(0), 5);

        table.load_page(FrameIndex(0), vp(2), 9);
        let frame = table.get(FrameIndex(0)).unwrap();
        assert_eq!(frame.page(), Some(PageId(2)));
        assert!(!frame.is_dirty());
        assert!(frame.is_referenced());
        assert_eq!(frame.load_time, 9);
        assert_eq!(frame.access_count, 1);
    }

    #[test]
    fn touch_records_access() {
        let mut table = FrameTable::new(1);
        table.load_page(FrameIndex(0), vp(1), 1);
        table.touch(FrameIndex(0), 4);
        table.touch(FrameIndex(0), 7);

        let frame = table.get(FrameIndex(0)).unwrap();
        assert_eq!(frame.last_access_time, 7);
        assert_eq!(frame.access_count, 3);
    }

    #[test]
    fn access_count_outgrows_u32() {
        let mut table = FrameTable::new(1);
        table.load_page(FrameIndex(0), vp(1), 1);
        table.frames[0].access_count = u64::from(u32::MAX);
        table.touch(FrameIndex(0), 2);
        assert_eq!(table.frames[0].access_count, u64::from(u32::MAX) + 1);
    }
}
