use crate::artifacts::history::commit::FileStatus;
use bitflags::bitflags;

bitflags! {
    /// Which file statuses of a commit get analysed (`--diff-filter` letters)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct StatusFilter: u32 {
        const ADDED = 0b0001;
        const DELETED = 0b0010;
        const MODIFIED = 0b0100;
        const RENAMED = 0b1000;
    }
}

impl StatusFilter {
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::DELETED,
                'M' => filter |= Self::MODIFIED,
                'R' => filter |= Self::RENAMED,
                _ => return None,
            }
        }

        Some(filter)
    }

    pub fn admits(&self, status: FileStatus) -> bool {
        match status {
            FileStatus::Added => self.contains(Self::ADDED),
            FileStatus::Deleted => self.contains(Self::DELETED),
            FileStatus::Modified => self.contains(Self::MODIFIED),
            FileStatus::Renamed => self.contains(Self::RENAMED),
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::all()
    }
}
