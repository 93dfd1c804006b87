//! Slot table bookkeeping: lookup, allocation, validity, and version bumps.

use super::ImageStore;
use crate::layout::EMPTY;

impl ImageStore {
    /// First NON_EMPTY slot whose id byte-equals `id`, compared over the full bound.
    pub(super) fn find_by_id(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.id_matches(id))
    }

    /// Lowest-index EMPTY slot.
    pub(super) fn find_free(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_empty())
    }

    pub(super) fn mark_empty(&mut self, index: usize) {
        self.slots[index].is_valid = EMPTY;
    }

    pub(super) fn bump_version(&mut self) {
        self.header.version = self.header.version.wrapping_add(1);
    }
}
