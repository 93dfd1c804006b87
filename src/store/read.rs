//! Materialises and returns the bytes of a stored resolution.

use super::ImageStore;
use crate::error::{Result, StoreError};
use crate::layout::Resolution;

impl ImageStore {
    /// Reads the bytes of `id` at `res`, resizing lazily if the derived
    /// resolution hasn't been produced yet.
    pub fn read(&mut self, id: &str, res: Resolution) -> Result<Vec<u8>> {
        let index = self.find_by_id(id).ok_or(StoreError::FileNotFound)?;

        self.materialise(index, res)?;

        let offset = self.slots[index].offset[res.index()];
        let size = self.slots[index].size[res.index()];
        self.read_at(offset, size)
    }
}
