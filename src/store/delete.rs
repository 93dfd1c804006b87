//! Removes a slot's validity without touching its blob bytes.

use super::ImageStore;
use crate::error::{Result, StoreError};

impl ImageStore {
    /// Marks `id`'s slot EMPTY. Referenced blobs are left in place; they are
    /// reclaimed only by `gc`.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.find_by_id(id).ok_or(StoreError::FileNotFound)?;

        self.mark_empty(index);
        self.persist_slot(index)?;

        self.header.num_files -= 1;
        self.bump_version();
        self.persist_header()?;

        tracing::info!(
            store = %self.path.display(),
            id,
            num_files = self.header.num_files,
            "deleted image"
        );

        Ok(())
    }
}
