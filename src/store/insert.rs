//! Ingests a new image: validates the id, deduplicates against existing
//! content, appends the original blob when needed, and persists the slot.

use super::dedup::DedupOutcome;
use super::ImageStore;
use crate::error::{Result, StoreError};
use crate::layout::{Resolution, Slot, MAX_IMG_ID, NON_EMPTY};
use crate::sha::sha256;

impl ImageStore {
    /// Inserts `bytes` (JPEG content) under `id`.
    pub fn insert(&mut self, bytes: &[u8], id: &str) -> Result<()> {
        if self.header.num_files >= self.header.max_files {
            return Err(StoreError::FullImgStore);
        }
        if id.is_empty() || id.len() > MAX_IMG_ID {
            return Err(StoreError::InvalidImgId(format!(
                "id must be 1..={MAX_IMG_ID} bytes, got {}",
                id.len()
            )));
        }
        let index = self.find_free().ok_or(StoreError::FullImgStore)?;

        let sha = sha256(bytes);
        let outcome = self.dedup_check(id, &sha)?;

        let mut candidate = Slot::empty();
        candidate.img_id = id.to_string();
        candidate.sha = sha;
        candidate.size[Resolution::Orig.index()] = bytes.len() as u32;

        let deduped = match outcome {
            DedupOutcome::Fresh => {
                let offset = self.append_blob(bytes)?;
                candidate.offset[Resolution::Orig.index()] = offset;
                false
            }
            DedupOutcome::Shared { offset, size } => {
                candidate.offset = offset;
                candidate.size = size;
                true
            }
        };

        candidate.res_orig = self.backend().dimensions(bytes)?;
        candidate.is_valid = NON_EMPTY;

        self.slots[index] = candidate;
        self.header.num_files += 1;
        self.bump_version();
        self.persist_header()?;
        self.persist_slot(index)?;

        tracing::info!(
            store = %self.path.display(),
            id,
            slot = index,
            bytes = bytes.len(),
            deduped,
            "inserted image"
        );

        Ok(())
    }
}
