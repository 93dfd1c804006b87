//! Content-addressed deduplication: shares an existing blob offset between
//! slots whose ingested bytes hash to the same SHA-256, and rejects inserts
//! that would introduce a duplicate id.

use super::ImageStore;
use crate::error::{Result, StoreError};
use crate::layout::NB_RES;

/// Outcome of running the dedup pass over a not-yet-persisted candidate.
pub(super) enum DedupOutcome {
    /// No other slot shares this SHA; the caller must append a fresh original blob.
    Fresh,
    /// Another slot already holds this content; its offsets and sizes are reused.
    Shared {
        offset: [u64; NB_RES],
        size: [u32; NB_RES],
    },
}

impl ImageStore {
    /// Checks `id` and `sha` against every existing NON_EMPTY slot. Scans
    /// index-ascending; the first SHA match wins when sharing a blob.
    pub(super) fn dedup_check(&self, id: &str, sha: &[u8; 32]) -> Result<DedupOutcome> {
        for slot in self.slots.iter().filter(|s| !s.is_empty()) {
            if slot.img_id == id {
                return Err(StoreError::DuplicateId);
            }
        }

        for slot in self.slots.iter().filter(|s| !s.is_empty()) {
            if &slot.sha == sha {
                return Ok(DedupOutcome::Shared {
                    offset: slot.offset,
                    size: slot.size,
                });
            }
        }

        Ok(DedupOutcome::Fresh)
    }
}
