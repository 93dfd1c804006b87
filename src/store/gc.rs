//! Offline compaction: rebuild a store into a fresh file so no bytes remain
//! unreferenced, then swap it in under the original name.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::ImageStore;
use crate::error::Result;
use crate::imaging::ImageBackend;
use crate::layout::Resolution;

/// Summary of a completed compaction, used for the CLI/log report.
#[derive(Debug, Clone, Copy)]
pub struct GcReport {
    pub slots_compacted: u32,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

/// Rebuilds `store_path` into `tmp_path`, then removes `store_path` and
/// renames `tmp_path` over it. Not crash-safe across the remove/rename pair:
/// a crash in between loses the store, which this format accepts.
pub fn gc(store_path: &Path, tmp_path: &Path, backend: Arc<dyn ImageBackend>) -> Result<GcReport> {
    let bytes_before = fs::metadata(store_path)?.len();

    let mut src = ImageStore::open(store_path, Arc::clone(&backend))?;
    let mut dst = ImageStore::create(
        tmp_path,
        &src.header.name.clone(),
        src.header.max_files,
        src.header.res_resized,
        backend,
    )?;

    let mut slots_compacted = 0u32;
    for i in 0..src.slots.len() {
        if src.slots[i].is_empty() {
            continue;
        }
        let slot = src.slots[i].clone();

        let orig_idx = Resolution::Orig.index();
        let orig_bytes = src.read_at(slot.offset[orig_idx], slot.size[orig_idx])?;

        dst.insert(&orig_bytes, &slot.img_id)?;
        let new_index = dst
            .find_by_id(&slot.img_id)
            .expect("just-inserted id must be present");

        if slot.offset[Resolution::Small.index()] != 0 {
            dst.materialise(new_index, Resolution::Small)?;
        }
        if slot.offset[Resolution::Thumb.index()] != 0 {
            dst.materialise(new_index, Resolution::Thumb)?;
        }

        slots_compacted += 1;
    }

    drop(src);
    drop(dst);

    fs::remove_file(store_path)?;
    fs::rename(tmp_path, store_path)?;

    let bytes_after = fs::metadata(store_path)?.len();

    tracing::info!(
        store = %store_path.display(),
        slots_compacted,
        bytes_before,
        bytes_after,
        "compacted store"
    );

    Ok(GcReport {
        slots_compacted,
        bytes_before,
        bytes_after,
    })
}
