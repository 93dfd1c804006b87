//! On-demand derivation of the thumbnail and small resolutions.

use super::ImageStore;
use crate::error::Result;
use crate::layout::Resolution;

impl ImageStore {
    /// Materialises `res` for the slot at `index` if it hasn't been already.
    /// No-op for [`Resolution::Orig`] and for any resolution already present.
    pub(super) fn materialise(&mut self, index: usize, res: Resolution) -> Result<()> {
        if res == Resolution::Orig {
            return Ok(());
        }
        if self.slots[index].offset[res.index()] != 0 {
            return Ok(());
        }

        let orig_idx = Resolution::Orig.index();
        let orig_offset = self.slots[index].offset[orig_idx];
        let orig_size = self.slots[index].size[orig_idx];
        let orig_bytes = self.read_at(orig_offset, orig_size)?;

        let target = match res {
            Resolution::Thumb => self.header.thumb_target(),
            Resolution::Small => self.header.small_target(),
            Resolution::Orig => unreachable!(),
        };

        let resized = self.backend().resize(&orig_bytes, target)?;
        let new_offset = self.append_blob(&resized)?;

        self.slots[index].offset[res.index()] = new_offset;
        self.slots[index].size[res.index()] = resized.len() as u32;

        self.bump_version();
        self.persist_slot(index)?;
        self.persist_header()?;

        tracing::info!(
            store = %self.path.display(),
            slot = index,
            resolution = res.suffix(),
            offset = new_offset,
            "materialised derived resolution"
        );

        Ok(())
    }
}
