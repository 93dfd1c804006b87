//! Append-only writes into the blob region.

use std::io::{Seek, SeekFrom, Write};

use super::ImageStore;
use crate::error::Result;

impl ImageStore {
    /// Appends `bytes` at the current end of file and returns the offset they
    /// were written at.
    pub(super) fn append_blob(&mut self, bytes: &[u8]) -> Result<u64> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        Ok(offset)
    }
}
