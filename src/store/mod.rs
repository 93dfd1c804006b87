//! The storage engine: a single file holding a [`Header`](crate::layout::Header),
//! a fixed-capacity slot table, and an append-only blob region.
//!
//! [`ImageStore`] owns the open file handle and an in-memory mirror of the
//! header and slot table; every mutating call persists the affected records
//! before returning, in header/slot/blob declaration order, so the on-disk
//! state is always consistent with what the in-memory view reports.

mod blob;
mod dedup;
mod delete;
pub mod gc;
mod insert;
mod list;
mod read;
mod resize;
mod slots;

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::imaging::ImageBackend;
use crate::layout::{self, Header, Slot, HEADER_SIZE, SLOT_SIZE};

const MIN_MAX_FILES: u32 = 1;
const THUMB_AXIS_MAX: u16 = 128;
const SMALL_AXIS_MAX: u16 = 512;

pub struct ImageStore {
    file: File,
    header: Header,
    slots: Vec<Slot>,
    path: PathBuf,
    backend: Arc<dyn ImageBackend>,
}

impl ImageStore {
    /// Creates a brand new, empty store at `path`, truncating any existing file.
    pub fn create(
        path: impl AsRef<Path>,
        name: &str,
        max_files: u32,
        res_resized: [u16; 4],
        backend: Arc<dyn ImageBackend>,
    ) -> Result<Self> {
        validate_max_files(max_files)?;
        validate_resolutions(res_resized)?;

        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let header = Header::new(name, max_files, res_resized);
        file.write_all(&header.to_bytes())?;

        let empty = Slot::empty();
        for _ in 0..max_files {
            file.write_all(&empty.to_bytes())?;
        }
        file.flush()?;

        tracing::info!(store = %path.display(), max_files, "created store");

        Ok(ImageStore {
            file,
            header,
            slots: vec![empty; max_files as usize],
            path,
            backend,
        })
    }

    /// Opens an existing store, reading and validating its header and slot table.
    pub fn open(path: impl AsRef<Path>, backend: Arc<dyn ImageBackend>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;

        let mut header_bytes = [0u8; HEADER_SIZE];
        file.read_exact(&mut header_bytes)?;
        let header = Header::from_bytes(&header_bytes)?;

        let mut slots = Vec::with_capacity(header.max_files as usize);
        let mut slot_bytes = vec![0u8; SLOT_SIZE];
        for i in 0..header.max_files as usize {
            file.seek(SeekFrom::Start(layout::slot_offset(i)))?;
            file.read_exact(&mut slot_bytes)?;
            slots.push(Slot::from_bytes(&slot_bytes)?);
        }

        Ok(ImageStore {
            file,
            header,
            slots,
            path,
            backend,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn num_files(&self) -> u32 {
        self.header.num_files
    }

    pub fn max_files(&self) -> u32 {
        self.header.max_files
    }

    pub(crate) fn backend(&self) -> Arc<dyn ImageBackend> {
        Arc::clone(&self.backend)
    }

    fn persist_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.header.to_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    fn persist_slot(&mut self, index: usize) -> Result<()> {
        self.file.seek(SeekFrom::Start(layout::slot_offset(index)))?;
        self.file.write_all(&self.slots[index].to_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, size: u32) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; size as usize];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

fn validate_max_files(max_files: u32) -> Result<()> {
    if max_files < MIN_MAX_FILES || max_files > layout::MAX_MAX_FILES {
        return Err(StoreError::MaxFiles(format!(
            "max_files must be in [{MIN_MAX_FILES}, {}], got {max_files}",
            layout::MAX_MAX_FILES
        )));
    }
    Ok(())
}

fn validate_resolutions(res_resized: [u16; 4]) -> Result<()> {
    let [tw, th, sw, sh] = res_resized;
    if tw == 0 || tw > THUMB_AXIS_MAX || th == 0 || th > THUMB_AXIS_MAX {
        return Err(StoreError::Resolutions(format!(
            "thumb resolution axes must be in [1, {THUMB_AXIS_MAX}], got {tw}x{th}"
        )));
    }
    if sw == 0 || sw > SMALL_AXIS_MAX || sh == 0 || sh > SMALL_AXIS_MAX {
        return Err(StoreError::Resolutions(format!(
            "small resolution axes must be in [1, {SMALL_AXIS_MAX}], got {sw}x{sh}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::FakeBackend;

    pub(crate) fn backend() -> Arc<dyn ImageBackend> {
        Arc::new(FakeBackend)
    }

    #[test]
    fn create_rejects_bad_max_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let err = ImageStore::create(&path, "t", 0, [64, 64, 256, 256], backend()).unwrap_err();
        assert!(matches!(err, StoreError::MaxFiles(_)));
    }

    #[test]
    fn create_rejects_bad_resolutions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let err =
            ImageStore::create(&path, "t", 10, [200, 64, 256, 256], backend()).unwrap_err();
        assert!(matches!(err, StoreError::Resolutions(_)));
    }

    #[test]
    fn create_then_open_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        {
            ImageStore::create(&path, layout::STORE_TAG, 10, [64, 64, 256, 256], backend())
                .unwrap();
        }
        let reopened = ImageStore::open(&path, backend()).unwrap();
        assert_eq!(reopened.max_files(), 10);
        assert_eq!(reopened.num_files(), 0);
        assert_eq!(reopened.header().res_resized, [64, 64, 256, 256]);
    }
}
