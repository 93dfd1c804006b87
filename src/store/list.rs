//! Enumerates valid slots for textual (CLI) and structured (HTTP) audiences.

use std::fmt::Write as _;

use super::ImageStore;
use crate::layout::Resolution;

impl ImageStore {
    /// A formatted dump of the header and every NON_EMPTY slot, in the style
    /// the CLI `list` subcommand prints.
    pub fn list_textual(&self) -> String {
        let mut out = String::new();
        let h = &self.header;
        let _ = writeln!(
            out,
            "store name: {} | version: {} | files: {}/{} | thumb: {}x{} | small: {}x{}",
            h.name,
            h.version,
            h.num_files,
            h.max_files,
            h.res_resized[0],
            h.res_resized[1],
            h.res_resized[2],
            h.res_resized[3],
        );

        let valid: Vec<_> = self.slots.iter().filter(|s| !s.is_empty()).collect();
        if valid.is_empty() {
            let _ = writeln!(out, "<< empty imgStore >>");
            return out;
        }

        for slot in valid {
            let _ = writeln!(
                out,
                "id: {:<16} sha: {} valid: 1 orig: {}x{} thumb[off={},size={}] small[off={},size={}] orig[off={},size={}]",
                slot.img_id,
                hex(&slot.sha),
                slot.res_orig.0,
                slot.res_orig.1,
                slot.offset[Resolution::Thumb.index()],
                slot.size[Resolution::Thumb.index()],
                slot.offset[Resolution::Small.index()],
                slot.size[Resolution::Small.index()],
                slot.offset[Resolution::Orig.index()],
                slot.size[Resolution::Orig.index()],
            );
        }
        out
    }

    /// The ordered ids of every NON_EMPTY slot.
    pub fn list_ids(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.img_id.clone())
            .collect()
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
