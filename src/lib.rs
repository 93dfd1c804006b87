//! Single-file, content-addressed JPEG image store.
//!
//! The on-disk format, dedup rule, lazy multi-resolution derivation, and
//! compaction protocol live in [`store`]; [`layout`] is the binary codec
//! they're built on. [`imaging`] and [`sha`] are the two external
//! collaborators the core talks to through narrow trait/function seams.

pub mod error;
pub mod http;
pub mod imaging;
pub mod layout;
pub mod sha;
pub mod store;

pub use error::{Result, StoreError};
pub use store::ImageStore;
