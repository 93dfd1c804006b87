//! Error kinds surfaced by the store core.
//!
//! Every fallible operation in this crate returns [`StoreError`]; I/O and
//! imaging failures convert into it via `From` so callers never have to
//! match on an opaque error type.

use std::io;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid image id: {0}")]
    InvalidImgId(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("invalid resolution bounds: {0}")]
    Resolutions(String),

    #[error("invalid max_files value: {0}")]
    MaxFiles(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("imaging backend failed: {0}")]
    ImgLib(String),

    #[error("store is full (max_files reached)")]
    FullImgStore,

    #[error("image not found")]
    FileNotFound,

    #[error("duplicate image id")]
    DuplicateId,

    #[error("malformed store: {0}")]
    MalformedStore(String),
}
