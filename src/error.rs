use std::alloc::Layout;
use thiserror::Error;

/// Errors reported by strategies and by the deque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A strategy could not supply a block for the requested layout.
    #[error("out of memory (requested {size} bytes, align {align})")]
    OutOfMemory { size: usize, align: usize },

    /// A value was popped from an empty deque.
    #[error("empty container")]
    Empty,

    /// A cursor positioned past the last element was dereferenced or
    /// advanced.
    #[error("invalid iterator use: cursor is past the end")]
    InvalidCursor,
}

impl Error {
    /// Build an `OutOfMemory` error describing `layout`.
    pub fn out_of_memory(layout: Layout) -> Error {
        Error::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
