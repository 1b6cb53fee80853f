//! I/O abstractions for the storage layer:
//! - [`ReadAt`]: positional reader with the ability to fill a caller-provided
//!   destination from an arbitrary offset of a file/blob.
//!
//! Provides memory-based and file-based implementations, a bounded sub-range
//! adapter ([`SlicedReadAt`]) and a bridge to `std::io` ([`ReadAdapter`]).

use std::{ops::Range, sync::Arc};

pub mod file;
pub mod memory;
pub mod read_adapter;
pub mod sliced;
pub mod utils;

pub use file::FileReader;
pub use read_adapter::ReadAdapter;
pub use sliced::SlicedReadAt;

/// A trait representing a conceptual file or buffer that supports reading from arbitrary
/// positions.
///
/// Implementations are read-only and take `&self`: they keep no read cursor, so any
/// number of independently positioned readers may share one source. Whatever handle a
/// source holds (an open file, a mapping) is released when the last reference is
/// dropped.
pub trait ReadAt: Send + Sync + 'static {
    /// Returns the size of the underlying object.
    ///
    /// The size is authoritative: it bounds every read and must not change while
    /// readers hold this source.
    fn size(&self) -> std::io::Result<u64>;

    /// Reads bytes starting at `pos` into `buf`, returning the number of bytes written.
    ///
    /// A fill may be short without that being an error: callers that need the whole
    /// destination populated must loop (see [`utils::read_at_exact`]). An implementation
    /// must never write more than `buf.len()` bytes, must not fabricate bytes past the
    /// source's size, and returns `Ok(0)` for a read entirely at or beyond the size.
    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Returns an independent handle bounded to `range` of this source, with offsets
    /// translated so that the new handle's position space starts at zero.
    ///
    /// Re-addressing is a capability a source declares by overriding this method;
    /// the default refuses with [`std::io::ErrorKind::Unsupported`]. The provided
    /// memory and file sources support it, and bounded handles compose: slicing a
    /// sliced handle translates offsets transitively.
    fn slice_at(&self, range: Range<u64>) -> std::io::Result<Arc<dyn ReadAt>> {
        let _ = range;
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "source does not support re-addressing",
        ))
    }

    /// Retrieves the storage profile associated with this reader.
    fn storage_profile(&self) -> StorageProfile {
        StorageProfile::default()
    }
}

/// Characterizes the performance aspects of the underlying storage implementation.
#[derive(Debug, Clone)]
pub struct StorageProfile {
    /// Suggested minimum size for an effective I/O request.
    /// Using buffers smaller than this size may be inefficient, as the round-trip time
    /// could dominate the overall I/O operation time.
    pub min_io_size: usize,

    /// Suggested maximum size for a single I/O request.
    /// Buffers larger than this size won't enhance performance and might even degrade
    /// the system's efficiency.
    pub max_io_size: usize,
}

impl StorageProfile {
    /// Clamps a given I/O size to the recommended range defined by this profile.
    ///
    /// The minimum size is guaranteed to be at least 1, and the maximum size is
    /// guaranteed to be at least the minimum size.
    pub fn clamp_io_size(&self, size: usize) -> usize {
        let min = self.min_io_size.max(1).min(self.max_io_size);
        let max = self.max_io_size.max(1).max(min);
        size.clamp(min, max)
    }
}

impl Default for StorageProfile {
    fn default() -> StorageProfile {
        Self {
            min_io_size: 4 * 1024,
            max_io_size: 4 * 1024 * 1024,
        }
    }
}

impl<T> ReadAt for Arc<T>
where
    T: ReadAt + ?Sized,
{
    fn size(&self) -> std::io::Result<u64> {
        self.as_ref().size()
    }

    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.as_ref().read_at(pos, buf)
    }

    fn slice_at(&self, range: Range<u64>) -> std::io::Result<Arc<dyn ReadAt>> {
        self.as_ref().slice_at(range)
    }

    fn storage_profile(&self) -> StorageProfile {
        self.as_ref().storage_profile()
    }
}
