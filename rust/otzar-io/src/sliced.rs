//! A `ReadAt` adapter that restricts reads to a specified range of the underlying reader.

use std::{ops::Range, sync::Arc};

use crate::{ReadAt, StorageProfile, verify};

/// A `ReadAt` adapter that restricts reads to a specified range of the underlying reader.
///
/// `SlicedReadAt` allows you to treat a portion of a larger `ReadAt` source as a separate,
/// independent `ReadAt` instance. All read operations are **relative to the slice's
/// starting position**.
///
/// For example, if the underlying reader has a size of 100, and a `SlicedReadAt` is
/// created with a range of `10..20`, then:
///
/// *   `size()` will return `10` (20 - 10).
/// *   `read_at(0, ..)` reads from byte 10 of the underlying reader.
/// *   a fill is clamped to the slice size, never reaching past byte 20.
pub struct SlicedReadAt<R> {
    inner: R,
    range: Range<u64>,
}

impl<R> SlicedReadAt<R> {
    /// Creates a new `SlicedReadAt` adapter.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end`.
    pub fn new(inner: R, range: Range<u64>) -> Self {
        assert!(range.start <= range.end);
        Self { inner, range }
    }

    /// Returns the size of the slice.
    pub fn slice_size(&self) -> u64 {
        self.range.end - self.range.start
    }

    /// Returns the range of the slice within the underlying reader.
    pub fn slice_range(&self) -> Range<u64> {
        self.range.clone()
    }

    /// Returns a reference to the underlying reader.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Consumes the `SlicedReadAt`, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Clone> SlicedReadAt<R> {
    /// Creates a new `SlicedReadAt` from the current instance, using the specified `range`
    /// relative to the starting position of this slice.
    ///
    /// The result addresses the underlying reader directly: slicing a slice translates
    /// offsets transitively instead of stacking adapters.
    pub fn slice(&self, range: Range<u64>) -> std::io::Result<SlicedReadAt<R>> {
        verify!(range.start <= range.end);
        verify!(range.end <= self.slice_size());
        Ok(SlicedReadAt {
            inner: self.inner.clone(),
            range: self.range.start + range.start..self.range.start + range.end,
        })
    }
}

impl<R: ReadAt + Clone> ReadAt for SlicedReadAt<R> {
    fn size(&self) -> std::io::Result<u64> {
        Ok(self.slice_size())
    }

    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let size = self.slice_size();
        if pos >= size || buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min((size - pos) as usize);
        let inner_pos = self.range.start.saturating_add(pos);
        self.inner.read_at(inner_pos, &mut buf[..len])
    }

    fn slice_at(&self, range: Range<u64>) -> std::io::Result<Arc<dyn ReadAt>> {
        Ok(Arc::new(self.slice(range)?))
    }

    fn storage_profile(&self) -> StorageProfile {
        self.inner.storage_profile()
    }
}

impl<R: Clone> Clone for SlicedReadAt<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            range: self.range.clone(),
        }
    }
}
