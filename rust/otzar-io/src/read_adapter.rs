//! A helper that turns any `ReadAt` implementation into a standard `std::io::Read`.

use crate::ReadAt;

/// A helper that turns any `ReadAt` implementation into a standard `std::io::Read` and
/// `std::io::Seek`.
///
/// The adapter maintains an internal position and reads sequentially from the underlying
/// `ReadAt` source, making it compatible with APIs that expect `std::io::Read` (checksum
/// computation, copying a segment out of the store, etc.).
pub struct ReadAdapter<R> {
    inner: R,
    pos: u64,
    /// Cached size of the inner `ReadAt`
    size: Option<u64>,
}

impl<R> ReadAdapter<R> {
    /// Creates a new `ReadAdapter` wrapping the given `ReadAt` implementation.
    ///
    /// The adapter starts reading from position 0.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pos: 0,
            size: None,
        }
    }

    /// Creates a new `ReadAdapter` starting from the specified position.
    pub fn new_at_position(inner: R, pos: u64) -> Self {
        Self {
            inner,
            pos,
            size: None,
        }
    }

    /// Returns the current read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Returns a reference to the underlying `ReadAt` implementation.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Consumes the adapter and returns the underlying `ReadAt` implementation.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ReadAt> ReadAdapter<R> {
    fn size(&mut self) -> std::io::Result<u64> {
        if let Some(size) = self.size {
            Ok(size)
        } else {
            let size = self.inner.size()?;
            self.size = Some(size);
            Ok(size)
        }
    }
}

impl<R: ReadAt> std::io::Read for ReadAdapter<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let size = self.size()?;
        if self.pos >= size {
            return Ok(0);
        }

        let to_read = buf.len().min((size - self.pos) as usize);
        let n = self.inner.read_at(self.pos, &mut buf[..to_read])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: ReadAt> std::io::Seek for ReadAdapter<R> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        use std::io::SeekFrom;

        let size = self.size()?;

        let new_pos = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::End(offset) => {
                if offset >= 0 {
                    size.saturating_add(offset as u64)
                } else {
                    size.saturating_sub((-offset) as u64)
                }
            }
            SeekFrom::Current(offset) => {
                if offset >= 0 {
                    self.pos.saturating_add(offset as u64)
                } else {
                    self.pos.saturating_sub((-offset) as u64)
                }
            }
        };

        // Seeking past the end is allowed, as per std::io::Seek behavior
        self.pos = new_pos;
        Ok(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};

    #[test]
    fn test_read_adapter_basic() {
        let mut adapter = ReadAdapter::new(b"Hello, World!".to_vec());

        let mut buf = [0u8; 5];
        let n = adapter.read(&mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"Hello");
        assert_eq!(adapter.position(), 5);

        let mut buf = [0u8; 10];
        let n = adapter.read(&mut buf).unwrap();
        assert_eq!(n, 8);
        assert_eq!(&buf[..n], b", World!");

        // EOF
        let n = adapter.read(&mut buf).unwrap();
        assert_eq!(n, 0);
        assert_eq!(adapter.position(), 13);
    }

    #[test]
    fn test_read_adapter_start_at_position() {
        let mut adapter = ReadAdapter::new_at_position(b"Hello, World!".to_vec(), 7);

        let mut result = Vec::new();
        adapter.read_to_end(&mut result).unwrap();
        assert_eq!(result, b"World!");
    }

    #[test]
    fn test_read_adapter_empty_source() {
        let mut adapter = ReadAdapter::new(Vec::<u8>::new());

        let mut buf = [0u8; 10];
        assert_eq!(adapter.read(&mut buf).unwrap(), 0);
        assert_eq!(adapter.position(), 0);
    }

    #[test]
    fn test_read_adapter_seek_and_read() {
        let mut adapter = ReadAdapter::new(b"Hello, World!".to_vec());

        adapter.seek(SeekFrom::Start(7)).unwrap();
        let mut result = Vec::new();
        adapter.read_to_end(&mut result).unwrap();
        assert_eq!(result, b"World!");

        let new_pos = adapter.seek(SeekFrom::End(-6)).unwrap();
        assert_eq!(new_pos, 7);

        adapter.seek(SeekFrom::Start(5)).unwrap();
        let new_pos = adapter.seek(SeekFrom::Current(-5)).unwrap();
        assert_eq!(new_pos, 0);
        let mut buf = [0u8; 5];
        adapter.read(&mut buf).unwrap();
        assert_eq!(&buf, b"Hello");
    }

    #[test]
    fn test_read_adapter_seek_past_end() {
        let mut adapter = ReadAdapter::new(b"Hello".to_vec());

        let new_pos = adapter.seek(SeekFrom::Start(10)).unwrap();
        assert_eq!(new_pos, 10);

        let mut buf = [0u8; 5];
        assert_eq!(adapter.read(&mut buf).unwrap(), 0);
        assert_eq!(adapter.position(), 10);
    }
}
