//! Buffered random-access input over a [`ReadAt`] backing source.

use std::sync::Arc;

use otzar_common::{Result, error::Error, verify_arg};
use otzar_io::{ReadAt, utils::read_at_exact};

/// Default buffer capacity of a [`BufferedInput`], in bytes.
///
/// [`BufferedInput::new`] clamps this to the backing source's storage profile;
/// [`BufferedInput::with_buffer_size`] overrides it per instance.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// A buffered, seekable view over a [`ReadAt`] backing source.
///
/// `BufferedInput` services sequential and random-access reads through a fixed-capacity
/// buffer holding a window of the underlying bytes. Reads inside the window are plain
/// copies; reads outside it reposition and refill the window; bulk reads of at least
/// the buffer capacity skip the window and fill the caller's destination directly.
///
/// The view's length is fixed at construction and bounds every read exactly: a read
/// ending at the length succeeds, a read passing it fails as a whole with an
/// end-of-stream error and no partial result. Failed reads do not disable the view.
///
/// A view is single-threaded (`&mut self` reads, no internal synchronization).
/// Concurrent readers each obtain their own view via [`slice`](BufferedInput::slice)
/// or [`Clone`], sharing only the read-only backing source.
pub struct BufferedInput {
    source: Arc<dyn ReadAt>,
    name: String,
    length: u64,
    buffer: Box<[u8]>,
    /// Offset of `buffer[0]` within this view.
    window_start: u64,
    /// Length of the valid prefix of `buffer`; 0 means the window is unpositioned.
    window_len: usize,
    pos: u64,
}

impl BufferedInput {
    /// Creates a view over the entire `source`, with a buffer capacity of
    /// [`DEFAULT_BUFFER_SIZE`] clamped to the source's storage profile.
    ///
    /// `name` labels the view in error messages.
    pub fn new(name: impl Into<String>, source: Arc<dyn ReadAt>) -> Result<BufferedInput> {
        let buffer_size = source.storage_profile().clamp_io_size(DEFAULT_BUFFER_SIZE);
        Self::with_buffer_size(name, source, buffer_size)
    }

    /// Creates a view over the entire `source` with an explicit buffer capacity.
    ///
    /// The buffer is allocated once, up front, and never grows.
    pub fn with_buffer_size(
        name: impl Into<String>,
        source: Arc<dyn ReadAt>,
        buffer_size: usize,
    ) -> Result<BufferedInput> {
        let name = name.into();
        verify_arg!(buffer_size, buffer_size != 0);
        let length = source.size().map_err(|e| Error::io(name.clone(), e))?;
        Ok(BufferedInput {
            source,
            name,
            length,
            buffer: vec![0; buffer_size].into_boxed_slice(),
            window_start: 0,
            window_len: 0,
            pos: 0,
        })
    }

    /// The diagnostics label of this view.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of bytes this view covers. For a slice this is the sub-range
    /// length, not the parent's.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The current absolute read position within this view.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// The fixed buffer capacity of this view.
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Moves the read position to `target`.
    ///
    /// The target is not validated against [`len`](BufferedInput::len): validation is
    /// left to the next read, which is the only operation that can fail. The buffer
    /// window is kept, so seeking back and forth within one window's span triggers no
    /// I/O.
    pub fn seek(&mut self, target: u64) {
        self.pos = target;
    }

    /// Reads the byte at the current position and advances the position by one.
    pub fn read_byte(&mut self) -> Result<u8> {
        if !self.covers(self.pos, 1) {
            self.refill(self.pos, 1)?;
        }
        let byte = self.buffer[(self.pos - self.window_start) as usize];
        self.pos += 1;
        Ok(byte)
    }

    /// Fills `buf` from the current position and advances the position by `buf.len()`.
    ///
    /// The whole request is validated first: when fewer than `buf.len()` bytes remain,
    /// the call fails with an end-of-stream error before the cursor or window moves,
    /// and no partial data is produced. Requests of at least the buffer capacity are
    /// read straight into `buf`, bypassing the window to avoid a double copy.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if self
            .pos
            .checked_add(buf.len() as u64)
            .is_none_or(|end| end > self.length)
        {
            return Err(self.eof_error(self.pos, buf.len()));
        }

        // Serve whatever the current window already holds.
        let mut copied = 0;
        if self.pos >= self.window_start {
            let offset = (self.pos - self.window_start) as usize;
            if offset < self.window_len {
                copied = (self.window_len - offset).min(buf.len());
                buf[..copied].copy_from_slice(&self.buffer[offset..offset + copied]);
                self.pos += copied as u64;
            }
        }

        while copied < buf.len() {
            let remaining = buf.len() - copied;
            if remaining >= self.buffer.len() {
                // Large remainder: invalidate the window and fill the caller's
                // destination straight from the source.
                self.window_len = 0;
                read_at_exact(self.source.as_ref(), self.pos, &mut buf[copied..])
                    .map_err(|e| Error::io(self.name.clone(), e))?;
                self.pos += remaining as u64;
                self.window_start = self.pos;
                copied = buf.len();
            } else {
                self.refill(self.pos, 1)?;
                let chunk = self.window_len.min(remaining);
                buf[copied..copied + chunk].copy_from_slice(&self.buffer[..chunk]);
                self.pos += chunk as u64;
                copied += chunk;
            }
        }
        Ok(())
    }

    /// Creates an independent view over `[offset, offset + length)` of this view.
    ///
    /// The slice has its own buffer (same capacity) and its own position, starting at 0;
    /// its position space is `[0, length)`. Slicing a slice translates offsets
    /// transitively. Fails with an invalid-argument error when the range exceeds this
    /// view's bounds, and with an unsupported-operation error when the backing source
    /// does not support re-addressing.
    pub fn slice(
        &self,
        name: impl Into<String>,
        offset: u64,
        length: u64,
    ) -> Result<BufferedInput> {
        verify_arg!(offset, offset <= self.length);
        verify_arg!(length, length <= self.length - offset);
        let source = self
            .source
            .slice_at(offset..offset + length)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::Unsupported => {
                    Error::unsupported(format!("slice of '{}'", self.name))
                }
                _ => Error::io(self.name.clone(), e),
            })?;
        Ok(BufferedInput {
            source,
            name: name.into(),
            length,
            buffer: vec![0; self.buffer.len()].into_boxed_slice(),
            window_start: 0,
            window_len: 0,
            pos: 0,
        })
    }

    /// Whether `[pos, pos + need)` lies inside the current buffer window.
    fn covers(&self, pos: u64, need: usize) -> bool {
        let window_end = self.window_start + self.window_len as u64;
        pos >= self.window_start
            && pos
                .checked_add(need as u64)
                .is_some_and(|end| end <= window_end)
    }

    /// Repositions the buffer window at `pos` and fills it from the backing source.
    ///
    /// Fails with an end-of-stream error, before the cursor or window changes, when
    /// fewer than `need` bytes remain before the declared length. Short fills from the
    /// source are retried; a source that delivers nothing while below the declared
    /// length surfaces as a backing I/O failure, not as end-of-stream.
    fn refill(&mut self, pos: u64, need: usize) -> Result<()> {
        if pos
            .checked_add(need as u64)
            .is_none_or(|end| end > self.length)
        {
            return Err(self.eof_error(pos, need));
        }
        self.window_start = pos;
        self.window_len = 0;
        let want = (self.length - pos).min(self.buffer.len() as u64) as usize;
        read_at_exact(self.source.as_ref(), pos, &mut self.buffer[..want])
            .map_err(|e| Error::io(self.name.clone(), e))?;
        self.window_len = want;
        Ok(())
    }

    #[cold]
    fn eof_error(&self, pos: u64, need: usize) -> Error {
        Error::end_of_stream(format!(
            "'{}': {} byte(s) at position {} exceed length {}",
            self.name, need, pos, self.length
        ))
    }
}

impl Clone for BufferedInput {
    /// Creates an independent view over the same range: the backing source is shared,
    /// the buffer starts out empty (same capacity) and the current position is kept.
    fn clone(&self) -> BufferedInput {
        BufferedInput {
            source: self.source.clone(),
            name: self.name.clone(),
            length: self.length,
            buffer: vec![0; self.buffer.len()].into_boxed_slice(),
            window_start: 0,
            window_len: 0,
            pos: self.pos,
        }
    }
}

impl std::fmt::Debug for BufferedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedInput")
            .field("name", &self.name)
            .field("length", &self.length)
            .field("pos", &self.pos)
            .field("buffer_size", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
