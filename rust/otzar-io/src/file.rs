use std::{
    fs::File,
    ops::Range,
    path::Path,
    sync::{Arc, OnceLock},
};

use crate::{ReadAt, SlicedReadAt, StorageProfile, verify};

/// Positional reader over an open file handle.
///
/// The handle is shared (`Arc<File>`) and reads do not move any file cursor, so any
/// number of `FileReader` clones can serve independently positioned readers.
#[derive(Clone)]
pub struct FileReader {
    file: Arc<File>,
    size: OnceLock<u64>,
}

impl FileReader {
    pub fn new(file: impl Into<Arc<File>>) -> FileReader {
        FileReader {
            file: file.into(),
            size: Default::default(),
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<FileReader> {
        Ok(FileReader::new(File::open(path)?))
    }

    fn get_size(&self) -> std::io::Result<u64> {
        if let Some(&size) = self.size.get() {
            Ok(size)
        } else {
            let size = self.file.metadata()?.len();
            let _ = self.size.set(size);
            Ok(size)
        }
    }
}

impl ReadAt for FileReader {
    fn size(&self) -> std::io::Result<u64> {
        self.get_size()
    }

    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let size = self.get_size()?;
        if pos >= size || buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min((size - pos) as usize);
        file_read_at(&self.file, pos, &mut buf[..len])
    }

    fn slice_at(&self, range: Range<u64>) -> std::io::Result<Arc<dyn ReadAt>> {
        verify!(range.start <= range.end);
        Ok(Arc::new(SlicedReadAt::new(self.clone(), range)))
    }

    fn storage_profile(&self) -> StorageProfile {
        StorageProfile {
            min_io_size: 16 * 1024,
            max_io_size: 1024 * 1024,
        }
    }
}

#[cfg(unix)]
pub fn file_read_at(file: &File, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::os::unix::fs::FileExt;

    file.read_at(buf, pos)
}

#[cfg(windows)]
pub fn file_read_at(file: &File, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    use std::os::windows::fs::FileExt;

    file.seek_read(buf, pos)
}

#[cfg(test)]
mod tests {
    use crate::{ReadAt, file::FileReader, utils::read_at_exact};

    #[test]
    fn test_file_reader() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("test.bin");
        std::fs::write(&path, b"abcdefgh".repeat(10)).expect("write");

        let reader = FileReader::open(&path).expect("open file");
        assert_eq!(reader.size().unwrap(), 80);

        let mut buf = [0u8; 4];
        for pos in (0..80).step_by(8) {
            read_at_exact(&reader, pos, &mut buf).expect("read_at_exact");
            assert_eq!(&buf, b"abcd");
        }
    }

    #[test]
    fn test_file_reader_reads_clamped_to_size() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("test.bin");
        std::fs::write(&path, b"0123456789").expect("write");

        let reader = FileReader::open(&path).expect("open file");
        let mut buf = [0u8; 16];
        let n = reader.read_at(6, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"6789");
        assert_eq!(reader.read_at(10, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_file_reader_slice_at() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("test.bin");
        std::fs::write(&path, b"0123456789").expect("write");

        let reader = FileReader::open(&path).expect("open file");
        let sliced = reader.slice_at(2..8).unwrap();
        assert_eq!(sliced.size().unwrap(), 6);

        let mut buf = [0u8; 6];
        read_at_exact(sliced.as_ref(), 0, &mut buf).expect("read slice");
        assert_eq!(&buf, b"234567");

        let nested = sliced.slice_at(1..4).unwrap();
        let mut buf = [0u8; 3];
        read_at_exact(nested.as_ref(), 0, &mut buf).expect("read nested slice");
        assert_eq!(&buf, b"345");
    }
}
