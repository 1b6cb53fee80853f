use std::{ops::Range, sync::Arc};

use crate::{ReadAt, StorageProfile, verify};

impl<T: ?Sized> ReadAt for T
where
    T: details::ByteSource + Send + Sync + 'static,
{
    fn size(&self) -> std::io::Result<u64> {
        Ok(self.as_bytes().len() as u64)
    }

    fn read_at(&self, pos: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let content = self.as_bytes();
        let content_len = content.len() as u64;
        if pos >= content_len || buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min((content_len - pos) as usize);
        let pos = pos as usize;
        buf[..len].copy_from_slice(&content[pos..pos + len]);
        Ok(len)
    }

    // The bounded handle holds its own copy of the sub-range.
    fn slice_at(&self, range: Range<u64>) -> std::io::Result<Arc<dyn ReadAt>> {
        let content = self.as_bytes();
        verify!(range.start <= range.end);
        verify!(range.end <= content.len() as u64);
        Ok(Arc::new(
            content[range.start as usize..range.end as usize].to_vec(),
        ))
    }

    fn storage_profile(&self) -> StorageProfile {
        StorageProfile {
            min_io_size: 1,
            max_io_size: self
                .as_bytes()
                .len()
                .min(StorageProfile::default().max_io_size),
        }
    }
}

mod details {
    pub trait ByteSource {
        fn as_bytes(&self) -> &[u8];
    }

    impl ByteSource for [u8] {
        fn as_bytes(&self) -> &[u8] {
            self
        }
    }

    impl ByteSource for Vec<u8> {
        fn as_bytes(&self) -> &[u8] {
            self
        }
    }
}
