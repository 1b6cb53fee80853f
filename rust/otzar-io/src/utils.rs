use crate::ReadAt;

#[macro_export]
macro_rules! verify {
    ($expr:expr) => {{
        let result = $expr;
        $crate::utils::verify(result, stringify!($expr))?;
    }};
}

pub fn verify(predicate: bool, condition: &str) -> std::io::Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            condition,
        ))
    }
}

/// Fills `buf` completely from `source`, starting at `pos`, looping over short fills.
///
/// A source is permitted to deliver fewer bytes per call than requested; this helper
/// keeps asking for the remainder. A zero-byte fill before `buf` is full means the
/// source cannot deliver bytes within its reported size, which is surfaced as
/// `UnexpectedEof` rather than a short result.
pub fn read_at_exact<R: ReadAt + ?Sized>(
    source: &R,
    pos: u64,
    buf: &mut [u8],
) -> std::io::Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let r = source.read_at(pos + filled as u64, &mut buf[filled..]);
        match r {
            Ok(0) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "backing source delivered no bytes below its reported size",
                ));
            }
            Ok(bytes) => filled += bytes,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
