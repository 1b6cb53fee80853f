//! Storage access layer: buffered random-access input over backing sources.
//!
//! Every byte a codec reader, a query executor or a stored-field fetch consumes flows
//! through [`BufferedInput`]: a seekable view that combines a small fixed-size buffer
//! with exact end-of-stream tracking and cheap sub-range views. Backing sources are
//! abstracted by [`otzar_io::ReadAt`].

pub mod input;

pub use input::{BufferedInput, DEFAULT_BUFFER_SIZE};
