pub mod overflow_tests;
pub mod source_tests;
pub mod roundtrip_tests;

use crate::buffer::BufferHandle;
use crate::config::BufferConfig;
use crate::source::HeapBufferSource;
use crate::writer::WriteCursor;

/// Cursor over a fresh buffer of `size` bytes backed by an unbounded heap source.
pub(crate) fn heap_cursor(size: usize) -> WriteCursor<HeapBufferSource> {
    let cfg = BufferConfig::default().with_buffer_size(size);
    let mut source = HeapBufferSource::new(&cfg);
    let buffer = source.allocate().unwrap();
    WriteCursor::with_config(buffer, source, &cfg)
}

/// Copy of the committed bytes of `buffer`. Panics if it is leased.
pub(crate) fn committed_of(buffer: &BufferHandle) -> Vec<u8> {
    buffer.snapshot_committed().unwrap()
}
