// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::BufferConfig;
use crate::reader::EventReader;
use crate::retire::Retirer;
use crate::source::{BufferPool, BufferSource, HeapBufferSource, PooledBufferSource};
use crate::writer::{HeaderClass, WriteCursor};
use super::{committed_of, heap_cursor};

fn write_pattern<S: BufferSource>(cursor: &mut WriteCursor<S>) -> usize {
    cursor.write_event(HeaderClass::Large, |w| {
        for i in 0..10u64 {
            w.write_u64(i * 1_000_003);
            w.write_str(Some("payload"));
            w.write_i16(-300);
        }
    })
}

#[test]
fn test_overflow_preserves_prefix() {
    let mut small = heap_cursor(16);
    let mut big = heap_cursor(4096);

    let n_small = write_pattern(&mut small);
    let n_big = write_pattern(&mut big);

    assert!(n_small > 16);
    assert_eq!(n_small, n_big);
    assert!(small.stats().flushes >= 1);
    assert_eq!(big.stats().flushes, 0);
    assert_eq!(committed_of(small.buffer()), committed_of(big.buffer()));
}

#[test]
fn test_swapped_out_buffer_keeps_committed_events() {
    let mut cursor = heap_cursor(16);
    let first = cursor.buffer().clone();

    for i in 0..4u8 {
        let n = cursor.write_event(HeaderClass::Small, |w| w.write_bytes_raw(&[i; 4]));
        assert_eq!(n, 5);
    }
    assert!(!cursor.buffer().ptr_eq(&first));
    assert_eq!(first.committed(), 15);
    assert_eq!(committed_of(cursor.buffer()), vec![5, 3, 3, 3, 3]);

    let mut retirer = Retirer::new();
    let segments = retirer.drain_queue(cursor.source().retired());
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].buffer, first.id());
    assert!(segments[0].verify());

    let payloads: Vec<Vec<u8>> = EventReader::new(&segments[0].bytes)
        .map(|r| r.unwrap().payload.to_vec())
        .collect();
    assert_eq!(payloads, vec![vec![0; 4], vec![1; 4], vec![2; 4]]);
}

#[test]
fn test_no_memory_drops_event_and_keeps_buffer() {
    let cfg = BufferConfig {
        max_total_bytes: Some(16),
        ..BufferConfig::default().with_buffer_size(16)
    };
    let mut source = HeapBufferSource::new(&cfg);
    let buffer = source.allocate().unwrap();
    let mut cursor = WriteCursor::with_config(buffer.clone(), source, &cfg);

    let n = cursor.write_event(HeaderClass::Small, |w| w.write_bytes_raw(&[1; 20]));
    assert_eq!(n, 0);
    assert_eq!(cursor.stats().dropped_no_memory, 1);
    assert!(cursor.buffer().ptr_eq(&buffer));
    assert!(cursor.source().retired().is_empty());
    assert_eq!(buffer.committed(), 0);

    assert_eq!(cursor.write_event(HeaderClass::Small, |w| w.write_u8(4)), 2);
    assert_eq!(committed_of(&buffer), vec![2, 4]);
}

#[test]
fn test_pool_exhaustion_and_recycling() {
    let cfg = BufferConfig {
        pool_buffers: 2,
        ..BufferConfig::default().with_buffer_size(32)
    };
    let pool = BufferPool::new(&cfg);
    let first = pool.take().unwrap();
    let mut cursor = WriteCursor::with_config(first.clone(), PooledBufferSource::new(pool.clone()), &cfg);
    let event = |w: &mut WriteCursor<PooledBufferSource>| w.write_bytes_raw(&[7; 20]);

    assert_eq!(cursor.write_event(HeaderClass::Large, event), 24);
    // Second event overflows into the last free buffer
    assert_eq!(cursor.write_event(HeaderClass::Large, event), 24);
    assert_eq!(pool.free_count(), 0);
    assert_eq!(pool.retired().len(), 1);

    // Third has nowhere to go
    assert_eq!(cursor.write_event(HeaderClass::Large, event), 0);
    assert_eq!(cursor.stats().dropped_no_memory, 1);

    let mut retirer = Retirer::new();
    let segments = retirer.drain_into_pool(pool.retired(), &pool);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].len(), 24);
    assert_eq!(first.committed(), 0);
    assert_eq!(pool.free_count(), 1);

    assert_eq!(cursor.write_event(HeaderClass::Large, event), 24);
    assert!(cursor.buffer().ptr_eq(&first));
    assert_eq!(cursor.stats().flushes, 2);
}

#[test]
fn test_heap_budget_is_returned_once_retired_buffers_drop() {
    let cfg = BufferConfig {
        max_total_bytes: Some(64),
        ..BufferConfig::default().with_buffer_size(32)
    };
    let mut source = HeapBufferSource::new(&cfg);
    let buffer = source.allocate().unwrap();
    let mut cursor = WriteCursor::with_config(buffer, source, &cfg);
    let event = |w: &mut WriteCursor<HeapBufferSource>| w.write_bytes_raw(&[3; 10]);

    let mut retirer = Retirer::new();
    for _ in 0..20 {
        assert_eq!(cursor.write_event(HeaderClass::Small, event), 11);
        retirer.drain_queue(cursor.source().retired());
        assert!(cursor.source().allocated_bytes() <= 64);
    }
    assert_eq!(cursor.stats().committed_events, 20);
    assert_eq!(cursor.stats().dropped(), 0);
    assert_eq!(cursor.stats().flushes, 9);
    assert_eq!(cursor.source().allocated_bytes(), 32);

    // A second live buffer takes the rest of the budget
    let spare = cursor.source_mut().allocate().unwrap();
    assert!(cursor.source_mut().allocate().is_none());
    assert_eq!(cursor.write_event(HeaderClass::Small, event), 0);
    assert_eq!(cursor.stats().dropped_no_memory, 1);

    drop(spare);
    assert_eq!(cursor.write_event(HeaderClass::Small, event), 11);
    assert_eq!(cursor.stats().flushes, 10);
}
