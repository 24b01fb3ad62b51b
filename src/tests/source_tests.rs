// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::buffer::BufferHandle;
use crate::config::BufferConfig;
use crate::retire::{RetireOutcome, Retirer};
use crate::source::{BufferPool, BufferSource, ExhaustedSource, RetiredQueue};

fn commit_bytes(buffer: &BufferHandle, bytes: &[u8]) {
    let mut lease = buffer.try_acquire().unwrap();
    let start = lease.committed();
    lease.region_mut()[start..start + bytes.len()].copy_from_slice(bytes);
    lease.publish(start + bytes.len());
}

#[test]
fn test_busy_buffers_stay_queued() {
    let queue = RetiredQueue::new();
    let a = BufferHandle::new(16);
    let b = BufferHandle::new(16);
    commit_bytes(&a, &[2, 1]);
    commit_bytes(&b, &[2, 2]);
    queue.push(a.clone());
    queue.push(b.clone());

    let held = a.try_acquire().unwrap();
    let mut retirer = Retirer::new();
    let segments = retirer.drain_queue(&queue);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].buffer, b.id());
    assert_eq!(retirer.busy_attempts(), 1);
    assert_eq!(queue.len(), 1);
    assert_eq!(a.committed(), 2);

    drop(held);
    let segments = retirer.drain_queue(&queue);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].bytes, vec![2, 1]);
    assert!(queue.is_empty());
    assert_eq!(retirer.segments_retired(), 2);
    assert_eq!(retirer.bytes_retired(), 4);
}

#[test]
fn test_retire_empty_buffer() {
    let buffer = BufferHandle::new(8);
    let mut retirer = Retirer::new();
    assert_eq!(retirer.try_retire(&buffer), RetireOutcome::Empty);
}

#[test]
fn test_segment_checksum_detects_corruption() {
    let buffer = BufferHandle::new(16);
    commit_bytes(&buffer, &[3, 4, 5]);
    let mut retirer = Retirer::new();
    let RetireOutcome::Retired(mut segment) = retirer.try_retire(&buffer) else {
        panic!("Expected Retired");
    };
    assert!(segment.verify());
    segment.bytes[1] ^= 0xff;
    assert!(!segment.verify());
}

#[test]
fn test_pool_refuses_undrained_buffers() {
    let cfg = BufferConfig {
        pool_buffers: 1,
        ..BufferConfig::default().with_buffer_size(16)
    };
    let pool = BufferPool::new(&cfg);
    let buffer = pool.take().unwrap();
    assert!(pool.take().is_none());

    commit_bytes(&buffer, &[2, 0]);
    assert!(!pool.recycle(buffer.clone()));

    let mut retirer = Retirer::new();
    assert!(matches!(retirer.try_retire(&buffer), RetireOutcome::Retired(_)));
    assert!(pool.recycle(buffer));
    assert_eq!(pool.free_count(), 1);
}

#[test]
fn test_exhausted_source_never_supplies() {
    let mut source = ExhaustedSource;
    let buffer = BufferHandle::new(8);
    assert!(source.flush(&buffer, &[1, 2], 4).is_none());
}
