// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::ids::{ThreadRegistry, ThreadRef, TypeRef, TypeRegistry};
use crate::reader::EventReader;
use crate::writer::HeaderClass;
use super::{committed_of, heap_cursor};

#[test]
fn test_every_primitive_reads_back() {
    let threads = ThreadRegistry::new();
    let types = TypeRegistry::new();
    let me = std::thread::current().id();

    let mut cursor = heap_cursor(256);
    let n = cursor.write_event(HeaderClass::Large, |w| {
        w.write_bool(true);
        w.write_u8(200);
        w.write_i8(-5);
        w.write_u16(65_000);
        w.write_i16(-2);
        w.write_u32(123_456);
        w.write_i32(i32::MIN);
        w.write_u64(u64::MAX);
        w.write_i64(i64::MIN);
        w.write_f32(1.5);
        w.write_f64(-0.25);
        w.write_str(None);
        w.write_str(Some(""));
        w.write_str(Some("héllo"));
        w.write_str_bounded(Some("héllo"), 2);
        w.write_thread_handle(&threads, Some(&me));
        w.write_type_handle(&types, Some("core::option::Option"));
        w.write_type_handle::<str, _>(&types, None);
        w.write_thread(ThreadRef::NONE);
    });
    assert!(n > 0);

    let bytes = committed_of(cursor.buffer());
    let mut events = EventReader::new(&bytes);
    let record = events.next().unwrap().unwrap();
    assert!(events.next().is_none());
    assert!(record.is_large());
    assert_eq!(record.size, n);

    let mut r = record.payload_reader();
    assert!(r.read_bool().unwrap());
    assert_eq!(r.read_u8().unwrap(), 200);
    assert_eq!(r.read_i8().unwrap(), -5);
    assert_eq!(r.read_u16().unwrap(), 65_000);
    assert_eq!(r.read_i16().unwrap(), -2);
    assert_eq!(r.read_u32().unwrap(), 123_456);
    assert_eq!(r.read_i32().unwrap(), i32::MIN);
    assert_eq!(r.read_u64().unwrap(), u64::MAX);
    assert_eq!(r.read_i64().unwrap(), i64::MIN);
    assert_eq!(r.read_f32().unwrap(), 1.5);
    assert_eq!(r.read_f64().unwrap(), -0.25);
    assert_eq!(r.read_str().unwrap(), None);
    assert_eq!(r.read_str().unwrap(), Some(""));
    assert_eq!(r.read_str().unwrap(), Some("héllo"));
    assert_eq!(r.read_str().unwrap(), Some("h"));
    assert_eq!(r.read_thread().unwrap(), ThreadRef(threads.get(&me).unwrap()));
    assert_eq!(r.read_type().unwrap(), TypeRef(types.get("core::option::Option").unwrap()));
    assert_eq!(r.read_type().unwrap(), TypeRef::NONE);
    assert!(r.read_thread().unwrap().is_none());
    assert!(r.is_empty());
}

#[test]
fn test_mixed_header_classes_share_a_buffer() {
    let mut cursor = heap_cursor(512);
    cursor.write_event(HeaderClass::Small, |w| w.write_u32(1));
    cursor.write_event(HeaderClass::Large, |w| w.write_bytes_raw(&[9; 200]));
    cursor.write_event(HeaderClass::Small, |w| w.write_str(Some("tail")));

    let bytes = committed_of(cursor.buffer());
    let records: Vec<_> = EventReader::new(&bytes).map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert!(!records[0].is_large());
    assert!(records[1].is_large());
    assert_eq!(records[1].size, 204);
    assert_eq!(records[2].payload_reader().read_str().unwrap(), Some("tail"));
}
