use std::time::Instant;

use super::*;
use crate::message::parser::Parser;
use crate::message::resource::Rdata;
use crate::message::{DNSCLASS_INET, DnsType};

// A response carrying two PTR records, the second one heavily compressed:
// "_privet._tcp.local" -> "hello._privet._tcp.local" and
// "_printer._tcp.local" -> "hello._printer._tcp.local".
fn sample_ptr_packet() -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x07_privet\x04_tcp\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01]); // PTR, IN
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]); // TTL 1s
    buf.extend_from_slice(&[0x00, 0x08]);
    buf.extend_from_slice(b"\x05hello\xc0\x0c");
    buf.extend_from_slice(b"\x08_printer\xc0\x14");
    buf.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01]);
    buf.extend_from_slice(&[0x00, 0x01, 0x24, 0x75]); // TTL 74869s
    buf.extend_from_slice(&[0x00, 0x08]);
    buf.extend_from_slice(b"\x05hello\xc0\x32");
    buf
}

fn single_a_packet(name: &str, class: u16, ttl: u32, addr: [u8; 4]) -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    for label in name.trim_end_matches('.').split('.') {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&[0x00, 0x01]);
    buf.extend_from_slice(&class.to_be_bytes());
    buf.extend_from_slice(&ttl.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x04]);
    buf.extend_from_slice(&addr);
    buf
}

fn parse_one(buf: &[u8], now: Instant) -> ParsedRecord {
    let mut parser = Parser::default();
    parser.start(buf).unwrap();
    ParsedRecord::create_from(&mut parser, now).unwrap()
}

#[test]
fn test_create_from_reads_records_in_order() {
    let buf = sample_ptr_packet();
    let now = Instant::now();

    let mut parser = Parser::default();
    parser.start(&buf).unwrap();
    assert_eq!(parser.record_count(), 2);

    let first = ParsedRecord::create_from(&mut parser, now).unwrap();
    assert_eq!(first.name().data, "_privet._tcp.local.");
    assert_eq!(first.typ(), DnsType::Ptr);
    assert_eq!(first.class(), DNSCLASS_INET);
    assert_eq!(first.ttl(), 1);
    assert_eq!(first.time_created(), now);
    match first.rdata() {
        Some(Rdata::Ptr(ptr)) => assert_eq!(ptr.ptr.data, "hello._privet._tcp.local."),
        other => panic!("expected PTR rdata, got {other:?}"),
    }

    let second = ParsedRecord::create_from(&mut parser, now).unwrap();
    assert_eq!(second.name().data, "_printer._tcp.local.");
    assert_eq!(second.ttl(), 74869);
    match second.rdata() {
        Some(Rdata::Ptr(ptr)) => assert_eq!(ptr.ptr.data, "hello._printer._tcp.local."),
        other => panic!("expected PTR rdata, got {other:?}"),
    }

    assert!(ParsedRecord::create_from(&mut parser, now).is_none());
}

#[test]
fn test_cache_flush_bit_masked_only_for_mdns() {
    let now = Instant::now();
    let plain = parse_one(&single_a_packet("privet.local", 0x0001, 5, [1, 2, 3, 4]), now);
    let flushed = parse_one(&single_a_packet("privet.local", 0x8001, 5, [1, 2, 3, 4]), now);

    assert!(plain.is_equal(&flushed, true));
    assert!(!plain.is_equal(&flushed, false));
    assert!(plain.is_equal(&plain, false));
}

#[test]
fn test_equality_ignores_ttl_and_creation_time() {
    let t0 = Instant::now();
    let t1 = t0 + std::time::Duration::from_secs(30);
    let a = parse_one(&single_a_packet("privet.local", 1, 5, [1, 2, 3, 4]), t0);
    let b = parse_one(&single_a_packet("privet.local", 1, 500, [1, 2, 3, 4]), t1);
    let c = parse_one(&single_a_packet("privet.local", 1, 5, [9, 9, 9, 9]), t0);

    assert!(a.is_equal(&b, false));
    assert!(!a.is_equal(&c, false));
}

#[test]
fn test_unknown_type_record_is_kept_without_rdata() {
    let now = Instant::now();
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x06privet\x05local\x00");
    buf.extend_from_slice(&[0x7a, 0x69, 0x00, 0x01]); // TYPE 31337, IN
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    buf.extend_from_slice(&[0x00, 0x04, 0xaa, 0xbb, 0xcc, 0xdd]);

    let record = parse_one(&buf, now);
    assert_eq!(record.typ(), DnsType::Unsupported(31337));
    assert!(record.rdata().is_none());

    // Two records of the same undecoded type carry nothing to compare, so
    // they are equal whatever their payload bytes were.
    let mut buf2 = buf.clone();
    let len = buf2.len();
    buf2[len - 4..].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    let other = parse_one(&buf2, now);
    assert!(record.is_equal(&other, true));
}

#[test]
fn test_malformed_recognized_rdata_rejects_record_but_not_scan() {
    let now = Instant::now();
    // Two answers: an A record with a three-byte address, then a good one.
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x03bad\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    buf.extend_from_slice(&[0x00, 0x03, 0xaa, 0xbb, 0xcc]);
    buf.extend_from_slice(b"\x04good\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    buf.extend_from_slice(&[0x00, 0x04, 0x0a, 0x00, 0x00, 0x01]);

    let mut parser = Parser::default();
    parser.start(&buf).unwrap();

    let mut records = vec![];
    for _ in 0..parser.record_count() {
        if let Some(record) = ParsedRecord::create_from(&mut parser, now) {
            records.push(record);
        }
    }

    // The malformed record is dropped; the scan still reaches the next one.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name().data, "good.local.");
    match records[0].rdata() {
        Some(Rdata::A(a)) => assert_eq!(a.a, [10, 0, 0, 1]),
        other => panic!("expected A rdata, got {other:?}"),
    }
}

#[test]
fn test_truncated_envelope_fails_entirely() {
    let now = Instant::now();
    // Claims one answer but stops in the middle of the header.
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x06privet\x05loc");

    let mut parser = Parser::default();
    parser.start(&buf).unwrap();
    assert!(ParsedRecord::create_from(&mut parser, now).is_none());
}
