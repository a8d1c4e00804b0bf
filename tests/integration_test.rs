//! Integration tests for mdns-cache
//!
//! These drive whole packets through the parser into the cache and back out
//! through queries, without any network I/O.

use std::rc::Rc;
use std::time::{Duration, Instant};

use mdns_cache::message::parser::Parser;
use mdns_cache::message::resource::Rdata;
use mdns_cache::{
    DnsQuery, DnsType, MdnsCache, MdnsCacheConfig, Name, ParsedRecord, UpdateType,
};

/// Parses every record in `packet` (received at `now`) into `cache`,
/// returning the update classifications in order. Malformed records are
/// skipped, the way a packet-processing loop would.
fn feed_packet(cache: &mut MdnsCache, packet: &[u8], now: Instant) -> Vec<UpdateType> {
    let mut parser = Parser::default();
    parser.start(packet).expect("packet header must parse");
    let mut updates = vec![];
    for _ in 0..parser.record_count() {
        if let Some(record) = ParsedRecord::create_from(&mut parser, now) {
            updates.push(cache.update_dns_record(Rc::new(record)));
        }
    }
    updates
}

/// A response with two PTR answers for different service types, the second
/// one built almost entirely out of compression pointers.
fn ptr_announcement_packet() -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x07_privet\x04_tcp\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01]);
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

/// Two PTR answers for the same owner pointing at different instances.
fn two_instance_ptr_packet(ttl: u32) -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x07_privet\x04_tcp\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01]);
    buf.extend_from_slice(&ttl.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x06]);
    buf.extend_from_slice(b"\x03one\xc0\x0c");
    buf.extend_from_slice(b"\xc0\x0c");
    buf.extend_from_slice(&[0x00, 0x0c, 0x00, 0x01]);
    buf.extend_from_slice(&ttl.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x06]);
    buf.extend_from_slice(b"\x03two\xc0\x0c");
    buf
}

/// An NSEC record for "_privet._tcp.local" whose type bitmap carries a
/// single set bit.
fn nsec_packet() -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x81, 0x80, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x07_privet\x04_tcp\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x2f, 0x00, 0x01]); // NSEC, IN
    buf.extend_from_slice(&[0x00, 0x01, 0x24, 0x74]);
    buf.extend_from_slice(&[0x00, 0x06]);
    buf.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x02, 0x00, 0x08]);
    buf
}

fn single_a_packet(name: &str, ttl: u32, addr: [u8; 4]) -> Vec<u8> {
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];
    for label in name.trim_end_matches('.').split('.') {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&ttl.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x04]);
    buf.extend_from_slice(&addr);
    buf
}

#[test]
fn test_packet_to_cache_to_expiry() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();

    let updates = feed_packet(&mut cache, &ptr_announcement_packet(), t0);
    assert_eq!(updates, vec![UpdateType::RecordAdded, UpdateType::RecordAdded]);
    assert_eq!(cache.len(), 2);

    // Both answerable right away.
    assert_eq!(
        cache
            .find_dns_records(DnsType::Ptr.value(), "_privet._tcp.local.", t0)
            .len(),
        1
    );
    assert_eq!(
        cache
            .find_dns_records(DnsType::Ptr.value(), "_printer._tcp.local.", t0)
            .len(),
        1
    );

    // After two seconds the TTL-1 record is gone; the long-lived one stays.
    let t2 = t0 + Duration::from_secs(2);
    let mut removed = vec![];
    cache.cleanup_records(t2, |record| removed.push(record.name().data.clone()));
    assert_eq!(removed, vec!["_privet._tcp.local.".to_owned()]);
    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache.next_expiration(),
        Some(t0 + Duration::from_secs(74869))
    );
    assert!(
        cache
            .find_dns_records(DnsType::Ptr.value(), "_privet._tcp.local.", t2)
            .is_empty()
    );
}

#[test]
fn test_same_owner_ptr_instances_coexist() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();

    let updates = feed_packet(&mut cache, &two_instance_ptr_packet(120), t0);
    assert_eq!(updates, vec![UpdateType::RecordAdded, UpdateType::RecordAdded]);

    let results = cache.find_dns_records(DnsType::Ptr.value(), "_privet._tcp.local.", t0);
    assert_eq!(results.len(), 2);
    let mut targets: Vec<String> = results
        .iter()
        .map(|record| match record.rdata() {
            Some(Rdata::Ptr(ptr)) => ptr.ptr.data.clone(),
            other => panic!("expected PTR rdata, got {other:?}"),
        })
        .collect();
    targets.sort();
    assert_eq!(
        targets,
        vec![
            "one._privet._tcp.local.".to_owned(),
            "two._privet._tcp.local.".to_owned()
        ]
    );
}

#[test]
fn test_goodbye_flow() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();

    feed_packet(&mut cache, &two_instance_ptr_packet(120), t0);
    assert_eq!(cache.len(), 2);

    // The goodbye announcement re-lists both instances with TTL 0. It is a
    // refresh, not a change, and pulls each record into the one-second
    // grace window.
    let t1 = t0 + Duration::from_secs(30);
    let updates = feed_packet(&mut cache, &two_instance_ptr_packet(0), t1);
    assert_eq!(updates, vec![UpdateType::NoChange, UpdateType::NoChange]);
    assert_eq!(cache.len(), 2);

    // Still answerable inside the grace window.
    assert_eq!(
        cache
            .find_dns_records(DnsType::Ptr.value(), "_privet._tcp.local.", t1)
            .len(),
        2
    );

    let mut removed = 0;
    cache.cleanup_records(t1 + Duration::from_secs(1), |_| removed += 1);
    assert_eq!(removed, 2);
    assert!(cache.is_empty());

    // A goodbye for something never cached stays a no-op.
    let updates = feed_packet(&mut cache, &two_instance_ptr_packet(0), t1);
    assert_eq!(updates, vec![UpdateType::NoChange, UpdateType::NoChange]);
    assert!(cache.is_empty());
}

#[test]
fn test_nsec_record_reaches_cache_with_bitmap() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();

    let updates = feed_packet(&mut cache, &nsec_packet(), t0);
    assert_eq!(updates, vec![UpdateType::RecordAdded]);

    let results = cache.find_dns_records(DnsType::Nsec.value(), "_privet._tcp.local.", t0);
    assert_eq!(results.len(), 1);
    match results[0].rdata() {
        Some(Rdata::Nsec(nsec)) => {
            assert_eq!(nsec.bitmap, vec![0x00, 0x08]);
            assert!(nsec.bit(12));
            assert!(!nsec.bit(1));
            assert!(!nsec.bit(500));
        }
        other => panic!("expected NSEC rdata, got {other:?}"),
    }
}

#[test]
fn test_overfill_clears_on_next_cleanup() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::with_config(MdnsCacheConfig::new().with_entry_limit(2));

    feed_packet(&mut cache, &single_a_packet("one.local", 3600, [10, 0, 0, 1]), t0);
    feed_packet(&mut cache, &single_a_packet("two.local", 3600, [10, 0, 0, 2]), t0);
    feed_packet(
        &mut cache,
        &single_a_packet("three.local", 3600, [10, 0, 0, 3]),
        t0,
    );
    assert!(cache.is_cache_overfilled());

    let mut removed = 0;
    cache.cleanup_records(t0, |_| removed += 1);
    assert_eq!(removed, 3);
    assert!(cache.is_empty());

    // The cache heals: new records are accepted as usual.
    let updates = feed_packet(
        &mut cache,
        &single_a_packet("four.local", 3600, [10, 0, 0, 4]),
        t0,
    );
    assert_eq!(updates, vec![UpdateType::RecordAdded]);
}

#[test]
fn test_query_answered_from_cache() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();
    feed_packet(
        &mut cache,
        &single_a_packet("printer.local", 120, [192, 168, 1, 9]),
        t0,
    );

    // A resolver builds a query; the answering side parses it and serves
    // records straight out of the cache.
    let query = DnsQuery::new(0x99, Name::new("Printer.Local").unwrap(), DnsType::A).unwrap();
    let received = DnsQuery::parse(&query.io_buffer()).unwrap();

    let answers = cache.find_dns_records(
        received.qtype().value(),
        &received.qname().data,
        t0 + Duration::from_secs(5),
    );
    assert_eq!(answers.len(), 1);
    match answers[0].rdata() {
        Some(Rdata::A(a)) => assert_eq!(a.a, [192, 168, 1, 9]),
        other => panic!("expected A rdata, got {other:?}"),
    }
}

#[test]
fn test_malformed_record_does_not_poison_packet() {
    let t0 = Instant::now();
    let mut cache = MdnsCache::new();

    // Two answers; the first A record's RDLENGTH cannot hold an address.
    let mut buf = vec![
        0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
    ];
    buf.extend_from_slice(b"\x03bad\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    buf.extend_from_slice(&[0x00, 0x02, 0xaa, 0xbb]);
    buf.extend_from_slice(b"\x04good\x05local\x00");
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x10]);
    buf.extend_from_slice(&[0x00, 0x04, 0x0a, 0x00, 0x00, 0x09]);

    let updates = feed_packet(&mut cache, &buf, t0);
    assert_eq!(updates, vec![UpdateType::RecordAdded]);
    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache
            .find_dns_records(DnsType::A.value(), "good.local.", t0)
            .len(),
        1
    );
}
