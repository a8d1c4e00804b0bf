use super::*;
use crate::message::resource::opt::DnsOption;

#[test]
fn test_build_query_wire_format() {
    let query = DnsQuery::new(0x1234, Name::new("example.com").unwrap(), DnsType::A).unwrap();
    assert_eq!(query.id(), 0x1234);
    assert_eq!(query.qname().data, "example.com.");
    assert_eq!(query.qtype(), DnsType::A);

    let expected: &[u8] = &[
        0x12, 0x34, // id
        0x01, 0x00, // RD set
        0x00, 0x01, // 1 question
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // no records
        0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00, // QNAME
        0x00, 0x01, // QTYPE A
        0x00, 0x01, // QCLASS IN
    ];
    assert_eq!(&query.io_buffer()[..], expected);
}

#[test]
fn test_build_query_with_edns0_opt() {
    let mut opt = OptResource::new();
    opt.add_opt(DnsOption {
        code: 1,
        data: vec![0xde, 0xad],
    })
    .unwrap();

    let query =
        DnsQuery::new_with_opt(0, Name::new("example.com").unwrap(), DnsType::Txt, opt).unwrap();
    let buf = query.io_buffer();

    // One additional record.
    assert_eq!(&buf[10..12], &[0x00, 0x01]);

    // The OPT pseudo-record trails the question: root owner, TYPE 41, the
    // advertised payload size in the class field, zeroed TTL, then the
    // options.
    let tail: &[u8] = &[
        0x00, // root name
        0x00, 0x29, // TYPE OPT
        0x10, 0x00, // CLASS 4096
        0x00, 0x00, 0x00, 0x00, // TTL
        0x00, 0x06, // RDLENGTH
        0x00, 0x01, 0x00, 0x02, 0xde, 0xad,
    ];
    assert_eq!(&buf[buf.len() - tail.len()..], tail);

    // Still parseable as a query.
    let parsed = DnsQuery::parse(&buf).unwrap();
    assert_eq!(parsed.qtype(), DnsType::Txt);
}

#[test]
fn test_with_id_restamps_only_the_id() {
    let query = DnsQuery::new(0x1111, Name::new("example.com").unwrap(), DnsType::A).unwrap();
    let restamped = query.with_id(0xabcd);

    assert_eq!(restamped.id(), 0xabcd);
    assert_eq!(restamped.qname().data, "example.com.");
    assert_eq!(&restamped.io_buffer()[..2], &[0xab, 0xcd]);
    assert_eq!(&restamped.io_buffer()[2..], &query.io_buffer()[2..]);
}

#[test]
fn test_parse_round_trip() {
    let query = DnsQuery::new(0x42, Name::new("printer.local").unwrap(), DnsType::Ptr).unwrap();
    let parsed = DnsQuery::parse(&query.io_buffer()).unwrap();
    assert_eq!(parsed.id(), 0x42);
    assert_eq!(parsed.qname().data, "printer.local.");
    assert_eq!(parsed.qtype(), DnsType::Ptr);
}

#[test]
fn test_parse_rejects_responses_and_bad_question_counts() {
    let query = DnsQuery::new(7, Name::new("example.com").unwrap(), DnsType::A).unwrap();

    // Flip the QR bit: a response is not a query.
    let mut response = query.io_buffer().to_vec();
    response[2] |= 0x80;
    assert_eq!(DnsQuery::parse(&response), Err(Error::ErrInvalidQuery));

    // Zero questions.
    let mut no_question = query.io_buffer().to_vec();
    no_question[5] = 0;
    assert_eq!(DnsQuery::parse(&no_question), Err(Error::ErrInvalidQuery));

    // Truncated header.
    assert!(DnsQuery::parse(&[0x00, 0x01, 0x02]).is_err());
}
