//! # mdns-cache
//!
//! An mDNS record cache with TTL-based expiry and the DNS resource-record
//! codec it feeds on, in sans-I/O style.
//!
//! The crate performs no I/O and starts no threads or timers. The embedding
//! application reads packets from the network, hands the bytes to the
//! [`message`] parser, feeds each [`ParsedRecord`] into an [`MdnsCache`], and
//! decides itself when to call [`MdnsCache::cleanup_records`], typically on
//! every read tick, which the cache makes cheap. All timestamps are supplied
//! by the caller.
//!
//! ## Overview
//!
//! - [`message`]: the wire codec. RFC 1035 names with compression pointers,
//!   the fixed header, questions, and typed record payloads (A, AAAA, CNAME,
//!   PTR, SRV, TXT, NSEC, OPT).
//! - [`ParsedRecord`]: one parsed resource record plus the time it was
//!   received, with the mDNS cache-flush-aware equality used for change
//!   detection.
//! - [`MdnsCache`]: the ordered record store. Update classification,
//!   TTL-0 goodbye handling, lazy expiry behind a cached next-expiration
//!   bound, wildcard lookups, and entry-limit eviction.
//! - [`DnsQuery`]: builds and parses single-question query packets,
//!   optionally with an EDNS0 OPT pseudo-record.
//!
//! ## Feeding the cache
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use std::time::Instant;
//!
//! use mdns_cache::message::parser::Parser;
//! use mdns_cache::{MdnsCache, ParsedRecord};
//!
//! let mut cache = MdnsCache::new();
//!
//! // packet: bytes received from the mDNS multicast group
//! let now = Instant::now();
//! let mut parser = Parser::default();
//! parser.start(packet)?;
//! for _ in 0..parser.record_count() {
//!     if let Some(record) = ParsedRecord::create_from(&mut parser, now) {
//!         cache.update_dns_record(Rc::new(record));
//!     }
//! }
//!
//! // Answer queries out of the cache, then let expiry run.
//! let live = cache.find_dns_records(1, "printer.local.", now);
//! cache.cleanup_records(now, |record| {
//!     println!("expired: {record}");
//! });
//! ```
//!
//! The cache is a plain synchronous data structure. Calls from several
//! threads must be serialized externally; in exchange, borrow lifetimes and
//! performance are predictable.

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod cache;
pub mod error;
pub mod message;
pub mod query;
pub mod record;

pub use cache::{CacheKey, DEFAULT_ENTRY_LIMIT, MdnsCache, MdnsCacheConfig, UpdateType};
pub use error::{Error, Result};
pub use message::name::Name;
pub use message::{CLASS_CACHE_FLUSH_BIT, CLASS_MASK, DNSCLASS_INET, DnsClass, DnsType, Message};
pub use query::DnsQuery;
pub use record::ParsedRecord;
