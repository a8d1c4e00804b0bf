#[cfg(test)]
mod record_test;

use std::fmt;
use std::time::Instant;

use crate::error::Error;
use crate::message::name::Name;
use crate::message::parser::Parser;
use crate::message::resource::Rdata;
use crate::message::{CLASS_MASK, DnsClass, DnsType};

/// One parsed DNS resource record together with the time it was read off the
/// wire. No field changes after construction.
///
/// `rdata` is `None` only for record types the codec has no decoder for; a
/// recognized type whose payload fails to decode rejects the whole record in
/// [`ParsedRecord::create_from`].
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    name: Name,
    typ: DnsType,
    class: DnsClass,
    ttl: u32,
    rdata: Option<Rdata>,
    time_created: Instant,
}

impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParsedRecord{{Name: {}, Type: {}, Class: {}, TTL: {}}}",
            self.name, self.typ, self.class, self.ttl
        )
    }
}

impl ParsedRecord {
    /// Reads the next resource record from `parser`, in wire order across the
    /// answer, authority and additional sections.
    ///
    /// Returns `None` when the sections are exhausted, when the record
    /// envelope is malformed, or when a recognized type's payload fails to
    /// decode. In the payload-failure case the parser has already advanced
    /// past the record, so a caller looping up to
    /// [`Parser::record_count`](crate::message::parser::Parser::record_count)
    /// times can keep reading the remaining records.
    pub fn create_from(parser: &mut Parser<'_>, time_created: Instant) -> Option<ParsedRecord> {
        let header = match parser.next_record_header() {
            Ok(header) => header,
            Err(Error::ErrSectionDone) => return None,
            Err(err) => {
                log::warn!("malformed resource record header: {err}");
                return None;
            }
        };
        match parser.record_rdata() {
            Ok(rdata) => Some(ParsedRecord {
                name: header.name,
                typ: header.typ,
                class: header.class,
                ttl: header.ttl,
                rdata,
                time_created,
            }),
            Err(err) => {
                log::warn!(
                    "discarding {} record for {}: {err}",
                    header.typ,
                    header.name
                );
                None
            }
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn typ(&self) -> DnsType {
        self.typ
    }

    /// The raw class field, cache-flush bit included.
    pub fn class(&self) -> DnsClass {
        self.class
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn rdata(&self) -> Option<&Rdata> {
        self.rdata.as_ref()
    }

    pub fn time_created(&self) -> Instant {
        self.time_created
    }

    /// Compares two records for equality, ignoring `ttl` and `time_created`.
    ///
    /// With `is_mdns` both class fields are masked with
    /// [`CLASS_MASK`](crate::message::CLASS_MASK) first, so records differing
    /// only in the cache-flush bit compare equal (RFC 6762 section 10.2).
    /// Two records of the same undecoded type compare equal regardless of
    /// their payload bytes; there is no decoded payload to tell them apart.
    pub fn is_equal(&self, other: &ParsedRecord, is_mdns: bool) -> bool {
        let mask = if is_mdns { CLASS_MASK } else { 0xffff };
        self.name == other.name
            && self.class.0 & mask == other.class.0 & mask
            && self.typ == other.typ
            && self.rdata == other.rdata
    }
}
