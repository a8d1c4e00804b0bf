#[cfg(test)]
mod query_test;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::message::header::Header;
use crate::message::name::Name;
use crate::message::parser::Parser;
use crate::message::question::Question;
use crate::message::resource::opt::OptResource;
use crate::message::resource::{Rdata, Resource, ResourceHeader};
use crate::message::{DNSCLASS_INET, DnsType, Message};

// UDP payload size advertised in the EDNS0 OPT pseudo-record (RFC 6891).
const EDNS0_PAYLOAD_SIZE: u16 = 4096;

/// A single-question DNS query and its packed wire image.
///
/// The image is built once at construction; [`DnsQuery::io_buffer`] hands it
/// out for transmission without re-encoding.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    id: u16,
    qname: Name,
    qtype: DnsType,
    io_buffer: Bytes,
}

impl DnsQuery {
    /// Builds a query for `qname`/`qtype` with the given transaction id.
    pub fn new(id: u16, qname: Name, qtype: DnsType) -> Result<DnsQuery> {
        Self::build(id, qname, qtype, None)
    }

    /// Like [`DnsQuery::new`], additionally carrying the given EDNS0 options
    /// in an OPT pseudo-record appended to the additional section.
    pub fn new_with_opt(
        id: u16,
        qname: Name,
        qtype: DnsType,
        opt: OptResource,
    ) -> Result<DnsQuery> {
        Self::build(id, qname, qtype, Some(opt))
    }

    fn build(id: u16, qname: Name, qtype: DnsType, opt: Option<OptResource>) -> Result<DnsQuery> {
        let mut msg = Message {
            header: Header {
                id,
                recursion_desired: true,
                ..Default::default()
            },
            questions: vec![Question {
                name: qname.clone(),
                typ: qtype,
                class: DNSCLASS_INET,
            }],
            ..Default::default()
        };

        if let Some(opt) = opt {
            let mut header = ResourceHeader::default();
            header.set_edns0(EDNS0_PAYLOAD_SIZE)?;
            msg.additionals.push(Resource {
                header,
                body: Some(Rdata::Opt(opt)),
            });
        }

        let buf = msg.pack()?;
        log::trace!("built {} query for {} ({} bytes)", qtype, qname, buf.len());
        Ok(DnsQuery {
            id,
            qname,
            qtype,
            io_buffer: Bytes::from(buf),
        })
    }

    /// Parses a wire-format message, accepting it only if it is a query
    /// (QR clear) with exactly one question.
    pub fn parse(msg: &[u8]) -> Result<DnsQuery> {
        let mut parser = Parser::default();
        let header = parser.start(msg)?;
        if header.response {
            return Err(Error::ErrInvalidQuery);
        }
        let question = parser.question().map_err(|_| Error::ErrInvalidQuery)?;
        match parser.question() {
            Err(Error::ErrSectionDone) => {}
            _ => return Err(Error::ErrInvalidQuery),
        }
        Ok(DnsQuery {
            id: header.id,
            qname: question.name,
            qtype: question.typ,
            io_buffer: Bytes::copy_from_slice(msg),
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn qname(&self) -> &Name {
        &self.qname
    }

    pub fn qtype(&self) -> DnsType {
        self.qtype
    }

    /// The packed wire image, ready to hand to a transport.
    pub fn io_buffer(&self) -> Bytes {
        self.io_buffer.clone()
    }

    /// A copy of this query re-stamped with a new transaction id. Only the
    /// two id bytes of the wire image change; the question is not re-encoded.
    pub fn with_id(&self, id: u16) -> DnsQuery {
        let mut buf = self.io_buffer.to_vec();
        buf[0] = (id >> 8) as u8;
        buf[1] = id as u8;
        DnsQuery {
            id,
            qname: self.qname.clone(),
            qtype: self.qtype,
            io_buffer: Bytes::from(buf),
        }
    }
}
