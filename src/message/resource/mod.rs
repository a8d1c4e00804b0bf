pub mod a;
pub mod aaaa;
pub mod cname;
pub mod nsec;
pub mod opt;
pub mod ptr;
pub mod srv;
pub mod txt;

use std::collections::HashMap;
use std::fmt;

use a::*;
use aaaa::*;
use cname::*;
use nsec::*;
use opt::*;
use ptr::*;
use srv::*;
use txt::*;

use super::name::*;
use super::packer::*;
use super::*;
use crate::error::{Error, Result};

// A Resource is a DNS resource record.
//
// body is None when the record's type has no decoder; the header fields are
// still meaningful then.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub header: ResourceHeader,
    pub body: Option<Rdata>,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.Resource{{Header: {}, Body: {}}}",
            self.header,
            if let Some(body) = &self.body {
                body.to_string()
            } else {
                "None".to_owned()
            }
        )
    }
}

impl Resource {
    // pack appends the wire format of the Resource to msg.
    pub(crate) fn pack(
        &mut self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<Vec<u8>> {
        let body = self.body.as_ref().ok_or(Error::ErrNilResourceBody)?;
        self.header.typ = body.real_type();
        let (mut msg, len_off) = self.header.pack(msg, compression, compression_off)?;
        let pre_len = msg.len();
        msg = body.pack(msg, compression, compression_off, &self.header.name)?;
        self.header.fix_len(&mut msg, len_off, pre_len)?;
        Ok(msg)
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], mut off: usize) -> Result<usize> {
        off = self.header.unpack(msg, off)?;
        let (body, off) = Rdata::unpack(self.header.typ, msg, off, self.header.length as usize)?;
        self.body = body;
        Ok(off)
    }

    pub(crate) fn skip(msg: &[u8], off: usize) -> Result<usize> {
        let mut new_off = Name::skip(msg, off)?;
        new_off = DnsType::skip(msg, new_off)?;
        new_off = DnsClass::skip(msg, new_off)?;
        new_off = skip_uint32(msg, new_off)?;
        let (length, mut new_off) = unpack_uint16(msg, new_off)?;
        new_off += length as usize;
        if new_off > msg.len() {
            return Err(Error::ErrResourceLen);
        }
        Ok(new_off)
    }
}

// A ResourceHeader is the fields every resource record starts with:
// NAME, TYPE, CLASS, TTL and RDLENGTH, in that wire order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ResourceHeader {
    /// The domain name this record pertains to.
    pub name: Name,

    /// The record type. Set automatically during packing.
    pub typ: DnsType,

    /// The class, usually [`DNSCLASS_INET`](super::DNSCLASS_INET). In mDNS
    /// responses the top bit doubles as the cache-flush flag.
    pub class: DnsClass,

    /// Time to live in seconds. Zero announces imminent removal in mDNS.
    pub ttl: u32,

    /// Length of the record data. Set automatically during packing.
    pub length: u16,
}

impl fmt::Display for ResourceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.ResourceHeader{{Name: {}, Type: {}, Class: {}, TTL: {}, Length: {}}}",
            self.name, self.typ, self.class, self.ttl, self.length,
        )
    }
}

impl ResourceHeader {
    // pack appends the wire format of the ResourceHeader to msg.
    //
    // The returned len_off is the offset in msg where the Length field was
    // packed, for fix_len once the body size is known.
    pub(crate) fn pack(
        &self,
        mut msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
    ) -> Result<(Vec<u8>, usize)> {
        msg = self.name.pack(msg, compression, compression_off)?;
        msg = self.typ.pack(msg);
        msg = self.class.pack(msg);
        msg = pack_uint32(msg, self.ttl);
        let len_off = msg.len();
        msg = pack_uint16(msg, self.length);
        Ok((msg, len_off))
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        let mut new_off = off;
        new_off = self.name.unpack(msg, new_off)?;
        new_off = self.typ.unpack(msg, new_off)?;
        new_off = self.class.unpack(msg, new_off)?;
        let (ttl, new_off) = unpack_uint32(msg, new_off)?;
        self.ttl = ttl;
        let (l, new_off) = unpack_uint16(msg, new_off)?;
        self.length = l;

        Ok(new_off)
    }

    // fix_len updates a packed ResourceHeader to include the length of the
    // ResourceBody.
    //
    // len_off is the offset of the Length field in msg; pre_len is the length
    // msg had before the body was packed.
    pub(crate) fn fix_len(&mut self, msg: &mut [u8], len_off: usize, pre_len: usize) -> Result<()> {
        if msg.len() < pre_len || msg.len() > pre_len + u16::MAX as usize {
            return Err(Error::ErrResTooLong);
        }

        let con_len = msg.len() - pre_len;

        msg[len_off] = ((con_len >> 8) & 0xff) as u8;
        msg[len_off + 1] = (con_len & 0xff) as u8;
        self.length = con_len as u16;

        Ok(())
    }

    /// Configures this header as an EDNS0 OPT pseudo-record (RFC 6891
    /// section 6.1.2): root owner name, the requestor's maximum UDP payload
    /// size in the class field, extended RCODE and flags cleared.
    pub fn set_edns0(&mut self, udp_payload_len: u16) -> Result<()> {
        self.name = Name::new(".")?;
        self.typ = DnsType::Opt;
        self.class = DnsClass(udp_payload_len);
        self.ttl = 0;
        Ok(())
    }
}

// The decoded, typed payload of a resource record.
//
// The record-type set is fixed by the protocol, so the payload is a closed
// sum over the supported types; comparisons and packing dispatch on the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rdata {
    A(AResource),
    Aaaa(AaaaResource),
    Cname(CnameResource),
    Ptr(PtrResource),
    Srv(SrvResource),
    Txt(TxtResource),
    Nsec(NsecResource),
    Opt(OptResource),
}

impl fmt::Display for Rdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rdata::A(r) => fmt::Display::fmt(r, f),
            Rdata::Aaaa(r) => fmt::Display::fmt(r, f),
            Rdata::Cname(r) => fmt::Display::fmt(r, f),
            Rdata::Ptr(r) => fmt::Display::fmt(r, f),
            Rdata::Srv(r) => fmt::Display::fmt(r, f),
            Rdata::Txt(r) => fmt::Display::fmt(r, f),
            Rdata::Nsec(r) => fmt::Display::fmt(r, f),
            Rdata::Opt(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl Rdata {
    // real_type returns the type tag matching this payload. It is used to
    // fill in the header Type field when packing.
    pub fn real_type(&self) -> DnsType {
        match self {
            Rdata::A(_) => DnsType::A,
            Rdata::Aaaa(_) => DnsType::Aaaa,
            Rdata::Cname(_) => DnsType::Cname,
            Rdata::Ptr(_) => DnsType::Ptr,
            Rdata::Srv(_) => DnsType::Srv,
            Rdata::Txt(_) => DnsType::Txt,
            Rdata::Nsec(_) => DnsType::Nsec,
            Rdata::Opt(_) => DnsType::Opt,
        }
    }

    // pack appends the wire format of the payload to msg. owner is the
    // record's own name; the mDNS NSEC form re-emits it as the next-domain
    // field.
    pub(crate) fn pack(
        &self,
        msg: Vec<u8>,
        compression: &mut Option<HashMap<String, usize>>,
        compression_off: usize,
        owner: &Name,
    ) -> Result<Vec<u8>> {
        match self {
            Rdata::A(r) => r.pack(msg, compression, compression_off),
            Rdata::Aaaa(r) => r.pack(msg, compression, compression_off),
            Rdata::Cname(r) => r.pack(msg, compression, compression_off),
            Rdata::Ptr(r) => r.pack(msg, compression, compression_off),
            Rdata::Srv(r) => r.pack(msg, compression, compression_off),
            Rdata::Txt(r) => r.pack(msg, compression, compression_off),
            Rdata::Nsec(r) => r.pack(msg, compression, compression_off, owner),
            Rdata::Opt(r) => r.pack(msg, compression, compression_off),
        }
    }

    // unpack decodes one record body of the given type from msg, starting at
    // off and declared to span length bytes.
    //
    // Returns Ok((None, ..)) for a type with no decoder; the caller keeps the
    // record envelope and skips the body. A type with a decoder must both
    // parse and consume the declared length exactly, otherwise the record is
    // malformed and the whole unpack fails.
    pub(crate) fn unpack(
        typ: DnsType,
        msg: &[u8],
        off: usize,
        length: usize,
    ) -> Result<(Option<Rdata>, usize)> {
        let end_off = off + length;
        if end_off > msg.len() {
            return Err(Error::ErrResourceLen);
        }

        let (body, new_off) = match typ {
            DnsType::A => {
                let mut r = AResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::A(r), new_off)
            }
            DnsType::Aaaa => {
                let mut r = AaaaResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Aaaa(r), new_off)
            }
            DnsType::Cname => {
                let mut r = CnameResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Cname(r), new_off)
            }
            DnsType::Ptr => {
                let mut r = PtrResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Ptr(r), new_off)
            }
            DnsType::Srv => {
                let mut r = SrvResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Srv(r), new_off)
            }
            DnsType::Txt => {
                let mut r = TxtResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Txt(r), new_off)
            }
            DnsType::Nsec => {
                let mut r = NsecResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Nsec(r), new_off)
            }
            DnsType::Opt => {
                let mut r = OptResource::default();
                let new_off = r.unpack(msg, off, length)?;
                (Rdata::Opt(r), new_off)
            }
            _ => return Ok((None, end_off)),
        };

        if new_off != end_off {
            return Err(Error::ErrResourceLen);
        }

        Ok((Some(body), new_off))
    }
}
