
pub mod header;
pub mod name;
mod packer;
pub mod parser;
pub mod question;
pub mod resource;

use std::collections::HashMap;
use std::fmt;

use header::*;
use question::*;
use resource::*;

use crate::error::{Error, Result};

// A DnsType is a type of DNS request and response.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DnsType {
    A,
    Cname,
    Ptr,
    Txt,
    Aaaa,
    Srv,
    Opt,
    Nsec,

    // question-only wildcard
    All,

    // Anything we have no decoder for, with its wire value preserved.
    Unsupported(u16),
}

impl Default for DnsType {
    fn default() -> Self {
        DnsType::Unsupported(0)
    }
}

impl From<u16> for DnsType {
    fn from(v: u16) -> Self {
        match v {
            1 => DnsType::A,
            5 => DnsType::Cname,
            12 => DnsType::Ptr,
            16 => DnsType::Txt,
            28 => DnsType::Aaaa,
            33 => DnsType::Srv,
            41 => DnsType::Opt,
            47 => DnsType::Nsec,
            255 => DnsType::All,
            _ => DnsType::Unsupported(v),
        }
    }
}

impl From<DnsType> for u16 {
    fn from(t: DnsType) -> u16 {
        match t {
            DnsType::A => 1,
            DnsType::Cname => 5,
            DnsType::Ptr => 12,
            DnsType::Txt => 16,
            DnsType::Aaaa => 28,
            DnsType::Srv => 33,
            DnsType::Opt => 41,
            DnsType::Nsec => 47,
            DnsType::All => 255,
            DnsType::Unsupported(v) => v,
        }
    }
}

impl fmt::Display for DnsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DnsType::A => write!(f, "A"),
            DnsType::Cname => write!(f, "CNAME"),
            DnsType::Ptr => write!(f, "PTR"),
            DnsType::Txt => write!(f, "TXT"),
            DnsType::Aaaa => write!(f, "AAAA"),
            DnsType::Srv => write!(f, "SRV"),
            DnsType::Opt => write!(f, "OPT"),
            DnsType::Nsec => write!(f, "NSEC"),
            DnsType::All => write!(f, "ALL"),
            DnsType::Unsupported(v) => write!(f, "TYPE{v}"),
        }
    }
}

impl DnsType {
    /// The IANA type code of this record type.
    pub fn value(&self) -> u16 {
        u16::from(*self)
    }

    // pack appends the wire format of the type to msg.
    pub(crate) fn pack(&self, msg: Vec<u8>) -> Vec<u8> {
        packer::pack_uint16(msg, self.value())
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        let (t, o) = packer::unpack_uint16(msg, off)?;
        *self = DnsType::from(t);
        Ok(o)
    }

    pub(crate) fn skip(msg: &[u8], off: usize) -> Result<usize> {
        packer::skip_uint16(msg, off)
    }
}

// A DnsClass is a class of network.
//
// In the mDNS context the top bit of the class field is the cache-flush flag
// (RFC 6762 section 10.2), so record comparisons mask it out.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct DnsClass(pub u16);

/// Internet class (IN), used for essentially all records.
pub const DNSCLASS_INET: DnsClass = DnsClass(1);

/// Any class (*), valid only in questions.
pub const DNSCLASS_ANY: DnsClass = DnsClass(255);

/// The mDNS cache-flush bit carried in the class field.
pub const CLASS_CACHE_FLUSH_BIT: u16 = 0x8000;

/// Mask stripping the cache-flush bit, leaving the plain class.
pub const CLASS_MASK: u16 = 0x7fff;

impl fmt::Display for DnsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DNSCLASS_INET => write!(f, "ClassINET"),
            DNSCLASS_ANY => write!(f, "ClassANY"),
            DnsClass(v) => write!(f, "{v}"),
        }
    }
}

impl DnsClass {
    // pack appends the wire format of the class to msg.
    pub(crate) fn pack(&self, msg: Vec<u8>) -> Vec<u8> {
        packer::pack_uint16(msg, self.0)
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], off: usize) -> Result<usize> {
        let (c, o) = packer::unpack_uint16(msg, off)?;
        *self = DnsClass(c);
        Ok(o)
    }

    pub(crate) fn skip(msg: &[u8], off: usize) -> Result<usize> {
        packer::skip_uint16(msg, off)
    }
}

// An OpCode is a DNS operation code.
pub type OpCode = u16;

// An RCode is a DNS response status code.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum RCode {
    #[default]
    Success = 0,
    FormatError = 1,
    ServerFailure = 2,
    NameError = 3,
    NotImplemented = 4,
    Refused = 5,
    Unsupported,
}

impl From<u8> for RCode {
    fn from(v: u8) -> Self {
        match v {
            0 => RCode::Success,
            1 => RCode::FormatError,
            2 => RCode::ServerFailure,
            3 => RCode::NameError,
            4 => RCode::NotImplemented,
            5 => RCode::Refused,
            _ => RCode::Unsupported,
        }
    }
}

impl fmt::Display for RCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RCode::Success => "RCodeSuccess",
            RCode::FormatError => "RCodeFormatError",
            RCode::ServerFailure => "RCodeServerFailure",
            RCode::NameError => "RCodeNameError",
            RCode::NotImplemented => "RCodeNotImplemented",
            RCode::Refused => "RCodeRefused",
            RCode::Unsupported => "RCodeUnsupported",
        };
        write!(f, "{s}")
    }
}

// Internal constants.

// PACK_STARTING_CAP is the default initial buffer size allocated during
// packing. Most DNS responses fit in the 512-byte UDP limit.
const PACK_STARTING_CAP: usize = 512;

// UINT16LEN is the length (in bytes) of a uint16.
pub(crate) const UINT16LEN: usize = 2;

// UINT32LEN is the length (in bytes) of a uint32.
pub(crate) const UINT32LEN: usize = 4;

// HEADER_LEN is the length (in bytes) of a DNS header: six uint16s, no
// padding.
pub(crate) const HEADER_LEN: usize = 6 * UINT16LEN;

pub(crate) const HEADER_BIT_QR: u16 = 1 << 15; // query/response (response=1)
pub(crate) const HEADER_BIT_AA: u16 = 1 << 10; // authoritative
pub(crate) const HEADER_BIT_TC: u16 = 1 << 9; // truncated
pub(crate) const HEADER_BIT_RD: u16 = 1 << 8; // recursion desired
pub(crate) const HEADER_BIT_RA: u16 = 1 << 7; // recursion available

/// Maximum wire length of an encoded domain name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum size of a DNS message over unicast UDP (RFC 1035).
pub const MAX_UDP_SIZE: usize = 512;

/// Maximum size of an mDNS message (RFC 6762 section 17).
pub const MAX_MULTICAST_SIZE: usize = 9000;

// Message is a representation of a DNS message.
#[derive(Default, Debug)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Resource>,
    pub authorities: Vec<Resource>,
    pub additionals: Vec<Resource>,
}

impl Message {
    // unpack parses a full Message.
    pub fn unpack(&mut self, msg: &[u8]) -> Result<()> {
        let mut p = parser::Parser::default();
        self.header = p.start(msg)?;
        self.questions = p.all_questions()?;
        self.answers = p.all_answers()?;
        self.authorities = p.all_authorities()?;
        self.additionals = p.all_additionals()?;
        Ok(())
    }

    // pack packs a full Message.
    pub fn pack(&mut self) -> Result<Vec<u8>> {
        self.append_pack(Vec::with_capacity(PACK_STARTING_CAP))
    }

    // append_pack is like pack but appends the full Message to b and returns
    // the extended buffer.
    pub fn append_pack(&mut self, b: Vec<u8>) -> Result<Vec<u8>> {
        // It is unlikely that anyone will try to pack more than 65535 of any
        // particular section, but it is possible and should fail gracefully.
        if self.questions.len() > u16::MAX as usize {
            return Err(Error::ErrTooManyQuestions);
        }
        if self.answers.len() > u16::MAX as usize {
            return Err(Error::ErrTooManyAnswers);
        }
        if self.authorities.len() > u16::MAX as usize {
            return Err(Error::ErrTooManyAuthorities);
        }
        if self.additionals.len() > u16::MAX as usize {
            return Err(Error::ErrTooManyAdditionals);
        }

        let (id, bits) = self.header.pack();

        let h = HeaderInternal {
            id,
            bits,
            questions: self.questions.len() as u16,
            answers: self.answers.len() as u16,
            authorities: self.authorities.len() as u16,
            additionals: self.additionals.len() as u16,
        };

        let compression_off = b.len();
        let mut msg = h.pack(b);

        // RFC 1035 allows (but does not require) compression when packing,
        // and requires unpacking implementations to support it, so it is
        // enabled unconditionally. It keeps typical responses under the
        // 512-byte UDP limit.
        let mut compression = Some(HashMap::new());

        for question in &self.questions {
            msg = question.pack(msg, &mut compression, compression_off)?;
        }
        for answer in &mut self.answers {
            msg = answer.pack(msg, &mut compression, compression_off)?;
        }
        for authority in &mut self.authorities {
            msg = authority.pack(msg, &mut compression, compression_off)?;
        }
        for additional in &mut self.additionals {
            msg = additional.pack(msg, &mut compression, compression_off)?;
        }

        Ok(msg)
    }
}
