use std::collections::HashMap;
use std::fmt;

use super::super::packer::*;
use crate::error::{Error, Result};

// A DnsOption is one EDNS0 option: a (code, data) pair (RFC 6891).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

impl fmt::Display for DnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dnsmessage.DnsOption{{Code: {}, Data: {:02x?}}}",
            self.code, self.data
        )
    }
}

// An OptResource is an OPT pseudo-record (EDNS0).
//
// It keeps both the decoded option list and the raw concatenated option
// bytes; the two are updated together so the raw form can be re-emitted
// verbatim.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct OptResource {
    options: Vec<DnsOption>,
    buf: Vec<u8>,
}

impl fmt::Display for OptResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts: Vec<String> = self.options.iter().map(|o| o.to_string()).collect();
        write!(f, "dnsmessage.OPTResource{{Options: [{}]}}", opts.join(", "))
    }
}

impl OptResource {
    pub fn new() -> Self {
        OptResource::default()
    }

    /// The decoded options, in wire order.
    pub fn opts(&self) -> &[DnsOption] {
        &self.options
    }

    /// The raw concatenated option bytes, exactly as they appear on the wire.
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }

    /// Appends an option, keeping the raw and decoded forms consistent.
    /// Nothing is applied if the option data cannot be encoded.
    pub fn add_opt(&mut self, opt: DnsOption) -> Result<()> {
        if opt.data.len() > u16::MAX as usize {
            return Err(Error::ErrResTooLong);
        }
        self.buf = pack_uint16(std::mem::take(&mut self.buf), opt.code);
        self.buf = pack_uint16(std::mem::take(&mut self.buf), opt.data.len() as u16);
        self.buf.extend_from_slice(&opt.data);
        self.options.push(opt);
        Ok(())
    }

    // pack appends the wire format of the OptResource to msg: the retained
    // raw bytes, verbatim.
    pub(crate) fn pack(
        &self,
        msg: Vec<u8>,
        _compression: &mut Option<HashMap<String, usize>>,
        _compression_off: usize,
    ) -> Result<Vec<u8>> {
        Ok(pack_bytes(msg, &self.buf))
    }

    pub(crate) fn unpack(&mut self, msg: &[u8], mut off: usize, length: usize) -> Result<usize> {
        let begin_off = off;
        let end_off = begin_off + length;
        if end_off > msg.len() {
            return Err(Error::ErrCalcLen);
        }
        let mut options = vec![];
        while off < end_off {
            let (code, new_off) = unpack_uint16(msg, off)?;
            let (l, new_off) = unpack_uint16(msg, new_off)?;
            off = new_off + l as usize;
            if off > end_off {
                return Err(Error::ErrCalcLen);
            }
            options.push(DnsOption {
                code,
                data: msg[new_off..off].to_vec(),
            });
        }
        self.options = options;
        self.buf = msg[begin_off..end_off].to_vec();
        Ok(end_off)
    }
}
